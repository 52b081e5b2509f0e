use std::fs;

use auto_motion::confounds::{CANONICAL_CHANNELS, ConfoundTable};
use auto_motion::error::SchemaError;
use auto_motion::identifier::Identifier;
use auto_motion::realignment::{Realignment, RealignmentMode, compute};
use tempfile::TempDir;

// Canonical channels, zero everywhere except the motion parameters.
fn motion_table(rows: &[[f64; 6]]) -> ConfoundTable {
    let names: Vec<String> = CANONICAL_CHANNELS.iter().map(|s| s.to_string()).collect();
    let columns: Vec<Vec<f64>> = CANONICAL_CHANNELS
        .iter()
        .map(|name| {
            let idx = ["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z"]
                .iter()
                .position(|m| m == name);
            rows.iter()
                .map(|r| idx.map(|i| r[i]).unwrap_or(0.0))
                .collect()
        })
        .collect();
    ConfoundTable::new(names, columns).unwrap()
}

fn subject() -> Identifier {
    Identifier::new("SUBJECT_ID", "1", "TASK", "1")
}

#[test]
fn writes_file_under_bids_layout() {
    let tmp = TempDir::new().unwrap();
    let writer = Realignment::new(tmp.path().join("rp_txt")).unwrap();
    let data = motion_table(&[[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);

    let path = writer
        .write(&subject(), RealignmentMode::Euclidean, &data, &[0])
        .unwrap();

    assert_eq!(
        path,
        tmp.path().join(
            "rp_txt/sub-SUBJECT_ID/ses-wave1/func/sub-SUBJECT_ID_ses-wave1_task-TASK_acq-1-realignment_parameters.txt"
        )
    );
    assert!(path.exists());
    assert_eq!(path, writer.output_path(&subject()));
}

#[test]
fn euclidean_values_and_derivatives() {
    let tmp = TempDir::new().unwrap();
    let writer = Realignment::new(tmp.path()).unwrap();
    let data = motion_table(&[
        [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        [2.0, 2.0, 2.0, 0.02, 0.02, 0.02],
    ]);

    let path = writer
        .write(&subject(), RealignmentMode::Euclidean, &data, &[0, 1])
        .unwrap();
    let text = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    assert_eq!(
        lines[0],
        "3.7416574   438.7482194   3.7416574   438.7482194   0"
    );
    let second: Vec<&str> = lines[1].split("   ").collect();
    assert_eq!(second.len(), 5);
    assert_eq!(second[0], "3.4641016");
    assert_eq!(second[1], "1.7320508");
    assert_eq!(second[4], "1");
    let d_trans: f64 = second[2].parse().unwrap();
    let d_rot: f64 = second[3].parse().unwrap();
    assert!((d_trans - (3.4641016 - 3.7416574)).abs() < 1e-6);
    assert!((d_rot - (1.7320508 - 438.7482194)).abs() < 1e-6);
}

#[test]
fn raw_mode_keeps_six_channels() {
    let data = motion_table(&[[0.1, 0.2, 0.3, 0.01, 0.02, 0.03]]);
    let rows = compute(&subject(), RealignmentMode::Raw, &data, &[1]).unwrap();
    assert_eq!(rows.values, vec![vec![0.1, 0.2, 0.3, 0.01, 0.02, 0.03]]);
    assert_eq!(rows.labels, vec![1]);
    assert_eq!(RealignmentMode::Raw.column_names().len(), 6);
    assert_eq!(RealignmentMode::from_no_euclidean(true), RealignmentMode::Raw);
}

#[test]
fn missing_motion_columns_write_nothing() {
    let tmp = TempDir::new().unwrap();
    let writer = Realignment::new(tmp.path()).unwrap();
    let data = ConfoundTable::new(
        vec!["csf".to_string(), "trans_x".to_string()],
        vec![vec![0.0], vec![1.0]],
    )
    .unwrap();

    let err = writer
        .write(&subject(), RealignmentMode::Euclidean, &data, &[0])
        .unwrap_err();
    match err.downcast_ref::<SchemaError>() {
        Some(SchemaError::MissingColumns { missing, .. }) => {
            assert!(missing.contains(&"rot_z".to_string()));
            assert!(!missing.contains(&"trans_x".to_string()));
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    assert!(!writer.output_path(&subject()).exists());
}

#[test]
fn label_length_must_match_volumes() {
    let data = motion_table(&[[0.0; 6], [0.0; 6]]);
    let err = compute(&subject(), RealignmentMode::Euclidean, &data, &[0]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaError>(),
        Some(SchemaError::LengthMismatch { expected: 2, got: 1 })
    ));
}
