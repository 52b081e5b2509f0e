use std::path::Path;

use auto_motion::identifier::Identifier;

#[test]
fn parses_canonical_fixture_name() {
    let id = Identifier::parse("sub-DEV001_ses-wave1_task-WTP_acq-4_desc-confounds_regressors.tsv");
    assert_eq!(id.subject_id, "DEV001");
    assert_eq!(id.wave, "1");
    assert_eq!(id.task, "WTP");
    assert_eq!(id.run, "4");
}

#[test]
fn parses_legacy_run_tag() {
    let id = Identifier::parse("sub-DEV002_ses-wave2_task-SVC_run-03_bold_confounds.tsv");
    assert_eq!(id, Identifier::new("DEV002", "2", "SVC", "03"));
}

#[test]
fn unmatched_names_default_to_empty() {
    let id = Identifier::parse("development_sample.tsv");
    assert_eq!(id, Identifier::default());
    assert!(id.is_empty());
}

#[test]
fn format_then_parse_round_trips() {
    let ids = [
        Identifier::new("DEV001", "1", "WTP", "4"),
        Identifier::new("FP123", "2", "SVC", "01"),
        Identifier::new("abc", "10", "DSD", "12"),
    ];
    for id in ids {
        let name = format!("{}_desc-confounds_regressors.tsv", id.file_stem());
        assert_eq!(Identifier::parse(&name), id, "round trip failed for {}", name);
    }
}

#[test]
fn from_path_uses_file_name_only() {
    let path = Path::new("/data/sub-X_ses-wave9/func/sub-DEV003_ses-wave3_task-WTP_acq-2_desc-confounds_regressors.tsv");
    assert_eq!(
        Identifier::from_path(path),
        Identifier::new("DEV003", "3", "WTP", "2")
    );
}

#[test]
fn output_paths_follow_bids_layout() {
    let id = Identifier::new("SUBJECT_ID", "1", "TASK", "1");
    let dir = id.func_dir(Path::new("out"));
    assert_eq!(dir, Path::new("out/sub-SUBJECT_ID/ses-wave1/func"));
    assert_eq!(
        id.realignment_file_name(),
        "sub-SUBJECT_ID_ses-wave1_task-TASK_acq-1-realignment_parameters.txt"
    );
}
