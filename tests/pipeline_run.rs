use std::fs;
use std::path::Path;

use assert_cmd::Command;
use auto_motion::confounds::CANONICAL_CHANNELS;
use serde_json::Value;
use tempfile::TempDir;

const RUN_FILE: &str = "sub-DEV001_ses-wave1_task-WTP_acq-1_desc-confounds_regressors.tsv";

// Artifact volumes sit far above clean ones on every channel.
fn row(volume: usize, artifact: bool) -> Vec<String> {
    (0..CANONICAL_CHANNELS.len())
        .map(|j| {
            let base = if artifact { 5.0 } else { 0.0 };
            format!("{}", base + ((volume + j) % 7) as f64 * 0.01)
        })
        .collect()
}

fn write_training(dir: &Path) {
    let mut out = String::from("artifact\t");
    out.push_str(&CANONICAL_CHANNELS.join("\t"));
    out.push('\n');
    for v in 0..40 {
        let artifact = v % 4 == 0;
        out.push_str(if artifact { "yes" } else { "no" });
        for cell in row(v, artifact) {
            out.push('\t');
            out.push_str(&cell);
        }
        out.push('\n');
    }
    fs::write(dir.join("development_sample.tsv"), out).unwrap();
}

fn write_run(dir: &Path, name: &str, artifacts: &[usize]) {
    let func = dir.join("sub-DEV001").join("ses-wave1").join("func");
    fs::create_dir_all(&func).unwrap();
    let mut out = String::from("global_signal_derivative1\t");
    out.push_str(&CANONICAL_CHANNELS.join("\t"));
    out.push('\n');
    for v in 0..10 {
        out.push_str("n/a");
        for cell in row(v, artifacts.contains(&v)) {
            out.push('\t');
            out.push_str(&cell);
        }
        out.push('\n');
    }
    fs::write(func.join(name), out).unwrap();
}

fn run_pipeline(input: &Path, out: &Path, extra: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("auto-motion").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(input)
        .arg("--out")
        .arg(out)
        .args(["--study", "FP", "--trees", "25"])
        .args(extra);
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn run_writes_summaries_and_realignment() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_training(input.path());
    write_run(input.path(), RUN_FILE, &[3, 7]);

    let stdout = run_pipeline(input.path(), out.path(), &[]);
    assert!(stdout.contains("Runs: 1"));
    assert!(stdout.contains("Artifact volumes: 2/10 (20.0%)"));

    let summary = out.path().join("summary");
    let by_run = fs::read_to_string(summary.join("FP_summaryRun.csv")).unwrap();
    assert!(by_run.contains("\"DEV001\",\"1\",\"WTP\",\"1\",2,20.0"));
    let trash = fs::read_to_string(summary.join("FP_trashVols.csv")).unwrap();
    assert_eq!(trash.lines().count(), 3);
    assert!(trash.contains("\"DEV001\",\"1\",\"WTP\",\"1\",3,1"));
    assert!(summary.join("FP_summaryTask.csv").exists());

    let rp = out.path().join(
        "rp_txt/sub-DEV001/ses-wave1/func/sub-DEV001_ses-wave1_task-WTP_acq-1-realignment_parameters.txt",
    );
    let rp_text = fs::read_to_string(rp).unwrap();
    let labels: Vec<&str> = rp_text
        .lines()
        .map(|l| l.rsplit("   ").next().unwrap())
        .collect();
    assert_eq!(labels, vec!["0", "0", "0", "1", "0", "0", "0", "1", "0", "0"]);

    let plots = out.path().join("plots/sub-DEV001/ses-wave1/func");
    assert_eq!(fs::read_dir(plots).unwrap().count(), 3);
}

#[test]
fn run_is_deterministic() {
    let input = TempDir::new().unwrap();
    write_training(input.path());
    write_run(input.path(), RUN_FILE, &[0, 9]);

    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    run_pipeline(input.path(), a.path(), &["--no-plot"]);
    run_pipeline(input.path(), b.path(), &["--no-plot"]);

    for name in ["FP_summaryRun.csv", "FP_summaryTask.csv", "FP_trashVols.csv"] {
        let left = fs::read(a.path().join("summary").join(name)).unwrap();
        let right = fs::read(b.path().join("summary").join(name)).unwrap();
        assert_eq!(left, right, "{} differs between runs", name);
    }
    assert!(!a.path().join("plots").exists());
}

#[test]
fn json_report_lists_runs() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_training(input.path());
    write_run(input.path(), RUN_FILE, &[2]);
    write_run(
        input.path(),
        "sub-DEV001_ses-wave1_task-WTP_acq-2_desc-confounds_regressors.tsv",
        &[],
    );

    run_pipeline(
        input.path(),
        out.path(),
        &["--json", "--no-rp", "--no-plot", "--no-euclidean"],
    );

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("FP_report.json")).unwrap()).unwrap();
    assert_eq!(v["tool"]["name"], "auto-motion");
    assert_eq!(v["study"], "FP");
    assert_eq!(v["input_meta"]["format"], "current");
    assert_eq!(v["input_meta"]["euclidean"], false);
    assert_eq!(v["input_meta"]["training_file_rows"], 40);
    assert_eq!(v["input_meta"]["training_artifacts"], 10);
    assert_eq!(v["totals"]["runs"], 2);
    assert_eq!(v["totals"]["volumes"], 20);
    assert_eq!(v["totals"]["artifacts"], 1);
    assert_eq!(v["runs"][0]["run"], "1");
    assert_eq!(v["runs"][1]["run"], "2");
    assert!(v["runs"][0]["realignment_file"].is_null());
    assert!(!out.path().join("rp_txt").exists());

    let by_task = fs::read_to_string(out.path().join("summary/FP_summaryTask.csv")).unwrap();
    assert_eq!(by_task.lines().count(), 2);
    assert!(by_task.contains("\"DEV001\",\"1\",\"WTP\",1,5.0"));
}

#[test]
fn missing_training_file_fails() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_run(input.path(), RUN_FILE, &[1]);

    let mut cmd = Command::cargo_bin("auto-motion").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(out.path())
        .args(["--study", "FP"]);
    cmd.assert().failure();
    assert!(!out.path().join("summary/FP_summaryRun.csv").exists());
}

#[test]
fn unknown_plot_channel_fails_early() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_training(input.path());
    write_run(input.path(), RUN_FILE, &[1]);

    let mut cmd = Command::cargo_bin("auto-motion").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(out.path())
        .args(["--study", "FP", "--fig-indicator", "heart_rate"]);
    cmd.assert().failure();
    assert!(!out.path().join("rp_txt").exists());
}

#[test]
fn validate_reports_counts_without_writing() {
    let input = TempDir::new().unwrap();
    write_training(input.path());
    write_run(input.path(), RUN_FILE, &[]);

    let mut cmd = Command::cargo_bin("auto-motion").unwrap();
    cmd.current_dir(input.path())
        .arg("validate")
        .arg("--input")
        .arg(input.path());
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("training rows: 40"));
    assert!(text.contains("runs: 1"));
    assert!(text.contains("volumes: 10"));
    assert!(!input.path().join("summary").exists());
}
