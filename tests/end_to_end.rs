use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

const PUBLICATIONS: &str = "id,title,authors\n\
1,Keeping a clean sheet,\"['Yann Sommer', 'Granit Xhaka']\"\n\
2,Midfield control,\"['Granit Xaka']\"\n\
3,Untitled,\n\
4,Broken,\"['Extra Field']\",oops\n\
5,Duplicates,\"['Yann Sommer', 'Madonna']\"\n";

fn write_gzip(path: &Path, contents: &str) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(contents.as_bytes())
        .expect("compress fixture");
    let bytes = encoder.finish().expect("finish gzip");
    fs::write(path, bytes).expect("write fixture");
}

fn unique_people(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unique-people"))
        .args(args)
        .current_dir(dir)
        .env_remove("PEOPLE_INPUT")
        .env_remove("PEOPLE_OUTPUT")
        .env_remove("PEOPLE_HEADER")
        .env_remove("PEOPLE_NAMES_COLUMN")
        .env_remove("PEOPLE_NORMALIZATION")
        .env_remove("PEOPLE_ON_MALFORMED")
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary runs")
}

#[test]
fn deduplicates_gzip_input_into_two_column_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_gzip(&dir.path().join("publications.csv.gz"), PUBLICATIONS);

    let output = unique_people(
        dir.path(),
        &["--input", "publications.csv.gz", "--output", "people.csv"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("finished"));

    let written = fs::read_to_string(dir.path().join("people.csv")).expect("output written");
    assert_eq!(
        written,
        "firstname,lastname\nYann,Sommer\nGranit,Xhaka\n,Madonna\n"
    );
}

#[test]
fn uses_default_file_names_and_custom_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_gzip(&dir.path().join("publications_min.csv.gz"), PUBLICATIONS);

    let output = unique_people(dir.path(), &["--header", "first,last"]);
    assert!(output.status.success());

    let written =
        fs::read_to_string(dir.path().join("unique_people.csv")).expect("default output written");
    assert!(written.starts_with("first,last\n"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn json_summary_reports_counts() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("plain.csv"), PUBLICATIONS).expect("write plain fixture");

    let output = unique_people(
        dir.path(),
        &["--input", "plain.csv", "--output", "people.csv", "--json"],
    );
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary is json");
    assert_eq!(summary["rows_read"], 4);
    assert_eq!(summary["null_rows"], 1);
    assert_eq!(summary["bad_lines"], 1);
    assert_eq!(summary["names_exploded"], 5);
    assert_eq!(summary["distinct_names"], 4);
    assert_eq!(summary["clusters"], 3);
    assert_eq!(summary["normalization"], "clean");
}

#[test]
fn malformed_cell_aborts_unless_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = "authors\n\"['Ana Pop']\"\n\"__import__('os')\"\n";
    fs::write(dir.path().join("input.csv"), csv).expect("write fixture");

    let failed = unique_people(dir.path(), &["--input", "input.csv", "--output", "out.csv"]);
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stderr).contains("application error"));

    let skipped = unique_people(
        dir.path(),
        &["--input", "input.csv", "--output", "out.csv", "--skip-malformed"],
    );
    assert!(skipped.status.success());
    let written = fs::read_to_string(dir.path().join("out.csv")).expect("output written");
    assert_eq!(written, "firstname,lastname\nAna,Pop\n");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = unique_people(dir.path(), &["--input", "absent.csv.gz"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("unique_people.csv").exists());
}

#[test]
fn key_subcommand_prints_reference_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = unique_people(dir.path(), &["key", "Mickæël"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Mickæël\tmickel\tMKLMACAL\n"
    );
}
