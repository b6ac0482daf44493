mod common;

use assert_cmd::Command;
use predicates::str::contains;

use common::temp_home;
use gpa_core::cli::SCRIPT_ENV;

fn script(input: &str) -> assert_cmd::assert::Assert {
    let home = temp_home();
    Command::cargo_bin("gpa_core_cli")
        .unwrap()
        .env(SCRIPT_ENV, "1")
        .env("GPA_CORE_HOME", &home)
        .write_stdin(input.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_reports_weighted_gpa() {
    script("add 1 CS101 4.5\nadd 1 MA101 3.5\nstats\nexit\n")
        .stdout(contains("GPA: 4.00 | Total credits: 8 | Graded credits: 8 | S/U used: 0/8"));
}

#[test]
fn exemption_beyond_cap_is_refused() {
    script("config set su_cap 1\nadd 1 A 4\nadd 1 B 4\nsu 1 1\nsu 1 2\nstats\nexit\n")
        .stdout(contains("Maximum of 1 S/U modules allowed!"))
        .stdout(contains("S/U used: 1/1"));
}

#[test]
fn export_and_import_through_the_shell() {
    let dir = temp_home();
    let path = dir.join("grades.json");
    let input = format!(
        "add 2 CS2030 5 4\nadd 2 CS2040 4\nexport \"{path}\"\nreset\nimport \"{path}\"\nstats\nexit\n",
        path = path.display()
    );

    script(&input)
        .stdout(contains("Exported 2 module(s)"))
        .stdout(contains("All semesters cleared."))
        .stdout(contains("Imported 2 module(s)"))
        .stdout(contains("GPA: 4.50"));

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"CS2030\""));
}

#[test]
fn bad_input_is_reported_and_shell_continues() {
    script("stat\nadd 9\nset 1 1 gpa 4.0\nadd 1 X 4.2\nstats\nexit\n")
        .stdout(contains("Unknown command `stat`"))
        .stdout(contains("Suggestion: `stats`?"))
        .stdout(contains("GPA: 0.00"));
}

#[test]
fn lenient_import_with_oversized_credits_keeps_the_shell_alive() {
    let dir = temp_home();
    let path = dir.join("legacy.json");
    std::fs::write(
        &path,
        r#"[[{"id": 0, "name": "A", "gpa": 4.0, "credits": 4294967295, "su": false}, {"id": 1, "name": "B", "gpa": 4.0, "credits": 4, "su": false}]]"#,
    )
    .unwrap();
    let input = format!("import \"{}\" --lenient\nstats\nexit\n", path.display());

    script(&input)
        .stdout(contains("illegal credits 4294967295"))
        .stdout(contains("GPA: 4.00 | Total credits: 4294967299"));
}
