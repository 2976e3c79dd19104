//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use entrance_core::exam::presentation_order;
use entrance_core::questions::{standard_bank, OPTION_LABELS};

fn entrance() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("entrance").unwrap()
}

/// A scratch working directory with no config or env overrides leaking in.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = entrance();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("ENTRANCE_DATA_FILE")
            .env_remove("ENTRANCE_LOG_FILE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn register(&self, id: u32, name: &str) {
        self.cmd()
            .args(["register", "--id", &id.to_string(), "--name", name])
            .args(["--dob", "2006-02-14", "--address", "Kathmandu"])
            .args(["--phone", "9841000000", "--email"])
            .arg(format!("{}@example.com", name.to_lowercase()))
            .args(["--guardian-name", "Hari", "--guardian-phone", "9800000000"])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("Registered student {id}")));
    }

    fn exam(&self, id: u32, seed: u64, answers: String) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["exam", &id.to_string(), "--yes", "--seed", &seed.to_string()])
            .write_stdin(answers)
            .assert()
    }
}

/// One answer line per question in the seeded order; `true` answers correctly.
fn answers(seed: u64, pattern: &[bool]) -> String {
    let bank = standard_bank();
    presentation_order(bank.len(), seed)
        .iter()
        .zip(pattern)
        .map(|(&q, &right)| {
            let correct = bank[q].correct_option;
            let pick = if right { correct } else { (correct + 1) % 4 };
            format!("{}\n", OPTION_LABELS[pick])
        })
        .collect()
}

#[test]
fn help_output() {
    entrance()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Student entrance-exam manager"));
}

#[test]
fn version_output() {
    entrance()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("entrance"));
}

#[test]
fn init_creates_config_and_store() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created entrance.toml"))
        .stdout(predicate::str::contains("0 records"));

    assert!(ws.dir.path().join("entrance.toml").exists());
    assert!(ws.dir.path().join("data/student.dat").exists());

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn register_and_list() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    ws.register(2, "Amy");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("amy@example.com"))
        .stdout(predicate::str::contains("not taken"))
        .stdout(predicate::str::contains("2 student(s)"));

    let output = ws.cmd().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[1]["name"], "Amy");
    assert_eq!(json[1]["has_taken_exam"], false);
    assert_eq!(json[0]["qr_code"], "STUDENT_1_Bob");
}

#[test]
fn duplicate_registration_is_declined() {
    let ws = Workspace::new();
    ws.register(1, "Bob");

    ws.cmd()
        .args(["register", "--id", "1", "--name", "Impostor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: student 1 already exists"));

    ws.cmd()
        .args(["search", "--id", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("Impostor").not());
}

#[test]
fn invalid_email_flag_is_rejected() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["register", "--id", "5", "--name", "Kim", "--dob", "x"])
        .args(["--address", "y", "--phone", "9841000000", "--email", "kim.example.com"])
        .args(["--guardian-name", "z", "--guardian-phone", "9800000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid email address"));
}

#[test]
fn skipped_exam_scores_zero_and_cannot_be_retaken() {
    let ws = Workspace::new();
    ws.register(1, "Bob");

    ws.exam(1, 3, "S\n".repeat(10))
        .success()
        .stdout(predicate::str::contains("Score: 0.00 / 10.00"))
        .stdout(predicate::str::contains("Result: FAIL"));

    ws.exam(1, 3, "A\n".repeat(10))
        .failure()
        .stderr(predicate::str::contains("already taken the exam"));

    ws.cmd()
        .args(["result", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mark:     0.00"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn invalid_answers_repeat_the_question() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    let input = format!("x\n42\n{}", answers(11, &[true; 10]));

    ws.exam(1, 11, input)
        .success()
        .stdout(predicate::str::contains("Invalid choice 'x'"))
        .stdout(predicate::str::contains("Score: 10.00 / 10.00"));
}

#[test]
fn early_end_of_input_still_scores() {
    let ws = Workspace::new();
    ws.register(1, "Bob");

    ws.exam(1, 5, answers(5, &[true; 4]))
        .success()
        .stdout(predicate::str::contains("6 remaining question(s)"))
        .stdout(predicate::str::contains("Score: 4.00 / 10.00"))
        .stdout(predicate::str::contains("Result: PASS"));
}

#[test]
fn declining_the_confirmation_leaves_the_record_alone() {
    let ws = Workspace::new();
    ws.register(1, "Bob");

    ws.cmd()
        .args(["exam", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam not started."));

    ws.cmd()
        .args(["result", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not taken yet"));
}

#[test]
fn confirmed_exam_runs_every_question() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    let input = format!("y\n{}", answers(9, &[true; 10]));

    ws.cmd()
        .args(["exam", "1", "--seed", "9"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"(?s)ENTRANCE EXAM.*Start the exam now\?.*EXAM COMPLETE")
                .unwrap(),
        )
        .stdout(predicate::str::contains("Not reached: 0"))
        .stdout(predicate::str::contains("Score: 10.00 / 10.00"));
}

#[test]
fn ineligible_candidate_is_turned_away_before_instructions() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    ws.exam(1, 3, "S\n".repeat(10)).success();

    ws.cmd()
        .args(["exam", "1"])
        .write_stdin("y\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ENTRANCE EXAM").not())
        .stderr(predicate::str::contains("already taken the exam"));

    ws.cmd()
        .args(["exam", "7"])
        .write_stdin("y\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ENTRANCE EXAM").not());
}

#[test]
fn bob_and_amy_rankings() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    ws.register(2, "Amy");
    ws.register(3, "Kim");

    ws.exam(1, 21, answers(21, &[true; 10]))
        .success()
        .stdout(predicate::str::contains("Score: 10.00 / 10.00"));
    let mixed = [true, false, true, false, true, false, true, false, true, false];
    ws.exam(2, 22, answers(22, &mixed))
        .success()
        .stdout(predicate::str::contains("Score: 4.50 / 10.00"));

    ws.cmd()
        .arg("rankings")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)Bob.*10\.00.*Amy.*4\.50").unwrap())
        .stdout(predicate::str::contains("Kim").not())
        .stdout(predicate::str::contains("Page 1 of 1 (2 student(s))"));

    ws.cmd()
        .args(["--role", "student:2", "result", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rank:     2 of 2"));

    ws.cmd()
        .args(["--role", "student:2", "result", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));

    let out = ws.dir.path().join("ranks.json");
    ws.cmd()
        .args(["rankings", "--export", "json", "--output"])
        .arg(&out)
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["entries"][0]["id"], 1);
    assert_eq!(json["entries"][1]["rank"], 2);
}

#[test]
fn empty_rankings() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("rankings")
        .assert()
        .success()
        .stdout(predicate::str::contains("No students have taken the exam yet."));
}

#[test]
fn student_role_cannot_register() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--role", "student:1", "register", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));
}

#[test]
fn reset_and_set_mark() {
    let ws = Workspace::new();
    ws.register(1, "Bob");

    ws.cmd()
        .args(["set-mark", "1", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not taken the exam"));

    ws.exam(1, 1, "S\n".repeat(10)).success();

    ws.cmd()
        .args(["set-mark", "1", "-0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set to -0.50"));
    ws.cmd()
        .args(["set-mark", "1", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid mark"));

    ws.cmd()
        .args(["--role", "examiner", "reset-exam", "1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));
    ws.cmd()
        .args(["reset-exam", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("may sit the exam again"));

    ws.exam(1, 1, "S\n".repeat(10)).success();
}

#[test]
fn search_and_check_in() {
    let ws = Workspace::new();
    ws.register(1, "Ramesh");
    ws.register(2, "Sita");

    ws.cmd()
        .args(["search", "RAMESH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 match(es)"));
    ws.cmd()
        .args(["search", "rmsh", "--fuzzy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ramesh"));
    ws.cmd()
        .args(["search", "rmsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No students match"));

    ws.cmd()
        .args(["check-in", "STUDENT_2_Sita"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in: Sita (ID 2)"));
    ws.cmd()
        .args(["check-in", "STUDENT_9_Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no student matches"));
}

#[test]
fn export_backup_and_report() {
    let ws = Workspace::new();
    ws.register(1, "Bob");
    ws.exam(1, 2, answers(2, &[true; 10])).success();

    let csv = ws.dir.path().join("out/students.csv");
    ws.cmd()
        .args(["export", "--output"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 student(s)"));
    let content = std::fs::read_to_string(&csv).unwrap();
    assert!(content.starts_with("ID,Name,DOB,Address,Phone,Email,"));
    assert!(content.contains("1,\"Bob\""));
    assert!(content.contains(",1,10.00,"));

    ws.cmd()
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup written to:"));
    let backups: Vec<_> = std::fs::read_dir(ws.dir.path().join("entrance-output/backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("student_") && backups[0].ends_with(".dat"));

    ws.cmd().arg("report").assert().success();
    let reports: Vec<_> = std::fs::read_dir(ws.dir.path().join("entrance-output/reports"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(reports.len(), 1);
    let report = std::fs::read_to_string(&reports[0]).unwrap();
    assert!(report.contains("Students Who Passed (>=3.0): 1"));
}

#[test]
fn config_file_changes_policy() {
    let ws = Workspace::new();
    std::fs::write(
        ws.dir.path().join("entrance.toml"),
        "data_file = \"records/students.dat\"\n[exam]\nnegative_marking = 0.0\n",
    )
    .unwrap();
    ws.register(1, "Bob");
    assert!(ws.dir.path().join("records/students.dat").exists());

    ws.exam(1, 4, answers(4, &[false; 10]))
        .success()
        .stdout(predicate::str::contains("Score: 0.00 / 10.00"));
}

#[test]
fn missing_config_file_is_an_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--config", "nope.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
