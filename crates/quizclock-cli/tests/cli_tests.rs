//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizclock() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizclock").unwrap();
    // Keep local config files and env overrides out of the runs.
    cmd.env_remove("QUIZCLOCK_TOTAL_TIME")
        .env_remove("QUIZCLOCK_QUESTION_COUNT")
        .env("HOME", std::env::temp_dir());
    cmd
}

/// A pool where the first choice is always correct.
const FIRST_IS_RIGHT: &str = r#"
[pool]
id = "first"
name = "First Is Right"

[[questions]]
id = 10
prompt = "Pick the first one"
choices = ["right", "wrong", "also wrong", "nope"]
answer = 0

[[questions]]
id = 20
prompt = "Pick the first one again"
choices = ["right", "wrong", "also wrong", "nope"]
answer = 0
"#;

fn write_pool(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("first.toml");
    std::fs::write(&path, FIRST_IS_RIGHT).unwrap();
    path
}

#[test]
fn validate_valid_pool() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .arg("validate")
        .arg("--pool")
        .arg(&pool)
        .assert()
        .success()
        .stdout(predicate::str::contains("First Is Right (2 questions)"))
        .stdout(predicate::str::contains("All pools valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "[pool]\nid = \"bad\"\nname = \"Bad\"\n\n[[questions]]\nid = 1\nprompt = \"Q\"\nchoices = [\"a\", \"b\"]\nanswer = 5\n",
    )
    .unwrap();

    quizclock()
        .arg("validate")
        .arg("--pool")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] WARNING: answer index 5"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizclock()
        .arg("validate")
        .arg("--pool")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("First Is Right"))
        .stdout(predicate::str::contains("JavaScript Basics (8 questions)"));
}

#[test]
fn validate_nonexistent_file() {
    quizclock()
        .arg("validate")
        .arg("--pool")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizclock()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizclock.toml"))
        .stdout(predicate::str::contains("Created pools/example.toml"));

    assert!(dir.path().join("quizclock.toml").exists());
    assert!(dir.path().join("pools/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizclock()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizclock()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn run_perfect_score() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "2", "--time", "60", "--pool"])
        .arg(&pool)
        .write_stdin("1\nn\n1\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 / 2"))
        .stdout(predicate::str::contains("Question 2 / 2"))
        .stdout(predicate::str::contains("You answered 2 out of 2 correctly."))
        .stdout(predicate::str::contains("Score: 100%"));
}

#[test]
fn run_overwritten_answer_counts_last_choice() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "2", "--pool"])
        .arg(&pool)
        .write_stdin("2\n1\nn\n1\n2\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You answered 1 out of 2 correctly."))
        .stdout(predicate::str::contains("Score: 50%"));
}

#[test]
fn run_times_out_without_input() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--time", "1", "--pool"])
        .arg(&pool)
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("[00:01 left]"))
        .stdout(predicate::str::contains("[00:00 left]"))
        .stdout(predicate::str::contains("Time is up!"))
        .stdout(predicate::str::contains("Score: 0%"));
}

#[test]
fn run_json_result_on_stdout() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    let output = quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "2", "--format", "json", "--pool"])
        .arg(&pool)
        .write_stdin("1\nn\nn\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["score"]["correct"], 1);
    assert_eq!(result["score"]["total"], 2);
    assert_eq!(result["score"]["percent"], 50);
    assert_eq!(result["timed_out"], false);
    assert_eq!(result["reviews"][1]["outcome"]["status"], "unanswered");
}

#[test]
fn run_retry_starts_over() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    let output = quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "2", "--pool"])
        .arg(&pool)
        .write_stdin("n\nn\nr\nq\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Question 1 / 2").count(), 2);
    assert_eq!(stdout.matches("Exam finished").count(), 1);
}

#[test]
fn run_rejects_bad_input_without_aborting() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "1", "--pool"])
        .arg(&pool)
        .write_stdin("banana\n9\np\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'banana'"))
        .stdout(predicate::str::contains("Pick a choice between 1 and 4."))
        .stdout(predicate::str::contains("Exam finished"));
}

#[test]
fn run_uses_config_file() {
    let dir = TempDir::new().unwrap();
    write_pool(&dir);
    std::fs::write(
        dir.path().join("quizclock.toml"),
        "total_time_secs = 90\nquestion_count = 1\npool = \"first.toml\"\n",
    )
    .unwrap();

    quizclock()
        .current_dir(dir.path())
        .arg("run")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 / 1"))
        .stdout(predicate::str::contains("[01:30 left]"));
}

#[test]
fn run_builtin_pool_by_default() {
    let dir = TempDir::new().unwrap();

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--seed", "7"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 / 5"))
        .stdout(predicate::str::contains("[02:00 left]"));
}

#[test]
fn run_more_questions_than_pool() {
    let dir = TempDir::new().unwrap();
    let pool = write_pool(&dir);

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "9", "--pool"])
        .arg(&pool)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pool has 2 questions; using all of them."))
        .stdout(predicate::str::contains("Question 1 / 2"));
}

#[test]
fn run_rejects_zero_count() {
    quizclock()
        .args(["run", "--count", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("count must be at least 1"));
}

#[test]
fn run_missing_config_fails() {
    quizclock()
        .args(["run", "--config", "missing.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn run_rejects_pool_with_shared_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.toml");
    std::fs::write(
        &path,
        "[pool]\nid = \"shared\"\nname = \"Shared\"\n\n[[questions]]\nid = 1\nprompt = \"A\"\nchoices = [\"a\", \"b\"]\nanswer = 0\n\n[[questions]]\nid = 1\nprompt = \"B\"\nchoices = [\"a\", \"b\", \"c\", \"d\"]\nanswer = 3\n",
    )
    .unwrap();

    quizclock()
        .current_dir(dir.path())
        .args(["run", "--count", "2", "--pool"])
        .arg(&path)
        .write_stdin("4\nn\n1\nn\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Exam finished").not())
        .stderr(predicate::str::contains(
            "question id 1 appears more than once in the pool",
        ));
}
