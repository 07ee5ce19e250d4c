use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{repository_dir, run_vcs_command};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_creates_the_repository_layout(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let vcs_path = repository_dir.path().canonicalize()?.join(".vcs");

    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(format!(
            "Initialized empty repository in {}\n",
            vcs_path.display()
        ));

    repository_dir
        .child(".vcs/HEAD")
        .assert("ref: refs/heads/master");
    repository_dir
        .child(".vcs/refs/heads/master")
        .assert("0".repeat(40).as_str());
    repository_dir
        .child(".vcs/refs/stash")
        .assert("0".repeat(40).as_str());
    repository_dir
        .child(".vcs/objects")
        .assert(predicate::path::is_dir());
    repository_dir
        .child(".vcs/index")
        .assert(predicate::path::is_file());
    repository_dir
        .child(".vcsignore")
        .assert(predicate::path::is_file());

    Ok(())
}

#[rstest]
fn init_twice_keeps_existing_state(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child(".vcsignore").write_str("target/\n")?;

    let assert = run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    assert!(common::stdout_of(&assert).starts_with("Reinitialized existing repository in "));
    repository_dir.child(".vcsignore").assert("target/\n");
    repository_dir
        .child(".vcs/HEAD")
        .assert("ref: refs/heads/master");

    Ok(())
}

#[rstest]
fn init_accepts_a_target_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vcs_command(repository_dir.path(), &["init", "project"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Initialized empty repository in "));

    repository_dir
        .child("project/.vcs/HEAD")
        .assert(predicate::path::is_file());

    Ok(())
}

#[rstest]
fn commands_outside_a_repository_are_rejected(repository_dir: TempDir) {
    let output = run_vcs_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a vcs repository"))
        .get_output()
        .stdout
        .clone();

    assert_eq!(String::from_utf8_lossy(&output), "");
}
