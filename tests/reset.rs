use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{commit_all, head_commit, init_repository_dir, run_vcs_command};
use common::file::{FileSpec, write_file};
use common::stdout_of;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

/// Adds a second commit on master; returns (first, second).
fn two_commits(dir: &TempDir) -> (String, String) {
    let first = head_commit(dir.path()).expect("fixture has a commit");
    write_file(FileSpec::new(
        dir.path().join("1.txt"),
        "one\ntwo\n".to_string(),
    ));
    let second = commit_all(dir.path(), "Second commit");

    (first, second)
}

#[rstest]
fn hard_reset_restores_files_and_keeps_objects(init_repository_dir: TempDir) {
    let (first, second) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--hard", &first])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(format!(
            "HEAD is now at {} Initial commit\n",
            &first[..7]
        )));

    init_repository_dir.child("1.txt").assert("one\n");
    assert_eq!(head_commit(init_repository_dir.path()), Some(first.clone()));

    let assert = run_vcs_command(init_repository_dir.path(), &["log", "--oneline"])
        .assert()
        .success();
    assert_eq!(
        stdout_of(&assert),
        format!("{} (HEAD -> master) Initial commit\n", &first[..7])
    );

    run_vcs_command(init_repository_dir.path(), &["cat-file", "-t", &second])
        .assert()
        .success()
        .stdout("commit\n");
}

#[rstest]
fn later_commits_stay_reachable_through_the_branch_log(init_repository_dir: TempDir) {
    let (first, second) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", &first])
        .assert()
        .success();
    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", &second])
        .assert()
        .success();

    assert_eq!(head_commit(init_repository_dir.path()), Some(second));
}

#[rstest]
fn soft_reset_keeps_index_and_files(init_repository_dir: TempDir) {
    let (first, _) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", &first])
        .assert()
        .success();

    init_repository_dir.child("1.txt").assert("one\ntwo\n");
    run_vcs_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("On branch master\n\nChanges to be committed:\n        modified:   1.txt\n");
}

#[rstest]
fn mixed_reset_unstages_changes(init_repository_dir: TempDir) {
    let (first, _) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--mixed", &first])
        .assert()
        .success();

    init_repository_dir.child("1.txt").assert("one\ntwo\n");
    run_vcs_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("On branch master\n\nChanges not staged for commit:\n        modified:   1.txt\n");
}

#[rstest]
fn declined_hard_reset_changes_nothing(init_repository_dir: TempDir) {
    let (first, second) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--hard", &first])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Reset aborted\n"));

    assert_eq!(head_commit(init_repository_dir.path()), Some(second));
    init_repository_dir.child("1.txt").assert("one\ntwo\n");
}

#[rstest]
fn reset_targets_are_validated(init_repository_dir: TempDir) {
    let (first, _) = two_commits(&init_repository_dir);

    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", "abc"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a valid object name"));

    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", &"e".repeat(40)])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("object not found"));

    run_vcs_command(init_repository_dir.path(), &["reset", &first])
        .assert()
        .failure()
        .code(2);
}

#[rstest]
fn commits_from_other_branches_are_refused(init_repository_dir: TempDir) {
    run_vcs_command(init_repository_dir.path(), &["checkout", "-b", "side"])
        .assert()
        .success();
    write_file(FileSpec::new(
        init_repository_dir.path().join("side.txt"),
        "side\n".to_string(),
    ));
    let side = commit_all(init_repository_dir.path(), "Side work");
    run_vcs_command(init_repository_dir.path(), &["checkout", "master"])
        .write_stdin("y\n")
        .assert()
        .success();

    run_vcs_command(init_repository_dir.path(), &["reset", "--soft", &side])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("is not part of the history of branch master"));
}
