use assert_fs::TempDir;
use common::command::{
    commit_all, head_commit, init_repository_dir, repository_dir, run_vcs_command, vcs_commit,
};
use common::file::{FileSpec, write_file};
use common::stdout_of;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn first_commit_prints_branch_and_short_hash(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("notes.txt"),
        "first draft\n".to_string(),
    ));
    run_vcs_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let assert = vcs_commit(repository_dir.path(), "Add notes").assert().success();
    let commit = head_commit(repository_dir.path()).ok_or("branch did not move")?;

    assert_eq!(stdout_of(&assert), format!("[master {}] Add notes\n", &commit[..7]));
    assert_eq!(
        std::fs::read_to_string(repository_dir.path().join(".vcs/logs/refs/heads/master"))?,
        format!(
            "{} {} fake_user 1700000000 commit: Add notes\n",
            "0".repeat(40),
            commit
        )
    );

    Ok(())
}

#[rstest]
fn nothing_staged_leaves_the_branch_alone(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let before = head_commit(init_repository_dir.path());

    vcs_commit(init_repository_dir.path(), "Nothing new")
        .assert()
        .success()
        .stdout("Everything is up to date\n");

    assert_eq!(head_commit(init_repository_dir.path()), before);

    Ok(())
}

#[rstest]
fn unstaged_changes_block_the_commit(init_repository_dir: TempDir) {
    let before = head_commit(init_repository_dir.path());
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "edited\n".to_string(),
    ));

    vcs_commit(init_repository_dir.path(), "Half done")
        .assert()
        .success()
        .stdout(predicate::str::contains("modified:   1.txt"))
        .stdout(predicate::str::ends_with(
            "No changes added to commit (use \"vcs add\")\n",
        ));

    assert_eq!(head_commit(init_repository_dir.path()), before);
}

#[rstest]
fn commits_chain_to_their_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = head_commit(init_repository_dir.path()).ok_or("no first commit")?;
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "one\nmore\n".to_string(),
    ));

    let second = commit_all(init_repository_dir.path(), "Extend one");

    let assert = run_vcs_command(init_repository_dir.path(), &["cat-file", "-p", &second])
        .assert()
        .success();
    assert!(stdout_of(&assert).contains(&format!("parent {}\n", first)));

    Ok(())
}

#[rstest]
fn detached_head_refuses_commits(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let commit = head_commit(init_repository_dir.path()).ok_or("no commit")?;
    run_vcs_command(init_repository_dir.path(), &["checkout", &commit])
        .write_stdin("y\n")
        .assert()
        .success();
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "detached edit\n".to_string(),
    ));
    run_vcs_command(init_repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    vcs_commit(init_repository_dir.path(), "Lost work")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("HEAD is detached"));

    Ok(())
}

#[rstest]
fn log_walks_history_newest_first(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = head_commit(init_repository_dir.path()).ok_or("no first commit")?;
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "one\ntwo\n".to_string(),
    ));
    let second = commit_all(init_repository_dir.path(), "Second commit\n\nWith a body");

    let assert = run_vcs_command(init_repository_dir.path(), &["log", "--oneline"])
        .assert()
        .success();
    assert_eq!(
        stdout_of(&assert),
        format!(
            "{} (HEAD -> master) Second commit\n{} Initial commit\n",
            &second[..7],
            &first[..7]
        )
    );

    let assert = run_vcs_command(init_repository_dir.path(), &["log"])
        .assert()
        .success();
    let log = stdout_of(&assert);

    assert!(log.starts_with(&format!(
        "commit {} (HEAD -> master)\nAuthor: fake_user\nDate:   ",
        second
    )));
    assert!(log.contains("\n\n    Second commit\n    \n    With a body\n\n"));
    assert!(log.contains(&format!("commit {}\nAuthor: fake_user\n", first)));
    assert!(log.ends_with("\n\n    Initial commit\n\n"));

    Ok(())
}

#[rstest]
fn log_of_an_empty_branch_prints_nothing(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_vcs_command(repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout("");
}
