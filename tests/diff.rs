use assert_fs::TempDir;
use common::command::{commit_all, head_commit, init_repository_dir, run_vcs_command};
use common::file::{FileSpec, write_file};
use common::stdout_of;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn diff(dir: &TempDir, args: &[&str]) -> String {
    let mut command = vec!["diff"];
    command.extend_from_slice(args);

    let assert = run_vcs_command(dir.path(), &command).assert().success();
    stdout_of(&assert)
}

#[rstest]
fn clean_tree_has_no_diff(init_repository_dir: TempDir) {
    assert_eq!(diff(&init_repository_dir, &[]), "");
    assert_eq!(diff(&init_repository_dir, &["--staged"]), "");
}

#[rstest]
fn workspace_changes_are_listed_line_by_line(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "one\nadded\n".to_string(),
    ));

    assert_eq!(
        diff(&init_repository_dir, &[]),
        "diff --vcs a/1.txt b/1.txt\n\
         --- a/1.txt\n\
         +++ b/1.txt\n\
         lines: -0 +1\n\
         -1 +1 |   one\n \
         # +2 | + added\n"
    );
}

#[rstest]
fn staged_changes_compare_head_with_the_index(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("new.txt"),
        "fresh\n".to_string(),
    ));
    run_vcs_command(init_repository_dir.path(), &["add", "new.txt"])
        .assert()
        .success();

    assert_eq!(diff(&init_repository_dir, &[]), "");
    assert_eq!(
        diff(&init_repository_dir, &["--staged"]),
        "diff --vcs a/new.txt b/new.txt\n\
         new file mode 100644\n\
         --- /dev/null\n\
         +++ b/new.txt\n\
         lines: -0 +1\n \
         # +1 | + fresh\n"
    );
}

#[rstest]
fn deleted_files_show_removed_lines(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::remove_file(init_repository_dir.path().join("1.txt"))?;

    let output = diff(&init_repository_dir, &[]);

    assert!(output.starts_with("diff --vcs a/1.txt b/1.txt\ndeleted file mode 100644\n"));
    assert!(output.contains("+++ /dev/null\n"));
    assert!(output.ends_with("lines: -1 +0\n-1  # | - one\n"));

    Ok(())
}

#[rstest]
fn commits_can_be_compared(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let first = head_commit(init_repository_dir.path()).ok_or("no commit")?;
    write_file(FileSpec::new(
        init_repository_dir.path().join("a").join("2.txt"),
        "two\n2\n".to_string(),
    ));
    let second = commit_all(init_repository_dir.path(), "Number two");

    let between = diff(&init_repository_dir, &[&first, &second]);
    assert!(between.starts_with("diff --vcs a/a/2.txt b/a/2.txt\n"));
    assert!(between.contains(" | + 2\n"));
    assert_eq!(between.matches("diff --vcs").count(), 1);

    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "uno\n".to_string(),
    ));
    let against_workspace = diff(&init_repository_dir, &["master"]);
    assert!(against_workspace.starts_with("diff --vcs a/1.txt b/1.txt\n"));
    assert_eq!(against_workspace.matches("diff --vcs").count(), 1);

    Ok(())
}
