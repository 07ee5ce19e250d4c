use assert_fs::TempDir;
use common::command::{init_repository_dir, repository_dir, run_vcs_command};
use common::file::{FileSpec, write_file};
use common::stdout_of;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn status(dir: &TempDir) -> String {
    let assert = run_vcs_command(dir.path(), &["status"]).assert().success();
    stdout_of(&assert)
}

#[rstest]
fn print_nothing_when_no_files_are_changed(init_repository_dir: TempDir) {
    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\nnothing to commit, working tree clean\n"
    );
}

#[rstest]
fn fresh_repository_lists_the_ignore_file_as_untracked(repository_dir: TempDir) {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    assert_eq!(
        status(&repository_dir),
        "On branch master\n\nUntracked files:\n        .vcsignore\n"
    );
}

#[rstest]
fn report_files_with_modified_contents(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "modified one\n".to_string(),
    ));
    write_file(FileSpec::new(
        init_repository_dir.path().join("a").join("2.txt"),
        "modified two\n".to_string(),
    ));

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\n\
         Changes not staged for commit:\n        \
         modified:   1.txt\n        \
         modified:   a/2.txt\n"
    );
}

#[rstest]
fn report_modified_files_with_unchanged_size(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "eno\n".to_string(),
    ));

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\nChanges not staged for commit:\n        modified:   1.txt\n"
    );
}

#[rstest]
fn report_deleted_files(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::remove_dir_all(init_repository_dir.path().join("a"))?;

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\n\
         Changes not staged for commit:\n        \
         deleted:    a/2.txt\n        \
         deleted:    a/b/3.txt\n"
    );

    Ok(())
}

#[rstest]
fn report_staged_additions_and_untracked_files(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("staged.txt"),
        "staged\n".to_string(),
    ));
    write_file(FileSpec::new(
        init_repository_dir.path().join("c").join("loose.txt"),
        "loose\n".to_string(),
    ));
    run_vcs_command(init_repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success();

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\n\
         Changes to be committed:\n        \
         new file:   staged.txt\n\n\
         Untracked files:\n        \
         c/loose.txt\n"
    );
}

#[rstest]
fn ignored_files_are_never_reported(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        init_repository_dir.path().join(".vcsignore"),
        "build/\n".to_string(),
    ));
    run_vcs_command(init_repository_dir.path(), &["add", ".vcsignore"])
        .assert()
        .success();
    common::command::vcs_commit(init_repository_dir.path(), "Ignore build output")
        .assert()
        .success();

    write_file(FileSpec::new(
        init_repository_dir.path().join("build").join("out.o"),
        "binary".to_string(),
    ));

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\nnothing to commit, working tree clean\n"
    );

    Ok(())
}

#[rstest]
fn print_nothing_if_a_file_is_touched(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = init_repository_dir.path().join("1.txt");
    filetime::set_file_mtime(&path, filetime::FileTime::from_unix_time(86_400, 0))?;

    assert_eq!(
        status(&init_repository_dir),
        "On branch master\n\nnothing to commit, working tree clean\n"
    );

    Ok(())
}
