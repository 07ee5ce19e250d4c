use crate::common::file::{FileSpec, write_file};
use crate::common::{AUTHOR, COMMIT_TIMESTAMP, stdout_of};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit holding `1.txt`, `a/2.txt`, `a/b/3.txt`
/// and the ignore file.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vcs_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one\n".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\n".to_string(),
    );
    write_file(file3);

    run_vcs_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    vcs_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_vcs_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vcs").expect("Failed to find vcs binary");
    cmd.envs(vec![
        ("NO_PAGER", "1"),
        ("USER", AUTHOR),
        ("VCS_COMMIT_TIMESTAMP", COMMIT_TIMESTAMP),
    ]);
    cmd.env_remove("VCS_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn vcs_commit(dir: &Path, message: &str) -> Command {
    run_vcs_command(dir, &["commit", message])
}

/// Stage everything and commit it, returning the new commit id.
pub fn commit_all(dir: &Path, message: &str) -> String {
    run_vcs_command(dir, &["add", "."]).assert().success();

    let assert = vcs_commit(dir, message).assert().success();
    head_commit(dir).unwrap_or_else(|| panic!("no commit after {:?}: {}", message, stdout_of(&assert)))
}

/// The commit HEAD resolves to, read straight from the ref files.
pub fn head_commit(dir: &Path) -> Option<String> {
    let vcs_dir = dir.join(".vcs");
    let head = std::fs::read_to_string(vcs_dir.join("HEAD")).ok()?;

    let oid = match head.trim().strip_prefix("ref: ") {
        Some(ref_path) => std::fs::read_to_string(vcs_dir.join(ref_path)).ok()?,
        None => head,
    };
    let oid = oid.trim().to_string();

    (oid != "0".repeat(40)).then_some(oid)
}
