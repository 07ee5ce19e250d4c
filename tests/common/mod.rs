#![allow(dead_code)]

pub mod command;
pub mod file;

/// Fixed commit time so hashes and log output are reproducible.
pub const COMMIT_TIMESTAMP: &str = "1700000000";
pub const AUTHOR: &str = "fake_user";

/// Captured stdout of a finished command.
pub fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

