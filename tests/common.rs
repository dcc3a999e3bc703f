#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::Path;
use tempfile::TempDir;

pub const LINK: &str = "https://docs.google.com/spreadsheets/d/ABC123/edit#gid=0";

/// mealsheet command rooted at `home`, with colours disabled
pub fn ms(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("mealsheet");
    cmd.arg("--home").arg(home).env("NO_COLOR", "1");
    cmd
}

/// Fresh, initialized home directory
pub fn init_home() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp home");
    ms(dir.path()).arg("init").assert().success();
    dir
}
