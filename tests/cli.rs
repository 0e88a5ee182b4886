use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn prints_usage_without_arguments() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.assert().failure().code(2).stderr(contains("Usage"));
}

#[test]
fn reports_unreadable_image_and_exits_1() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.arg("tests/files/missing.obj");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("failed to load image: tests/files/missing.obj"));
}

#[test]
fn halts_cleanly_with_exit_0() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.arg("tests/files/halt.obj");
    cmd.assert().success().stdout("HALT\n");
}

#[test]
fn prints_string_through_puts() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.arg("tests/files/hi.obj");
    cmd.assert().success().stdout("HiHALT\n");
}

#[test]
fn later_image_overlays_earlier_one() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.arg("tests/files/hi.obj").arg("tests/files/patch.obj");
    cmd.assert().success().stdout("YiHALT\n");
}

#[test]
fn one_bad_image_among_many_aborts_the_load() {
    let mut cmd = Command::cargo_bin("lc3").unwrap();
    cmd.arg("tests/files/hi.obj").arg("tests/files/missing.obj");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("failed to load image: tests/files/missing.obj"));
}
