extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn mandelfarm() -> Command {
    let mut cmd = Command::cargo_bin("mandelfarm").unwrap();
    for var in &[
        "MANDELFARM_OUTPUT",
        "MANDELFARM_SIZE",
        "MANDELFARM_LEFTLOWER",
        "MANDELFARM_RIGHTUPPER",
        "MANDELFARM_PROCESSES",
        "MANDELFARM_GRANULARITY",
        "MANDELFARM_ITERATIONS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn renders_a_scheduled_image() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("mandel.png");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "60x40", "-p", "4", "-g", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 60x40"));
    let decoded = image::open(&output).unwrap().to_rgb();
    assert_eq!(decoded.dimensions(), (60, 40));
}

#[test]
fn renders_sequentially() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("mandel.ppm");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "30x20", "--sequential"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 30x20"));
    assert!(output.exists());
}

#[test]
fn accepts_a_negative_window() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("zoom.png");
    mandelfarm()
        .args(&[
            "-o",
            output.to_str().unwrap(),
            "-s",
            "32x32",
            "-l",
            "-0.75,-0.25",
            "-r",
            "-0.25,0.25",
            "-p",
            "3",
        ])
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn reads_settings_from_the_environment() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("env.png");
    mandelfarm()
        .env("MANDELFARM_OUTPUT", output.to_str().unwrap())
        .env("MANDELFARM_SIZE", "24x16")
        .env("MANDELFARM_PROCESSES", "3")
        .assert()
        .success();
    let decoded = image::open(&output).unwrap().to_rgb();
    assert_eq!(decoded.dimensions(), (24, 16));
}

#[test]
fn refuses_a_height_that_does_not_divide_into_units() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.png");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "60x40", "-g", "7", "-p", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a multiple"));
    assert!(!output.exists());
}

#[test]
fn refuses_a_group_without_workers() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.png");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "60x40", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Process count must be between 2"));
    assert!(!output.exists());
}

#[test]
fn refuses_an_unknown_image_format() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.gif");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "60x40", "-p", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must end in"));
    assert!(!output.exists());
}

#[test]
fn refuses_an_inverted_window() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("never.png");
    mandelfarm()
        .args(&["-o", output.to_str().unwrap(), "-s", "8x8", "-l", "1,1", "-r", "-2,-1", "-p", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
    assert!(!output.exists());
}
