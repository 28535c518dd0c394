use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn dircomp_cmd() -> Command {
    Command::cargo_bin("dircomp").expect("Failed to find dircomp binary")
}

// These tests cover argument parsing and configuration validation, which
// run before ffmpeg or ffprobe are looked up, so they pass on machines
// without either tool installed.

#[test]
fn test_help_lists_flags() -> Result<(), Box<dyn Error>> {
    dircomp_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--input"))
        .stdout(contains("--min-size"))
        .stdout(contains("--recursive"))
        .stdout(contains("--on-error"));
    Ok(())
}

#[test]
fn test_missing_required_args() -> Result<(), Box<dyn Error>> {
    dircomp_cmd()
        .arg("--input")
        .arg("somewhere")
        .assert()
        .failure()
        .stderr(contains("--output"));
    Ok(())
}

#[test]
fn test_non_existent_input() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;
    let missing = output_dir.path().join("surely/this/does/not/exist");

    dircomp_cmd()
        .arg("--input")
        .arg(&missing)
        .arg("--output")
        .arg(output_dir.path().join("out"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Input path not found"));
    Ok(())
}

#[test]
fn test_crf_and_bitrate_conflict() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--crf", "28", "--bitrate", "1M"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--scale", "double"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--crf", "99"])
        .assert()
        .failure();

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--min-size", "lots"])
        .assert()
        .failure()
        .stderr(contains("invalid size"));
    Ok(())
}

#[test]
fn test_invalid_bitrate_is_a_configuration_error() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(output_dir.path())
        .args(["--bitrate", "fast"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("invalid bitrate"));
    Ok(())
}

#[test]
fn test_output_inside_input_is_rejected() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;

    dircomp_cmd()
        .arg("-i")
        .arg(input_dir.path())
        .arg("-o")
        .arg(input_dir.path().join("compressed"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("must not be the input directory"));

    assert!(!input_dir.path().join("compressed").exists());
    Ok(())
}
