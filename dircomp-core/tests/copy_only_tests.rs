// dircomp-core/tests/copy_only_tests.rs
//
// End-to-end runs through the public API with the real spawner and prober.
// Every file sits below the minimum size, so neither ffmpeg nor ffprobe is
// ever invoked and the tests run anywhere.

use dircomp_core::external::{CrateFfprobeProber, SidecarSpawner};
use dircomp_core::{CoreConfigBuilder, CoreError, NoopReporter, process_tree};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn build_tree(input: &Path) {
    write(&input.join("movie.mkv"), b"not really a movie");
    write(&input.join("docs/readme.txt"), b"hello");
    write(&input.join("docs/deep/nested/data.bin"), &[7u8; 300]);
    fs::create_dir_all(input.join("empty")).unwrap();
}

#[test]
fn test_recursive_copy_mirrors_every_entry() {
    let root = tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    build_tree(&input);

    let config = CoreConfigBuilder::new()
        .input_path(input.clone())
        .output_path(output.clone())
        .recursive(true)
        .min_size(u64::MAX)
        .build()
        .unwrap();

    let summary = process_tree(&SidecarSpawner, &CrateFfprobeProber::new(), &NoopReporter, &config)
        .unwrap();

    assert!(summary.encoded.is_empty());
    assert_eq!(summary.files_copied, 3);
    assert_eq!(summary.bytes_copied, 18 + 5 + 300);
    assert_eq!(fs::read(output.join("movie.mkv")).unwrap(), b"not really a movie");
    assert_eq!(fs::read(output.join("docs/readme.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(output.join("docs/deep/nested/data.bin")).unwrap().len(), 300);
    assert!(output.join("empty").is_dir());
}

#[test]
fn test_non_recursive_copy_counts_subtrees() {
    let root = tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    build_tree(&input);

    let config = CoreConfigBuilder::new()
        .input_path(input)
        .output_path(output.clone())
        .min_size(u64::MAX)
        .build()
        .unwrap();

    let summary = process_tree(&SidecarSpawner, &CrateFfprobeProber::new(), &NoopReporter, &config)
        .unwrap();

    // docs/ and empty/
    assert_eq!(summary.subtrees_copied, 2);
    assert_eq!(summary.files_copied, 3);
    assert!(output.join("empty").is_dir());
    assert!(output.join("docs/deep/nested/data.bin").is_file());
}

#[test]
fn test_builder_rejects_bad_configuration() {
    let root = tempdir().unwrap();

    let missing = CoreConfigBuilder::new()
        .input_path(root.path().join("missing"))
        .output_path(root.path().join("out"))
        .build();
    assert!(matches!(missing, Err(CoreError::InputNotFound(_))));

    let conflicting = CoreConfigBuilder::new()
        .input_path(root.path().to_path_buf())
        .output_path(tempdir().unwrap().path().join("out"))
        .crf(30)
        .bitrate("2M")
        .build();
    assert!(matches!(conflicting, Err(CoreError::Config(_))));
}
