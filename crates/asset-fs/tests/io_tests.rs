use asset_fs::io;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("references/ci/index.md");

    io::write_atomic(&path, b"# CI").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# CI");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("page.md");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
}

#[test]
#[cfg(unix)]
fn test_write_atomic_replaces_symlink_at_destination() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside.md");
    fs::write(&outside, "keep me").unwrap();

    let link = temp.path().join("page.md");
    std::os::unix::fs::symlink(&outside, &link).unwrap();

    io::write_text(&link, "fresh").unwrap();

    assert!(!link.is_symlink(), "symlink should be replaced by a file");
    assert_eq!(fs::read_to_string(&link).unwrap(), "fresh");
    assert_eq!(fs::read_to_string(&outside).unwrap(), "keep me");
}

#[test]
fn test_read_text_nonexistent_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = io::read_text(&temp.path().join("missing.md")).unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}
