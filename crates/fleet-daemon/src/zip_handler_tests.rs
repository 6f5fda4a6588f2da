// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn roundtrip_preserves_file_contents_and_layout() {
    let src = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("a.txt"), b"hello").unwrap();
    std::fs::create_dir(src.path().join("nested")).unwrap();
    std::fs::write(src.path().join("nested/b.txt"), b"world").unwrap();

    let zip_dir = tempfile::tempdir().unwrap();
    let zip_path = zip_dir.path().join("out.zip");
    ZipHandler::compress(&zip_path, src.path()).unwrap();
    assert!(zip_path.exists());

    let dest = tempfile::tempdir().unwrap();
    ZipHandler::uncompress(&zip_path, dest.path()).unwrap();

    assert_eq!(std::fs::read(dest.path().join("a.txt")).unwrap(), b"hello");
    assert_eq!(std::fs::read(dest.path().join("nested/b.txt")).unwrap(), b"world");
}

#[test]
fn uncompress_creates_destination_directory() {
    let src = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("a.txt"), b"x").unwrap();
    let zip_dir = tempfile::tempdir().unwrap();
    let zip_path = zip_dir.path().join("out.zip");
    ZipHandler::compress(&zip_path, src.path()).unwrap();

    let dest_parent = tempfile::tempdir().unwrap();
    let dest = dest_parent.path().join("does_not_exist_yet");
    ZipHandler::uncompress(&zip_path, &dest).unwrap();
    assert!(dest.join("a.txt").exists());
}

#[test]
fn compress_of_empty_directory_produces_readable_archive() {
    let src = tempfile::tempdir().unwrap();
    let zip_dir = tempfile::tempdir().unwrap();
    let zip_path = zip_dir.path().join("empty.zip");
    ZipHandler::compress(&zip_path, src.path()).unwrap();

    let dest = tempfile::tempdir().unwrap();
    ZipHandler::uncompress(&zip_path, dest.path()).unwrap();
    assert!(dest.path().exists());
}
