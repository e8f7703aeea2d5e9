//! Integration tests for edge cases
//!
//! Tests for:
//! - 0-byte input
//! - 1-byte input
//! - Inputs exactly at and just over a part boundary
//! - Unicode and special characters in file names
//! - Guard ordering for rejected inputs
//! - Directories that carry the `.tar.gz` suffix

use std::fs;
use std::io;
use tarsplit_core::{SplitError, SplitOptions, Splitter};
use tarsplit_integration_tests::{collect_parts, concat_parts};
use tempfile::TempDir;

#[test]
fn test_zero_byte_input_produces_no_parts() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("zero.tar.gz");
    fs::write(&input, b"").unwrap();

    let splitter = Splitter::new(SplitOptions::from_bytes(1024).unwrap());
    let plan = splitter.plan(&input).unwrap();
    assert_eq!(plan.num_parts(), 0);
    assert_eq!(plan.total_size(), 0);

    // Zero parts for zero bytes; nothing is written, not even an empty part
    let report = splitter.split(&input).unwrap();
    assert!(report.parts.is_empty());
    assert!(collect_parts(&input).unwrap().is_empty());
}

#[test]
fn test_single_byte_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("one.tar.gz");
    fs::write(&input, [0x42u8]).unwrap();

    let report = Splitter::default().split(&input).unwrap();
    assert_eq!(report.parts.len(), 1);
    assert_eq!(fs::read(&report.parts[0].path).unwrap(), vec![0x42]);
}

#[test]
fn test_exact_part_boundary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("exact.tar.gz");
    let part_size = 256 * 1024;
    fs::write(&input, vec![0xAB; part_size * 3]).unwrap();

    let opts = SplitOptions::from_bytes(part_size as u64).unwrap();
    let report = Splitter::new(opts).split(&input).unwrap();

    assert_eq!(report.parts.len(), 3);
    assert!(report.parts.iter().all(|p| p.size == part_size as u64));
}

#[test]
fn test_just_over_part_boundary() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("over.tar.gz");
    let part_size = 256 * 1024;
    fs::write(&input, vec![0xCD; part_size + 1]).unwrap();

    let opts = SplitOptions::from_bytes(part_size as u64).unwrap();
    let report = Splitter::new(opts).split(&input).unwrap();

    assert_eq!(report.parts.len(), 2);
    assert_eq!(report.parts[0].size, part_size as u64);
    assert_eq!(report.parts[1].size, 1);
    assert_eq!(fs::read(&report.parts[1].path).unwrap(), vec![0xCD]);
}

#[test]
fn test_unicode_filename() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("测试文件_файл_ファイル.tar.gz");
    let data: Vec<u8> = (0..5000u32).map(|i| i as u8).collect();
    fs::write(&input, &data).unwrap();

    let opts = SplitOptions::from_bytes(2000).unwrap();
    let report = Splitter::new(opts).split(&input).unwrap();

    assert_eq!(report.parts.len(), 3);
    assert!(
        report.parts[0]
            .path
            .to_string_lossy()
            .ends_with("测试文件_файл_ファイル.tar.gz.part1.tar.gz")
    );
    assert_eq!(concat_parts(&collect_parts(&input).unwrap()).unwrap(), data);
}

#[test]
fn test_special_characters_in_filename() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("file-with_special.chars[1](2){3}@#$.tar.gz");
    fs::write(&input, vec![0x77; 512]).unwrap();

    let opts = SplitOptions::from_bytes(500).unwrap();
    let report = Splitter::new(opts).split(&input).unwrap();

    assert_eq!(report.parts.len(), 2);
    assert!(report.parts.iter().all(|p| p.path.exists()));
}

#[test]
fn test_missing_wrong_suffix_reports_missing() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("absent.rar");

    let err = Splitter::default().split(&input).unwrap_err();
    assert!(matches!(err, SplitError::NotFound(_)));
}

#[test]
fn test_double_suffix_part_is_accepted_as_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("a.tar.gz");
    fs::write(&input, vec![9u8; 300]).unwrap();

    let opts = SplitOptions::from_bytes(200).unwrap();
    let splitter = Splitter::new(opts);
    let report = splitter.split(&input).unwrap();

    // A part file itself ends in .tar.gz and may be split again
    let nested = splitter.split(&report.parts[0].path).unwrap();
    assert_eq!(nested.parts.len(), 1);
    assert!(
        nested.parts[0]
            .path
            .to_string_lossy()
            .ends_with("a.tar.gz.part1.tar.gz.part1.tar.gz")
    );
}

#[test]
fn test_directory_input_leaves_no_parts() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("dir.tar.gz");
    fs::create_dir(&input).unwrap();

    let splitter = Splitter::new(SplitOptions::from_bytes(1).unwrap());
    let err = splitter.split(&input).unwrap_err();

    match &err {
        SplitError::Io { source, .. } => {
            assert_eq!(source.kind(), io::ErrorKind::IsADirectory);
        }
        other => panic!("expected I/O error, got {other:?}"),
    }
    assert!(!err.is_precondition());

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("dir.tar.gz")]);
    assert!(collect_parts(&input).unwrap().is_empty());
}
