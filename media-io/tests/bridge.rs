use std::fs;

use media_io::{AccessMode, Error, IoBridge, OpenFlags, Whence};

fn sandbox_resolver(root: &std::path::Path) -> media_io::PathResolver {
    let root = root.to_path_buf();
    Box::new(move |url| Ok(root.join(url)))
}

#[test]
fn test_flag_table() {
    assert_eq!(AccessMode::from_flags(OpenFlags::READ | OpenFlags::WRITE).unwrap(), AccessMode::ReadWrite);
    assert_eq!(AccessMode::from_flags(OpenFlags::READ).unwrap(), AccessMode::Read);
    assert_eq!(AccessMode::from_flags(OpenFlags::WRITE).unwrap(), AccessMode::Write);
    assert!(matches!(
        AccessMode::from_flags(OpenFlags::empty()),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_raw_flag_bits() {
    assert_eq!(AccessMode::from_bits(3).unwrap(), AccessMode::ReadWrite);
    assert_eq!(AccessMode::from_bits(1).unwrap(), AccessMode::Read);
    assert_eq!(AccessMode::from_bits(2).unwrap(), AccessMode::Write);

    assert!(matches!(AccessMode::from_bits(0), Err(Error::Unsupported(_))));
    assert!(matches!(AccessMode::from_bits(4), Err(Error::Unsupported(_))));
    assert!(matches!(AccessMode::from_bits(5), Err(Error::Unsupported(_))));
    assert!(matches!(AccessMode::from_bits(0x8000_0002), Err(Error::Unsupported(_))));
}

#[test]
fn test_write_only_creates() {
    let sandbox = tempfile::tempdir().unwrap();
    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));

    let mut handle = bridge.open("fresh.bin", OpenFlags::WRITE).unwrap();
    handle.write(b"segment data").unwrap();
    handle.close().unwrap();

    assert_eq!(fs::read(sandbox.path().join("fresh.bin")).unwrap(), b"segment data");
}

#[test]
fn test_write_only_truncates() {
    let sandbox = tempfile::tempdir().unwrap();
    let path = sandbox.path().join("existing.bin");
    fs::write(&path, b"previous contents that should vanish").unwrap();

    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));
    let mut handle = bridge.open("existing.bin", OpenFlags::WRITE).unwrap();
    handle.write(b"new").unwrap();
    handle.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"new");
}

#[test]
fn test_read_write_requires_existing() {
    let sandbox = tempfile::tempdir().unwrap();
    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));

    let err = bridge.open("missing.bin", OpenFlags::READ | OpenFlags::WRITE).unwrap_err();
    assert!(matches!(err, Error::OpenFailed(_)));
    assert!(!sandbox.path().join("missing.bin").exists());
}

#[test]
fn test_read_write_updates_existing() {
    let sandbox = tempfile::tempdir().unwrap();
    let path = sandbox.path().join("update.bin");
    fs::write(&path, b"0123456789").unwrap();

    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));
    let mut handle = bridge.open("update.bin", OpenFlags::READ | OpenFlags::WRITE).unwrap();

    handle.seek(4, Whence::Start).unwrap();
    handle.write(b"abcd").unwrap();
    handle.seek(0, Whence::Start).unwrap();

    let mut buf = [0u8; 10];
    handle.read(&mut buf).unwrap();
    assert_eq!(&buf, b"0123abcd89");

    handle.close().unwrap();
}

#[test]
fn test_read_bypasses_resolver() {
    let input_dir = tempfile::tempdir().unwrap();
    let sandbox = tempfile::tempdir().unwrap();

    let input = input_dir.path().join("input.ts");
    fs::write(&input, b"mpegts bytes").unwrap();

    // The resolver points elsewhere; a read-only open must use the path as
    // given.
    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));
    let mut handle = bridge.open(input.to_str().unwrap(), OpenFlags::READ).unwrap();

    let mut buf = [0u8; 12];
    handle.read(&mut buf).unwrap();
    assert_eq!(&buf, b"mpegts bytes");

    handle.close().unwrap();
}

#[test]
fn test_write_without_resolver() {
    let bridge = IoBridge::new();

    assert!(matches!(bridge.open("out.bin", OpenFlags::WRITE), Err(Error::OpenFailed(_))));
    assert!(matches!(
        bridge.open("out.bin", OpenFlags::READ | OpenFlags::WRITE),
        Err(Error::OpenFailed(_))
    ));
}

#[test]
fn test_write_only_handle_rejects_read() {
    let sandbox = tempfile::tempdir().unwrap();
    let bridge = IoBridge::with_resolver(sandbox_resolver(sandbox.path()));

    let mut handle = bridge.open("wo.bin", OpenFlags::WRITE).unwrap();
    handle.write(b"x").unwrap();

    let mut buf = [0u8; 1];
    assert!(matches!(handle.read(&mut buf), Err(Error::Unsupported(_))));

    handle.close().unwrap();
}
