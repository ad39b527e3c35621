use media_io::{CallRecord, MemoryStream, Stream, StreamCaps, StreamOp, TracedStream, Whence};

#[test]
fn test_records_calls_with_arguments() {
    let mut stream = TracedStream::new(MemoryStream::new());
    let log = stream.log();

    stream.write(b"hello").unwrap();
    stream.seek(0, Whence::Start).unwrap();

    let mut buf = [0u8; 3];
    stream.read(&mut buf).unwrap();
    stream.close().unwrap();

    let records = log.records();
    assert_eq!(records.len(), 4);

    assert!(matches!(records[0], CallRecord::Write { len: 5, written: 5 }));
    assert!(matches!(
        records[1],
        CallRecord::Seek {
            offset: 0,
            whence: Whence::Start
        }
    ));
    assert!(matches!(records[2], CallRecord::Read { requested: 3, returned: 3 }));
    assert!(matches!(records[3], CallRecord::Close));

    assert_eq!(log.count(StreamOp::Write), 1);
    assert_eq!(log.count(StreamOp::Seek), 1);
    assert_eq!(log.count(StreamOp::Read), 1);
    assert_eq!(log.count(StreamOp::Close), 1);
    assert_eq!(log.bytes_written(), 5);
    assert_eq!(log.bytes_read(), 3);
}

#[test]
fn test_caps_pass_through() {
    let stream = TracedStream::new(MemoryStream::new());
    assert_eq!(stream.caps(), StreamCaps::READ | StreamCaps::WRITE | StreamCaps::SEEK);
}

#[test]
fn test_shared_log_outlives_stream() {
    let stream = TracedStream::new(MemoryStream::new());
    let log = stream.log();

    {
        let mut stream = stream;
        stream.write(b"data").unwrap();
        stream.close().unwrap();
    }

    assert_eq!(log.count(StreamOp::Write), 1);
    assert_eq!(log.count(StreamOp::Close), 1);
}
