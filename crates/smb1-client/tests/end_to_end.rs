//! Drives the connection and request engines against an in-process mock
//! `Transport` that scripts server responses byte-for-byte, covering the
//! end-to-end download/upload/error scenarios.

use std::collections::VecDeque;
use std::io;

use smb1_client::body::{VecSink, VecSource};
use smb1_client::credentials::BasicCredentials;
use smb1_client::ntlm::DefaultNtlm;
use smb1_client::pathparser::DefaultPathParser;
use smb1_client::pid::StdProcessId;
use smb1_client::progress::NoProgress;
use smb1_client::traits::Transport;
use smb1_client::{ClientConfig, Direction, SmbHandler, Status};

use smb1_proto::header::Header;
use smb1_proto::netbios::NetBiosHeader;

/// A scripted, in-process server: a fixed queue of response frames handed
/// out one message per `read` call (never straddling a message boundary,
/// matching the strict req/response serialization a real SMB1 server
/// observes), and an optional per-call byte cap on `write` to simulate a
/// short send.
struct MockTransport {
    inbound: VecDeque<Vec<u8>>,
    current: Option<(Vec<u8>, usize)>,
    write_caps: VecDeque<usize>,
    sent: Vec<u8>,
}

impl MockTransport {
    fn new(inbound: Vec<Vec<u8>>) -> Self {
        Self {
            inbound: inbound.into(),
            current: None,
            write_caps: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    fn with_write_caps(mut self, caps: Vec<usize>) -> Self {
        self.write_caps = caps.into();
        self
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.current.is_none() {
            match self.inbound.pop_front() {
                Some(msg) => self.current = Some((msg, 0)),
                None => return Err(io::Error::from(io::ErrorKind::WouldBlock)),
            }
        }

        let (msg, offset) = self.current.as_mut().unwrap();
        let n = (msg.len() - *offset).min(buf.len());
        buf[..n].copy_from_slice(&msg[*offset..*offset + n]);
        *offset += n;
        if *offset == msg.len() {
            self.current = None;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let cap = self.write_caps.pop_front().unwrap_or(buf.len());
        self.sent.extend_from_slice(&buf[..cap]);
        Ok(cap)
    }
}

/// Builds a response frame with an arbitrary status/tid/uid, bypassing the
/// client-side request encoders (which always emit status = 0).
fn response_frame(command: u8, status: u32, tid: u16, uid: u16, params: &[u8], data: &[u8]) -> Vec<u8> {
    let mut header = Header::request(command, tid, uid, 0);
    header.status = status;

    let mut payload = Vec::new();
    payload.extend_from_slice(&header.encode());
    payload.push((params.len() / 2) as u8);
    payload.extend_from_slice(params);
    payload.extend_from_slice(&(data.len() as u16).to_le_bytes());
    payload.extend_from_slice(data);

    let nbt = NetBiosHeader::session_message(payload.len() as u16);
    let mut out = nbt.encode().to_vec();
    out.extend_from_slice(&payload);
    out
}

fn negotiate_response(challenge: [u8; 8], session_key: u32) -> Vec<u8> {
    let mut params = vec![0u8; 34];
    params[15..19].copy_from_slice(&session_key.to_le_bytes());
    response_frame(smb1_proto::command::NEGOTIATE, 0, 0, 0, &params, &challenge)
}

fn session_setup_response(status: u32, uid: u16) -> Vec<u8> {
    response_frame(smb1_proto::command::SESSION_SETUP_ANDX, status, 0, uid, &[0u8; 6], &[])
}

fn tree_connect_response(status: u32, tid: u16) -> Vec<u8> {
    response_frame(smb1_proto::command::TREE_CONNECT_ANDX, status, tid, 0x1001, &[0u8; 8], &[])
}

fn create_response(status: u32, tid: u16, fid: u16, end_of_file: u64) -> Vec<u8> {
    let mut params = vec![0u8; 64];
    params[5..7].copy_from_slice(&fid.to_le_bytes());
    params[55..63].copy_from_slice(&end_of_file.to_le_bytes());
    response_frame(smb1_proto::command::NT_CREATE_ANDX, status, tid, 0x1001, &params, &[])
}

fn read_response(tid: u16, payload: &[u8]) -> Vec<u8> {
    let mut params = vec![0u8; 24];
    // DataOffset is measured from the SMB header start, not from the end of
    // this frame's own header + params + byte_count.
    let data_offset = Header::SIZE + 1 + params.len() + 2;
    params[10..12].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    params[12..14].copy_from_slice(&(data_offset as u16).to_le_bytes());
    response_frame(smb1_proto::command::READ_ANDX, 0, tid, 0x1001, &params, payload)
}

fn write_response(tid: u16, count: u16) -> Vec<u8> {
    let mut params = vec![0u8; 28];
    params[4..6].copy_from_slice(&count.to_le_bytes());
    response_frame(smb1_proto::command::WRITE_ANDX, 0, tid, 0x1001, &params, &[])
}

fn status_response(command: u8, tid: u16) -> Vec<u8> {
    response_frame(command, 0, tid, 0x1001, &[], &[])
}

fn run_to_completion<T: Transport>(handler: &mut SmbHandler<T>) -> Status {
    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;
    for _ in 0..10_000 {
        let done = handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap();
        if done && handler.requests_served() > 0 {
            return handler.take_result().unwrap().0;
        }
    }
    panic!("handler never completed");
}

fn setup_handler(transport: MockTransport, share_path: &str) -> SmbHandler<MockTransport> {
    let mut handler = SmbHandler::new(ClientConfig::default(), DefaultNtlm, transport);
    let creds = BasicCredentials::new("alice", "secret");
    handler
        .setup(share_path, &creds, "fileserver", false, &DefaultPathParser)
        .unwrap();
    handler.connect::<StdProcessId>();
    handler
}

#[test]
fn download_success() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0, 0x1001),
        tree_connect_response(0, 0x2002),
        create_response(0, 0x2002, 0x3003, 11),
        read_response(0x2002, b"hello world"),
        status_response(smb1_proto::command::CLOSE, 0x2002),
        status_response(smb1_proto::command::TREE_DISCONNECT, 0x2002),
    ]);

    let mut handler = setup_handler(transport, "/public/hello.txt");

    // Drive the connection to `Connected`.
    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;
    loop {
        if handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap() {
            break;
        }
    }

    handler.begin_request(Direction::Download);
    let status = run_to_completion(&mut handler);
    assert_eq!(status, Status::Ok);
    assert_eq!(sink.0, b"hello world");
}

#[test]
fn upload_success() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0, 0x1001),
        tree_connect_response(0, 0x2002),
        create_response(0, 0x2002, 0x3003, 0),
        write_response(0x2002, 3),
        status_response(smb1_proto::command::CLOSE, 0x2002),
        status_response(smb1_proto::command::TREE_DISCONNECT, 0x2002),
    ]);

    let mut handler = setup_handler(transport, "/public/hello.txt");

    let mut sink = VecSink::default();
    let mut source = VecSource::new(b"abc".to_vec());
    let mut progress = NoProgress;
    loop {
        if handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap() {
            break;
        }
    }

    handler.begin_request(Direction::Upload { infilesize: 3 });

    for _ in 0..10_000 {
        let done = handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap();
        if done {
            break;
        }
    }
    let (status, premature) = handler.take_result().unwrap();
    assert_eq!(status, Status::Ok);
    assert!(!premature);
}

#[test]
fn auth_failure_stops_before_tree_connect() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0xC000_006D, 0),
    ]);
    let mut handler = setup_handler(transport, "/public/hello.txt");

    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;

    let mut saw_error = false;
    for _ in 0..10 {
        match handler.drive(true, true, &mut sink, &mut source, &mut progress) {
            Ok(true) => break,
            Ok(false) => continue,
            Err(smb1_client::Error::LoginDenied) => {
                saw_error = true;
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(saw_error);
}

#[test]
fn access_denied_on_share() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0, 0x1001),
        tree_connect_response(smb1_proto::SMB_ERR_NOACCESS, 0),
    ]);
    let mut handler = setup_handler(transport, "/public/hello.txt");

    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;
    loop {
        if handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap() {
            break;
        }
    }

    handler.begin_request(Direction::Download);
    let status = run_to_completion(&mut handler);
    assert_eq!(status, Status::RemoteAccessDenied);
}

#[test]
fn file_not_found_sends_tree_disconnect_without_close() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0, 0x1001),
        tree_connect_response(0, 0x2002),
        create_response(0xC000_0034, 0x2002, 0, 0),
        status_response(smb1_proto::command::TREE_DISCONNECT, 0x2002),
    ]);
    let mut handler = setup_handler(transport, "/public/missing.txt");

    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;
    loop {
        if handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap() {
            break;
        }
    }

    handler.begin_request(Direction::Download);
    let status = run_to_completion(&mut handler);
    assert_eq!(status, Status::RemoteFileNotFound);
}

#[test]
fn partial_send_drains_before_reading_continues() {
    let transport = MockTransport::new(vec![
        negotiate_response([1, 2, 3, 4, 5, 6, 7, 8], 0xdead_beef),
        session_setup_response(0, 0x1001),
        tree_connect_response(0, 0x2002),
        create_response(0, 0x2002, 0x3003, 11),
        read_response(0x2002, b"hello world"),
        status_response(smb1_proto::command::CLOSE, 0x2002),
        status_response(smb1_proto::command::TREE_DISCONNECT, 0x2002),
    ])
    .with_write_caps(vec![7, 0]);

    let mut handler = setup_handler(transport, "/public/hello.txt");

    let mut sink = VecSink::default();
    let mut source = VecSource::default();
    let mut progress = NoProgress;
    loop {
        if handler.drive(true, true, &mut sink, &mut source, &mut progress).unwrap() {
            break;
        }
    }

    handler.begin_request(Direction::Download);
    let status = run_to_completion(&mut handler);
    assert_eq!(status, Status::Ok);
    assert_eq!(sink.0, b"hello world");
}
