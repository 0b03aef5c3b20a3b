//! The request engine: one file transfer's TREE_CONNECT -> OPEN ->
//! DOWNLOAD/UPLOAD -> CLOSE -> TREE_DISCONNECT lifecycle.

use log::{debug, trace, warn};

use smb1_proto::{close, create, rw, tree_connect, SMB_ERR_NOACCESS};

use crate::connection::{Connection, MAX_PAYLOAD_SIZE};
use crate::error::{Error, Result};
use crate::ntlm::DefaultNtlm;
use crate::traits::{BodySink, BodySource, NtlmCore, Progress, Transport};

/// Phase of the request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReqPhase {
    Requesting,
    TreeConnect,
    Open,
    Download,
    Upload,
    Close,
    TreeDisconnect,
    Done,
}

/// Terminal outcome of a completed request, reported by [`Request::done`].
/// Distinct from [`Error`]: this is a small, copyable summary suitable for
/// keeping around after the request state itself is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    RemoteAccessDenied,
    RemoteFileNotFound,
    RecvError,
    UploadFailed,
}

/// Which way the transfer goes, and (for uploads) how much to send.
#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Download,
    Upload { infilesize: u64 },
}

/// A single file transfer's protocol state.
pub struct Request {
    phase: ReqPhase,
    share: String,
    path: String,
    direction: Direction,

    tid: u16,
    fid: u16,
    offset: u64,
    total: u64,
    transferred: u64,

    result: Status,
}

impl Request {
    pub fn new(share: String, path: String, direction: Direction) -> Self {
        Self {
            phase: ReqPhase::Requesting,
            share,
            path,
            direction,
            tid: 0,
            fid: 0,
            offset: 0,
            total: match direction {
                Direction::Upload { infilesize } => infilesize,
                Direction::Download => 0,
            },
            transferred: 0,
            result: Status::Ok,
        }
    }

    pub fn phase(&self) -> ReqPhase {
        self.phase
    }

    /// Advances the request phase by at most one protocol step. Returns
    /// `Ok(true)` once `Done`, `Ok(false)` to wait for more readiness, or
    /// `Err` on a failure that aborts the whole connection (as opposed to
    /// one recorded gracefully in `self.result`).
    ///
    /// A `Transport::read` returning zero bytes while a message is still
    /// incomplete is treated as "nothing available yet", the same as
    /// `WouldBlock`, not as end of stream; unverified against a live server.
    pub fn drive_request<N: NtlmCore>(
        &mut self,
        conn: &mut Connection<N>,
        readable: bool,
        writable: bool,
        transport: &mut impl Transport,
        sink: &mut impl BodySink,
        source: &mut impl BodySource,
        progress: &mut impl Progress,
    ) -> Result<bool> {
        if conn.send_pending() {
            if !writable {
                return Ok(false);
            }
            conn.flush(transport)?;
            if conn.send_pending() {
                return Ok(false);
            }
        }

        match self.phase {
            ReqPhase::Requesting => {
                trace!("sending TREE_CONNECT_ANDX for share {}", self.share);
                let req = tree_connect::encode_request(conn.pid(), conn.uid(), conn.host(), &self.share)
                    .map_err(|_| Error::FilesizeExceeded)?;
                conn.queue_send(&req, transport)?;
                self.phase = ReqPhase::TreeConnect;
                Ok(false)
            }
            ReqPhase::TreeConnect => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = conn.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = tree_connect::decode_response(msg)?;
                if resp.status == 0 {
                    self.tid = resp.tid;
                    debug!("tree connected, tid=0x{:04x}", self.tid);
                    let intent = match self.direction {
                        Direction::Download => create::Intent::Read,
                        Direction::Upload { .. } => create::Intent::Write,
                    };
                    let req = create::encode_request(conn.pid(), self.tid, conn.uid(), &self.path, intent)
                        .map_err(|_| Error::FilesizeExceeded)?;
                    conn.queue_send(&req, transport)?;
                    self.phase = ReqPhase::Open;
                    Ok(false)
                } else if resp.status == SMB_ERR_NOACCESS {
                    warn!("share access denied");
                    self.result = Status::RemoteAccessDenied;
                    self.phase = ReqPhase::Done;
                    Ok(true)
                } else {
                    warn!("tree connect failed, status=0x{:08x}", resp.status);
                    self.result = Status::RemoteFileNotFound;
                    self.phase = ReqPhase::Done;
                    Ok(true)
                }
            }
            ReqPhase::Open => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = conn.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = create::decode_response(msg)?;
                if resp.status != 0 {
                    warn!("NT_CREATE_ANDX failed, status=0x{:08x}", resp.status);
                    self.result = Status::RemoteFileNotFound;
                    return self.finish_without_handle(conn, transport);
                }

                self.fid = resp.fid;
                self.offset = 0;
                match self.direction {
                    Direction::Download => {
                        self.total = resp.end_of_file;
                        self.send_read(conn, transport)?;
                        self.phase = ReqPhase::Download;
                    }
                    Direction::Upload { .. } => {
                        self.send_write(conn, transport, source)?;
                        self.phase = ReqPhase::Upload;
                    }
                }
                Ok(false)
            }
            ReqPhase::Download => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = conn.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = rw::decode_read_response(msg)?;
                if resp.status != 0 {
                    warn!("READ_ANDX failed mid-transfer, status=0x{:08x}", resp.status);
                    self.result = Status::RecvError;
                    return self.start_close(conn, transport);
                }

                sink.write(resp.data)?;
                self.offset += resp.data.len() as u64;
                self.transferred += resp.data.len() as u64;
                progress.update(self.transferred, 0);

                if resp.data.len() < MAX_PAYLOAD_SIZE {
                    self.start_close(conn, transport)
                } else {
                    self.send_read(conn, transport)?;
                    Ok(false)
                }
            }
            ReqPhase::Upload => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = conn.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = rw::decode_write_response(msg)?;
                if resp.status != 0 {
                    warn!("WRITE_ANDX failed mid-transfer, status=0x{:08x}", resp.status);
                    self.result = Status::UploadFailed;
                    return self.start_close(conn, transport);
                }

                self.offset += resp.count as u64;
                self.transferred += resp.count as u64;
                progress.update(0, self.transferred);

                if self.transferred >= self.total {
                    self.start_close(conn, transport)
                } else {
                    self.send_write(conn, transport, source)?;
                    Ok(false)
                }
            }
            ReqPhase::Close => {
                if !readable {
                    return Ok(false);
                }
                if conn.try_pop_message(transport)?.is_none() {
                    return Ok(false);
                }
                // Close failures are not surfaced; the tree is disconnected
                // regardless.
                self.send_tree_disconnect(conn, transport)
            }
            ReqPhase::TreeDisconnect => {
                if !readable {
                    return Ok(false);
                }
                if conn.try_pop_message(transport)?.is_none() {
                    return Ok(false);
                }
                self.phase = ReqPhase::Done;
                Ok(true)
            }
            ReqPhase::Done => Ok(true),
        }
    }

    /// Releases the request state and reports its terminal status, plus
    /// whether the close sequence was cut short by an earlier failure.
    pub fn done(self) -> (Status, bool) {
        let premature = self.result != Status::Ok;
        (self.result, premature)
    }

    fn send_read(&self, conn: &mut Connection<impl NtlmCore>, transport: &mut impl Transport) -> Result<()> {
        let req = rw::encode_read_request(conn.pid(), self.tid, conn.uid(), self.fid, self.offset, MAX_PAYLOAD_SIZE as u16);
        conn.queue_send(&req, transport)
    }

    fn send_write(
        &self,
        conn: &mut Connection<impl NtlmCore>,
        transport: &mut impl Transport,
        source: &mut impl BodySource,
    ) -> Result<()> {
        let remaining = (self.total - self.transferred).min(MAX_PAYLOAD_SIZE as u64) as usize;
        let mut body = vec![0u8; remaining];
        let n = source.fill(&mut body)?;
        if n == 0 {
            // Re-armed on next drive; the source isn't ready yet.
            return Ok(());
        }
        body.truncate(n);
        let req = rw::encode_write_request(conn.pid(), self.tid, conn.uid(), self.fid, self.offset, &body)
            .map_err(|_| Error::FilesizeExceeded)?;
        conn.queue_send(&req, transport)
    }

    fn start_close(&mut self, conn: &mut Connection<impl NtlmCore>, transport: &mut impl Transport) -> Result<bool> {
        let req = close::encode_close_request(conn.pid(), self.tid, conn.uid(), self.fid);
        conn.queue_send(&req, transport)?;
        self.phase = ReqPhase::Close;
        Ok(false)
    }

    fn send_tree_disconnect(&mut self, conn: &mut Connection<impl NtlmCore>, transport: &mut impl Transport) -> Result<bool> {
        let req = close::encode_tree_disconnect_request(conn.pid(), self.tid, conn.uid());
        conn.queue_send(&req, transport)?;
        self.phase = ReqPhase::TreeDisconnect;
        Ok(false)
    }

    /// Used when the transfer fails before a file handle was opened (tree
    /// connect or create failure): no CLOSE is sent, only TREE_DISCONNECT.
    fn finish_without_handle(&mut self, conn: &mut Connection<impl NtlmCore>, transport: &mut impl Transport) -> Result<bool> {
        self.send_tree_disconnect(conn, transport)
    }
}
