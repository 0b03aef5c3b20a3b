//! The connection engine: NEGOTIATE -> SESSION_SETUP_ANDX -> Connected.

use log::{debug, trace, warn};

use smb1_proto::{negotiate, session_setup};

use crate::config::ClientConfig;
use crate::credentials::split_domain_user;
use crate::error::{Error, Result};
use crate::ntlm::DefaultNtlm;
use crate::traits::{CredentialSource, NtlmCore, PathParser, ProcessId, Transport};

pub const MAX_PAYLOAD_SIZE: usize = smb1_proto::MAX_PAYLOAD_SIZE;
pub const MAX_MESSAGE_SIZE: usize = smb1_proto::MAX_MESSAGE_SIZE;

/// Phase of the connection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnPhase {
    Connecting,
    Negotiate,
    Setup,
    Connected,
}

/// Which way the caller's selector should watch this connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorHint {
    None,
    Read,
    Write,
}

/// A single SMB1 connection's protocol state.
pub struct Connection<N: NtlmCore = DefaultNtlm> {
    phase: Option<ConnPhase>,
    ntlm: N,
    config: ClientConfig,

    send_buf: Vec<u8>,
    recv_buf: Vec<u8>,
    got: usize,
    send_size: usize,
    sent: usize,

    uid: u16,
    session_key: u32,
    challenge: [u8; 8],

    user: String,
    domain: String,
    password: String,
    host: String,
    pid: u32,
    use_tls: bool,

    requests_served: u64,

    pending_share: String,
    pending_path: String,
}

impl<N: NtlmCore> Connection<N> {
    pub fn new(config: ClientConfig, ntlm: N) -> Self {
        Self {
            phase: None,
            ntlm,
            config,
            send_buf: Vec::new(),
            recv_buf: Vec::new(),
            got: 0,
            send_size: 0,
            sent: 0,
            uid: 0,
            session_key: 0,
            challenge: [0; 8],
            user: String::new(),
            domain: String::new(),
            password: String::new(),
            host: String::new(),
            pid: 0,
            use_tls: false,
            requests_served: 0,
            pending_share: String::new(),
            pending_path: String::new(),
        }
    }

    /// Parses `url_path` into a share/path pair and records credentials and
    /// host for the upcoming connect. Domain resolution: an explicit
    /// `credentials.domain()` wins; otherwise a `domain/user` or
    /// `domain\user` embedded in the user name is split out; otherwise the
    /// domain defaults to `host`.
    pub fn setup(
        &mut self,
        url_path: &str,
        credentials: &impl CredentialSource,
        host: &str,
        use_tls: bool,
        path_parser: &impl PathParser,
    ) -> Result<()> {
        let (share, path) = path_parser.parse(url_path)?;

        let (domain, user) = match credentials.domain() {
            Some(d) => (d.to_string(), credentials.user().to_string()),
            None => match split_domain_user(credentials.user()) {
                (Some(d), u) => (d.to_string(), u.to_string()),
                (None, u) => (
                    self.config.default_domain.clone().unwrap_or_else(|| host.to_string()),
                    u.to_string(),
                ),
            },
        };

        self.pending_share = share;
        self.pending_path = path;
        self.user = user;
        self.domain = domain;
        self.password = credentials.password().to_string();
        self.host = host.to_string();
        self.use_tls = use_tls;

        Ok(())
    }

    /// Allocates the fixed-size buffers and resets protocol state for a new
    /// connection. `pid` comes from a [`ProcessId`] implementation.
    pub fn connect<P: ProcessId>(&mut self) {
        self.send_buf = vec![0; MAX_MESSAGE_SIZE];
        self.recv_buf = vec![0; MAX_MESSAGE_SIZE];
        self.got = 0;
        self.send_size = 0;
        self.sent = 0;
        self.uid = 0;
        self.session_key = 0;
        self.challenge = [0; 8];
        self.pid = P::current();
        self.phase = Some(ConnPhase::Connecting);
        debug!("connection state reset, pid={}", self.pid);
    }

    pub fn phase(&self) -> Option<ConnPhase> {
        self.phase
    }

    pub fn uid(&self) -> u16 {
        self.uid
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether a prior send is still draining; no new message may be
    /// encoded onto `send_buf` while this is true.
    pub(crate) fn send_pending(&self) -> bool {
        self.send_size > 0
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served
    }

    pub fn note_request_done(&mut self) {
        self.requests_served += 1;
    }

    pub fn take_share_path(&mut self) -> (String, String) {
        (
            std::mem::take(&mut self.pending_share),
            std::mem::take(&mut self.pending_path),
        )
    }

    pub fn selector_hint(&self) -> SelectorHint {
        match self.phase {
            None => SelectorHint::None,
            Some(_) if self.send_size > 0 => SelectorHint::Write,
            Some(_) => SelectorHint::Read,
        }
    }

    /// Advances the connection phase by at most one protocol step. Returns
    /// `Ok(true)` once `Connected`, `Ok(false)` if the caller should wait for
    /// more readiness (this is the internal "Again" case), or `Err` on a
    /// terminal failure.
    pub fn drive_connection(&mut self, readable: bool, writable: bool, transport: &mut impl Transport) -> Result<bool> {
        let Some(phase) = self.phase else {
            return Ok(false);
        };

        if self.send_size > 0 {
            if !writable {
                return Ok(false);
            }
            self.flush(transport)?;
            if self.send_size > 0 {
                return Ok(false);
            }
        }

        match phase {
            ConnPhase::Connected => Ok(true),
            ConnPhase::Connecting => {
                if !transport.is_tls_ready() {
                    return Ok(false);
                }
                trace!("sending NEGOTIATE");
                let req = negotiate::encode_request(self.pid);
                self.queue_send(&req, transport)?;
                self.phase = Some(ConnPhase::Negotiate);
                Ok(false)
            }
            ConnPhase::Negotiate => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = self.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = negotiate::decode_response(msg)?;
                if resp.status != 0 {
                    warn!("NEGOTIATE rejected, status=0x{:08x}", resp.status);
                    return Err(Error::CouldNotConnect);
                }
                self.challenge = resp.challenge;
                self.session_key = resp.session_key;

                let lm_hash = self.ntlm.lm_hash(&self.password);
                let lm_response = self.ntlm.lm_response(&lm_hash, &self.challenge);
                let nt_response = if self.config.send_nt_response {
                    let nt_hash = self.ntlm.nt_hash(&self.password);
                    Some(self.ntlm.lm_response(&nt_hash, &self.challenge))
                } else {
                    None
                };

                let req = session_setup::encode_request(&session_setup::SessionSetupRequest {
                    pid: self.pid,
                    session_key: self.session_key,
                    lm_response,
                    nt_response,
                    user: &self.user,
                    domain: &self.domain,
                    os_name: &self.config.os_name,
                    client_name: &self.config.client_name,
                })
                .map_err(|_| Error::FilesizeExceeded)?;
                self.queue_send(&req, transport)?;
                self.phase = Some(ConnPhase::Setup);
                Ok(false)
            }
            ConnPhase::Setup => {
                if !readable {
                    return Ok(false);
                }
                let Some(msg) = self.try_pop_message(transport)? else {
                    return Ok(false);
                };
                let resp = session_setup::decode_response(msg)?;
                if resp.status != 0 {
                    warn!("SESSION_SETUP_ANDX rejected, status=0x{:08x}", resp.status);
                    return Err(Error::LoginDenied);
                }
                self.uid = resp.uid;
                debug!("session established, uid=0x{:04x}", self.uid);
                self.phase = Some(ConnPhase::Connected);
                Ok(true)
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.send_buf = Vec::new();
        self.recv_buf = Vec::new();
        self.got = 0;
        self.send_size = 0;
        self.sent = 0;
        self.domain = String::new();
        self.phase = None;
    }

    /// Queues `msg` for sending, attempting an immediate write. If the
    /// transport accepts fewer bytes than the whole message, the remainder
    /// is buffered in `send_buf` and drained by later `flush` calls.
    pub(crate) fn queue_send(&mut self, msg: &[u8], transport: &mut impl Transport) -> Result<()> {
        debug_assert!(self.send_size == 0, "cannot queue a send while one is pending");
        self.send_buf[..msg.len()].copy_from_slice(msg);
        self.send_size = msg.len();
        self.sent = 0;
        self.flush(transport)
    }

    pub(crate) fn flush(&mut self, transport: &mut impl Transport) -> Result<()> {
        while self.sent < self.send_size {
            match transport.write(&self.send_buf[self.sent..self.send_size]) {
                Ok(0) => break,
                Ok(n) => self.sent += n,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        if self.sent == self.send_size {
            self.send_size = 0;
            self.sent = 0;
        }
        Ok(())
    }

    /// Reads into `recv_buf[got..]` and returns the framed message once a
    /// complete one has arrived, consuming it (`got` resets to zero).
    pub(crate) fn try_pop_message(&mut self, transport: &mut impl Transport) -> Result<Option<&[u8]>> {
        loop {
            match transport.read(&mut self.recv_buf[self.got..]) {
                Ok(0) => break,
                Ok(n) => self.got += n,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        let framed_len = match smb1_proto::frame::pop_message(&self.recv_buf, self.got)? {
            Some(msg) => msg.len(),
            None => return Ok(None),
        };

        self.got = 0;
        Ok(Some(&self.recv_buf[..framed_len]))
    }
}
