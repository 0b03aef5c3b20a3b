//! Collaborator traits the surrounding library (or a test) implements.
//!
//! None of these traits are SMB-specific; they are the seams this crate
//! leaves open so it can be embedded in a larger transfer library without
//! owning URL parsing, credential storage, sockets, or a body pump.

use std::io;

/// A non-blocking byte stream. `WouldBlock` is the documented way to signal
/// "no bytes available right now" from either `read` or `write`.
pub trait Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Whether the transport is ready to carry SMB traffic. For plain TCP
    /// this is always true; a TLS-wrapping transport returns `false` until
    /// its handshake completes.
    fn is_tls_ready(&self) -> bool {
        true
    }
}

/// Decoded login credentials.
pub trait CredentialSource {
    fn user(&self) -> &str;
    fn domain(&self) -> Option<&str>;
    fn password(&self) -> &str;
}

/// Splits a URL path into a share name and a file path.
pub trait PathParser {
    fn parse(&self, url_path: &str) -> crate::Result<(String, String)>;
}

/// NTLM hash primitives. Deliberately NTLMv1 only: no NTLMv2, no Kerberos.
pub trait NtlmCore {
    fn lm_hash(&self, password: &str) -> [u8; 16];
    fn nt_hash(&self, password: &str) -> [u8; 16];
    fn lm_response(&self, hash: &[u8; 16], challenge: &[u8; 8]) -> [u8; 24];
}

/// Receives downloaded bytes in order.
pub trait BodySink {
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
}

/// Supplies bytes to upload, in order. Returns `0` when exhausted.
pub trait BodySource {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Receives progress updates after each successful READ_ANDX/WRITE_ANDX.
pub trait Progress {
    fn update(&mut self, downloaded: u64, uploaded: u64);
}

/// Source of the process id used to build SMB1 `pid_high`/`pid_low`.
pub trait ProcessId {
    fn current() -> u32;
}
