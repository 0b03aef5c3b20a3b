//! Wire codec for the SMB1 ("NT LM 0.12") dialect, framed inside the NetBIOS
//! Session Service.
//!
//! This crate is pure functions over byte slices: it does not own a socket,
//! a thread, or any connection state. Everything here is either:
//!
//! - a small fixed-size header decoded/encoded with [`binrw`] (the NetBIOS
//!   frame header and the 32-byte SMB1 header), or
//! - a variable-length AndX parameter/data block, encoded and decoded by
//!   hand with the [`le`] helpers, because the word_count/byte_count shape
//!   of these blocks does not map cleanly onto a single fixed `binrw` struct.
//!
//! Every multi-byte SMB field is little-endian on the wire except the
//! NetBIOS length, which is big-endian; decoding never relies on host byte
//! order or `#[repr(C)]` layout.

pub mod close;
pub mod consts;
pub mod create;
pub mod error;
pub mod frame;
pub mod header;
pub mod le;
pub mod negotiate;
pub mod netbios;
pub mod rw;
pub mod session_setup;
pub mod tree_connect;

pub use consts::*;
pub use error::CodecError;
pub use header::{Flags, Flags2, Header};
pub use netbios::NetBiosHeader;

/// Codec [`Result`](std::result::Result) alias.
pub type Result<T> = std::result::Result<T, CodecError>;
