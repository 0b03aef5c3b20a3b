//! The fixed 32-byte SMB1 header.

use binrw::prelude::*;
use std::io::Cursor;

use crate::error::CodecError;

bitflags::bitflags! {
    /// SMB1 header `flags` byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const CANONICAL_PATHNAMES = crate::consts::flags::CANONICAL_PATHNAMES;
        const CASELESS_PATHNAMES = crate::consts::flags::CASELESS_PATHNAMES;
    }
}

bitflags::bitflags! {
    /// SMB1 header `flags2` field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags2: u16 {
        const KNOWS_LONG_NAME = crate::consts::flags2::KNOWS_LONG_NAME;
        const IS_LONG_NAME = crate::consts::flags2::IS_LONG_NAME;
    }
}

/// The SMB1 header, magic through `mid`. All multi-byte fields after the
/// magic are little-endian on the wire.
#[binrw]
#[brw(little)]
#[brw(magic(b"\xffSMB"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub command: u8,
    pub status: u32,
    pub flags: u8,
    pub flags2: u16,
    pub pid_high: u16,
    pub signature: [u8; 8],
    pub reserved: u16,
    pub tid: u16,
    pub pid_low: u16,
    pub uid: u16,
    pub mid: u16,
}

impl Header {
    /// Size of the header in bytes, magic included.
    pub const SIZE: usize = 32;

    /// Builds the header for an outgoing request. `mid` is always zero: this
    /// client never multiplexes more than one outstanding request (MPX=1).
    pub fn request(command: u8, tid: u16, uid: u16, pid: u32) -> Self {
        Self {
            command,
            status: 0,
            flags: (Flags::CANONICAL_PATHNAMES | Flags::CASELESS_PATHNAMES).bits(),
            flags2: (Flags2::KNOWS_LONG_NAME | Flags2::IS_LONG_NAME).bits(),
            pid_high: (pid >> 16) as u16,
            signature: [0; 8],
            reserved: 0,
            tid,
            pid_low: pid as u16,
            uid,
            mid: 0,
        }
    }

    /// Reassembles the 32-bit process id from `pid_high`/`pid_low`.
    pub fn pid(&self) -> u32 {
        ((self.pid_high as u32) << 16) | self.pid_low as u32
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut cursor = Cursor::new(Vec::with_capacity(Self::SIZE));
        self.write(&mut cursor).expect("fixed-size header write");
        cursor.into_inner().try_into().unwrap()
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::Truncated("smb1 header"));
        }
        let mut cursor = Cursor::new(&buf[..Self::SIZE]);
        Self::read(&mut cursor).map_err(|e| match e {
            binrw::Error::BadMagic { .. } => CodecError::BadMagic,
            other => CodecError::from(other),
        })
    }
}
