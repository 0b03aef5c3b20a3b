//! NetBIOS Session Service framing.
//!
//! Every SMB1 message is preceded by a 4-byte header: a message-type byte
//! followed by a 24-bit length in network byte order. This client only ever
//! sends/receives session messages well under 64 KiB, so (matching the
//! reference behavior) only the low 16 bits of the length are read; the
//! high byte is always zero on the wire.

use binrw::prelude::*;
use std::io::Cursor;

use crate::error::CodecError;

/// The 4-byte NetBIOS Session Service header.
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetBiosHeader {
    pub msg_type: u8,
    #[br(temp)]
    #[bw(calc = 0)]
    _high_length_byte: u8,
    pub length: u16,
}

impl NetBiosHeader {
    /// Size of the NetBIOS header in bytes.
    pub const SIZE: usize = 4;

    /// Message type for an ordinary session message.
    pub const SESSION_MESSAGE: u8 = crate::consts::NBSS_SESSION_MESSAGE;

    /// Builds a session-message header framing `length` payload bytes.
    pub fn session_message(length: u16) -> Self {
        Self {
            msg_type: Self::SESSION_MESSAGE,
            length,
        }
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut cursor = Cursor::new(Vec::with_capacity(Self::SIZE));
        self.write(&mut cursor).expect("fixed-size header write");
        cursor.into_inner().try_into().unwrap()
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::Truncated("netbios header"));
        }
        let mut cursor = Cursor::new(&buf[..Self::SIZE]);
        Ok(Self::read(&mut cursor)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let hdr = NetBiosHeader::session_message(0x1234);
        let bytes = hdr.encode();
        assert_eq!(bytes, [0x00, 0x00, 0x12, 0x34]);
        assert_eq!(NetBiosHeader::decode(&bytes).unwrap(), hdr);
    }

    #[test]
    fn high_byte_is_ignored_on_decode() {
        let bytes = [0x00, 0xff, 0x00, 0x0b];
        let hdr = NetBiosHeader::decode(&bytes).unwrap();
        assert_eq!(hdr.length, 0x0b);
    }
}
