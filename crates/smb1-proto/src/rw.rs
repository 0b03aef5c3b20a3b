//! SMB_COM_READ_ANDX and SMB_COM_WRITE_ANDX: streaming file contents.

use crate::consts::{word_count, NO_ANDX_COMMAND};
use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;
use crate::netbios::NetBiosHeader;

/// Builds a READ_ANDX request for up to `max_count` bytes (clamped by the
/// caller to `MAX_PAYLOAD_SIZE`) starting at `offset`.
pub fn encode_read_request(pid: u32, tid: u16, uid: u16, fid: u16, offset: u64, max_count: u16) -> Vec<u8> {
    let mut params = Vec::with_capacity(24);
    params.push(NO_ANDX_COMMAND);
    params.push(0); // andx.reserved
    le::write_u16(&mut params, 0); // andx.offset
    le::write_u16(&mut params, fid);
    le::write_u32(&mut params, offset as u32);
    le::write_u16(&mut params, max_count);
    le::write_u16(&mut params, max_count); // min_count: same as max, we want a full read
    le::write_u32(&mut params, 0); // max_count_high: reads never exceed a u16 count
    le::write_u16(&mut params, 0); // remaining
    le::write_u32(&mut params, (offset >> 32) as u32); // offset_high
    debug_assert_eq!(params.len(), word_count::READ_ANDX as usize * 2);

    frame::build_frame(crate::consts::command::READ_ANDX, tid, uid, pid, &params, &[])
}

/// Outcome of a READ_ANDX response: status and, on success, the bytes read
/// (a view into the framed message, not a fresh allocation).
pub struct ReadResponse<'a> {
    pub status: u32,
    pub data: &'a [u8],
}

/// Byte offsets within the READ_ANDX response parameter block.
mod read_param_offset {
    pub const DATA_LENGTH: usize = 10;
    pub const DATA_OFFSET: usize = 12;
}

pub fn decode_read_response(msg: &[u8]) -> Result<ReadResponse<'_>, CodecError> {
    let ParsedMessage { header, params, .. } = frame::parse(msg)?;

    if header.status != 0 {
        return Ok(ReadResponse { status: header.status, data: &[] });
    }

    let data_length = le::read_u16(params, read_param_offset::DATA_LENGTH)? as usize;
    let data_offset = le::read_u16(params, read_param_offset::DATA_OFFSET)? as usize;

    // DataOffset is measured from the start of the SMB header, i.e. from
    // right after the 4-byte NetBIOS length prefix, not from the end of it.
    let base = NetBiosHeader::SIZE;
    let start = base
        .checked_add(data_offset)
        .ok_or(CodecError::MalformedFrame)?;
    let end = start.checked_add(data_length).ok_or(CodecError::MalformedFrame)?;
    let data = msg.get(start..end).ok_or(CodecError::Truncated("read data"))?;

    Ok(ReadResponse { status: header.status, data })
}

/// Builds a WRITE_ANDX request carrying `body` starting at `offset`. The
/// caller (the request engine) is responsible for filling `body` from its
/// `BodySource` and clamping it to `MAX_PAYLOAD_SIZE` before calling this.
pub fn encode_write_request(pid: u32, tid: u16, uid: u16, fid: u16, offset: u64, body: &[u8]) -> Result<Vec<u8>, CodecError> {
    if !frame::fits_in_message(word_count::WRITE_ANDX as usize * 2, body.len()) {
        return Err(CodecError::ValueTooLarge);
    }

    // Measured from the SMB header start (byte 4), not from the NetBIOS
    // frame start: sizeof(header + params + byte_count), no NBT prefix.
    let data_offset = frame::params_offset() as u16 + 1 + word_count::WRITE_ANDX as u16 * 2 + 2 - NetBiosHeader::SIZE as u16;

    let mut params = Vec::with_capacity(28);
    params.push(NO_ANDX_COMMAND);
    params.push(0); // andx.reserved
    le::write_u16(&mut params, 0); // andx.offset
    le::write_u16(&mut params, fid);
    le::write_u32(&mut params, offset as u32);
    le::write_u32(&mut params, 0); // reserved
    le::write_u16(&mut params, 0); // write_mode
    le::write_u16(&mut params, 0); // remaining
    le::write_u16(&mut params, 0); // data_length_high
    le::write_u16(&mut params, body.len() as u16);
    le::write_u16(&mut params, data_offset);
    le::write_u32(&mut params, (offset >> 32) as u32); // offset_high
    debug_assert_eq!(params.len(), word_count::WRITE_ANDX as usize * 2);

    Ok(frame::build_frame(crate::consts::command::WRITE_ANDX, tid, uid, pid, &params, body))
}

/// Outcome of a WRITE_ANDX response: status and, on success, the number of
/// bytes the server actually accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResponse {
    pub status: u32,
    pub count: u16,
}

mod write_param_offset {
    pub const COUNT: usize = 4;
}

pub fn decode_write_response(msg: &[u8]) -> Result<WriteResponse, CodecError> {
    let ParsedMessage { header, params, .. } = frame::parse(msg)?;

    if header.status != 0 {
        return Ok(WriteResponse { status: header.status, count: 0 });
    }

    let count = le::read_u16(params, write_param_offset::COUNT)?;
    Ok(WriteResponse { status: header.status, count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_request_has_expected_word_count() {
        let bytes = encode_read_request(1, 0, 0, 7, 0, 0x8000);
        assert_eq!(bytes[4 + 32], word_count::READ_ANDX);
    }

    #[test]
    fn decodes_read_payload_by_offset() {
        let mut params = vec![0u8; word_count::READ_ANDX as usize * 2];
        let payload = b"hello world";
        let data_offset = crate::header::Header::SIZE + 1 + params.len() + 2;
        params[read_param_offset::DATA_LENGTH..read_param_offset::DATA_LENGTH + 2]
            .copy_from_slice(&(payload.len() as u16).to_le_bytes());
        params[read_param_offset::DATA_OFFSET..read_param_offset::DATA_OFFSET + 2]
            .copy_from_slice(&(data_offset as u16).to_le_bytes());
        let msg = frame::build_frame(crate::consts::command::READ_ANDX, 0, 0, 1, &params, payload);
        let resp = decode_read_response(&msg).unwrap();
        assert_eq!(resp.data, payload);
    }

    #[test]
    fn write_request_places_body_at_declared_offset() {
        let body = b"payload bytes";
        let bytes = encode_write_request(1, 0, 0, 7, 0, body).unwrap();
        assert!(bytes.ends_with(body));
    }

    #[test]
    fn decodes_bytes_written() {
        let mut params = vec![0u8; word_count::WRITE_ANDX as usize * 2];
        params[write_param_offset::COUNT..write_param_offset::COUNT + 2].copy_from_slice(&99u16.to_le_bytes());
        let msg = frame::build_frame(crate::consts::command::WRITE_ANDX, 0, 0, 1, &params, &[]);
        let resp = decode_write_response(&msg).unwrap();
        assert_eq!(resp.count, 99);
    }
}
