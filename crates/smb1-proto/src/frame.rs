//! Deciding whether a receive buffer holds one complete framed message.

use crate::error::CodecError;
use crate::header::Header;
use crate::le;
use crate::netbios::NetBiosHeader;

/// Looks at `buf[..got]` and returns the complete framed message (NetBIOS
/// header included) once enough bytes have arrived, or `None` if the caller
/// should keep reading.
///
/// Mirrors the reference decision: the NetBIOS length is checked first
/// (`got < 4` is incomplete), then, once an SMB1 header is present, the
/// word_count/byte_count parameter block is checked to fit inside the framed
/// length (a violation is `MalformedFrame`, not "keep reading").
pub fn pop_message(buf: &[u8], got: usize) -> Result<Option<&[u8]>, CodecError> {
    if got < NetBiosHeader::SIZE {
        return Ok(None);
    }
    let nbt = NetBiosHeader::decode(&buf[..NetBiosHeader::SIZE])?;
    let framed = NetBiosHeader::SIZE + nbt.length as usize;
    if got < framed {
        return Ok(None);
    }
    let msg = &buf[..framed];
    if framed >= NetBiosHeader::SIZE + Header::SIZE + 1 {
        validate_param_bounds(msg)?;
    }
    Ok(Some(msg))
}

/// Validates that `word_count`/`byte_count`, read from a framed message that
/// contains a full SMB1 header, stay within the framed length.
fn validate_param_bounds(msg: &[u8]) -> Result<(), CodecError> {
    let base = NetBiosHeader::SIZE + Header::SIZE;
    let word_count = *msg.get(base).ok_or(CodecError::Truncated("word_count"))? as usize;
    let byte_count_off = base + 1 + word_count * 2;
    let byte_count = le::read_u16(msg, byte_count_off)? as usize;
    let data_end = byte_count_off + 2 + byte_count;
    if data_end > msg.len() {
        return Err(CodecError::MalformedFrame);
    }
    Ok(())
}

/// Offset, from the start of a framed message, of the `word_count` byte.
pub fn params_offset() -> usize {
    NetBiosHeader::SIZE + Header::SIZE
}

/// Total size of a framed message built from `params_len` bytes of
/// parameters and a `data_len`-byte data block, NetBIOS header included.
pub fn framed_len(params_len: usize, data_len: usize) -> usize {
    params_offset() + 1 + params_len + 2 + data_len
}

/// Whether a request of this shape fits in a connection's fixed-size send
/// buffer (`MAX_MESSAGE_SIZE`). Callers building a request with a
/// caller-supplied byte block (user/domain/path/file body) must check this
/// before handing the frame to `build_frame`: the send buffer panics on
/// overflow rather than growing to fit.
pub fn fits_in_message(params_len: usize, data_len: usize) -> bool {
    framed_len(params_len, data_len) <= crate::consts::MAX_MESSAGE_SIZE
}

/// A framed message split into its header, parameter words, and data bytes.
pub struct ParsedMessage<'a> {
    pub header: Header,
    /// Raw parameter words (`word_count * 2` bytes), not yet byte-swapped.
    pub params: &'a [u8],
    pub data: &'a [u8],
}

/// Parses a framed message (as returned by [`pop_message`]) into its header,
/// parameter, and data sections.
pub fn parse(msg: &[u8]) -> Result<ParsedMessage<'_>, CodecError> {
    let header = Header::decode(&msg[NetBiosHeader::SIZE..])?;
    let base = params_offset();
    let word_count = *msg.get(base).ok_or(CodecError::Truncated("word_count"))? as usize;
    let params_start = base + 1;
    let params_end = params_start + word_count * 2;
    let params = msg
        .get(params_start..params_end)
        .ok_or(CodecError::Truncated("params"))?;
    let byte_count = le::read_u16(msg, params_end)? as usize;
    let data_start = params_end + 2;
    let data_end = data_start + byte_count;
    let data = msg
        .get(data_start..data_end)
        .ok_or(CodecError::Truncated("data"))?;
    Ok(ParsedMessage {
        header,
        params,
        data,
    })
}

/// Assembles a complete framed message: NetBIOS header, SMB1 header,
/// `word_count` parameter words, and a data block.
///
/// `params` holds the raw little-endian parameter bytes and must be an even
/// number of bytes (SMB1 parameters are always whole 16-bit words); the
/// `word_count` byte is derived from its length.
pub fn build_frame(command: u8, tid: u16, uid: u16, pid: u32, params: &[u8], data: &[u8]) -> Vec<u8> {
    assert_eq!(params.len() % 2, 0, "SMB1 parameters must be whole words");
    let header = Header::request(command, tid, uid, pid);
    let mut payload = Vec::with_capacity(Header::SIZE + 1 + params.len() + 2 + data.len());
    payload.extend_from_slice(&header.encode());
    payload.push((params.len() / 2) as u8);
    payload.extend_from_slice(params);
    le::write_u16(&mut payload, data.len() as u16);
    payload.extend_from_slice(data);

    let nbt = NetBiosHeader::session_message(payload.len() as u16);
    let mut out = Vec::with_capacity(NetBiosHeader::SIZE + payload.len());
    out.extend_from_slice(&nbt.encode());
    out.extend_from_slice(&payload);
    out
}
