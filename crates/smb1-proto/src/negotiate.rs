//! SMB_COM_NEGOTIATE: protocol dialect negotiation.

use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;

/// The only dialect this client offers.
pub const DIALECT: &str = "NT LM 0.12";

/// Builds the NEGOTIATE request: word_count = 0, one dialect entry in the
/// data block (`0x02` format byte, the dialect string, a NUL terminator).
pub fn encode_request(pid: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + DIALECT.len() + 1);
    data.push(0x02);
    le::write_cstr(&mut data, DIALECT);
    frame::build_frame(crate::consts::command::NEGOTIATE, 0, 0, pid, &[], &data)
}

/// Fields parsed out of a NEGOTIATE response, per MS-CIFS 2.2.4.5.2 (core
/// dialect, non-extended-security response shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiateResponse {
    pub status: u32,
    pub session_key: u32,
    pub challenge: [u8; 8],
}

/// Byte offsets within the NEGOTIATE response parameter block.
mod param_offset {
    pub const SESSION_KEY: usize = 15;
}

/// Decodes a NEGOTIATE response. Only `status`, `session_key`, and the
/// 8-byte challenge are of interest to this client.
pub fn decode_response(msg: &[u8]) -> Result<NegotiateResponse, CodecError> {
    let ParsedMessage {
        header,
        params,
        data,
    } = frame::parse(msg)?;

    if header.status != 0 {
        return Ok(NegotiateResponse {
            status: header.status,
            session_key: 0,
            challenge: [0; 8],
        });
    }

    let session_key = le::read_u32(params, param_offset::SESSION_KEY)?;
    let mut challenge = [0u8; 8];
    let got = data.get(..8).ok_or(CodecError::Truncated("challenge"))?;
    challenge.copy_from_slice(got);

    Ok(NegotiateResponse {
        status: header.status,
        session_key,
        challenge,
    })
}
