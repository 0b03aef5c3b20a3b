//! SMB_COM_SESSION_SETUP_ANDX: NTLM challenge/response login.

use crate::consts::{word_count, CAP_LARGE_FILES, NO_ANDX_COMMAND};
use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;

/// Inputs needed to build a SESSION_SETUP_ANDX request.
pub struct SessionSetupRequest<'a> {
    pub pid: u32,
    pub session_key: u32,
    pub lm_response: [u8; 24],
    /// `None` when the NT response is disabled by configuration (a zeroed
    /// 24-byte block is sent instead).
    pub nt_response: Option<[u8; 24]>,
    pub user: &'a str,
    pub domain: &'a str,
    pub os_name: &'a str,
    pub client_name: &'a str,
}

/// Encodes a SESSION_SETUP_ANDX request, or `FilesizeExceeded` if the byte
/// block would not fit in a `u16` `byte_count`.
pub fn encode_request(req: &SessionSetupRequest<'_>) -> Result<Vec<u8>, CodecError> {
    let mut params = Vec::with_capacity(26);
    params.push(NO_ANDX_COMMAND);
    params.push(0); // andx.reserved
    le::write_u16(&mut params, 0); // andx.offset
    le::write_u16(&mut params, (crate::consts::MAX_MESSAGE_SIZE) as u16);
    le::write_u16(&mut params, 1); // max_mpx_count
    le::write_u16(&mut params, 1); // vc_number
    le::write_u32(&mut params, req.session_key);
    le::write_u16(&mut params, 24); // lm_response_length
    le::write_u16(&mut params, if req.nt_response.is_some() { 24 } else { 0 });
    le::write_u32(&mut params, 0); // reserved
    le::write_u32(&mut params, CAP_LARGE_FILES);
    debug_assert_eq!(params.len(), word_count::SETUP_ANDX as usize * 2);

    let mut data = Vec::new();
    data.extend_from_slice(&req.lm_response);
    data.extend_from_slice(&req.nt_response.unwrap_or([0; 24]));
    le::write_cstr(&mut data, req.user);
    le::write_cstr(&mut data, req.domain);
    le::write_cstr(&mut data, req.os_name);
    le::write_cstr(&mut data, req.client_name);

    if !frame::fits_in_message(params.len(), data.len()) {
        return Err(CodecError::ValueTooLarge);
    }

    Ok(frame::build_frame(
        crate::consts::command::SESSION_SETUP_ANDX,
        0,
        0,
        req.pid,
        &params,
        &data,
    ))
}

/// Outcome of a SESSION_SETUP_ANDX response: status and, on success, the
/// allocated user id (carried in the SMB1 header, not the parameter block).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSetupResponse {
    pub status: u32,
    pub uid: u16,
}

pub fn decode_response(msg: &[u8]) -> Result<SessionSetupResponse, CodecError> {
    let ParsedMessage { header, .. } = frame::parse(msg)?;
    Ok(SessionSetupResponse {
        status: header.status,
        uid: header.uid,
    })
}
