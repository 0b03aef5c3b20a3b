//! SMB_COM_TREE_CONNECT_ANDX: attaching to a share.

use crate::consts::{word_count, NO_ANDX_COMMAND};
use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;

/// Builds a TREE_CONNECT_ANDX request for `\\<host>\<share>`, with an empty
/// password (NTLM auth already happened in SESSION_SETUP_ANDX) and the
/// generic "?????" service type so the server infers the share type.
pub fn encode_request(pid: u32, uid: u16, host: &str, share: &str) -> Result<Vec<u8>, CodecError> {
    let mut params = Vec::with_capacity(8);
    params.push(NO_ANDX_COMMAND);
    params.push(0); // andx.reserved
    le::write_u16(&mut params, 0); // andx.offset
    le::write_u16(&mut params, 0); // flags
    le::write_u16(&mut params, 0); // password_length: no password byte
    debug_assert_eq!(params.len(), word_count::TREE_CONNECT_ANDX as usize * 2);

    let mut data = Vec::new();
    le::write_cstr(&mut data, &format!(r"\\{host}\{share}"));
    le::write_cstr(&mut data, "?????");

    if !frame::fits_in_message(params.len(), data.len()) {
        return Err(CodecError::ValueTooLarge);
    }

    Ok(frame::build_frame(
        crate::consts::command::TREE_CONNECT_ANDX,
        0,
        uid,
        pid,
        &params,
        &data,
    ))
}

/// Outcome of a TREE_CONNECT_ANDX response: status and, on success, the
/// allocated tree id (carried in the SMB1 header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConnectResponse {
    pub status: u32,
    pub tid: u16,
}

pub fn decode_response(msg: &[u8]) -> Result<TreeConnectResponse, CodecError> {
    let ParsedMessage { header, .. } = frame::parse(msg)?;
    Ok(TreeConnectResponse {
        status: header.status,
        tid: header.tid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_unc_path_and_service_type() {
        let bytes = encode_request(1, 0x10, "fileserver", "share").unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(r"\\fileserver\share"));
        assert!(text.contains("?????"));
    }

    #[test]
    fn decodes_tid_from_header() {
        let msg = frame::build_frame(crate::consts::command::TREE_CONNECT_ANDX, 0x7, 0x10, 1, &[0u8; 8], &[]);
        let resp = decode_response(&msg).unwrap();
        assert_eq!(resp.status, 0);
        assert_eq!(resp.tid, 0x7);
    }
}
