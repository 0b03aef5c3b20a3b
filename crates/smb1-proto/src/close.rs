//! SMB_COM_CLOSE and SMB_COM_TREE_DISCONNECT: releasing a handle and a tree.

use crate::consts::word_count;
use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;

/// Builds a CLOSE request for `fid`. `last_write_time` of zero tells the
/// server not to update the file's last-write timestamp.
pub fn encode_close_request(pid: u32, tid: u16, uid: u16, fid: u16) -> Vec<u8> {
    let mut params = Vec::with_capacity(6);
    le::write_u16(&mut params, fid);
    le::write_u32(&mut params, 0); // last_write_time
    debug_assert_eq!(params.len(), word_count::CLOSE as usize * 2);

    frame::build_frame(crate::consts::command::CLOSE, tid, uid, pid, &params, &[])
}

/// Builds a TREE_DISCONNECT request. No parameters, no data.
pub fn encode_tree_disconnect_request(pid: u32, tid: u16, uid: u16) -> Vec<u8> {
    frame::build_frame(crate::consts::command::TREE_DISCONNECT, tid, uid, pid, &[], &[])
}

/// Both commands share the same response shape this client cares about:
/// just the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: u32,
}

pub fn decode_status_response(msg: &[u8]) -> Result<StatusResponse, CodecError> {
    let ParsedMessage { header, .. } = frame::parse(msg)?;
    Ok(StatusResponse { status: header.status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_has_expected_word_count() {
        let bytes = encode_close_request(1, 0, 0, 9);
        assert_eq!(bytes[4 + 32], word_count::CLOSE);
    }

    #[test]
    fn tree_disconnect_has_no_parameters() {
        let bytes = encode_tree_disconnect_request(1, 0x5, 0);
        assert_eq!(bytes[4 + 32], 0); // word_count
        assert_eq!(&bytes[4 + 32 + 1..4 + 32 + 3], &[0, 0]); // byte_count
    }

    #[test]
    fn decodes_status() {
        let msg = frame::build_frame(crate::consts::command::CLOSE, 0, 0, 1, &[0u8; 6], &[]);
        assert_eq!(decode_status_response(&msg).unwrap().status, 0);
    }
}
