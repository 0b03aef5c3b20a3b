//! SMB_COM_NT_CREATE_ANDX: opening (or creating) a file handle.

use crate::consts::{access, create_disposition, word_count, NO_ANDX_COMMAND, SHARE_ALL};
use crate::error::CodecError;
use crate::frame::{self, ParsedMessage};
use crate::le;

/// Which direction the caller intends to use the resulting handle for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
}

/// Builds an NT_CREATE_ANDX request. `Intent::Read` opens an existing file
/// (`FILE_OPEN`); `Intent::Write` creates-or-truncates (`FILE_OVERWRITE_IF`).
pub fn encode_request(pid: u32, tid: u16, uid: u16, path: &str, intent: Intent) -> Result<Vec<u8>, CodecError> {
    let name = path.trim_start_matches(['\\', '/']);
    let name_length = name.len() as u16;

    let (desired_access, disposition) = match intent {
        Intent::Read => (access::GENERIC_READ, create_disposition::FILE_OPEN),
        Intent::Write => (access::GENERIC_READ | access::GENERIC_WRITE, create_disposition::FILE_OVERWRITE_IF),
    };

    let mut params = Vec::with_capacity(48);
    params.push(NO_ANDX_COMMAND);
    params.push(0); // andx.reserved
    le::write_u16(&mut params, 0); // andx.offset
    params.push(0); // reserved
    le::write_u16(&mut params, name_length);
    le::write_u32(&mut params, 0); // flags
    le::write_u32(&mut params, 0); // root_directory_fid
    le::write_u32(&mut params, desired_access);
    le::write_u64(&mut params, 0); // allocation_size
    le::write_u32(&mut params, 0); // ext_file_attributes
    le::write_u32(&mut params, SHARE_ALL);
    le::write_u32(&mut params, disposition);
    le::write_u32(&mut params, 0); // create_options
    le::write_u32(&mut params, 0); // impersonation
    params.push(0); // security_flags
    debug_assert_eq!(params.len(), word_count::NT_CREATE_ANDX as usize * 2);

    let mut data = Vec::with_capacity(name.len() + 1);
    le::write_cstr(&mut data, name);

    if !frame::fits_in_message(params.len(), data.len()) {
        return Err(CodecError::ValueTooLarge);
    }

    Ok(frame::build_frame(
        crate::consts::command::NT_CREATE_ANDX,
        tid,
        uid,
        pid,
        &params,
        &data,
    ))
}

/// Outcome of an NT_CREATE_ANDX response: status and, on success, the
/// opened file id and its current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateResponse {
    pub status: u32,
    pub fid: u16,
    pub end_of_file: u64,
}

/// Byte offsets within the NT_CREATE_ANDX response parameter block.
mod param_offset {
    pub const FID: usize = 5;
    pub const END_OF_FILE: usize = 55;
}

pub fn decode_response(msg: &[u8]) -> Result<CreateResponse, CodecError> {
    let ParsedMessage { header, params, .. } = frame::parse(msg)?;

    if header.status != 0 {
        return Ok(CreateResponse {
            status: header.status,
            fid: 0,
            end_of_file: 0,
        });
    }

    let fid = le::read_u16(params, param_offset::FID)?;
    let end_of_file = le::read_u64(params, param_offset::END_OF_FILE)?;

    Ok(CreateResponse {
        status: header.status,
        fid,
        end_of_file,
    })
}
