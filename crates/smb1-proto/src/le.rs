//! Explicit little-endian read/write helpers.
//!
//! SMB1 fields are little-endian on the wire regardless of host byte order;
//! these helpers go through `to_le_bytes`/`from_le_bytes` rather than ever
//! reinterpreting a buffer as a `#[repr(C)]` struct, so the codec behaves
//! identically on big-endian hosts.

use crate::error::CodecError;

/// Reads a little-endian `u16` at `off`, or `Truncated` if it doesn't fit.
pub fn read_u16(buf: &[u8], off: usize) -> Result<u16, CodecError> {
    let bytes = buf
        .get(off..off + 2)
        .ok_or(CodecError::Truncated("u16"))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads a little-endian `u32` at `off`, or `Truncated` if it doesn't fit.
pub fn read_u32(buf: &[u8], off: usize) -> Result<u32, CodecError> {
    let bytes = buf
        .get(off..off + 4)
        .ok_or(CodecError::Truncated("u32"))?;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

/// Reads a little-endian `u64` at `off`, or `Truncated` if it doesn't fit.
pub fn read_u64(buf: &[u8], off: usize) -> Result<u64, CodecError> {
    let bytes = buf
        .get(off..off + 8)
        .ok_or(CodecError::Truncated("u64"))?;
    Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
}

/// Appends a little-endian `u16`.
pub fn write_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Appends a little-endian `u32`.
pub fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Appends a little-endian `u64`.
pub fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Appends a NUL-terminated ASCII/OEM string. No Unicode path support by design.
pub fn write_cstr(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// Reads a NUL-terminated ASCII string starting at `off`, returning the
/// string (without the terminator) and the offset just past the terminator.
pub fn read_cstr(buf: &[u8], off: usize) -> Result<(String, usize), CodecError> {
    let rest = buf.get(off..).ok_or(CodecError::Truncated("cstr"))?;
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::Truncated("cstr"))?;
    let s = String::from_utf8_lossy(&rest[..nul]).into_owned();
    Ok((s, off + nul + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ints() {
        let mut out = Vec::new();
        write_u16(&mut out, 0x1234);
        write_u32(&mut out, 0xdead_beef);
        write_u64(&mut out, 0x0102_0304_0506_0708);
        assert_eq!(read_u16(&out, 0).unwrap(), 0x1234);
        assert_eq!(read_u32(&out, 2).unwrap(), 0xdead_beef);
        assert_eq!(read_u64(&out, 6).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn truncated_reads_error() {
        let buf = [0u8; 1];
        assert_eq!(read_u16(&buf, 0), Err(CodecError::Truncated("u16")));
    }

    #[test]
    fn cstr_round_trip() {
        let mut out = Vec::new();
        write_cstr(&mut out, "hello");
        let (s, next) = read_cstr(&out, 0).unwrap();
        assert_eq!(s, "hello");
        assert_eq!(next, out.len());
    }
}
