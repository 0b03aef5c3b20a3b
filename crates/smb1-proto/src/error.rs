//! Codec-level errors.

use thiserror::Error;

/// Errors raised while framing or parsing an SMB1 message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer does not yet hold a complete NetBIOS frame; not an error
    /// condition by itself, but callers that expected completeness treat it
    /// as one.
    #[error("message is not fully framed yet")]
    Incomplete,

    /// `word_count`/`byte_count` claim more bytes than fit inside the framed
    /// NetBIOS length.
    #[error("word_count/byte_count exceed the framed message length")]
    MalformedFrame,

    /// The SMB1 magic (`\xffSMB`) was not present where expected.
    #[error("missing SMB1 magic")]
    BadMagic,

    /// A fixed-size field read ran past the end of the supplied buffer.
    #[error("buffer too short to decode {0}")]
    Truncated(&'static str),

    /// A string field (path, share, user, domain, ...) did not fit the
    /// byte_count budget of its frame.
    #[error("encoded value too large for its frame")]
    ValueTooLarge,

    /// Wraps a `binrw` failure decoding/encoding a fixed-size header.
    #[error("binary header codec error: {0}")]
    Binrw(String),
}

impl From<binrw::Error> for CodecError {
    fn from(e: binrw::Error) -> Self {
        CodecError::Binrw(e.to_string())
    }
}
