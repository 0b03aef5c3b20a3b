use thiserror::Error;

/// Errors surfaced to the caller of the connection and request engines.
///
/// `Again` (wait for more readiness) is deliberately not a variant here: the
/// drive functions model it as `Ok(false)`, never an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("allocation failed")]
    OutOfMemory,
    #[error("URL path has no share/path separator")]
    UrlMalformed,
    #[error("encoded message would exceed its frame")]
    FilesizeExceeded,
    #[error("NEGOTIATE was rejected by the server")]
    CouldNotConnect,
    #[error("SESSION_SETUP_ANDX was rejected by the server")]
    LoginDenied,
    #[error("TREE_CONNECT_ANDX denied access to the share")]
    RemoteAccessDenied,
    #[error("the remote file or share could not be found")]
    RemoteFileNotFound,
    #[error("READ_ANDX failed mid-transfer")]
    RecvError,
    #[error("WRITE_ANDX failed mid-transfer")]
    UploadFailed,
    #[error("malformed response frame: {0}")]
    ReadError(#[from] smb1_proto::CodecError),
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
