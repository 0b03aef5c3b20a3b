/// Runtime configuration for a connection.
///
/// Mirrors the reference design's compile-time vendor strings and NTLM
/// policy switch as plain fields with sensible defaults, rather than feature
/// flags or `#[cfg]` gates.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// OS identifier string sent in SESSION_SETUP_ANDX.
    pub os_name: String,
    /// Client/vendor identifier string sent in SESSION_SETUP_ANDX.
    pub client_name: String,
    /// Whether to compute and send a real NTLM NT response, rather than a
    /// zeroed 24-byte block. Default `true`: refusing to answer a server's
    /// NTLM challenge correctly is the more common interop failure than the
    /// reverse.
    pub send_nt_response: bool,
    /// Domain used when credentials don't carry one of their own.
    pub default_domain: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            os_name: "smb1-client".to_string(),
            client_name: "smb1-client".to_string(),
            send_nt_response: true,
            default_domain: None,
        }
    }
}
