//! `SmbHandler`: a single registration point gathering the connection and
//! request engines plus their injected collaborators, so the surrounding
//! library drives one struct instead of juggling `Connection` and `Request`
//! separately.

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnPhase, SelectorHint};
use crate::error::Result;
use crate::ntlm::DefaultNtlm;
use crate::request::{Direction, Request, Status};
use crate::traits::{BodySink, BodySource, CredentialSource, NtlmCore, PathParser, Progress, ProcessId, Transport};

pub struct SmbHandler<T: Transport, N: NtlmCore = DefaultNtlm> {
    connection: Connection<N>,
    request: Option<Request>,
    transport: T,
    last_result: Option<(Status, bool)>,
}

impl<T: Transport, N: NtlmCore> SmbHandler<T, N> {
    pub fn new(config: ClientConfig, ntlm: N, transport: T) -> Self {
        Self {
            connection: Connection::new(config, ntlm),
            request: None,
            transport,
            last_result: None,
        }
    }

    /// Parses the URL path and records credentials/host ahead of `connect`.
    pub fn setup(
        &mut self,
        url_path: &str,
        credentials: &impl CredentialSource,
        host: &str,
        use_tls: bool,
        path_parser: &impl PathParser,
    ) -> Result<()> {
        self.connection.setup(url_path, credentials, host, use_tls, path_parser)
    }

    /// Allocates buffers and starts the connection state machine.
    pub fn connect<P: ProcessId>(&mut self) {
        self.connection.connect::<P>();
    }

    /// Starts a new file transfer once the connection is established. Share
    /// and path come from the URL parsed in `setup`.
    pub fn begin_request(&mut self, direction: Direction) {
        let (share, path) = self.connection.take_share_path();
        self.request = Some(Request::new(share, path, direction));
    }

    pub fn requests_served(&self) -> u64 {
        self.connection.requests_served()
    }

    /// Drives whichever state machine is active: the connection until it
    /// reaches `Connected`, then the current request (if any) to completion.
    /// Returns `Ok(true)` once the active request is `Done`; if there is no
    /// request yet, `Ok(true)` once the connection is `Connected`.
    pub fn drive(
        &mut self,
        readable: bool,
        writable: bool,
        sink: &mut impl BodySink,
        source: &mut impl BodySource,
        progress: &mut impl Progress,
    ) -> Result<bool> {
        if self.connection.phase() != Some(ConnPhase::Connected) {
            return self.connection.drive_connection(readable, writable, &mut self.transport);
        }

        let Some(request) = self.request.as_mut() else {
            return Ok(true);
        };

        let done = request.drive_request(
            &mut self.connection,
            readable,
            writable,
            &mut self.transport,
            sink,
            source,
            progress,
        )?;

        if done {
            let finished = self.request.take().expect("request present when done");
            self.last_result = Some(finished.done());
            self.connection.note_request_done();
        }

        Ok(done)
    }

    /// Takes the terminal `(Status, premature)` of the most recently
    /// finished request, if one hasn't been taken yet.
    pub fn take_result(&mut self) -> Option<(Status, bool)> {
        self.last_result.take()
    }

    pub fn selector_hint(&self) -> SelectorHint {
        self.connection.selector_hint()
    }

    pub fn disconnect(&mut self) {
        self.request = None;
        self.connection.disconnect();
    }
}
