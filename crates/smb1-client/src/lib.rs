//! A non-blocking, readiness-driven SMB1 (CIFS) client protocol engine.
//!
//! This crate owns the connection and request state machines
//! (`NEGOTIATE -> SESSION_SETUP_ANDX -> Connected` and
//! `TREE_CONNECT -> NT_CREATE -> READ/WRITE loop -> CLOSE -> TREE_DISCONNECT`)
//! and the NTLMv1 challenge/response. It does not own a thread, a socket
//! implementation, URL parsing, or credential storage: those are injected
//! through the traits in [`traits`], with ready-to-use default
//! implementations provided for standalone use.

pub mod body;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod ntlm;
pub mod pathparser;
pub mod pid;
pub mod progress;
pub mod request;
pub mod transport;
pub mod traits;

pub use config::ClientConfig;
pub use connection::{ConnPhase, Connection, SelectorHint};
pub use error::{Error, Result};
pub use handler::SmbHandler;
pub use request::{Direction, ReqPhase, Request, Status};
