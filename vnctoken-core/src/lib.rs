//! Vnctoken core: session-token to desktop-endpoint resolution over a lookup provider.

pub mod native;
pub mod provider;
pub mod resolver;

pub use native::NativeProvider;
pub use provider::{EchoProvider, HostBuf, LookupProvider, StaticProvider};
pub use resolver::TokenResolver;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Port every resolved desktop listens on. The provider maps hosts only.
pub const VNC_PORT: u16 = 5901;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("lookup provider unavailable: {0}")]
    Provider(#[from] libloading::Error),
    #[error("host reply is not valid UTF-8")]
    HostDecode(#[source] std::str::Utf8Error),
    #[error("NUL byte in C string: {0}")]
    Nul(#[from] std::ffi::NulError),
    #[error("invalid host map: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolved remote-desktop target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Endpoint on the fixed desktop port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: VNC_PORT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
