//! Token resolution: one provider query, decode, guaranteed release.

use crate::native::NativeProvider;
use crate::provider::{EchoProvider, HostBuf, LookupProvider};
use crate::{CoreError, Endpoint};

/// Test-mode switch: when set, tokens resolve to themselves instead of going
/// through the native library.
pub const TEST_MODE_ENV: &str = "VNCTOKEN_TEST";

/// Resolves session tokens to desktop endpoints through a lookup provider.
pub struct TokenResolver {
    provider: Box<dyn LookupProvider>,
}

impl TokenResolver {
    pub fn new(provider: Box<dyn LookupProvider>) -> Self {
        Self { provider }
    }

    /// Deployment resolver: echo provider when VNCTOKEN_TEST is set, else the
    /// native library named by VNCTOKEN_LIB (default "get-ip.so").
    pub fn from_env() -> Result<Self, CoreError> {
        if std::env::var_os(TEST_MODE_ENV).is_some() {
            return Ok(Self::new(Box::new(EchoProvider)));
        }
        Ok(Self::new(Box::new(NativeProvider::from_env()?)))
    }

    /// Resolve a token. `Ok(None)` means the provider has no mapping for it.
    ///
    /// The provider reply is released on every path out of this function,
    /// including a failed host decode.
    pub fn resolve(&self, token: &str) -> Result<Option<Endpoint>, CoreError> {
        let Some(buf) = self.provider.query(token)? else {
            return Ok(None);
        };
        let reply = Reply::new(self.provider.as_ref(), buf);
        let host = reply.host()?;
        Ok(Some(Endpoint::new(host)))
    }
}

/// One query reply scoped to a resolve call: releases the buffer on drop.
struct Reply<'a> {
    provider: &'a dyn LookupProvider,
    buf: Option<HostBuf>,
}

impl<'a> Reply<'a> {
    fn new(provider: &'a dyn LookupProvider, buf: HostBuf) -> Self {
        Self {
            provider,
            buf: Some(buf),
        }
    }

    /// Decode the host. The buffer stays provider-owned; the host is copied out.
    fn host(&self) -> Result<String, CoreError> {
        // buf is Some for the guard's whole life; take() happens only in drop.
        let buf = self.buf.as_ref().expect("reply released before drop");
        let host = buf.as_c_str().to_str().map_err(CoreError::HostDecode)?;
        Ok(host.to_owned())
    }
}

impl Drop for Reply<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.provider.release(buf);
        }
    }
}
