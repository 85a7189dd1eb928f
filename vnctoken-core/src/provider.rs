//! Lookup provider seam: how a token becomes a host, and who frees the reply.

use std::collections::HashMap;
use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr::NonNull;

use crate::CoreError;

/// Provider-owned host buffer. Created from a non-null `query` reply; must go
/// back to the same provider's `release` exactly once.
pub struct HostBuf {
    ptr: NonNull<c_char>,
}

impl HostBuf {
    /// # Safety
    /// `ptr` must point to a NUL-terminated buffer that stays valid until the
    /// owning provider releases it.
    pub unsafe fn from_raw(ptr: NonNull<c_char>) -> Self {
        Self { ptr }
    }

    /// Borrow the reply as a C string.
    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: from_raw requires a valid NUL-terminated buffer.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Hand the raw pointer back for release.
    pub fn into_raw(self) -> NonNull<c_char> {
        self.ptr
    }
}

/// How to look up a host by token. Implementations: native library, static map, echo.
///
/// Every `Some` reply from `query` owns provider memory and must be passed to
/// `release` exactly once. A `None` reply allocates nothing and must never be
/// released.
pub trait LookupProvider: Send + Sync {
    /// Query the provider. `None` means no mapping for this token.
    fn query(&self, token: &str) -> Result<Option<HostBuf>, CoreError>;
    /// Release a reply previously returned by `query` on this provider.
    fn release(&self, buf: HostBuf);
}

/// Mint a reply the in-process providers own themselves. Same ownership
/// contract as a native reply: freed in `drop_minted`.
fn mint(host: &str) -> Result<HostBuf, CoreError> {
    let raw = CString::new(host)?.into_raw();
    // SAFETY: into_raw never returns null and yields a NUL-terminated
    // allocation that lives until drop_minted reclaims it.
    Ok(unsafe { HostBuf::from_raw(NonNull::new_unchecked(raw)) })
}

fn drop_minted(buf: HostBuf) {
    // SAFETY: buf came from mint's CString::into_raw.
    drop(unsafe { CString::from_raw(buf.into_raw().as_ptr()) });
}

/// Fixed token-to-host map. For tests, local development and the CLI `--map` flag.
pub struct StaticProvider {
    hosts: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new(hosts: HashMap<String, String>) -> Self {
        Self { hosts }
    }

    /// Load the map from a JSON object file: `{"<token>": "<host>", ...}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }
}

impl LookupProvider for StaticProvider {
    fn query(&self, token: &str) -> Result<Option<HostBuf>, CoreError> {
        match self.hosts.get(token) {
            Some(host) => Ok(Some(mint(host)?)),
            None => Ok(None),
        }
    }

    fn release(&self, buf: HostBuf) {
        drop_minted(buf);
    }
}

/// Echoes the token back as the host. Test mode only: every token resolves.
pub struct EchoProvider;

impl LookupProvider for EchoProvider {
    fn query(&self, token: &str) -> Result<Option<HostBuf>, CoreError> {
        Ok(Some(mint(token)?))
    }

    fn release(&self, buf: HostBuf) {
        drop_minted(buf);
    }
}
