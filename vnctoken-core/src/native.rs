//! Native lookup provider: binds the query/release pair from a shared library.

use std::ffi::{c_char, CString};
use std::ptr::NonNull;
use std::sync::{Mutex, PoisonError};

use libloading::Library;

use crate::provider::{HostBuf, LookupProvider};
use crate::CoreError;

/// `query(token) -> host or null`. Ownership of a non-null reply moves to the caller.
type QueryFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
/// `release(host)`. Must be called exactly once per non-null `query` reply.
type ReleaseFn = unsafe extern "C" fn(*mut c_char);

/// Overrides the provider library path.
pub const PROVIDER_LIB_ENV: &str = "VNCTOKEN_LIB";
/// Resolved through the loader search path when no override is given.
const DEFAULT_PROVIDER_LIB: &str = "get-ip.so";

/// Library path: VNCTOKEN_LIB when set, else the default library name.
pub fn provider_lib_path() -> String {
    std::env::var(PROVIDER_LIB_ENV).unwrap_or_else(|_| DEFAULT_PROVIDER_LIB.to_owned())
}

/// Lookup provider backed by a shared library exposing `query` and `release`.
///
/// The library's thread-safety is undocumented, so both entry points are
/// serialized behind one lock.
pub struct NativeProvider {
    // Keeps the library mapped for as long as the fn pointers are callable.
    _lib: Library,
    query: QueryFn,
    release: ReleaseFn,
    call: Mutex<()>,
}

impl NativeProvider {
    /// Load the library and bind both entry points. A missing library or
    /// symbol is unrecoverable for the resolver, so this fails fast.
    pub fn load(path: &str) -> Result<Self, CoreError> {
        // SAFETY: the provider library is trusted code shipped with the
        // deployment; its init routines run on load.
        let lib = unsafe { Library::new(path) }?;
        let query = *unsafe { lib.get::<QueryFn>(b"query\0") }?;
        let release = *unsafe { lib.get::<ReleaseFn>(b"release\0") }?;
        Ok(Self {
            _lib: lib,
            query,
            release,
            call: Mutex::new(()),
        })
    }

    /// Load from VNCTOKEN_LIB or the default library name.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::load(&provider_lib_path())
    }
}

impl LookupProvider for NativeProvider {
    fn query(&self, token: &str) -> Result<Option<HostBuf>, CoreError> {
        let token = CString::new(token)?;
        // The lock guards no data, only the foreign call window.
        let _call = self.call.lock().unwrap_or_else(PoisonError::into_inner);
        // SAFETY: query receives a valid NUL-terminated string; a non-null
        // reply is a NUL-terminated buffer whose ownership moves to us.
        let reply = unsafe { (self.query)(token.as_ptr()) };
        Ok(NonNull::new(reply).map(|ptr| unsafe { HostBuf::from_raw(ptr) }))
    }

    fn release(&self, buf: HostBuf) {
        let _call = self.call.lock().unwrap_or_else(PoisonError::into_inner);
        // SAFETY: buf came from this provider's query and is released once.
        unsafe { (self.release)(buf.into_raw().as_ptr()) };
    }
}
