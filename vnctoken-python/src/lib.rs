//! Python bindings for vnctoken-core. Exposes the websockify token plugin:
//! `Token(src).lookup(token)` returns `(host, port)` strings or `None`.
//!
//! Run under websockify as
//! `websockify --token-plugin=vnctoken_native.Token --token-source=<provider .so>`.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use vnctoken_core::{CoreError, NativeProvider, TokenResolver};

#[pyclass]
struct Token {
    inner: TokenResolver,
}

#[pymethods]
impl Token {
    /// `src` is websockify's --token-source: a provider library path. A
    /// missing or empty `src` falls back to VNCTOKEN_LIB / the default
    /// library name, or echo mode when VNCTOKEN_TEST is set.
    #[new]
    #[pyo3(signature = (src=None))]
    fn new(src: Option<&str>) -> PyResult<Self> {
        let inner = match src {
            None | Some("") => TokenResolver::from_env(),
            Some(path) => NativeProvider::load(path).map(|p| TokenResolver::new(Box::new(p))),
        }
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Look up a token. Returns (host, port) as strings, or None when the
    /// provider has no mapping.
    fn lookup(&self, token: &str) -> PyResult<Option<(String, String)>> {
        match self.inner.resolve(token) {
            Ok(ep) => Ok(ep.map(|e| (e.host, e.port.to_string()))),
            Err(e @ (CoreError::HostDecode(_) | CoreError::Nul(_))) => {
                Err(PyValueError::new_err(e.to_string()))
            }
            Err(e) => Err(PyRuntimeError::new_err(e.to_string())),
        }
    }
}

#[pymodule]
fn vnctoken_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Token>()?;
    Ok(())
}
