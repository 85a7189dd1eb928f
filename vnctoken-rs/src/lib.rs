//! Vnctoken Rust facade: resolver and providers re-exported from vnctoken-core.

pub use vnctoken_core::native::{provider_lib_path, PROVIDER_LIB_ENV};
pub use vnctoken_core::resolver::TEST_MODE_ENV;
pub use vnctoken_core::{
    CoreError, EchoProvider, Endpoint, HostBuf, LookupProvider, NativeProvider, StaticProvider,
    TokenResolver, VNC_PORT,
};
