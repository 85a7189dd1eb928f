//! Resolve semantics against fake providers: hits, misses, release discipline.

use std::collections::HashMap;
use std::ffi::CString;
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};

use vnctoken_core::{
    CoreError, EchoProvider, Endpoint, HostBuf, LookupProvider, StaticProvider, TokenResolver,
    VNC_PORT,
};

/// Fake provider that hands out C-string replies and counts every call.
struct CountingProvider {
    hosts: HashMap<String, Vec<u8>>,
    queries: Arc<Mutex<u32>>,
    releases: Arc<Mutex<u32>>,
}

impl CountingProvider {
    fn new(hosts: &[(&str, &[u8])]) -> Self {
        Self {
            hosts: hosts
                .iter()
                .map(|(t, h)| (t.to_string(), h.to_vec()))
                .collect(),
            queries: Arc::new(Mutex::new(0)),
            releases: Arc::new(Mutex::new(0)),
        }
    }
}

impl LookupProvider for CountingProvider {
    fn query(&self, token: &str) -> Result<Option<HostBuf>, CoreError> {
        *self.queries.lock().unwrap() += 1;
        let Some(host) = self.hosts.get(token) else {
            return Ok(None);
        };
        let raw = CString::new(host.as_slice())?.into_raw();
        Ok(Some(unsafe {
            HostBuf::from_raw(NonNull::new_unchecked(raw))
        }))
    }

    fn release(&self, buf: HostBuf) {
        *self.releases.lock().unwrap() += 1;
        drop(unsafe { CString::from_raw(buf.into_raw().as_ptr()) });
    }
}

fn resolver_with_counts(
    hosts: &[(&str, &[u8])],
) -> (TokenResolver, Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
    let provider = CountingProvider::new(hosts);
    let queries = Arc::clone(&provider.queries);
    let releases = Arc::clone(&provider.releases);
    (TokenResolver::new(Box::new(provider)), queries, releases)
}

#[test]
fn mapped_token_resolves_on_fixed_port() {
    let (resolver, _, releases) = resolver_with_counts(&[(
        "7ff149ff-b71e-4e11-8330-4f8ea7cb7131",
        b"10.0.0.5",
    )]);
    let ep = resolver
        .resolve("7ff149ff-b71e-4e11-8330-4f8ea7cb7131")
        .unwrap()
        .unwrap();
    assert_eq!(ep.host, "10.0.0.5");
    assert_eq!(ep.port, 5901);
    assert_eq!(*releases.lock().unwrap(), 1);
}

#[test]
fn unmapped_token_is_absent_and_releases_nothing() {
    let (resolver, queries, releases) = resolver_with_counts(&[]);
    assert!(resolver.resolve("test").unwrap().is_none());
    assert_eq!(*queries.lock().unwrap(), 1);
    assert_eq!(*releases.lock().unwrap(), 0);
}

#[test]
fn each_hit_releases_exactly_once() {
    let (resolver, queries, releases) = resolver_with_counts(&[("a", b"10.0.0.1")]);
    resolver.resolve("a").unwrap();
    resolver.resolve("a").unwrap();
    resolver.resolve("missing").unwrap();
    assert_eq!(*queries.lock().unwrap(), 3);
    assert_eq!(*releases.lock().unwrap(), 2);
}

#[test]
fn resolving_twice_is_idempotent() {
    let (resolver, _, _) = resolver_with_counts(&[("a", b"10.0.0.1")]);
    let first = resolver.resolve("a").unwrap();
    let second = resolver.resolve("a").unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_token_is_a_normal_query() {
    let (resolver, _, _) = resolver_with_counts(&[("", b"10.0.0.9")]);
    let ep = resolver.resolve("").unwrap().unwrap();
    assert_eq!(ep, Endpoint::new("10.0.0.9"));

    let (resolver, _, releases) = resolver_with_counts(&[]);
    assert!(resolver.resolve("").unwrap().is_none());
    assert_eq!(*releases.lock().unwrap(), 0);
}

#[test]
fn bad_utf8_reply_errors_but_still_releases() {
    let (resolver, _, releases) = resolver_with_counts(&[("a", &[0xff, 0xfe])]);
    let err = resolver.resolve("a").unwrap_err();
    match err {
        CoreError::HostDecode(_) => {}
        other => panic!("expected HostDecode, got {other:?}"),
    }
    assert_eq!(*releases.lock().unwrap(), 1);
}

#[test]
fn static_provider_resolves_its_map() {
    let mut hosts = HashMap::new();
    hosts.insert("t1".to_string(), "192.168.1.20".to_string());
    let resolver = TokenResolver::new(Box::new(StaticProvider::new(hosts)));
    assert_eq!(
        resolver.resolve("t1").unwrap(),
        Some(Endpoint::new("192.168.1.20"))
    );
    assert_eq!(resolver.resolve("t2").unwrap(), None);
}

#[test]
fn static_provider_loads_a_json_map() {
    let path = std::env::temp_dir().join("vnctoken-map-test.json");
    std::fs::write(&path, r#"{"t1": "10.1.2.3"}"#).unwrap();
    let resolver = TokenResolver::new(Box::new(StaticProvider::from_json_file(&path).unwrap()));
    assert_eq!(
        resolver.resolve("t1").unwrap(),
        Some(Endpoint::new("10.1.2.3"))
    );
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn echo_provider_returns_the_token_as_host() {
    let resolver = TokenResolver::new(Box::new(EchoProvider));
    let ep = resolver.resolve("10.0.0.7").unwrap().unwrap();
    assert_eq!(ep.host, "10.0.0.7");
    assert_eq!(ep.port, VNC_PORT);
}

#[test]
fn endpoint_displays_as_host_port() {
    assert_eq!(Endpoint::new("10.0.0.5").to_string(), "10.0.0.5:5901");
}
