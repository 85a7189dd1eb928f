//! Minimal lookup: static map in, endpoint out.

use std::collections::HashMap;

use vnctoken_rs::{StaticProvider, TokenResolver};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut hosts = HashMap::new();
    hosts.insert(
        "7ff149ff-b71e-4e11-8330-4f8ea7cb7131".to_string(),
        "10.0.0.5".to_string(),
    );
    let resolver = TokenResolver::new(Box::new(StaticProvider::new(hosts)));

    for token in ["7ff149ff-b71e-4e11-8330-4f8ea7cb7131", "test"] {
        match resolver.resolve(token)? {
            Some(ep) => println!("{token} -> {ep}"),
            None => println!("{token} -> no mapping"),
        }
    }
    Ok(())
}
