//! CLI for vnctoken: one-shot token lookups against a provider.

use clap::{Parser, Subcommand};

use vnctoken_rs::{LookupProvider, NativeProvider, StaticProvider, TokenResolver};

#[derive(Parser)]
#[command(name = "vnctoken")]
#[command(about = "Vnctoken lookup CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a session token to its desktop endpoint.
    Lookup {
        /// Session token to resolve.
        token: String,
        /// Provider library path (default: VNCTOKEN_LIB, then get-ip.so).
        #[arg(long)]
        lib: Option<String>,
        /// JSON {token: host} map file used instead of the native library.
        #[arg(long, conflicts_with = "lib")]
        map: Option<String>,
        /// Print the endpoint as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn run_lookup(
    token: &str,
    lib: Option<&str>,
    map: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let provider: Box<dyn LookupProvider> = match (map, lib) {
        (Some(path), _) => Box::new(StaticProvider::from_json_file(path)?),
        (None, Some(path)) => Box::new(NativeProvider::load(path)?),
        (None, None) => Box::new(NativeProvider::from_env()?),
    };
    let resolver = TokenResolver::new(provider);
    match resolver.resolve(token)? {
        Some(ep) if json => println!("{}", serde_json::to_string(&ep)?),
        Some(ep) => println!("{}", ep),
        None => {
            eprintln!("no mapping for token");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Lookup {
            token,
            lib,
            map,
            json,
        } => run_lookup(&token, lib.as_deref(), map.as_deref(), json),
    }
}
