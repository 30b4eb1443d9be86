//! abierrors CLI — decode contract revert data from the terminal.
//!
//! Usage:
//! ```bash
//! # Decode against a Foundry artifact
//! abierrors error 0xcf479181... --abi out/Vault.sol/Vault.json
//!
//! # ABI path from the environment, JSON output
//! ABIERRORS_ABI=out/Vault.sol/Vault.json abierrors error 0xcf479181... --json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use abierrors_core::{
    AbiValue, CollisionPolicy, DecodedResult, DecoderConfig, ErrorDecoder, InterfaceDescription,
};
use abierrors_evm::{builtin, AbiErrorDecoder};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

mod logging;

use logging::LogConfig;

#[derive(Parser)]
#[command(
    name = "abierrors",
    about = "Decode ABI-encoded contract errors against a compiled ABI",
    version
)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode revert data into an error name and arguments
    Error {
        /// Revert data (0x-prefixed hex)
        data: String,
        /// Compilation artifact or ABI JSON file declaring the errors
        #[arg(long, env = "ABIERRORS_ABI")]
        abi: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Fail instead of picking the first declaration when selectors collide
        #[arg(long)]
        reject_collisions: bool,
        /// Do not recognise Error(string) and Panic(uint256) unless the ABI declares them
        #[arg(long)]
        no_builtins: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    logging::init_tracing(&LogConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
        ..LogConfig::default()
    });

    if let Err(e) = run(cli.command) {
        eprintln!("Failed to decode error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Error {
            data,
            abi,
            json,
            reject_collisions,
            no_builtins,
        } => {
            let config = DecoderConfig {
                collision: if reject_collisions {
                    CollisionPolicy::Reject
                } else {
                    CollisionPolicy::FirstDeclared
                },
                builtins: !no_builtins,
            };
            cmd_error(&data, &abi, config, json)
        }
    }
}

fn cmd_error(data: &str, abi_path: &Path, config: DecoderConfig, as_json: bool) -> Result<()> {
    let interface = load_interface(abi_path)?;
    info!(path = %abi_path.display(), errors = interface.len(), "loaded interface");

    let decoder = AbiErrorDecoder::with_config(interface, config);
    let result = decoder.decode_hex(data)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result));
    }
    Ok(())
}

fn load_interface(path: &Path) -> Result<InterfaceDescription> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read ABI file {}", path.display()))?;
    InterfaceDescription::from_json(&json)
        .with_context(|| format!("cannot load errors from {}", path.display()))
}

/// Plain-text output: the error name, then the comma-joined arguments.
/// Arrays and tuples are flattened into the same list.
fn render(result: &DecodedResult) -> String {
    let args: Vec<String> = result.values().map(plain).collect();
    let mut out = format!("Error name: {}\nArgs: {}\n", result.error_name, args.join(","));
    if let Some(reason) = builtin::panic_reason(result) {
        out.push_str(&format!("Panic: {reason}\n"));
    }
    out
}

fn plain(value: &AbiValue) -> String {
    match value {
        AbiValue::FixedArray(items) | AbiValue::Array(items) | AbiValue::Tuple(items) => {
            items.iter().map(plain).collect::<Vec<_>>().join(",")
        }
        other => other.to_string(),
    }
}
