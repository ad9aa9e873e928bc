//! Derive a protocol registry or inspect parameter tables from the command line.
//!
//! Output is JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use teiki_protocol::core::ReferenceCompiler;
use teiki_protocol::params::{ProtocolNonScriptParams, TransactionConstants};
use teiki_protocol::{ProtocolConfig, ProtocolInstance, ResolverConfig};

#[derive(Parser, Debug)]
#[command(name = "teiki-registry", version, about)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the registry of a protocol instance
    Derive(DeriveCmd),
    /// Print the parameter tables, optionally loaded from files
    Params(ParamsCmd),
}

#[derive(Args, Debug)]
struct DeriveCmd {
    /// Seed output reference, as `<tx hash hex>#<index>`
    #[arg(long)]
    seed: String,

    /// Base token policy id (hex)
    #[arg(long)]
    base_policy: String,

    /// Migration token policy id (hex)
    #[arg(long)]
    migration_policy: String,

    /// Migration token name
    #[arg(long, default_value = "MIGRATE")]
    migration_name: String,

    /// Protocol configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Derive nodes of a layer one at a time
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Print the raw hash bundle instead of the registry
    #[arg(long, default_value_t = false)]
    raw: bool,
}

#[derive(Args, Debug)]
struct ParamsCmd {
    /// Non-script parameter table (JSON); the sample table when omitted
    #[arg(long)]
    params: Option<PathBuf>,

    /// Transaction constants (JSON); the defaults when omitted
    #[arg(long)]
    constants: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")?;

    match cli.command {
        Command::Derive(cmd) => derive(cmd),
        Command::Params(cmd) => params(cmd),
    }
}

fn derive(cmd: DeriveCmd) -> Result<()> {
    let mut config = match &cmd.config {
        Some(path) => ProtocolConfig::from_file(path)
            .with_context(|| format!("load protocol config {}", path.display()))?,
        None => ProtocolConfig::default(),
    };
    if cmd.sequential {
        config.resolver = ResolverConfig { parallel: false };
    }

    let instance = ProtocolInstance::from_text(
        &cmd.seed,
        &cmd.base_policy,
        &cmd.migration_policy,
        &cmd.migration_name,
    )
    .context("parse instance identifiers")?;
    let deployment = instance
        .instantiate(ReferenceCompiler::new(), config)
        .with_context(|| format!("derive registry for seed {}", instance.seed))?;

    let json = if cmd.raw {
        serde_json::to_string_pretty(&deployment.hashes)
    } else {
        serde_json::to_string_pretty(&deployment.registry)
    }
    .context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn params(cmd: ParamsCmd) -> Result<()> {
    let params = match &cmd.params {
        Some(path) => ProtocolNonScriptParams::from_file(path)
            .with_context(|| format!("load parameters {}", path.display()))?,
        None => ProtocolNonScriptParams::default()
            .validated()
            .context("validate sample parameters")?,
    };
    let constants = match &cmd.constants {
        Some(path) => TransactionConstants::from_file(path)
            .with_context(|| format!("load transaction constants {}", path.display()))?,
        None => TransactionConstants::default(),
    };

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "nonScriptParams": params,
        "transactionConstants": constants,
    }))
    .context("serialize output")?;
    println!("{json}");
    Ok(())
}
