use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use multisig_wallet::{MultiSigWallet, WalletConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod deployments;
mod replay;

use deployments::{DeploymentRecord, DeploymentsFile};

/// Provision multisig wallet instances and replay call scripts against them.
///
/// This is the thin operational wrapper around the engine: it validates constructor arguments
/// by actually constructing the wallet, and keeps a machine-readable deployments file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Instantiate a wallet from a config file and record its address.
    Provision(ProvisionArgs),
    /// Run a JSON script of deposit/propose/approve/execute steps against an in-memory wallet.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ProvisionArgs {
    /// Wallet config JSON: `{ "owners": [...], "requiredApprovals": n, "initialFunding": "0x.." }`.
    #[arg(long, env = "WALLET_CONFIG")]
    config: PathBuf,

    /// Account that creates the wallet.
    #[arg(long, env = "DEPLOYER_ADDRESS")]
    deployer: Address,

    /// Deployer account nonce used for the CREATE address.
    #[arg(long)]
    nonce: u64,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this wallet.
    #[arg(long, default_value = "multisig-wallet")]
    contract_key: String,

    /// Network name (eg, devnet, sepolia).
    #[arg(long, env = "NETWORK", default_value = "devnet")]
    network: String,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(long, env = "WALLET_CONFIG")]
    config: PathBuf,

    /// JSON array of steps.
    #[arg(long)]
    script: PathBuf,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Command::Provision(args) => provision(&args),
        Command::Replay(args) => replay(&args),
    }
}

fn load_config(path: &Path) -> Result<WalletConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed parsing JSON in {}", path.display()))
}

fn provision(args: &ProvisionArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let wallet = MultiSigWallet::from_config(&config).context("invalid wallet configuration")?;

    let record = DeploymentRecord::new(&wallet, args.deployer, args.nonce);
    let address = record.address;

    let mut deployments = DeploymentsFile::load(&args.deployments_path)?;
    deployments.record(&args.network, &args.contract_key, &record)?;
    deployments.save()?;

    info!(
        key = %args.contract_key,
        %address,
        path = %args.deployments_path.display(),
        "wallet provisioned"
    );
    println!("Provisioned `{}` at {}", args.contract_key, address);
    Ok(())
}

fn replay(args: &ReplayArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let raw = fs::read_to_string(&args.script)
        .with_context(|| format!("failed reading {}", args.script.display()))?;
    let steps: Vec<replay::Step> = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing JSON in {}", args.script.display()))?;

    let report = replay::run(&config, &steps)?;
    for outcome in &report.outcomes {
        println!(
            "{}",
            serde_json::to_string(outcome).context("failed serialising step outcome")?
        );
    }
    println!("{}", serde_json::json!({ "balance": report.balance }));
    Ok(())
}
