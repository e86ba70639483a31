//! Deployments file: `{ network, updated_at, deployments: { <key>: { address, ... } } }`.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use multisig_wallet::{MultiSigWallet, WalletConfig};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// What gets recorded for one provisioned wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    pub address: Address,
    pub owners: Vec<Address>,
    pub required_approvals: u64,
    pub initial_funding: U256,
    pub constructor_args: Bytes,
    pub deployer: Address,
    pub nonce: u64,
}

impl DeploymentRecord {
    /// Describe `wallet` as created by `deployer` at account nonce `nonce`. The address is the
    /// CREATE address `keccak256(rlp([deployer, nonce]))[12..]`.
    pub fn new(wallet: &MultiSigWallet, deployer: Address, nonce: u64) -> Self {
        let config = WalletConfig {
            owners: wallet.owners().to_vec(),
            required_approvals: wallet.required_approvals(),
            initial_funding: wallet.balance(),
        };
        Self {
            address: deployer.create(nonce),
            constructor_args: config.constructor_args().into(),
            owners: config.owners,
            required_approvals: config.required_approvals,
            initial_funding: config.initial_funding,
            deployer,
            nonce,
        }
    }
}

/// An on-disk deployments file, loaded leniently and saved with a temp file + rename.
#[derive(Debug)]
pub struct DeploymentsFile {
    path: PathBuf,
    root: Map<String, Value>,
}

impl DeploymentsFile {
    /// Missing or blank files start empty. A JSON root that is not an object is discarded;
    /// unparseable JSON is an error so a typo never wipes recorded addresses.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read {}", path.display()))
            }
        };

        let root = if raw.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
            {
                Value::Object(map) => map,
                _ => Map::new(),
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Set `deployments[key]`, stamping the file and the entry with the current time.
    pub fn record(&mut self, network: &str, key: &str, record: &DeploymentRecord) -> Result<()> {
        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("cannot format timestamp")?;

        let mut entry = serde_json::to_value(record).context("cannot encode deployment record")?;
        entry["deployed_at"] = json!(now);

        self.root.insert("network".into(), json!(network));
        self.root.insert("updated_at".into(), json!(now));
        let deployments = self
            .root
            .entry("deployments")
            .or_insert_with(|| json!({}));
        if !deployments.is_object() {
            *deployments = json!({});
        }
        deployments[key] = entry;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, &self.root)
            .context("cannot encode deployments file")?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .with_context(|| format!("cannot replace {}", self.path.display()))?;
        Ok(())
    }
}
