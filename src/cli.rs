use crate::{
    chainspec::ChainParams,
    staking::{forbid_address, valid_pk, EpochCalculator, RelayerValue},
    system_contracts::registry_id,
};
use alloy_primitives::{hex, Address, U256};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Built-in networks accepted by `--chain`.
pub const SUPPORTED_CHAINS: &[&str] = &["map", "mainnet", "makalu", "testnet"];

#[derive(Debug, Subcommand)]
pub enum RelayerCommands {
    /// Show the epoch containing a height
    Epoch {
        #[arg(long)]
        height: u64,
    },
    /// Show the epoch with the given id
    EpochById {
        #[arg(long)]
        id: u64,
    },
    /// List the epochs overlapping a height range
    Range {
        #[arg(long)]
        begin: u64,
        #[arg(long)]
        end: u64,
    },
    /// Show the first height at which stake registered in an epoch can be redeemed
    Redeem {
        #[arg(long)]
        epoch: u64,
    },
    /// Split stake into unlocked and still-locked parts at a height
    Unlock {
        /// Stake increments as EPOCH:AMOUNT (amount in decimal or 0x-hex)
        #[arg(long, num_args = 1.., value_parser = parse_stake)]
        stake: Vec<(u64, U256)>,
        #[arg(long)]
        height: u64,
    },
    /// Compute the registry identifier of a system contract
    RegistryId {
        #[arg(long)]
        name: String,
    },
    /// Check that an address may act as a relayer
    CheckAddress {
        #[arg(long)]
        address: Address,
    },
    /// Check that a hex string is an uncompressed secp256k1 public key
    CheckPk {
        #[arg(long)]
        key: String,
    },
}

#[derive(Debug, Parser)]
#[command(author, version, about = "MAP relayer epoch and registry toolkit")]
pub struct RelayerCli {
    #[command(subcommand)]
    pub command: RelayerCommands,

    /// Built-in network (map, makalu)
    #[arg(long, default_value = "map", global = true)]
    pub chain: String,

    /// JSON file with custom chain parameters, overrides --chain
    #[arg(long, global = true)]
    pub params: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

impl RelayerCli {
    /// Parse CLI arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> eyre::Result<()> {
        if self.params.is_none() && !SUPPORTED_CHAINS.contains(&self.chain.as_str()) {
            return Err(eyre::eyre!("Unsupported chain: {}", self.chain));
        }
        match &self.command {
            RelayerCommands::Range { begin, end } if begin > end => {
                Err(eyre::eyre!("Range begin {} is past its end {}", begin, end))
            }
            RelayerCommands::Unlock { stake, .. } if stake.is_empty() => {
                Err(eyre::eyre!("Unlock requires at least one --stake entry"))
            }
            RelayerCommands::RegistryId { name } if name.is_empty() => {
                Err(eyre::eyre!("Registry name must not be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the chain parameters selected on the command line.
    pub fn chain_params(&self) -> eyre::Result<ChainParams> {
        let params = match &self.params {
            Some(path) => ChainParams::load(path)?,
            None => ChainParams::named(&self.chain)?,
        };
        Ok(params)
    }

    /// Executes the command and returns its JSON report.
    pub fn run(&self) -> eyre::Result<Value> {
        let params = self.chain_params()?;
        execute(&self.command, &params)
    }
}

/// Runs `command` against `params`.
pub fn execute(command: &RelayerCommands, params: &ChainParams) -> eyre::Result<Value> {
    let epochs = EpochCalculator::new(params.epochs)?;
    let report = match command {
        RelayerCommands::Epoch { height } => serde_json::to_value(epochs.epoch_from_height(*height))?,
        RelayerCommands::EpochById { id } => serde_json::to_value(epochs.epoch_from_id(*id))?,
        RelayerCommands::Range { begin, end } => serde_json::to_value(epochs.epoch_range(*begin, *end)?)?,
        RelayerCommands::Redeem { epoch } => json!({
            "epoch": epoch,
            "minRedeemHeight": epochs.min_redeem_height(*epoch),
        }),
        RelayerCommands::Unlock { stake, height } => {
            let value: RelayerValue = stake.iter().copied().collect();
            json!({
                "height": height,
                "total": value.total(),
                "unlocked": value.to_unlocked_value(&epochs, *height),
                "unlocking": value.to_unlocking_value(&epochs, *height),
            })
        }
        RelayerCommands::RegistryId { name } => json!({ "name": name, "id": registry_id(name) }),
        RelayerCommands::CheckAddress { address } => {
            forbid_address(*address, params.relayer_address)?;
            json!({ "address": address, "allowed": true })
        }
        RelayerCommands::CheckPk { key } => {
            let bytes = hex::decode(key)?;
            valid_pk(&bytes)?;
            json!({ "valid": true })
        }
    };
    Ok(report)
}

fn parse_stake(s: &str) -> Result<(u64, U256), String> {
    let (eid, amount) = s.split_once(':').ok_or_else(|| format!("expected EPOCH:AMOUNT, got `{s}`"))?;
    let eid = eid.trim().parse::<u64>().map_err(|e| format!("invalid epoch `{eid}`: {e}"))?;
    let amount = amount.trim().parse::<U256>().map_err(|e| format!("invalid amount `{amount}`: {e}"))?;
    Ok((eid, amount))
}
