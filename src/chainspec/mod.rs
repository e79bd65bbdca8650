//! Chain parameters for the relayer economics and system-contract layer.
//!
//! Every constant the rest of the crate depends on (fork point, epoch length,
//! registry address, gas ceilings) lives in an immutable [`ChainParams`] that is
//! handed to components when they are built, so test networks can run with
//! their own values.
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod makalu;
pub mod map;

pub use makalu::makalu_testnet;
pub use map::map_mainnet;

/// Address of the on-chain Registry contract on every MAP network.
pub const REGISTRY_CONTRACT_ADDRESS: Address = address!("000000000000000000000000000000000000ce10");

/// Gas ceiling for a `getAddressFor` lookup.
pub const MAX_GAS_FOR_GET_ADDRESS_FOR: u64 = 100_000;

/// Reserved address of the relayer system account. It may not take part in
/// relayer registration or reward withdrawal.
pub fn relayer_system_address() -> Address {
    Address::left_padding_from(b"RelayerAddress")
}

/// Epoch layout and redemption policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochParams {
    /// Last height of the legacy epoch. The first fixed-length epoch starts right after it.
    pub fork_point: u64,
    /// Number of heights in every epoch after the fork.
    pub epoch_length: u64,
    /// Identifier of the first fixed-length epoch (shared by the legacy epoch).
    pub first_new_epoch_id: u64,
    /// Grace period, in heights, added to the start of the following epoch before
    /// stake becomes withdrawable.
    pub max_redeem_height: u64,
}

/// Well-known system-contract settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractParams {
    pub registry_address: Address,
    pub max_gas_for_get_address_for: u64,
}

impl Default for ContractParams {
    fn default() -> Self {
        Self {
            registry_address: REGISTRY_CONTRACT_ADDRESS,
            max_gas_for_get_address_for: MAX_GAS_FOR_GET_ADDRESS_FOR,
        }
    }
}

/// Full parameter set of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    pub epochs: EpochParams,
    #[serde(default)]
    pub contracts: ContractParams,
    #[serde(default = "relayer_system_address")]
    pub relayer_address: Address,
}

impl ChainParams {
    /// MAP mainnet parameters.
    pub fn mainnet() -> Self {
        map_mainnet()
    }

    /// Makalu testnet parameters.
    pub fn testnet() -> Self {
        makalu_testnet()
    }

    /// Looks up a built-in network by name.
    pub fn named(chain: &str) -> Result<Self, ChainParamsError> {
        match chain {
            "map" | "mainnet" => Ok(Self::mainnet()),
            "makalu" | "testnet" => Ok(Self::testnet()),
            other => Err(ChainParamsError::UnknownChain(other.to_string())),
        }
    }

    /// Parses and validates parameters from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ChainParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads parameters from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChainParamsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| ChainParamsError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&json)
    }

    /// Checks the invariants the epoch arithmetic relies on.
    pub fn validate(&self) -> Result<(), ChainParamsError> {
        self.epochs.validate()?;
        if self.contracts.registry_address.is_zero() {
            return Err(ChainParamsError::ZeroRegistryAddress);
        }
        Ok(())
    }
}

impl EpochParams {
    /// Checks that every height maps to an epoch without overflowing `u64`.
    pub fn validate(&self) -> Result<(), ChainParamsError> {
        // every epoch must span at least two heights so that end > begin
        if self.epoch_length < 2 {
            return Err(ChainParamsError::EpochLengthTooShort(self.epoch_length));
        }
        if self.first_new_epoch_id == 0 {
            return Err(ChainParamsError::ZeroFirstEpochId);
        }
        // the first epoch's end and the height after it must be representable
        if self.fork_point.checked_add(self.epoch_length).and_then(|end| end.checked_add(1)).is_none() {
            return Err(ChainParamsError::ForkPointOverflow {
                fork_point: self.fork_point,
                epoch_length: self.epoch_length,
            });
        }
        // the id of the epoch holding `u64::MAX` must be representable
        if self.first_new_epoch_id.checked_add(u64::MAX / self.epoch_length + 1).is_none() {
            return Err(ChainParamsError::FirstEpochIdOverflow(self.first_new_epoch_id));
        }
        Ok(())
    }
}

/// Errors raised while loading [`ChainParams`].
#[derive(Debug, thiserror::Error)]
pub enum ChainParamsError {
    #[error("unsupported chain: {0}")]
    UnknownChain(String),
    #[error("failed to read chain params from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid chain params json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("epoch length must be at least 2, got {0}")]
    EpochLengthTooShort(u64),
    #[error("first new epoch id must be non-zero")]
    ZeroFirstEpochId,
    #[error("fork point {fork_point} plus epoch length {epoch_length} overflows the height range")]
    ForkPointOverflow { fork_point: u64, epoch_length: u64 },
    #[error("first new epoch id {0} leaves no room for later epoch ids")]
    FirstEpochIdOverflow(u64),
    #[error("registry address must be set")]
    ZeroRegistryAddress,
}
