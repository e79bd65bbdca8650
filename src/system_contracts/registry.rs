//! Registry-backed address resolution for system contracts.
//!
//! System contracts are upgradeable, so their addresses are never hardcoded: each
//! one is named by a 32-byte identifier and looked up through the Registry
//! contract's `getAddressFor(bytes32)` at call time.

use super::{error::ContractCallError, method::BoundMethod};
use crate::{
    chainspec::ContractParams,
    evm::{EvmError, EvmRunner, MeteringPause},
};
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{keccak256, Address, B256};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

/// Identifier of a logical system contract in the Registry.
pub type RegistryId = B256;

/// Derives the Registry identifier of a contract from its name.
pub fn registry_id(name: &str) -> RegistryId {
    keccak256(name.as_bytes())
}

pub static ACCOUNTS_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("Accounts"));
pub static ELECTION_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("Election"));
pub static EPOCH_REWARDS_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("EpochRewards"));
pub static GOLD_TOKEN_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("GoldToken"));
pub static GOVERNANCE_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("Governance"));
pub static LOCKED_GOLD_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("LockedGold"));
pub static VALIDATORS_REGISTRY_ID: Lazy<RegistryId> = Lazy::new(|| registry_id("Validators"));

/// Human-readable ABI of the Registry entry point this crate relies on.
pub const REGISTRY_ABI: &[&str] =
    &["function getAddressFor(bytes32 identifier) external view returns (address)"];

/// Parsed Registry ABI, shared by every [`Registry`] instance.
pub static REGISTRY_JSON_ABI: Lazy<Arc<JsonAbi>> = Lazy::new(|| {
    Arc::new(JsonAbi::parse(REGISTRY_ABI.iter().copied()).expect("registry ABI is well formed"))
});

/// Handle on the Registry contract of one network.
#[derive(Debug, Clone)]
pub struct Registry {
    get_address_for: BoundMethod,
}

impl Registry {
    pub fn new(params: &ContractParams) -> Self {
        Self {
            get_address_for: BoundMethod::new(
                params.registry_address,
                REGISTRY_JSON_ABI.clone(),
                "getAddressFor",
                params.max_gas_for_get_address_for,
            ),
        }
    }

    /// The bound `getAddressFor` method.
    pub const fn get_address_for(&self) -> &BoundMethod {
        &self.get_address_for
    }

    /// Returns the address registered under `id`.
    ///
    /// Gas metering is suspended for the lookup and resumed on every exit path.
    /// An empty or reverted response means the Registry itself is not deployed;
    /// a zero address means the entry has not been set.
    pub fn resolve<R: EvmRunner + ?Sized>(
        &self,
        runner: &mut R,
        id: RegistryId,
    ) -> Result<Address, ContractCallError> {
        let mut runner = MeteringPause::new(runner);

        let mut contract = Address::ZERO;
        let args = [DynSolValue::FixedBytes(id, 32)];
        match self.get_address_for.query(&mut *runner, &mut contract, &args) {
            Ok(()) => {}
            Err(ContractCallError::EmptyOutput { .. }) |
            Err(ContractCallError::Execution { source: EvmError::ExecutionReverted(_), .. }) => {
                debug!(target: "system_contracts", %id, "Registry contract not deployed");
                return Err(ContractCallError::RegistryContractNotDeployed);
            }
            Err(err) => return Err(err),
        }

        if contract.is_zero() {
            debug!(target: "system_contracts", %id, "System contract not registered");
            return Err(ContractCallError::SystemContractNotDeployed);
        }
        Ok(contract)
    }

    /// Binds `method` of the contract registered under `id`.
    pub fn bind(self: &Arc<Self>, id: RegistryId, abi: Arc<JsonAbi>, method: &str, max_gas: u64) -> BoundMethod {
        BoundMethod::registered(self.clone(), id, abi, method, max_gas)
    }
}

/// Looks up `id` in the Registry described by `params`.
pub fn resolve_registered_address<R: EvmRunner + ?Sized>(
    runner: &mut R,
    params: &ContractParams,
    id: RegistryId,
) -> Result<Address, ContractCallError> {
    Registry::new(params).resolve(runner, id)
}
