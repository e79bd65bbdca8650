use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Withdrawable and locked stake of one relayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub address: Address,
    pub valid: U256,
    pub lock: U256,
}

/// Stake balances of every relayer at one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBalance {
    #[serde(rename = "addrWithBalance")]
    pub balance: Vec<BalanceInfo>,
}

impl BlockBalance {
    /// Indexes the balances by address. A later entry for the same address wins.
    pub fn to_map(&self) -> BTreeMap<Address, BalanceInfo> {
        self.balance.iter().map(|info| (info.address, info.clone())).collect()
    }
}

/// Rebuilds balance entries from an address map, in address order. Each entry
/// takes its address from the key.
pub fn to_balance_infos(items: &BTreeMap<Address, BalanceInfo>) -> Vec<BalanceInfo> {
    items
        .iter()
        .map(|(address, info)| BalanceInfo { address: *address, valid: info.valid, lock: info.lock })
        .collect()
}
