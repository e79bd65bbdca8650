//! Reward bookkeeping for block producers and relayers.
//!
//! Every type here is a plain value. Aggregation always produces new values and
//! never writes back into the inputs, so a merged view can be built from a ledger
//! without disturbing it. Sums that do not fit in 256 bits are reported as
//! [`StakingError::AmountOverflow`], never clamped.

use super::{error::StakingError, util::rlp_hash};
use alloy_primitives::{Address, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{collections::BTreeMap, fmt};

/// Accumulated reward and register weight of one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct RewardInfo {
    #[serde(rename = "Address")]
    pub address: Address,
    #[serde(rename = "Amount")]
    pub amount: U256,
    #[serde(rename = "register")]
    pub register: U256,
}

impl RewardInfo {
    pub const fn new(address: Address, amount: U256) -> Self {
        Self { address, amount, register: U256::ZERO }
    }

    /// Reporting view: `{Address, Amount, Register}` with hex quantities.
    pub fn to_json(&self) -> Value {
        json!({
            "Address": self.address,
            "Amount": self.amount,
            "Register": self.register,
        })
    }
}

impl fmt::Display for RewardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Address:{},Amount:{}", self.address, self.amount)?;
        f.write_str("]")
    }
}

/// Adds `incoming` into `base`: amounts of addresses already in `base` are summed,
/// unknown addresses are appended in their `incoming` order.
pub fn merge_reward_infos(
    mut base: Vec<RewardInfo>,
    incoming: &[RewardInfo],
) -> Result<Vec<RewardInfo>, StakingError> {
    for item in incoming {
        match base.iter_mut().find(|existing| existing.address == item.address) {
            Some(existing) => {
                existing.amount = existing
                    .amount
                    .checked_add(item.amount)
                    .ok_or(StakingError::AmountOverflow(item.address))?;
            }
            None => base.push(item.clone()),
        }
    }
    Ok(base)
}

/// Merges every group whose relayer address is `addr`.
pub fn fetch_by_address(groups: &[RewardInfos], addr: Address) -> Result<Vec<RewardInfo>, StakingError> {
    groups
        .iter()
        .filter(|group| group.relayer_address() == Some(addr))
        .try_fold(Vec::new(), |acc, group| merge_reward_infos(acc, &group.items))
}

/// Rewards attributed to one relayer. The first item is the relayer itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct RewardInfos {
    #[serde(rename = "Items")]
    pub items: Vec<RewardInfo>,
}

impl RewardInfos {
    pub const fn new(items: Vec<RewardInfo>) -> Self {
        Self { items }
    }

    /// Address of the relayer the group belongs to, `None` for an empty group.
    pub fn relayer_address(&self) -> Option<Address> {
        self.items.first().map(|item| item.address)
    }

    /// Reporting view: `{"SaReward": [...]}`.
    pub fn to_json(&self) -> Value {
        json!({ "SaReward": self.items.iter().map(RewardInfo::to_json).collect::<Vec<_>>() })
    }
}

impl fmt::Display for RewardInfos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.items.iter().try_for_each(|item| write!(f, "{item}"))
    }
}

/// Reward summary of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct ChainReward {
    pub height: u64,
    pub st: u64,
    #[serde(rename = "blockminer")]
    pub coinbase: RewardInfo,
    #[serde(rename = "relayers", default)]
    pub relayers: Vec<RewardInfos>,
}

impl ChainReward {
    pub const fn new(height: u64, st: u64, coinbase: RewardInfo, relayers: Vec<RewardInfos>) -> Self {
        Self { height, st, coinbase, relayers }
    }

    /// Reporting view of the block producer reward.
    pub fn coin_reward_info(&self) -> Value {
        json!({ "blockminer": self.coinbase.to_json() })
    }

    /// Reporting view of the relayer rewards.
    pub fn relayer_reward_info(&self) -> Value {
        json!({ "RelayerReward": self.relayers.iter().map(RewardInfos::to_json).collect::<Vec<_>>() })
    }

    /// Merged rewards of the relayer `addr` in this block.
    pub fn relayer_rewards(&self, addr: Address) -> Result<Vec<RewardInfo>, StakingError> {
        fetch_by_address(&self.relayers, addr)
    }

    pub fn hash(&self) -> B256 {
        rlp_hash(self)
    }
}

/// A [`ChainReward`] stamped with when and where it was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedChainReward {
    pub st: u64,
    pub number: u64,
    pub reward: ChainReward,
}

/// One [`RewardInfo`] per map entry, in address order.
pub fn to_reward_infos(items: &BTreeMap<Address, U256>) -> Vec<RewardInfo> {
    items.iter().map(|(addr, amount)| RewardInfo::new(*addr, *amount)).collect()
}

/// One single-item [`RewardInfos`] group per map entry, in address order.
pub fn to_relayer_reward_infos(items: &BTreeMap<Address, U256>) -> Vec<RewardInfos> {
    to_reward_infos(items).into_iter().map(|item| RewardInfos::new(vec![item])).collect()
}

/// Sums two address-keyed reward maps.
pub fn merge_reward_maps(
    mut base: BTreeMap<Address, U256>,
    incoming: &BTreeMap<Address, U256>,
) -> Result<BTreeMap<Address, U256>, StakingError> {
    for (addr, amount) in incoming {
        let entry = base.entry(*addr).or_default();
        *entry = entry.checked_add(*amount).ok_or(StakingError::AmountOverflow(*addr))?;
    }
    Ok(base)
}
