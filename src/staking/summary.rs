use super::epoch::EpochIdInfo;
use alloy_primitives::U256;
use serde_json::{json, Value};

/// Registration totals of one epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryEpochInfo {
    pub epoch_id: u64,
    pub sa_count: u64,
    pub da_count: u64,
    pub begin_height: u64,
    pub end_height: u64,
    pub all_amount: U256,
}

impl SummaryEpochInfo {
    /// Empty totals over the boundaries of `epoch`.
    pub const fn for_epoch(epoch: &EpochIdInfo) -> Self {
        Self {
            epoch_id: epoch.epoch_id,
            sa_count: 0,
            da_count: 0,
            begin_height: epoch.begin_height,
            end_height: epoch.end_height,
            all_amount: U256::ZERO,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "EpochID": self.epoch_id,
            "SaCount": self.sa_count,
            "DaCount": self.da_count,
            "BeginHeight": self.begin_height,
            "EndHeight": self.end_height,
            "AllAmount": self.all_amount,
        })
    }
}

/// Registration overview across epochs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    pub last_reward: u64,
    pub accounts: u64,
    pub all_amount: U256,
    pub infos: Vec<SummaryEpochInfo>,
}

impl RegisterSummary {
    /// Reporting view. Quantities are hex, heights and counts plain numbers.
    pub fn to_json(&self) -> Value {
        json!({
            "lastRewardHeight": self.last_reward,
            "AccountsCounts": self.accounts,
            "currentAllRegister": self.all_amount,
            "EpochInfos": self.infos.iter().map(SummaryEpochInfo::to_json).collect::<Vec<_>>(),
        })
    }
}
