use super::epoch::EpochCalculator;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A relayer's stake history, bucketed by the epoch in which each increment was
/// registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerValue {
    pub value: BTreeMap<u64, U256>,
}

impl RelayerValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the bucket of epoch `eid`.
    pub fn add(&mut self, eid: u64, amount: U256) {
        let entry = self.value.entry(eid).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Sum of every bucket.
    pub fn total(&self) -> U256 {
        self.value.values().fold(U256::ZERO, |acc, v| acc.saturating_add(*v))
    }

    /// Stake that may be withdrawn at `height`.
    pub fn to_unlocked_value(&self, epochs: &EpochCalculator, height: u64) -> U256 {
        self.sum_where(|eid| epochs.is_unlocked(eid, height))
    }

    /// Stake still inside its redemption window at `height`.
    pub fn to_unlocking_value(&self, epochs: &EpochCalculator, height: u64) -> U256 {
        self.sum_where(|eid| !epochs.is_unlocked(eid, height))
    }

    fn sum_where(&self, mut include: impl FnMut(u64) -> bool) -> U256 {
        self.value
            .iter()
            .filter(|(eid, _)| include(**eid))
            .fold(U256::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }
}

impl FromIterator<(u64, U256)> for RelayerValue {
    fn from_iter<I: IntoIterator<Item = (u64, U256)>>(iter: I) -> Self {
        let mut value = Self::new();
        for (eid, amount) in iter {
            value.add(eid, amount);
        }
        value
    }
}
