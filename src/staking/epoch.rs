//! Mapping between block heights and epochs.
//!
//! Heights `0..=fork_point` form one legacy epoch. From `fork_point + 1` on, the
//! chain is cut into contiguous epochs of `epoch_length` heights, the first of
//! which carries `first_new_epoch_id`. The legacy epoch reports the same id as
//! the first fixed-length one, so only its boundaries tell them apart.

use super::{error::StakingError, util::rlp_hash};
use crate::chainspec::{ChainParamsError, EpochParams};
use alloy_primitives::B256;
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier and inclusive height boundaries of one epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, RlpEncodable, RlpDecodable,
)]
#[serde(rename_all = "PascalCase")]
pub struct EpochIdInfo {
    #[serde(rename = "EpochID")]
    pub epoch_id: u64,
    pub begin_height: u64,
    pub end_height: u64,
}

impl EpochIdInfo {
    /// Returns `true` if `height` lies inside the epoch.
    pub const fn contains(&self, height: u64) -> bool {
        self.begin_height <= height && height <= self.end_height
    }

    /// Number of heights covered by the epoch.
    pub const fn span(&self) -> u64 {
        self.end_height - self.begin_height + 1
    }

    /// Content hash of the RLP encoding.
    pub fn hash(&self) -> B256 {
        rlp_hash(self)
    }
}

impl fmt::Display for EpochIdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[id:{},begin:{},end:{}]", self.epoch_id, self.begin_height, self.end_height)
    }
}

/// Largest number of epochs [`EpochCalculator::epoch_range`] returns.
pub const MAX_EPOCH_RANGE: u64 = 10_000;

/// Pure epoch arithmetic over a fixed [`EpochParams`].
///
/// Only validated parameters are accepted, so every height and id maps to an
/// epoch without overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochCalculator {
    params: EpochParams,
}

impl EpochCalculator {
    pub fn new(params: EpochParams) -> Result<Self, ChainParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub const fn params(&self) -> &EpochParams {
        &self.params
    }

    /// The first fixed-length epoch, starting right after the fork point.
    pub const fn first_epoch(&self) -> EpochIdInfo {
        EpochIdInfo {
            epoch_id: self.params.first_new_epoch_id,
            begin_height: self.params.fork_point + 1,
            end_height: self.params.fork_point + self.params.epoch_length,
        }
    }

    /// The legacy epoch `[0, fork_point]`, reported under the first epoch's id.
    pub const fn pre_first_epoch(&self) -> EpochIdInfo {
        EpochIdInfo {
            epoch_id: self.params.first_new_epoch_id,
            begin_height: 0,
            end_height: self.params.fork_point,
        }
    }

    /// Returns the epoch containing `height`.
    pub fn epoch_from_height(&self, height: u64) -> EpochIdInfo {
        if height <= self.params.fork_point {
            return self.pre_first_epoch();
        }
        let first = self.first_epoch();
        if height <= first.end_height {
            return first;
        }
        let offset = height - first.end_height;
        let mut eid = offset / self.params.epoch_length + first.epoch_id;
        if offset % self.params.epoch_length != 0 {
            eid += 1;
        }
        self.epoch_from_id(eid)
    }

    /// Returns the fixed-length epoch with id `eid`. Ids at or below the first
    /// epoch's id all map to the first epoch.
    pub fn epoch_from_id(&self, eid: u64) -> EpochIdInfo {
        let first = self.first_epoch();
        if eid <= first.epoch_id {
            return first;
        }
        let begin_height = (eid - first.epoch_id - 1)
            .saturating_mul(self.params.epoch_length)
            .saturating_add(first.end_height + 1);
        EpochIdInfo {
            epoch_id: eid,
            begin_height,
            end_height: begin_height.saturating_add(self.params.epoch_length - 1),
        }
    }

    /// Epochs overlapping `[begin, end]`, in height order.
    ///
    /// Empty when `end == 0`, `begin > end`, or both ends lie strictly before the
    /// fork point. A range that starts in the legacy epoch reports it first and
    /// then the first fixed-length epoch. Both carry the same id, so ids in the
    /// output can repeat across the fork; tell entries apart by their boundaries.
    ///
    /// Fails without allocating when the range covers more than
    /// [`MAX_EPOCH_RANGE`] epochs.
    pub fn epoch_range(&self, begin: u64, end: u64) -> Result<Vec<EpochIdInfo>, StakingError> {
        let fork_point = self.params.fork_point;
        if end == 0 || begin > end || (begin < fork_point && end < fork_point) {
            return Ok(Vec::new());
        }

        let mut epoch = self.epoch_from_height(begin);
        let last = self.epoch_from_height(end);
        let straddles_fork = begin <= fork_point && end > fork_point;
        let count = (last.epoch_id - epoch.epoch_id) + 1 + u64::from(straddles_fork);
        if count > MAX_EPOCH_RANGE {
            return Err(StakingError::EpochRangeTooWide { begin, end, epochs: count, max: MAX_EPOCH_RANGE });
        }

        let mut epochs = Vec::with_capacity(count as usize);
        epochs.push(epoch);
        while epoch.end_height < end {
            let next = self.epoch_from_height(epoch.end_height + 1);
            if next == epoch {
                break;
            }
            epochs.push(next);
            epoch = next;
        }
        Ok(epochs)
    }

    /// First height at which stake registered in epoch `eid` may be withdrawn.
    pub fn min_redeem_height(&self, eid: u64) -> u64 {
        self.redeem_threshold(eid).saturating_add(1)
    }

    /// Returns `true` once `height` is strictly past the redemption window of
    /// stake registered in epoch `eid`.
    pub fn is_unlocked(&self, eid: u64, height: u64) -> bool {
        height > self.redeem_threshold(eid)
    }

    /// Start of the following epoch plus the grace period.
    fn redeem_threshold(&self, eid: u64) -> u64 {
        self.epoch_from_id(eid.saturating_add(1))
            .begin_height
            .saturating_add(self.params.max_redeem_height)
    }

    /// Checks that `info` is one of the epochs this calculator produces.
    pub fn is_valid(&self, info: &EpochIdInfo) -> bool {
        if info.end_height <= info.begin_height {
            return false;
        }
        let first = self.first_epoch();
        match info.epoch_id.cmp(&first.epoch_id) {
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => *info == first || *info == self.pre_first_epoch(),
            std::cmp::Ordering::Greater => *info == self.epoch_from_id(info.epoch_id),
        }
    }
}
