//! Relayer epoch economics: epoch boundaries, stake locking and reward
//! bookkeeping. Everything here is pure computation over [`EpochParams`].
//!
//! [`EpochParams`]: crate::chainspec::EpochParams

mod balance;
mod epoch;
mod error;
mod lock;
mod reward;
mod summary;
pub mod util;

pub use balance::{to_balance_infos, BalanceInfo, BlockBalance};
pub use epoch::{EpochCalculator, EpochIdInfo, MAX_EPOCH_RANGE};
pub use error::StakingError;
pub use lock::RelayerValue;
pub use reward::{
    fetch_by_address, merge_reward_infos, merge_reward_maps, to_relayer_reward_infos,
    to_reward_infos, ChainReward, RewardInfo, RewardInfos, TimedChainReward,
};
pub use summary::{RegisterSummary, SummaryEpochInfo};
pub use util::{copy_vote_pk, forbid_address, rlp_hash, valid_pk};
