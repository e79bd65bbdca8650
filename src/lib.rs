pub mod chainspec;
pub mod cli;
pub mod evm;
pub mod staking;
pub mod system_contracts;

pub use chainspec::{ChainParams, ContractParams, EpochParams};
pub use evm::{EvmError, EvmRunner, MeteringPause};
pub use staking::{
    ChainReward, EpochCalculator, EpochIdInfo, RelayerValue, RewardInfo, RewardInfos, StakingError,
};
pub use system_contracts::{
    AddressResolver, BoundMethod, ContractCallError, Method, Registry, RegistryId,
};
