//! MAP mainnet parameters.
use super::{relayer_system_address, ChainParams, ContractParams, EpochParams};

/// Mainnet never ran a legacy chain, so the first fixed-length epoch starts at height 1.
pub fn map_mainnet() -> ChainParams {
    ChainParams {
        epochs: EpochParams {
            fork_point: 0,
            epoch_length: 20_000,
            first_new_epoch_id: 1,
            max_redeem_height: 1_000,
        },
        contracts: ContractParams::default(),
        relayer_address: relayer_system_address(),
    }
}
