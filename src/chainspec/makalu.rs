//! Makalu testnet parameters.
use super::{relayer_system_address, ChainParams, ContractParams, EpochParams};

pub fn makalu_testnet() -> ChainParams {
    ChainParams {
        epochs: EpochParams {
            fork_point: 0,
            epoch_length: 1_000,
            first_new_epoch_id: 1,
            max_redeem_height: 100,
        },
        contracts: ContractParams::default(),
        relayer_address: relayer_system_address(),
    }
}
