use alloy_primitives::U256;
use map_relayer::{EpochCalculator, EpochParams, RelayerValue};

fn calc() -> EpochCalculator {
    EpochCalculator::new(EpochParams { fork_point: 1000, epoch_length: 100, first_new_epoch_id: 1, max_redeem_height: 10 })
        .unwrap()
}

fn stake() -> RelayerValue {
    [(1, U256::from(100)), (2, U256::from(50)), (4, U256::from(25)), (9, U256::from(1))].into_iter().collect()
}

#[test]
fn unlocked_and_unlocking_partition_the_stake() {
    let calc = calc();
    let stake = stake();
    for height in (0..2_500).step_by(3) {
        let unlocked = stake.to_unlocked_value(&calc, height);
        let unlocking = stake.to_unlocking_value(&calc, height);
        assert_eq!(unlocked + unlocking, stake.total(), "height {height}");
    }
}

#[test]
fn unlocked_stake_never_shrinks() {
    let calc = calc();
    let stake = stake();
    let mut prev = U256::ZERO;
    for height in 0..2_500 {
        let unlocked = stake.to_unlocked_value(&calc, height);
        assert!(unlocked >= prev, "height {height}");
        prev = unlocked;
    }
    assert_eq!(prev, stake.total());
}

#[test]
fn bucket_unlocks_exactly_at_min_redeem_height() {
    let calc = calc();
    for eid in [1, 2, 4, 9] {
        let single: RelayerValue = [(eid, U256::from(1))].into_iter().collect();
        let min = calc.min_redeem_height(eid);
        assert_eq!(single.to_unlocked_value(&calc, min - 1), U256::ZERO, "epoch {eid}");
        assert_eq!(single.to_unlocked_value(&calc, min), U256::from(1), "epoch {eid}");
    }
}
