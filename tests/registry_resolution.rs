mod common;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_macro::sol;
use alloy_sol_types::{SolCall, SolValue};
use common::MockRunner;
use map_relayer::{
    chainspec::{ContractParams, REGISTRY_CONTRACT_ADDRESS},
    system_contracts::{
        registry::{ELECTION_REGISTRY_ID, VALIDATORS_REGISTRY_ID},
        resolve_registered_address, ContractCallError, Registry,
    },
    EvmError,
};
use std::sync::Arc;

sol! {
    function getAddressFor(bytes32 identifier) external view returns (address);
    function balanceOf(address owner) external view returns (uint256);
}

const VALIDATORS: Address = address!("000000000000000000000000000000000000d011");

fn registry_returns(runner: &mut MockRunner, response: Result<Bytes, EvmError>) {
    runner.respond(REGISTRY_CONTRACT_ADDRESS, getAddressForCall::SELECTOR, response);
}

fn encoded(addr: Address) -> Result<Bytes, EvmError> {
    Ok(addr.abi_encode().into())
}

#[test]
fn resolves_registered_address_with_metering_paused() {
    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(VALIDATORS));

    let params = ContractParams::default();
    let resolved = resolve_registered_address(&mut runner, &params, *VALIDATORS_REGISTRY_ID).unwrap();
    assert_eq!(resolved, VALIDATORS);

    assert_eq!(runner.calls.len(), 1);
    let call = &runner.calls[0];
    assert_eq!(call.to, REGISTRY_CONTRACT_ADDRESS);
    assert_eq!(call.gas_limit, params.max_gas_for_get_address_for);
    assert_eq!(call.value, None);
    assert!(call.metering_paused);
    let expected = getAddressForCall { identifier: *VALIDATORS_REGISTRY_ID }.abi_encode();
    assert_eq!(call.input[..], expected[..]);
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn empty_registry_output_means_registry_not_deployed() {
    let mut runner = MockRunner::new();
    let err = resolve_registered_address(&mut runner, &ContractParams::default(), *VALIDATORS_REGISTRY_ID)
        .unwrap_err();
    assert!(matches!(err, ContractCallError::RegistryContractNotDeployed));
    assert!(err.is_address_resolution());
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn reverted_registry_means_registry_not_deployed() {
    let mut runner = MockRunner::new();
    registry_returns(&mut runner, Err(EvmError::ExecutionReverted(Bytes::new())));
    let err = resolve_registered_address(&mut runner, &ContractParams::default(), *ELECTION_REGISTRY_ID)
        .unwrap_err();
    assert!(matches!(err, ContractCallError::RegistryContractNotDeployed));
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn zero_entry_means_system_contract_not_deployed() {
    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(Address::ZERO));
    let err = resolve_registered_address(&mut runner, &ContractParams::default(), *ELECTION_REGISTRY_ID)
        .unwrap_err();
    assert!(matches!(err, ContractCallError::SystemContractNotDeployed));
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn other_registry_failures_are_propagated() {
    let mut runner = MockRunner::new();
    registry_returns(&mut runner, Err(EvmError::OutOfGas));
    let err = resolve_registered_address(&mut runner, &ContractParams::default(), *ELECTION_REGISTRY_ID)
        .unwrap_err();
    assert_eq!(err.evm_error(), Some(&EvmError::OutOfGas));
    assert!(!err.is_address_resolution());
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn custom_registry_address_is_honoured() {
    let params = ContractParams { registry_address: Address::repeat_byte(0xee), max_gas_for_get_address_for: 7 };
    let mut runner = MockRunner::new();
    runner.respond(params.registry_address, getAddressForCall::SELECTOR, encoded(VALIDATORS));

    assert_eq!(resolve_registered_address(&mut runner, &params, *VALIDATORS_REGISTRY_ID).unwrap(), VALIDATORS);
    assert_eq!(runner.calls[0].gas_limit, 7);
}

fn validators_abi() -> Arc<JsonAbi> {
    Arc::new(JsonAbi::parse(["function balanceOf(address owner) external view returns (uint256)"]).unwrap())
}

#[test]
fn registered_method_resolves_then_calls_with_metering_on() {
    let registry = Arc::new(Registry::new(&ContractParams::default()));
    let balance_of = registry.bind(*VALIDATORS_REGISTRY_ID, validators_abi(), "balanceOf", 50_000);

    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(VALIDATORS));
    runner.respond(VALIDATORS, balanceOfCall::SELECTOR, Ok(U256::from(77).abi_encode().into()));

    let owner = Address::repeat_byte(0x0a);
    let mut balance = U256::ZERO;
    balance_of.query(&mut runner, &mut balance, &[DynSolValue::Address(owner)]).unwrap();
    assert_eq!(balance, U256::from(77));

    assert_eq!(runner.calls.len(), 2);
    assert!(runner.calls[0].metering_paused);
    let target = &runner.calls[1];
    assert_eq!(target.to, VALIDATORS);
    assert_eq!(target.gas_limit, 50_000);
    assert!(!target.metering_paused);
    assert_eq!(target.input[..], balanceOfCall { owner }.abi_encode()[..]);
    assert_eq!(runner.pause_count, 1);
    assert_eq!(runner.paused_depth, 0);
}

#[test]
fn registered_method_never_caches_the_address() {
    let registry = Arc::new(Registry::new(&ContractParams::default()));
    let balance_of = registry.bind(*VALIDATORS_REGISTRY_ID, validators_abi(), "balanceOf", 50_000);
    let upgraded = Address::repeat_byte(0x42);

    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(VALIDATORS));
    balance_of.query(&mut runner, &mut (), &[DynSolValue::Address(Address::ZERO)]).unwrap();

    registry_returns(&mut runner, encoded(upgraded));
    balance_of.query(&mut runner, &mut (), &[DynSolValue::Address(Address::ZERO)]).unwrap();

    let targets: Vec<_> = runner.calls.iter().filter(|c| !c.metering_paused).map(|c| c.to).collect();
    assert_eq!(targets, vec![VALIDATORS, upgraded]);
    assert_eq!(runner.pause_count, 2);
}

#[test]
fn failed_resolution_skips_the_target_call() {
    let registry = Arc::new(Registry::new(&ContractParams::default()));
    let balance_of = registry.bind(*VALIDATORS_REGISTRY_ID, validators_abi(), "balanceOf", 50_000);

    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(Address::ZERO));
    let mut balance = U256::from(5);
    let err = balance_of.query(&mut runner, &mut balance, &[DynSolValue::Address(Address::ZERO)]).unwrap_err();

    assert!(matches!(err, ContractCallError::SystemContractNotDeployed));
    assert_eq!(runner.calls.len(), 1);
    assert_eq!(balance, U256::from(5));
}

#[test]
fn revert_reason_is_decoded_for_the_caller() {
    let registry = Arc::new(Registry::new(&ContractParams::default()));
    let balance_of = registry.bind(*VALIDATORS_REGISTRY_ID, validators_abi(), "balanceOf", 50_000);
    let revert = alloy_sol_types::Revert { reason: "not a validator".to_string() };

    let mut runner = MockRunner::new();
    registry_returns(&mut runner, encoded(VALIDATORS));
    runner.respond(
        VALIDATORS,
        balanceOfCall::SELECTOR,
        Err(EvmError::ExecutionReverted(alloy_sol_types::SolError::abi_encode(&revert).into())),
    );

    let mut balance = U256::ZERO;
    let err = balance_of.query(&mut runner, &mut balance, &[DynSolValue::Address(Address::ZERO)]).unwrap_err();
    match err {
        ContractCallError::Execution { reason, source, .. } => {
            assert!(reason.unwrap().contains("not a validator"));
            assert!(source.is_reverted());
        }
        other => panic!("unexpected error: {other}"),
    }
}
