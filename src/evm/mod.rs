//! Narrow interface to the EVM that executes system-contract calls.
//!
//! The interpreter itself lives outside this crate; everything here only issues
//! calls through [`EvmRunner`] and classifies what comes back.

use alloy_primitives::{Address, Bytes, U256};
use auto_impl::auto_impl;

mod metering;

pub use metering::MeteringPause;

/// Executes contract calls against the current state with a bounded gas budget.
///
/// Implementations must keep gas metering nested correctly: this crate only ever
/// calls [`EvmRunner::stop_gas_metering`] and [`EvmRunner::start_gas_metering`] in
/// matched pairs (see [`MeteringPause`]).
#[auto_impl(&mut, Box)]
pub trait EvmRunner {
    /// Runs a state-mutating call, transferring `value` to `to`.
    fn execute(
        &mut self,
        to: Address,
        input: Bytes,
        gas_limit: u64,
        value: U256,
    ) -> Result<Bytes, EvmError>;

    /// Runs a read-only call. State changes made by the callee are discarded.
    fn query(&mut self, to: Address, input: Bytes, gas_limit: u64) -> Result<Bytes, EvmError>;

    /// Stops charging gas to the running transaction.
    fn stop_gas_metering(&mut self);

    /// Resumes charging gas to the running transaction.
    fn start_gas_metering(&mut self);
}

/// Failure reported by an [`EvmRunner`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvmError {
    /// The callee executed `REVERT`; carries the raw return data.
    #[error("execution reverted")]
    ExecutionReverted(Bytes),
    /// The gas ceiling was exhausted.
    #[error("out of gas")]
    OutOfGas,
    /// Any other interpreter failure.
    #[error("{0}")]
    Other(String),
}

impl EvmError {
    /// Raw output returned alongside the failure, empty unless the call reverted.
    pub fn output(&self) -> &[u8] {
        match self {
            Self::ExecutionReverted(output) => &output[..],
            _ => &[],
        }
    }

    /// Best-effort decoding of a Solidity revert reason. Never fails: undecodable
    /// data simply yields `None`.
    pub fn revert_reason(&self) -> Option<String> {
        let output = self.output();
        if output.is_empty() {
            return None;
        }
        alloy_sol_types::decode_revert_reason(output)
    }

    /// Returns `true` if the callee reverted.
    pub const fn is_reverted(&self) -> bool {
        matches!(self, Self::ExecutionReverted(_))
    }
}
