#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, U256};
use map_relayer::{EvmError, EvmRunner};
use std::collections::HashMap;

/// One call observed by [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: Address,
    pub input: Bytes,
    pub gas_limit: u64,
    /// `None` for read-only calls.
    pub value: Option<U256>,
    /// Whether gas metering was suspended when the call was issued.
    pub metering_paused: bool,
}

/// Scripted EVM: answers by (address, selector), records every call and tracks
/// how deeply gas metering is suspended.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<(Address, [u8; 4]), Result<Bytes, EvmError>>,
    pub calls: Vec<RecordedCall>,
    pub paused_depth: u32,
    pub pause_count: u32,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for calls to `to` with `selector`. Unscripted calls return
    /// empty output, as a call to an address without code does.
    pub fn respond(&mut self, to: Address, selector: [u8; 4], response: Result<Bytes, EvmError>) {
        self.responses.insert((to, selector), response);
    }

    fn answer(&mut self, to: Address, input: Bytes, gas_limit: u64, value: Option<U256>) -> Result<Bytes, EvmError> {
        let selector = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok()).unwrap_or_default();
        self.calls.push(RecordedCall { to, input, gas_limit, value, metering_paused: self.paused_depth > 0 });
        self.responses.get(&(to, selector)).cloned().unwrap_or_else(|| Ok(Bytes::new()))
    }
}

impl EvmRunner for MockRunner {
    fn execute(&mut self, to: Address, input: Bytes, gas_limit: u64, value: U256) -> Result<Bytes, EvmError> {
        self.answer(to, input, gas_limit, Some(value))
    }

    fn query(&mut self, to: Address, input: Bytes, gas_limit: u64) -> Result<Bytes, EvmError> {
        self.answer(to, input, gas_limit, None)
    }

    fn stop_gas_metering(&mut self) {
        self.paused_depth += 1;
        self.pause_count += 1;
    }

    fn start_gas_metering(&mut self) {
        assert!(self.paused_depth > 0, "metering resumed without a matching pause");
        self.paused_depth -= 1;
    }
}
