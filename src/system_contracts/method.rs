use super::{error::ContractCallError, metrics::SystemContractMetrics, Registry, RegistryId};
use crate::evm::EvmRunner;
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, B256, U256};
use std::sync::Arc;
use tracing::{error, trace};

/// Destination for decoded return values.
///
/// Implemented for the common single-value Solidity return types, which take the
/// first return value, for `Vec<DynSolValue>`, which takes all of them, and for `()`,
/// which discards the output without decoding it.
pub trait CallOutput {
    /// Whether the output should be decoded at all.
    fn wants_output(&self) -> bool {
        true
    }

    /// Writes the decoded values into `self`.
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String>;
}

impl CallOutput for () {
    fn wants_output(&self) -> bool {
        false
    }

    fn store(&mut self, _values: Vec<DynSolValue>) -> Result<(), String> {
        Ok(())
    }
}

impl CallOutput for Vec<DynSolValue> {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        *self = values;
        Ok(())
    }
}

impl CallOutput for DynSolValue {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        *self = first(values)?;
        Ok(())
    }
}

impl CallOutput for Address {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        *self = value.as_address().ok_or_else(|| mismatch("address", &value))?;
        Ok(())
    }
}

impl CallOutput for U256 {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        *self = value.as_uint().map(|(v, _)| v).ok_or_else(|| mismatch("uint", &value))?;
        Ok(())
    }
}

impl CallOutput for u64 {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        let wide = value.as_uint().map(|(v, _)| v).ok_or_else(|| mismatch("uint", &value))?;
        *self = u64::try_from(wide).map_err(|_| format!("value {wide} overflows u64"))?;
        Ok(())
    }
}

impl CallOutput for bool {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        *self = value.as_bool().ok_or_else(|| mismatch("bool", &value))?;
        Ok(())
    }
}

impl CallOutput for B256 {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        match value.as_fixed_bytes() {
            Some((word, 32)) => *self = B256::from_slice(word),
            _ => return Err(mismatch("bytes32", &value)),
        }
        Ok(())
    }
}

impl CallOutput for Bytes {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        *self = value.as_bytes().map(Bytes::copy_from_slice).ok_or_else(|| mismatch("bytes", &value))?;
        Ok(())
    }
}

impl CallOutput for String {
    fn store(&mut self, values: Vec<DynSolValue>) -> Result<(), String> {
        let value = first(values)?;
        *self = value.as_str().map(str::to_string).ok_or_else(|| mismatch("string", &value))?;
        Ok(())
    }
}

fn first(values: Vec<DynSolValue>) -> Result<DynSolValue, String> {
    values.into_iter().next().ok_or_else(|| "method returned no values".to_string())
}

fn mismatch(expected: &str, got: &DynSolValue) -> String {
    format!("expected {expected}, got {got:?}")
}

/// A contract method: ABI descriptor, method name and gas ceiling.
#[derive(Debug, Clone)]
pub struct Method {
    abi: Arc<JsonAbi>,
    name: String,
    max_gas: u64,
}

impl Method {
    pub fn new(abi: Arc<JsonAbi>, name: impl Into<String>, max_gas: u64) -> Self {
        Self { abi, name: name.into(), max_gas }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn max_gas(&self) -> u64 {
        self.max_gas
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Binds the method to a fixed contract address.
    pub fn bind(self, contract: Address) -> BoundMethod {
        BoundMethod::with_resolver(self, AddressResolver::Constant(contract))
    }

    /// Picks the overload taking `arity` arguments, falling back to the first one
    /// so that a bad argument list surfaces as an encoding error.
    fn function(&self, arity: usize) -> Result<&Function, ContractCallError> {
        let overloads = self
            .abi
            .function(&self.name)
            .ok_or_else(|| ContractCallError::UnknownMethod { method: self.name.clone() })?;
        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .or_else(|| overloads.first())
            .ok_or_else(|| ContractCallError::UnknownMethod { method: self.name.clone() })
    }

    /// ABI-encodes a call (selector plus arguments).
    pub fn encode_call(&self, args: &[DynSolValue]) -> Result<Bytes, ContractCallError> {
        let function = self.function(args.len())?;
        self.encode_with(function, args)
    }

    fn encode_with(&self, function: &Function, args: &[DynSolValue]) -> Result<Bytes, ContractCallError> {
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|source| ContractCallError::Encoding { method: self.name.clone(), source })
    }

    /// Decodes `output` and writes it through `result`.
    fn decode_with<T: CallOutput + ?Sized>(
        &self,
        function: &Function,
        result: &mut T,
        output: &[u8],
    ) -> Result<(), ContractCallError> {
        if !result.wants_output() {
            return Ok(());
        }
        if output.is_empty() && !function.outputs.is_empty() {
            return Err(ContractCallError::EmptyOutput { method: self.name.clone() });
        }
        let values = function.abi_decode_output(output).map_err(|err| {
            ContractCallError::Decoding { method: self.name.clone(), reason: err.to_string() }
        })?;
        result
            .store(values)
            .map_err(|reason| ContractCallError::Decoding { method: self.name.clone(), reason })
    }
}

/// How a [`BoundMethod`] finds its target address.
#[derive(Debug, Clone)]
pub enum AddressResolver {
    /// A fixed address.
    Constant(Address),
    /// Looked up in the Registry on every call.
    Registry { registry: Arc<Registry>, id: RegistryId },
}

impl AddressResolver {
    pub fn resolve<R: EvmRunner + ?Sized>(&self, runner: &mut R) -> Result<Address, ContractCallError> {
        match self {
            Self::Constant(address) => Ok(*address),
            Self::Registry { registry, id } => registry.resolve(runner, *id),
        }
    }
}

/// A [`Method`] together with the strategy that resolves its target address.
///
/// Resolution happens on every call; addresses are never cached because Registry
/// entries can change between calls.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    method: Method,
    resolver: AddressResolver,
}

impl BoundMethod {
    /// Creates a method bound to a fixed address.
    pub fn new(contract: Address, abi: Arc<JsonAbi>, name: impl Into<String>, max_gas: u64) -> Self {
        Method::new(abi, name, max_gas).bind(contract)
    }

    /// Creates a method whose target is looked up in `registry` under `id`.
    pub fn registered(
        registry: Arc<Registry>,
        id: RegistryId,
        abi: Arc<JsonAbi>,
        name: impl Into<String>,
        max_gas: u64,
    ) -> Self {
        Self::with_resolver(Method::new(abi, name, max_gas), AddressResolver::Registry { registry, id })
    }

    pub const fn with_resolver(method: Method, resolver: AddressResolver) -> Self {
        Self { method, resolver }
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub const fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    pub fn name(&self) -> &str {
        self.method.name()
    }

    pub const fn max_gas(&self) -> u64 {
        self.method.max_gas()
    }

    /// Runs the method as a read-only call and writes the return value into `result`.
    /// Pass `&mut ()` to ignore the output.
    pub fn query<R, T>(&self, runner: &mut R, result: &mut T, args: &[DynSolValue]) -> Result<(), ContractCallError>
    where
        R: EvmRunner + ?Sized,
        T: CallOutput + ?Sized,
    {
        self.run(runner, result, true, U256::ZERO, args)
    }

    /// Runs the method as a state-mutating call transferring `value`, and writes the
    /// return value into `result`. Pass `&mut ()` if the method returns nothing.
    pub fn execute<R, T>(
        &self,
        runner: &mut R,
        result: &mut T,
        value: U256,
        args: &[DynSolValue],
    ) -> Result<(), ContractCallError>
    where
        R: EvmRunner + ?Sized,
        T: CallOutput + ?Sized,
    {
        self.run(runner, result, false, value, args)
    }

    fn run<R, T>(
        &self,
        runner: &mut R,
        result: &mut T,
        read_only: bool,
        value: U256,
        args: &[DynSolValue],
    ) -> Result<(), ContractCallError>
    where
        R: EvmRunner + ?Sized,
        T: CallOutput + ?Sized,
    {
        let _timer = SystemContractMetrics::global().start_call(self.name());

        let to = self.resolver.resolve(runner)?;
        let max_gas = self.max_gas();

        let function = self.method.function(args.len()).inspect_err(|err| {
            error!(target: "system_contracts", %to, method = self.name(), ?args, %err, "Error invoking evm function: can't encode method arguments");
        })?;
        let input = self.method.encode_with(function, args).inspect_err(|err| {
            error!(target: "system_contracts", %to, method = self.name(), ?args, %err, "Error invoking evm function: can't encode method arguments");
        })?;

        let output = if read_only {
            runner.query(to, input.clone(), max_gas)
        } else {
            runner.execute(to, input.clone(), max_gas, value)
        };

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                let reason = err.revert_reason();
                error!(
                    target: "system_contracts",
                    %to,
                    method = self.name(),
                    ?args,
                    %input,
                    maxgas = max_gas,
                    %err,
                    message = reason.as_deref().unwrap_or_default(),
                    "Error invoking evm function: EVM call failure"
                );
                return Err(ContractCallError::Execution {
                    method: self.name().to_string(),
                    reason,
                    source: err,
                });
            }
        };

        self.method.decode_with(function, result, &output).inspect_err(|err| {
            error!(target: "system_contracts", %to, method = self.name(), %err, maxgas = max_gas, "Error invoking evm function: can't unpack result");
        })?;

        trace!(target: "system_contracts", %to, method = self.name(), %input, %output, "EVM call successful");
        Ok(())
    }
}
