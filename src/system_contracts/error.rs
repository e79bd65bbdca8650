use crate::evm::EvmError;

/// Errors returned by [`BoundMethod`](super::BoundMethod) calls and registry lookups.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ContractCallError {
    /// The Registry has no implementation behind it yet.
    #[error("registry contract not deployed")]
    RegistryContractNotDeployed,

    /// The Registry is live but the requested entry is still the zero address.
    #[error("system contract not deployed")]
    SystemContractNotDeployed,

    /// The ABI descriptor has no function with the bound name.
    #[error("method `{method}` not found in contract ABI")]
    UnknownMethod { method: String },

    /// Call arguments don't match the method signature.
    #[error("can't encode arguments for `{method}`: {source}")]
    Encoding {
        method: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// The EVM call failed. `reason` holds the decoded revert message when there is one.
    #[error("evm call to `{method}` failed: {source}")]
    Execution {
        method: String,
        reason: Option<String>,
        #[source]
        source: EvmError,
    },

    /// The call succeeded but returned no data where return values were expected.
    #[error("attempting to unpack empty output of `{method}`")]
    EmptyOutput { method: String },

    /// The returned data could not be decoded into the requested result.
    #[error("can't unpack output of `{method}`: {reason}")]
    Decoding { method: String, reason: String },
}

impl ContractCallError {
    /// Returns `true` for failures that happen before any target call is made.
    pub const fn is_address_resolution(&self) -> bool {
        matches!(self, Self::RegistryContractNotDeployed | Self::SystemContractNotDeployed)
    }

    /// The underlying EVM failure, if the call reached the interpreter.
    pub const fn evm_error(&self) -> Option<&EvmError> {
        match self {
            Self::Execution { source, .. } => Some(source),
            _ => None,
        }
    }
}
