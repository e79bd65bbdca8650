//! Calls into on-chain system contracts.
//!
//! A [`BoundMethod`] performs the encode, invoke and decode round trip against a
//! contract whose address is either fixed or looked up in the [`Registry`].

mod error;
mod method;
mod metrics;
pub mod registry;

pub use error::ContractCallError;
pub use method::{AddressResolver, BoundMethod, CallOutput, Method};
pub use metrics::{SystemContractMetrics, CALL_DURATION_SECONDS};
pub use registry::{registry_id, resolve_registered_address, Registry, RegistryId};
