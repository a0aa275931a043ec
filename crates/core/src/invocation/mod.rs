//! Analyzer invocation.
//!
//! [`executor::AnalysisInvoker`] is the seam between the request handler and
//! the external analyzer. [`process::ProcessInvoker`] runs the real binary;
//! the spawn, capture and timeout logic lives in [`subprocess`].

pub mod executor;
pub mod process;
pub mod subprocess;

pub use executor::{AnalysisInvoker, InvocationRequest, InvocationResult, InvokeError};
pub use process::ProcessInvoker;
