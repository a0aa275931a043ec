//! Domain logic for the Markov graph analyzer web front-end.
//!
//! A submission flows through [`resolver::InputResolver`] (graph data to a
//! file path), [`arguments::ArgumentBuilder`] (options to argv) and an
//! [`invocation::AnalysisInvoker`] (runs the analyzer). [`handler::RequestHandler`]
//! ties them together and guarantees temporary files are removed.

pub mod arguments;
pub mod defaults;
pub mod error;
pub mod handler;
pub mod invocation;
pub mod resolver;
pub mod submission;
