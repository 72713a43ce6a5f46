pub mod audit;
pub mod catalog;
pub mod config;
pub mod core;
pub mod language;
pub mod parser;
pub mod pricing;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod runtime;
pub mod transport;
pub mod validity;

#[cfg(test)]
mod test_support;

pub use crate::core::types::*;
pub use providers::LlmTranslator;
pub use runtime::{TranslationRuntime, TranslationRuntimeBuilder};
