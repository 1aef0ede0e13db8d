//! INI file manipulation keywords for keyword-driven test automation hosts.
//!
//! The crate is a thin adapter: [`store::IniStore`] holds at most one parsed
//! INI document, and the [`keywords`] module publishes every store operation
//! under the action name a test-orchestration host invokes it by. Parsing and
//! serialization are delegated to the `configparser` crate.

pub mod keywords;
pub mod store;
pub mod utils;

// Re-export the main entry points for easier access
pub use keywords::{run_keyword, Keyword, KeywordError, KeywordValue};
pub use store::{IniStore, StoreError};
