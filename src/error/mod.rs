//! Error handling for luapack
//!
//! This module provides the error taxonomy for the dependency engine and the
//! build orchestrator, a result alias, and context utilities.

pub mod context;
pub mod tests;
pub mod types;

pub use context::{OptionExt, ResultExt};
pub use types::{ErrorSeverity, LuapackError, Result};
