//! Data models for luapack

pub mod analysis;
pub mod config;
pub mod graph;

pub use analysis::{AnalysisReport, ImportSite, ModuleReference};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use graph::{DependencyGraph, DependencyNode};
