//! Runtime configuration files (config/*.json) and their env overrides.

pub mod classifier;

pub use classifier::ClassifierConfig;
