//! Core functionality for the Palisade secure module-loading system.
//!
//! This crate provides the configuration, logging, and error plumbing used
//! across the Palisade workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CacheSection, Config, LoaderSection};
pub use error::{Error, Result};
