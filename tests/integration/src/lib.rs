//! Integration tests for the Palisade loading pipeline
//!
//! This test suite validates:
//! - Trust-domain sharing across modules, origins, and threads
//! - Single-flight domain construction under concurrent definition storms
//! - Policy-hook failures, retries, and cache reset behavior
//! - The loader entry points end to end against a table-backed policy



#[cfg(test)]
mod secure_loader_tests;
