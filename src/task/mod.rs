//! Task review workflow.
//!
//! Pelaksana users submit tasks to a leader, who approves them or sends them
//! back for revision. Approved tasks then collect progress reports until they
//! complete, and every transition leaves a history entry. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
