//! Task review workflow service.
//!
//! Workers (pelaksana) submit tasks to a leader, who approves them or sends
//! them back for revision. Approved tasks collect progress reports until they
//! complete, and managers oversee approved work. Every transition is
//! role-gated and leaves an append-only history entry.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and credentials
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration over injected ports
//!
//! # Modules
//!
//! - [`identity`]: Users, roles, access policies, login, and tokens
//! - [`task`]: The task status workflow and its audit trail
//! - [`api`]: axum router, access gate, and handlers
//! - [`config`]: Settings from flags and environment
//! - [`server`]: Bootstrap and graceful shutdown

pub mod api;
pub mod config;
pub mod identity;
pub mod server;
pub mod task;
