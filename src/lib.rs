//! Taskboard: a multi-user kanban task board service.
//!
//! Each user owns a board of three columns. Within a column, task positions
//! are always numbered `0..N-1`; every create, move, and delete renumbers
//! the affected neighbours in the same atomic write.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, ordering, progress, and the board service
//! - [`http`]: JSON API over the board service
//! - [`config`]: Layered server configuration

pub mod config;
pub mod http;
pub mod task;
