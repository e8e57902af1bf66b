//! Task board management.
//!
//! Tasks live in per-owner columns (`backlog`, `in_progress`, `done`) and
//! carry a position that stays gap-free within each column across creates,
//! moves, and deletes. Progress is derived from the task checklist. The
//! module follows hexagonal architecture:
//!
//! - Domain types and position planners in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
