//! Port definitions for hexagonal architecture.

pub mod outbound;
