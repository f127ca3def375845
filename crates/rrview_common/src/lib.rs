//! Shared foundational types used across the rrview workspace.
//!
//! This crate provides the id newtypes that every other crate keys its
//! lookups on, the floating-point [`Position`] produced by the coordinate
//! mapper, and the internal error type for invariant violations.

#![warn(missing_docs)]

pub mod ids;
pub mod position;
pub mod result;

pub use ids::{NetIndex, NodeId};
pub use position::Position;
pub use result::{InternalError, RrvResult};
