//! Opaque ID newtypes for routing-resource graph entities.
//!
//! [`NodeId`] is the primary key of a node in the routing-resource graph and
//! [`NetIndex`] is a net's serial position in a routing solution. Both are
//! thin `u32` wrappers that are `Copy`, `Ord`, `Hash`, and
//! `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` value.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw `u32` value.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Unique id of a node within one routing-resource graph instance.
    NodeId
);

define_id!(
    /// Serial index of a net within a routing solution.
    ///
    /// Distinct from the net's symbolic name, which the router may renumber
    /// independently of solution order.
    NetIndex
);
