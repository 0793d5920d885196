//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered) so that iteration over ID-keyed maps roughly follows
//! creation order.
//!
//! Social structures (relationships, crews, conga lines) key off these
//! handles rather than references, so removing a dancer invalidates every
//! structure that mentions it without any dangling-pointer hazard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a dancer on the floor.
    DancerId
}

define_id! {
    /// Unique identifier for a dance move in the global catalog.
    MoveId
}

define_id! {
    /// Unique identifier for a transient dance group.
    GroupId
}

define_id! {
    /// Unique identifier for a conga line.
    CongaLineId
}

define_id! {
    /// Unique identifier for a persistent dance crew.
    CrewId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = DancerId::new();
        let b = DancerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = MoveId::new();
        assert_eq!(format!("{id}"), format!("{}", id.into_inner()));
    }

    #[test]
    fn round_trips_through_uuid() {
        let id = GroupId::new();
        let raw: Uuid = id.into();
        assert_eq!(GroupId::from(raw), id);
    }
}
