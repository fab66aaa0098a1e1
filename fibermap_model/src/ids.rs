// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed identifiers for backend records.
//!
//! Every record the backend persists carries an integer primary key. Wrapping
//! each key in its own newtype keeps an object id from being passed where a
//! cable id is expected. All ids serialize as the bare integer.

use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw backend key.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw backend key.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

typed_id!(
    /// Identity of a [`NetworkObject`](crate::NetworkObject).
    ObjectId
);
typed_id!(
    /// Identity of a [`Cable`](crate::Cable).
    CableId
);
typed_id!(
    /// Identity of a [`FiberSplice`](crate::FiberSplice).
    SpliceId
);
typed_id!(
    /// Identity of a [`Region`](crate::Region).
    RegionId
);
typed_id!(
    /// Identity of a row in the cable-type reference table.
    CableTypeId
);
