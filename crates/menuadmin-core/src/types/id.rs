//! Newtype wrappers around the backend's integer identifiers.
//!
//! Using distinct types prevents accidentally passing a `RoleId` where a
//! `MenuId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the raw integer value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a menu node (group, collapse, or item).
    MenuId
);

define_id!(
    /// Identifier of a role whose menu permissions are edited.
    RoleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: MenuId = " 42 ".parse().unwrap();
        assert_eq!(id, MenuId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<RoleId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&MenuId(7)).unwrap();
        assert_eq!(json, "7");
        let id: RoleId = serde_json::from_str("3").unwrap();
        assert_eq!(id, RoleId(3));
    }
}
