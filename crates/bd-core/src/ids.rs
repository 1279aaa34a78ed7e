//! Identifier newtypes for the two indexed populations.
//!
//! Ids are dense: agent `n` lives at index `n` of every `AgentStore` column,
//! site `n` at index `n` of every `SiteField` column.  Neither population
//! ever reuses an id within a run.

use std::fmt;

/// Generate a dense `u32` id newtype with a short display prefix.
macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident, $prefix:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Marks an empty slot in dense per-cell tables.
            pub const INVALID: $name = $name(u32::MAX);

            /// Id for column index `i`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize);
                $name(i as u32)
            }

            /// Column index for SoA lookups.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

dense_id! {
    /// A mobile agent: offender or patrol.
    AgentId, "agent"
}

dense_id! {
    /// A residential site.
    SiteId, "site"
}

/// The two mobile agent populations.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    Offender,
    Patrol,
}

impl AgentKind {
    /// Lower-case word used in logs and output rows.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Offender => "offender",
            AgentKind::Patrol   => "patrol",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
