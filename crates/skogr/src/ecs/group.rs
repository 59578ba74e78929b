//! Group tags.
//!
//! A [`Group`] is a small integer naming a role ("map tile", "monster",
//! "projectile"). Games usually define an enum of roles and convert it with
//! `From`, see [`Role`](crate::role::Role).

use std::fmt;

/// A role tag, bounded by the registry's `max_groups`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(usize);

impl Group {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
