//! The groups the arena scene sorts its entities into.

use serde::{Deserialize, Serialize};

use crate::ecs::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    MapBackground,
    Map,
    MapFx,
    Player,
    Monster,
    TerrainCollider,
    Projectile,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::MapBackground,
        Role::Map,
        Role::MapFx,
        Role::Player,
        Role::Monster,
        Role::TerrainCollider,
        Role::Projectile,
    ];

    /// Back to front. Terrain colliders are only drawn when debugging.
    pub const RENDER_ORDER: [Role; 6] = [
        Role::MapBackground,
        Role::Map,
        Role::Projectile,
        Role::Player,
        Role::Monster,
        Role::MapFx,
    ];
}

impl From<Role> for Group {
    fn from(role: Role) -> Self {
        Group::new(role as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_distinct_groups() {
        let groups: std::collections::HashSet<Group> =
            Role::ALL.iter().map(|&r| Group::from(r)).collect();
        assert_eq!(groups.len(), Role::ALL.len());
        assert!(groups.iter().all(|g| g.index() < 32));
    }
}
