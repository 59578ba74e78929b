//! Errors raised by the entity/component container.

use thiserror::Error;

use super::entity::Entity;
use super::group::Group;

/// Everything that can go wrong when talking to a [`Registry`](super::Registry).
///
/// Capacity errors are configuration problems: the panicking API
/// (`add_component`, `add_group`) fails fast on them, the `try_` variants hand
/// them back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("component type limit reached: at most {max} component types per registry")]
    ComponentCapacity { max: usize },

    #[error("group {group} is out of range: at most {max} groups per registry")]
    GroupCapacity { group: Group, max: usize },

    #[error("entity {entity} has no `{component}` component")]
    ComponentNotFound {
        component: &'static str,
        entity: Entity,
    },

    #[error("entity {0} does not exist or has been removed")]
    EntityNotFound(Entity),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::EntityAllocator;

    #[test]
    fn messages_name_the_offending_thing() {
        let entity = EntityAllocator::new().allocate();
        let err = EcsError::ComponentNotFound {
            component: "Transform",
            entity,
        };
        assert_eq!(err.to_string(), "entity 0v0 has no `Transform` component");

        let err = EcsError::GroupCapacity {
            group: Group::new(40),
            max: 32,
        };
        assert!(err.to_string().contains("group 40"));
    }
}
