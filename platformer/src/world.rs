use std::collections::HashMap;

/// Unique identifier for an entity in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Get the underlying integer ID (useful for debugging).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// What an entity is, as far as the scene's overlap handling is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    /// Static level geometry.
    Terrain,
    Coin,
    Flag,
}

/// Registry of the scene's live entities and their kinds.
#[derive(Clone, Debug)]
pub struct World {
    next_id: u32,
    kinds: HashMap<EntityId, EntityKind>,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            kinds: HashMap::new(),
        }
    }

    /// Spawn a new entity of the given kind and return its `EntityId`.
    pub fn spawn(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.kinds.insert(id, kind);
        id
    }

    /// Despawn an entity. Returns whether it was alive.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        self.kinds.remove(&entity).is_some()
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.kinds.contains_key(&entity)
    }

    pub fn kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.kinds.get(&entity).copied()
    }

    /// Number of alive entities of a kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.kinds.values().filter(|&&k| k == kind).count()
    }

    /// Alive entities of a kind, in spawn order.
    pub fn entities_of(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut entities: Vec<EntityId> = self
            .kinds
            .iter()
            .filter(|(_, &k)| k == kind)
            .map(|(&id, _)| id)
            .collect();
        entities.sort();
        entities
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if there are no entities in the world.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_despawn_track_kinds() {
        let mut world = World::new();
        let player = world.spawn(EntityKind::Player);
        let a = world.spawn(EntityKind::Coin);
        let b = world.spawn(EntityKind::Coin);

        assert_eq!(world.kind(player), Some(EntityKind::Player));
        assert_eq!(world.entities_of(EntityKind::Coin), vec![a, b]);

        assert!(world.despawn(a));
        assert!(!world.despawn(a));
        assert!(!world.is_alive(a));
        assert_eq!(world.count(EntityKind::Coin), 1);
        assert_eq!(world.len(), 2);
    }
}
