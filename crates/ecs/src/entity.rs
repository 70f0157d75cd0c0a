use crate::body::PhysicsBody;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use voxelkit_kernel::{VisualSink, VoxelWorld};

/// Identifier for an entity in an `EntityStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// What an entity is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Creature { hp: f32, max_hp: f32, attack: f32 },
    /// Static scenery; never has a body unless one is attached explicitly.
    Prop,
}

impl EntityKind {
    pub fn creature(max_hp: f32, attack: f32) -> Self {
        Self::Creature {
            hp: max_hp,
            max_hp,
            attack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec3,
    /// Present for entities that fall and land.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Reduce hit points, never below zero. Returns true if this blow was fatal.
    /// Non-creatures ignore damage.
    pub fn damage(&mut self, amount: f32) -> bool {
        match &mut self.kind {
            EntityKind::Creature { hp, .. } => {
                let was_alive = *hp > 0.0;
                *hp = (*hp - amount).max(0.0);
                was_alive && *hp == 0.0
            }
            _ => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        match self.kind {
            EntityKind::Creature { hp, .. } => hp > 0.0,
            _ => true,
        }
    }
}

/// Tagged-variant entity collection.
///
/// Physics is a capability: `step_physics` touches exactly the entities that
/// carry a `PhysicsBody`, whatever their kind.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        kind: EntityKind,
        position: Vec3,
        body: Option<PhysicsBody>,
    ) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        tracing::debug!(?id, ?kind, "entity spawned");
        self.entities.insert(id, Entity { kind, position, body });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    /// Advance every body-carrying entity by one tick of gravity and landing.
    pub fn step_physics<S: VisualSink>(&mut self, world: &VoxelWorld<S>, gravity: f32, dt: f32) {
        for entity in self.entities.values_mut() {
            if let Some(body) = entity.body.as_mut() {
                entity.position = body.step(entity.position, world, gravity, dt);
            }
        }
    }

    /// Remove creatures whose hit points reached zero. Returns how many were removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, e| e.is_alive());
        before - self.entities.len()
    }
}
