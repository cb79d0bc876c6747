use glam::Mat4;
use std::collections::HashMap;
use std::hash::Hash;

use super::info::CollisionInfo;
use super::pair::PairwiseCollision;
use crate::error::CollisionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    Entered,
    Staying,
    Exited,
}

/// Turns per-frame contact flags into enter/stay/exit transitions, one
/// flag per tracked pair.
#[derive(Debug, Clone)]
pub struct CollisionTracker<K> {
    colliding: HashMap<K, bool>,
}

impl<K> Default for CollisionTracker<K> {
    fn default() -> Self {
        Self {
            colliding: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> CollisionTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records this frame's flag for `key`. No event while the pair stays apart.
    pub fn update(&mut self, key: K, colliding: bool) -> Option<CollisionEvent> {
        let was = self.colliding.insert(key, colliding).unwrap_or(false);
        match (was, colliding) {
            (false, true) => Some(CollisionEvent::Entered),
            (true, true) => Some(CollisionEvent::Staying),
            (true, false) => Some(CollisionEvent::Exited),
            (false, false) => None,
        }
    }

    /// Runs the cheap test and, on contact, the full per-edge test into
    /// `info`, then records the result for `key`. Without contact `info` is
    /// emptied.
    pub fn observe<C: PairwiseCollision + ?Sized>(
        &mut self,
        key: K,
        pair: &C,
        primary: &Mat4,
        secondary: &Mat4,
        info: &mut CollisionInfo,
    ) -> CollisionResult<Option<CollisionEvent>> {
        let hit = pair.check_collision(primary, secondary)?;
        if hit {
            pair.full_collision(primary, secondary, info)?;
        } else {
            info.clear();
        }
        Ok(self.update(key, hit))
    }

    pub fn is_colliding(&self, key: &K) -> bool {
        self.colliding.get(key).copied().unwrap_or(false)
    }

    pub fn forget(&mut self, key: &K) {
        self.colliding.remove(key);
    }

    pub fn len(&self) -> usize {
        self.colliding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliding.is_empty()
    }
}
