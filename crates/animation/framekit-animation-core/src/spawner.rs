//! Prefab spawning backed by a [`Pool`].
//!
//! Despawned objects leave the scene and wait, inactive, in the pool; the
//! next spawn reuses them under a fresh [`ObjectId`]. Objects removed with
//! [`Scene::destroy`] instead of [`Spawner::despawn`] are not returned to the
//! pool; call [`Spawner::forget`] or [`Spawner::reconcile`] so the spawner
//! stops counting them as live.

use std::convert::Infallible;

use hashbrown::HashSet;

use framekit_core::{Config, Factory, Pool};

use crate::ids::ObjectId;
use crate::math::{Quat, Vec3};
use crate::scene::{Scene, SceneObject};

/// Clones an inactive copy of a prefab object.
#[derive(Clone, Debug)]
pub struct PrefabFactory {
    prefab: SceneObject,
}

impl PrefabFactory {
    pub fn new(prefab: SceneObject) -> Self {
        Self { prefab }
    }

    pub fn prefab(&self) -> &SceneObject {
        &self.prefab
    }
}

impl Factory<SceneObject> for PrefabFactory {
    type Error = Infallible;

    fn create(&mut self) -> Result<SceneObject, Infallible> {
        let mut object = self.prefab.clone();
        object.active = false;
        Ok(object)
    }
}

#[derive(Debug)]
pub struct Spawner {
    pool: Pool<SceneObject, PrefabFactory>,
    live: HashSet<ObjectId>,
}

impl Spawner {
    pub fn new(prefab: SceneObject) -> Self {
        Self::with_config(prefab, &Config::default())
    }

    pub fn with_config(prefab: SceneObject, config: &Config) -> Self {
        Self {
            pool: Pool::with_capacity(PrefabFactory::new(prefab), config.pool_capacity),
            live: HashSet::new(),
        }
    }

    /// Create `count` idle instances ahead of time.
    pub fn prewarm(&mut self, count: usize) {
        if let Err(never) = self.pool.prewarm(count) {
            match never {}
        }
    }

    /// Take a pooled instance, place it, activate it and add it to `scene`.
    pub fn spawn(&mut self, scene: &mut Scene, position: Vec3, rotation: Quat) -> ObjectId {
        let mut object = match self.pool.retrieve() {
            Ok(object) => object,
            Err(never) => match never {},
        };
        object.transform.position = position;
        object.transform.rotation = rotation;
        object.transform.scale = self.pool.factory().prefab().transform.scale;
        object.animation_data = None;
        object.active = true;
        let id = scene.insert(object);
        self.live.insert(id);
        id
    }

    /// Stop the object's tasks, take it out of `scene` and return it to the
    /// pool. Ids this spawner did not hand out are left alone.
    pub fn despawn(&mut self, scene: &mut Scene, id: ObjectId) -> bool {
        if !self.live.remove(&id) {
            return false;
        }
        match scene.destroy(id) {
            Some(mut object) => {
                object.active = false;
                self.pool.release(object);
                true
            }
            None => false,
        }
    }

    /// Stop tracking `id` without touching the scene. Returns whether it was
    /// live.
    pub fn forget(&mut self, id: ObjectId) -> bool {
        self.live.remove(&id)
    }

    /// Forget every live id that `scene` no longer contains. Returns how many
    /// were dropped.
    pub fn reconcile(&mut self, scene: &Scene) -> usize {
        let before = self.live.len();
        self.live.retain(|id| scene.contains(*id));
        let dropped = before - self.live.len();
        if dropped > 0 {
            log::debug!("spawner: forgot {dropped} object(s) destroyed outside the spawner");
        }
        dropped
    }

    #[inline]
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains(&id)
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Idle pooled instances.
    #[inline]
    pub fn available(&self) -> usize {
        self.pool.available()
    }

    /// Instances built from the prefab so far.
    #[inline]
    pub fn created(&self) -> usize {
        self.pool.created()
    }
}
