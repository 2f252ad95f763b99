//! Owner registry: scene objects plus one task runner per object.
//!
//! Runners are created on first use and live beside the objects in their own
//! map, so a task can borrow its object mutably while the scene iterates.
//! Objects that are inactive keep their tasks but are not ticked.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use framekit_core::{Config, KeyedTaskRunner, LayerMask, RunnerError, Task, TaskHandle};

use crate::animate::{self, AnimationData, AnimationKind, Animated};
use crate::ids::{IdAllocator, ObjectId};
use crate::math::Vec3;
use crate::outputs::{Outputs, SceneEvent};
use crate::transform::Transform;
use crate::vec3_curve::Vec3Curve;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SceneError {
    #[error("unknown scene object {0:?}")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub active: bool,
    pub layer: u8,
    pub transform: Transform,
    #[serde(default)]
    pub animation_data: Option<AnimationData>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            layer: 0,
            transform: Transform::IDENTITY,
            animation_data: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn on_layer(&self, mask: LayerMask) -> bool {
        mask.contains_layer(self.layer)
    }
}

impl Animated for SceneObject {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn animation_data(&self) -> Option<&AnimationData> {
        self.animation_data.as_ref()
    }

    fn animation_data_mut(&mut self) -> &mut Option<AnimationData> {
        &mut self.animation_data
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    runners: HashMap<ObjectId, KeyedTaskRunner<SceneObject>>,
    ids: IdAllocator,
    config: Config,
    pending: Vec<SceneEvent>,
    outputs: Outputs,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add an object and return its id.
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = self.ids.alloc_object();
        log::debug!("scene: inserted '{}' as {id:?}", object.name);
        self.objects.insert(id, object);
        id
    }

    /// Add an active object with an identity transform.
    pub fn spawn_object(&mut self, name: impl Into<String>) -> ObjectId {
        self.insert(SceneObject::new(name))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// The object's runner, if one was ever created.
    pub fn runner(&self, id: ObjectId) -> Option<&KeyedTaskRunner<SceneObject>> {
        self.runners.get(&id)
    }

    /// The object's runner, created on first use.
    pub fn runner_mut(
        &mut self,
        id: ObjectId,
    ) -> Result<&mut KeyedTaskRunner<SceneObject>, SceneError> {
        self.parts(id).map(|(_, runner)| runner)
    }

    /// Whether `key` is running on `id`.
    pub fn is_running(&self, id: ObjectId, key: &str) -> bool {
        self.runners.get(&id).is_some_and(|r| r.contains(key))
    }

    /// Register a custom task on an object. Duplicate keys are rejected.
    pub fn add_coroutine<T>(
        &mut self,
        id: ObjectId,
        key: impl Into<String>,
        task: T,
    ) -> Result<TaskHandle, SceneError>
    where
        T: Task<SceneObject> + 'static,
    {
        let handle = self.runner_mut(id)?.add_coroutine(key, task)?;
        self.pending.push(SceneEvent::Started {
            object: id,
            key: handle.key().to_string(),
        });
        Ok(handle)
    }

    /// Cancel the task under `key` on `id`; a no-op when absent.
    pub fn remove_coroutine(&mut self, id: ObjectId, key: &str) -> bool {
        let removed = self
            .runners
            .get_mut(&id)
            .is_some_and(|r| r.remove_coroutine(key));
        if removed {
            self.pending.push(SceneEvent::Stopped {
                object: id,
                key: key.to_string(),
            });
        }
        removed
    }

    /// Start `kind` on `id`, replacing whatever that kind was doing.
    pub fn animate(
        &mut self,
        id: ObjectId,
        kind: AnimationKind,
        curve: Vec3Curve,
    ) -> Result<TaskHandle, SceneError> {
        let (object, runner) = self.parts(id)?;
        let replaced = runner.contains(kind.key());
        let handle = animate::start(runner, object, kind, curve);
        self.record_start(id, kind.key(), replaced);
        Ok(handle)
    }

    pub fn position(&mut self, id: ObjectId, curve: Vec3Curve) -> Result<TaskHandle, SceneError> {
        self.animate(id, AnimationKind::Position, curve)
    }

    pub fn position_relative(
        &mut self,
        id: ObjectId,
        curve: Vec3Curve,
    ) -> Result<TaskHandle, SceneError> {
        self.animate(id, AnimationKind::PositionRelative, curve)
    }

    /// Curve values are Euler angles in degrees.
    pub fn rotation(&mut self, id: ObjectId, curve: Vec3Curve) -> Result<TaskHandle, SceneError> {
        self.animate(id, AnimationKind::Rotation, curve)
    }

    pub fn scale(&mut self, id: ObjectId, curve: Vec3Curve) -> Result<TaskHandle, SceneError> {
        self.animate(id, AnimationKind::Scale, curve)
    }

    pub fn scale_relative(
        &mut self,
        id: ObjectId,
        curve: Vec3Curve,
    ) -> Result<TaskHandle, SceneError> {
        self.animate(id, AnimationKind::ScaleRelative, curve)
    }

    /// Move `id` linearly to `destination`. See [`animate::move_to`] for the
    /// snapping rule on non-positive durations.
    pub fn move_to(
        &mut self,
        id: ObjectId,
        destination: Vec3,
        duration: f32,
    ) -> Result<Option<TaskHandle>, SceneError> {
        let key = AnimationKind::Position.key();
        let (object, runner) = self.parts(id)?;
        let was_running = runner.contains(key);
        let handle = animate::move_to(runner, object, destination, duration);
        match handle {
            Some(_) => self.record_start(id, key, was_running),
            None if was_running => self.pending.push(SceneEvent::Stopped {
                object: id,
                key: key.to_string(),
            }),
            None => {}
        }
        Ok(handle)
    }

    /// Stop `kind` on `id`. Returns whether it was running.
    pub fn stop(&mut self, id: ObjectId, kind: AnimationKind) -> bool {
        self.remove_coroutine(id, kind.key())
    }

    /// Cancel every task of `id`. Returns how many were cancelled.
    pub fn stop_all(&mut self, id: ObjectId) -> usize {
        let Some(runner) = self.runners.get_mut(&id) else {
            return 0;
        };
        let keys: Vec<String> = runner.keys().map(str::to_string).collect();
        let count = runner.remove_all_coroutines();
        self.pending.extend(
            keys.into_iter()
                .map(|key| SceneEvent::Stopped { object: id, key }),
        );
        count
    }

    /// Re-capture the baseline used by relative animations from the object's
    /// current transform.
    pub fn reset_animation_data(&mut self, id: ObjectId) -> Result<(), SceneError> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::UnknownObject(id))?;
        animate::reset_animation_data(object);
        Ok(())
    }

    /// Cancel all tasks of `id`, then remove it from the scene.
    pub fn destroy(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.stop_all(id);
        self.runners.remove(&id);
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            log::debug!("scene: destroyed {id:?}");
        }
        removed
    }

    /// Advance every active object's tasks by one frame.
    ///
    /// Objects are visited in id order. The returned outputs also include
    /// events from calls made since the previous tick.
    pub fn tick(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending);

        let mut ids: Vec<ObjectId> = self.runners.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let (Some(object), Some(runner)) = (self.objects.get_mut(&id), self.runners.get_mut(&id))
            else {
                continue;
            };
            if !object.active || runner.is_empty() {
                continue;
            }
            let report = runner.tick(object, dt);
            self.outputs.events.extend(
                report
                    .completed
                    .into_iter()
                    .map(|key| SceneEvent::Completed { object: id, key }),
            );
            self.outputs.events.extend(
                report
                    .cancelled
                    .into_iter()
                    .map(|key| SceneEvent::Stopped { object: id, key }),
            );
            self.outputs
                .events
                .extend(report.started.into_iter().map(|(key, replaced)| {
                    if replaced {
                        SceneEvent::Replaced { object: id, key }
                    } else {
                        SceneEvent::Started { object: id, key }
                    }
                }));
        }
        &self.outputs
    }

    /// Events produced by the most recent tick.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    fn parts(
        &mut self,
        id: ObjectId,
    ) -> Result<(&mut SceneObject, &mut KeyedTaskRunner<SceneObject>), SceneError> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::UnknownObject(id))?;
        let config = &self.config;
        let runner = self
            .runners
            .entry(id)
            .or_insert_with(|| KeyedTaskRunner::with_config(config.clone()));
        Ok((object, runner))
    }

    fn record_start(&mut self, object: ObjectId, key: &str, replaced: bool) {
        let key = key.to_string();
        self.pending.push(if replaced {
            SceneEvent::Replaced { object, key }
        } else {
            SceneEvent::Started { object, key }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_object_is_an_error() {
        let mut scene = Scene::new();
        let err = scene
            .position(ObjectId(7), Vec3Curve::constant(Vec3::ONE))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownObject(ObjectId(7)));
        assert!(!scene.stop(ObjectId(7), AnimationKind::Position));
        assert_eq!(scene.stop_all(ObjectId(7)), 0);
    }

    #[test]
    fn runner_is_created_on_first_use() {
        let mut scene = Scene::new();
        let id = scene.spawn_object("cube");
        assert!(scene.runner(id).is_none());
        scene.runner_mut(id).unwrap();
        assert!(scene.runner(id).is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn inactive_objects_are_not_ticked() {
        let mut scene = Scene::new();
        let id = scene.spawn_object("cube");
        scene
            .move_to(id, Vec3::new(4.0, 0.0, 0.0), 1.0)
            .unwrap();
        scene.get_mut(id).unwrap().active = false;
        scene.tick(0.5);
        scene.tick(0.5);
        assert_eq!(scene.get(id).unwrap().transform.position, Vec3::ZERO);
        assert!(scene.is_running(id, "Position"));
    }

    #[test]
    fn events_cover_start_replace_stop() {
        let mut scene = Scene::new();
        let id = scene.spawn_object("cube");
        scene.scale(id, Vec3Curve::linear(Vec3::ONE, Vec3::ZERO, 1.0)).unwrap();
        scene.scale(id, Vec3Curve::linear(Vec3::ONE, Vec3::ZERO, 1.0)).unwrap();
        scene.stop(id, AnimationKind::Scale);
        let events = &scene.tick(0.1).events;
        assert_eq!(
            events,
            &vec![
                SceneEvent::Started { object: id, key: "Scale".into() },
                SceneEvent::Replaced { object: id, key: "Scale".into() },
                SceneEvent::Stopped { object: id, key: "Scale".into() },
            ]
        );
        assert!(scene.tick(0.1).is_empty());
    }

    #[test]
    fn tasks_started_by_tasks_are_reported() {
        use framekit_core::{task_fn, TaskContext, TaskStatus, Wait};

        let mut scene = Scene::new();
        let id = scene.spawn_object("chain");
        scene
            .add_coroutine(
                id,
                "first",
                task_fn(|cx: &mut TaskContext<'_, SceneObject>| {
                    cx.start_or_replace("second", Wait::seconds(1.0));
                    TaskStatus::Complete
                }),
            )
            .unwrap();
        let events = scene.tick(0.1).events.clone();
        assert_eq!(
            events,
            vec![
                SceneEvent::Started { object: id, key: "first".into() },
                SceneEvent::Completed { object: id, key: "first".into() },
                SceneEvent::Started { object: id, key: "second".into() },
            ]
        );
    }
}
