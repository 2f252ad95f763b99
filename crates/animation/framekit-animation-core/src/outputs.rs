//! Events reported by the scene.
//!
//! Outputs carry the task lifecycle changes of one tick (plus whatever was
//! started or stopped since the previous tick), so hosts can react to an
//! animation finishing without polling runners.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SceneEvent {
    /// A task started under a free key.
    Started { object: ObjectId, key: String },
    /// A task started under a key that was busy; the old task was cancelled.
    Replaced { object: ObjectId, key: String },
    /// A task finished on its own.
    Completed { object: ObjectId, key: String },
    /// A task was cancelled before finishing.
    Stopped { object: ObjectId, key: String },
}

impl SceneEvent {
    pub fn object(&self) -> ObjectId {
        match self {
            Self::Started { object, .. }
            | Self::Replaced { object, .. }
            | Self::Completed { object, .. }
            | Self::Stopped { object, .. } => *object,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Started { key, .. }
            | Self::Replaced { key, .. }
            | Self::Completed { key, .. }
            | Self::Stopped { key, .. } => key,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub events: Vec<SceneEvent>,
}

impl Outputs {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Keys that completed on `object` during the tick.
    pub fn completed(&self, object: ObjectId) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(move |e| match e {
            SceneEvent::Completed { object: o, key } if *o == object => Some(key.as_str()),
            _ => None,
        })
    }
}
