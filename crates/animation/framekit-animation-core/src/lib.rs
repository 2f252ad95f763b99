//! framekit animation core (engine-agnostic)
//!
//! Keyframed curves, the drive task that samples them every frame, and the
//! transform animations built on top: absolute and relative position,
//! rotation and scale, each occupying one runner key per object. [`Scene`]
//! ties objects to their runners; [`Spawner`] recycles prefab instances
//! through a framekit-core pool.

pub mod animate;
pub mod curve;
pub mod ids;
pub mod interp;
pub mod math;
pub mod outputs;
pub mod sampler;
pub mod scene;
pub mod spawner;
pub mod stored_curve;
pub mod transform;
pub mod vec3_curve;

// Re-exports for consumers (hosts)
pub use animate::{AnimationData, AnimationKind, Animated};
pub use curve::{Curve, CurveError, Interpolation, Keyframe, WrapMode};
pub use ids::{IdAllocator, ObjectId};
pub use math::{Quat, Vec3};
pub use outputs::{Outputs, SceneEvent};
pub use sampler::{CurveTask, SampleFn};
pub use scene::{Scene, SceneError, SceneObject};
pub use spawner::{PrefabFactory, Spawner};
pub use stored_curve::{curve_from_value, curve_to_json, parse_curve_json};
pub use transform::Transform;
pub use vec3_curve::Vec3Curve;

pub use framekit_core::{Config, KeyedTaskRunner, TaskHandle};
