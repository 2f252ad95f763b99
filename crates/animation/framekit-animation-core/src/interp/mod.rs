//! Interpolation and time-wrapping helpers.
//!
//! Curves pick one of the [`Interpolation`](crate::curve::Interpolation)
//! modes per curve; the math lives in [`functions`].

pub mod functions;

pub use functions::{bezier_ease_t, hermite, lerp_f32, ping_pong, repeat};
