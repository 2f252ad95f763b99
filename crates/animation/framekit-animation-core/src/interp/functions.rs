//! Interpolation helpers:
//! - lerp_f32 (linear)
//! - hermite (cubic Hermite with per-key slopes)
//! - bezier_ease_t (cubic-bezier timing, CSS-style control points)
//! - repeat / ping_pong (time wrapping for looping curves)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Hermite between `(v0, m0)` and `(v1, m1)` over a segment of length
/// `span`, at normalized position `s` in [0, 1]. Slopes are per unit time.
/// Infinite slopes hold `v0` (stepped key).
#[inline]
pub fn hermite(v0: f32, m0: f32, v1: f32, m1: f32, span: f32, s: f32) -> f32 {
    if !m0.is_finite() || !m1.is_finite() {
        return v0;
    }
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    h00 * v0 + h10 * span * m0 + h01 * v1 + h11 * span * m1
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
pub fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Bezier(0,0,1,1) is exactly linear
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Wrap t into [0, span).
#[inline]
pub fn repeat(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    fmod(t, span)
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
pub fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * span;
    let m = fmod(t, period);
    if m <= span {
        m
    } else {
        period - m
    }
}
