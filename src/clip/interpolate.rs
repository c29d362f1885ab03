//! Sampling functions used by [`ClipController::evaluate`](super::ClipController::evaluate).

/// How a controller turns its cursor into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvaluationMode {
    /// Value of the current keyframe.
    #[default]
    Step,
    /// Current or next keyframe, whichever is closer in time.
    Nearest,
    /// Linear blend of the current and next keyframe.
    Lerp,
    /// Cubic Catmull-Rom through previous, current, next and next-next.
    CatmullRom,
}

pub fn nearest(current: f64, next: f64, t: f64) -> f64 {
    if t < 0.5 {
        current
    } else {
        next
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
///
/// ```text
///                 | 0  2  0  0 | |p0|
/// 0.5 [1 t t² t³] |-1  0  1  0 | |p1|
///                 | 2 -5  4 -1 | |p2|
///                 |-1  3 -3  1 | |p3|
/// ```
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn catmull_rom_passes_through_inner_points() {
        assert_relative_eq!(catmull_rom(-3.0, 1.0, 2.0, 8.0, 0.0), 1.0);
        assert_relative_eq!(catmull_rom(-3.0, 1.0, 2.0, 8.0, 1.0), 2.0);
    }

    #[test]
    fn catmull_rom_on_a_line_is_linear() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_relative_eq!(catmull_rom(0.0, 1.0, 2.0, 3.0, t), 1.0 + t, epsilon = 1e-12);
        }
    }

    #[test]
    fn nearest_switches_at_half() {
        assert_eq!(nearest(1.0, 2.0, 0.49), 1.0);
        assert_eq!(nearest(1.0, 2.0, 0.5), 2.0);
        assert_relative_eq!(lerp(1.0, 3.0, 0.25), 1.5);
    }
}
