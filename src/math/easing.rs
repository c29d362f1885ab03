use glam::Vec3;

pub fn cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Quadratic Bezier through `start` and `end`, pulled toward `control`.
pub fn quadratic_bezier(t: f32, start: Vec3, control: Vec3, end: Vec3) -> Vec3 {
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}
