use lumis_geom::Aabb;
use lumis_render_raylib::conv::vec3_to_rl;
use raylib::prelude::*;

const MOVE_KEYS: [(KeyboardKey, Axis); 6] = [
    (KeyboardKey::KEY_W, Axis::Forward(1.0)),
    (KeyboardKey::KEY_S, Axis::Forward(-1.0)),
    (KeyboardKey::KEY_D, Axis::Right(1.0)),
    (KeyboardKey::KEY_A, Axis::Right(-1.0)),
    (KeyboardKey::KEY_E, Axis::Lift(1.0)),
    (KeyboardKey::KEY_Q, Axis::Lift(-1.0)),
];

#[derive(Clone, Copy)]
enum Axis {
    Forward(f32),
    Right(f32),
    Lift(f32),
}

/// Free-flying viewer camera; speed scales with the scene it was framed on.
pub struct FlyCamera {
    pub position: Vector3,
    pub yaw: f32,   // degrees
    pub pitch: f32, // degrees
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub captured: bool,
}

impl FlyCamera {
    /// Stands in front of `bounds` on +Z looking at its centre, crossing the
    /// diagonal in about four seconds.
    pub fn framing(bounds: Aabb) -> Self {
        let (center, diag, depth) = if bounds.is_empty() {
            (Vector3::zero(), 1.0, 1.0)
        } else {
            (
                vec3_to_rl(bounds.center()),
                bounds.diagonal().max(1e-3),
                bounds.max.z - bounds.min.z,
            )
        };
        Self {
            position: center + Vector3::new(0.0, 0.0, depth * 0.5 + diag * 0.6),
            yaw: -90.0,
            pitch: 0.0,
            move_speed: diag * 0.25,
            mouse_sensitivity: 0.1,
            captured: false,
        }
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D::perspective(self.position, self.position + self.forward(), Vector3::up(), 60.0)
    }

    pub fn forward(&self) -> Vector3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vector3::new(cy * cp, sp, sy * cp).normalized()
    }

    pub fn right(&self) -> Vector3 {
        self.forward().cross(Vector3::up()).normalized()
    }

    /// Applies a mouse delta in pixels; pitch stops short of the poles.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch - dy * self.mouse_sensitivity).clamp(-89.9, 89.9);
    }

    /// Unit direction for the held movement keys, or zero.
    fn wish_direction(&self, held: impl Fn(KeyboardKey) -> bool) -> Vector3 {
        let (f, r) = (self.forward(), self.right());
        let sum = MOVE_KEYS
            .iter()
            .filter(|(key, _)| held(*key))
            .fold(Vector3::zero(), |acc, (_, axis)| match *axis {
                Axis::Forward(s) => acc + f * s,
                Axis::Right(s) => acc + r * s,
                Axis::Lift(s) => acc + Vector3::up() * s,
            });
        if sum.length() > 0.0 { sum.normalized() } else { sum }
    }

    pub fn update(&mut self, rl: &mut RaylibHandle, dt: f32) {
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            self.captured = !self.captured;
            if self.captured {
                rl.disable_cursor();
            } else {
                rl.enable_cursor();
            }
        }
        if self.captured {
            let md = rl.get_mouse_delta();
            self.look(md.x, md.y);
        }

        let dir = self.wish_direction(|key| rl.is_key_down(key));
        let boost = if rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT) { 3.0 } else { 1.0 };
        self.position += dir * (self.move_speed * boost * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumis_geom::Vec3;

    #[test]
    fn framing_looks_at_the_box() {
        let cam = FlyCamera::framing(Aabb::new(Vec3::ZERO, Vec3::splat(2.0)));
        assert!(cam.position.z > 2.0);
        let to_center = (Vector3::new(1.0, 1.0, 1.0) - cam.position).normalized();
        assert!(cam.forward().dot(to_center) > 0.99);
    }

    #[test]
    fn opposing_keys_cancel_and_diagonals_are_unit() {
        let cam = FlyCamera::framing(Aabb::new(Vec3::ZERO, Vec3::ONE));
        let still = cam.wish_direction(|k| matches!(k, KeyboardKey::KEY_W | KeyboardKey::KEY_S));
        assert_eq!(still.length(), 0.0);
        let diag = cam.wish_direction(|k| matches!(k, KeyboardKey::KEY_W | KeyboardKey::KEY_D));
        assert!((diag.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::framing(Aabb::EMPTY);
        cam.look(0.0, -10_000.0);
        assert_eq!(cam.pitch, 89.9);
    }
}
