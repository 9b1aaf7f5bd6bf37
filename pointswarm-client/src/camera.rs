//! Mouse driven orbit camera.
//!
//! Left drag rotates, right drag pans in the view plane and middle drag moves
//! along the view axis.

use glam::{Mat4, Vec2, Vec3};
use sdl2::mouse::MouseButton;

use crate::other::UpdateContext;

const ROTATE_SPEED: f32 = 0.005;
const PAN_SPEED: f32 = 0.03;
const ZOOM_SPEED: f32 = 0.05;

pub struct OrbitCamera {
    pub pan: Vec3,
    /// Yaw (around Y) and pitch (around X), in radians.
    pub rotation: Vec2,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            pan: Vec3::new(0.0, -5.0, -15.0),
            rotation: Vec2::ZERO,
            fov: 65.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

impl OrbitCamera {
    /// Applies a drag of `delta` pixels with `button` held.
    pub fn drag(&mut self, button: MouseButton, delta: Vec2) {
        match button {
            MouseButton::Left => self.rotation += delta * ROTATE_SPEED,
            MouseButton::Right => {
                self.pan.x += delta.x * PAN_SPEED;
                self.pan.y -= delta.y * PAN_SPEED;
            }
            MouseButton::Middle => self.pan.z += delta.y * ZOOM_SPEED,
            _ => {}
        }
    }

    /// Feeds this frame's mouse motion for every held button.
    pub fn update(&mut self, ctx: &UpdateContext) {
        if ctx.mouse.delta == Vec2::ZERO {
            return;
        }
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            if ctx.mouse.down.contains(&button) {
                self.drag(button, ctx.mouse.delta);
            }
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(self.pan)
            * Mat4::from_rotation_x(self.rotation.y)
            * Mat4::from_rotation_y(self.rotation.x)
    }

    /// A zero height viewport yields an aspect of 1 rather than a degenerate matrix.
    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_buttons() {
        let mut camera = OrbitCamera::default();
        camera.drag(MouseButton::Left, Vec2::new(100.0, -20.0));
        assert!(camera.rotation.abs_diff_eq(Vec2::new(0.5, -0.1), 1e-6));

        camera.drag(MouseButton::Right, Vec2::new(10.0, 10.0));
        assert!(camera.pan.abs_diff_eq(Vec3::new(0.3, -5.3, -15.0), 1e-5));

        camera.drag(MouseButton::Middle, Vec2::new(0.0, 20.0));
        assert!((camera.pan.z - -14.0).abs() < 1e-5);
    }

    #[test]
    fn test_default_view_looks_at_origin() {
        let camera = OrbitCamera::default();
        let origin = camera.view().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, -5.0, -15.0));
        assert!(camera.projection(800, 0).is_finite());
    }
}
