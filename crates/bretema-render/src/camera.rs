//! Fly camera driven by user input.

use std::f32::consts::FRAC_PI_2;

use bretema_core::axis;
use bretema_input::{InputReceiver, KeyCode, MouseButton, UserInput};
use glam::{Mat4, Vec3, Vec4};

/// Pitch stays just short of straight up/down so the view basis never degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// A perspective camera.
///
/// Yaw and pitch are radians. Yaw 0 looks down +X, -90° down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    name: String,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    pub look_sensitivity: f32,
    pub clear_color: Vec4,
    /// Local movement axes: x right, y up, z forward, each in [-1, 1].
    move_intent: Vec3,
    last_input_revision: Option<u64>,
    input_updates: u64,
}

impl Camera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: -FRAC_PI_2,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            move_speed: 5.0,
            look_sensitivity: 0.002,
            clear_color: Vec4::new(0.1, 0.1, 0.12, 1.0),
            move_intent: Vec3::ZERO,
            last_input_revision: None,
            input_updates: 0,
        }
    }

    /// A fresh default camera named `"Main"`.
    pub fn main() -> Self {
        Self::new("Main")
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub const fn with_clear_color(mut self, color: Vec4) -> Self {
        self.clear_color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(axis::UP).normalize()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), axis::UP)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Match the aspect ratio to a viewport. Zero-area viewports are ignored.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub const fn move_intent(&self) -> Vec3 {
        self.move_intent
    }

    /// Revision of the last input snapshot this camera reacted to.
    pub const fn last_input_revision(&self) -> Option<u64> {
        self.last_input_revision
    }

    /// How many input snapshots this camera has seen.
    pub const fn input_updates(&self) -> u64 {
        self.input_updates
    }

    /// Move along the current intent for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let direction = self.right() * self.move_intent.x
            + axis::UP * self.move_intent.y
            + self.forward() * self.move_intent.z;
        if direction != Vec3::ZERO {
            self.position += direction.normalize() * self.move_speed * dt;
        }
    }
}

fn key_axis(input: &UserInput, positive: KeyCode, negative: KeyCode) -> f32 {
    f32::from(i8::from(input.is_key_pressed(positive)) - i8::from(input.is_key_pressed(negative)))
}

impl InputReceiver for Camera {
    fn on_input_change(&mut self, input: &UserInput) {
        self.move_intent = Vec3::new(
            key_axis(input, KeyCode::KeyD, KeyCode::KeyA),
            key_axis(input, KeyCode::Space, KeyCode::ShiftLeft),
            key_axis(input, KeyCode::KeyW, KeyCode::KeyS),
        );

        if input.is_mouse_pressed(MouseButton::Right) {
            let motion = input.event_motion() * self.look_sensitivity;
            self.yaw += motion.x;
            self.pitch = (self.pitch - motion.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.last_input_revision = Some(input.revision());
        self.input_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bretema_input::InputEvent;
    use glam::Vec2;

    fn press(input: &mut UserInput, code: KeyCode) {
        input.process(&InputEvent::Key {
            code,
            pressed: true,
        });
    }

    #[test]
    fn main_camera_looks_down_negative_z() {
        let camera = Camera::main();
        assert_eq!(camera.name(), "Main");
        let forward = camera.forward();
        assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.right().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_projection_puts_origin_in_front() {
        let camera = Camera::main();
        let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn keys_drive_movement() {
        let mut camera = Camera::main();
        let mut input = UserInput::new();
        press(&mut input, KeyCode::KeyW);
        camera.on_input_change(&input);
        assert_eq!(camera.move_intent(), Vec3::Z);

        camera.advance(1.0);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-5);

        press(&mut input, KeyCode::KeyS);
        camera.on_input_change(&input);
        assert_eq!(camera.move_intent(), Vec3::ZERO);
    }

    #[test]
    fn look_requires_right_button() {
        let mut camera = Camera::main();
        let mut input = UserInput::new();
        let yaw = camera.yaw;

        input.process(&InputEvent::MouseMotion(Vec2::new(100.0, 0.0)));
        camera.on_input_change(&input);
        assert_relative_eq!(camera.yaw, yaw);

        input.process(&InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        input.process(&InputEvent::MouseMotion(Vec2::new(100.0, 0.0)));
        camera.on_input_change(&input);
        assert_relative_eq!(camera.yaw, yaw + 100.0 * camera.look_sensitivity);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::main();
        let mut input = UserInput::new();
        input.process(&InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        input.process(&InputEvent::MouseMotion(Vec2::new(0.0, -1.0e6)));
        camera.on_input_change(&input);
        assert_relative_eq!(camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn remembers_input_revision() {
        let mut camera = Camera::main();
        assert_eq!(camera.last_input_revision(), None);

        let mut input = UserInput::new();
        press(&mut input, KeyCode::KeyA);
        camera.on_input_change(&input);
        assert_eq!(camera.last_input_revision(), Some(1));
        assert_eq!(camera.input_updates(), 1);
    }

    #[test]
    fn fit_viewport_ignores_zero_area() {
        let mut camera = Camera::main();
        camera.fit_viewport(800, 400);
        assert_relative_eq!(camera.aspect, 2.0);
        camera.fit_viewport(0, 400);
        assert_relative_eq!(camera.aspect, 2.0);
    }
}
