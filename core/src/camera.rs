//! Orbit camera - rotates the scene under a fixed eye
//!
//! The eye sits on the -Y axis looking at the origin with +Z up. Dragging
//! rotates the model (the globe and its space sphere) instead of moving the eye,
//! so the surface under the cursor follows the pointer:
//! - horizontal drag spins around the world Z axis
//! - vertical drag tilts around the camera's right axis (world X)
//! - scrolling moves the eye along -Y between the configured distances

use glam::{Mat4, Quat, UVec2, Vec2, Vec3};

use crate::config::CameraConfig;

/// Camera state for the globe viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Accumulated model rotation
    pub rotation: Quat,
    /// Eye distance from the origin
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per drag across the whole viewport
    pub rotation_speed: f32,
    /// Scroll lines per unit of distance (the LOWER the FASTER)
    pub scroll_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    /// Create a camera from its config section, clamping the start distance
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            rotation: Quat::IDENTITY,
            distance: config.distance,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            rotation_speed: config.rotation_speed,
            scroll_speed: config.scroll_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        };
        camera.clamp_distance();
        camera
    }

    /// Apply a pointer drag of `delta_px` pixels inside a `viewport` sized window
    pub fn rotate(&mut self, delta_px: Vec2, viewport: UVec2) {
        if viewport.x == 0 || viewport.y == 0 || delta_px == Vec2::ZERO {
            return;
        }

        let yaw = delta_px.x / viewport.x as f32 * self.rotation_speed;
        let pitch = delta_px.y / viewport.y as f32 * self.rotation_speed;

        // Both axes are world axes, so the new rotation is applied on the left
        let spin = Quat::from_rotation_x(pitch) * Quat::from_rotation_z(yaw);
        self.rotation = (spin * self.rotation).normalize();
    }

    /// Move the eye by `scroll_lines` (positive zooms in)
    pub fn zoom(&mut self, scroll_lines: f32) {
        if self.scroll_speed <= 0.0 {
            return;
        }
        self.distance -= scroll_lines / self.scroll_speed;
        self.clamp_distance();
    }

    /// Forget all rotation
    pub fn reset_rotation(&mut self) {
        self.rotation = Quat::IDENTITY;
    }

    fn clamp_distance(&mut self) {
        // Guard against an inverted range from a bad config
        let max = self.max_distance.max(self.min_distance);
        self.distance = self.distance.clamp(self.min_distance, max);
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, -self.distance, 0.0)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Z)
    }

    /// Right-handed perspective with a 0..1 depth range
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Combined `projection * view`
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn camera() -> OrbitCamera {
        OrbitCamera::default()
    }

    #[test]
    fn test_default_matches_config() {
        let camera = camera();
        assert_eq!(camera.rotation, Quat::IDENTITY);
        assert!((camera.distance - 2.5).abs() < EPSILON);
        assert!((camera.fov_degrees - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_start_distance_clamped() {
        let config = CameraConfig {
            distance: 500.0,
            ..CameraConfig::default()
        };
        let camera = OrbitCamera::from_config(&config);
        assert!((camera.distance - config.max_distance).abs() < EPSILON);
    }

    // =============================================================
    // Zoom
    // =============================================================

    #[test]
    fn test_zoom_in_and_out() {
        let mut camera = camera();
        camera.zoom(1.0);
        assert!((camera.distance - 2.3).abs() < EPSILON); // 2.5 - 1 / 5

        camera.zoom(-5.0);
        assert!((camera.distance - 3.3).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = camera();
        camera.zoom(1000.0);
        assert!((camera.distance - camera.min_distance).abs() < EPSILON);

        camera.zoom(-100_000.0);
        assert!((camera.distance - camera.max_distance).abs() < EPSILON);
    }

    // =============================================================
    // Rotation
    // =============================================================

    #[test]
    fn test_horizontal_drag_spins_around_z() {
        let mut camera = camera();
        camera.rotation_speed = std::f32::consts::PI;
        // Half the viewport width = quarter turn
        camera.rotate(Vec2::new(400.0, 0.0), UVec2::new(800, 600));

        // Front of the globe (facing the eye) moves to +X, the poles stay put
        let front = camera.model_matrix().transform_point3(-Vec3::Y);
        let pole = camera.model_matrix().transform_point3(Vec3::Z);
        assert!((front - Vec3::X).length() < EPSILON, "{front}");
        assert!((pole - Vec3::Z).length() < EPSILON, "{pole}");
    }

    #[test]
    fn test_vertical_drag_tilts_around_x() {
        let mut camera = camera();
        camera.rotation_speed = std::f32::consts::PI;
        // Dragging down half the viewport height = quarter turn
        camera.rotate(Vec2::new(0.0, 300.0), UVec2::new(800, 600));

        let front = camera.model_matrix().transform_point3(-Vec3::Y);
        let side = camera.model_matrix().transform_point3(Vec3::X);
        assert!((front - -Vec3::Z).length() < EPSILON, "{front}");
        assert!((side - Vec3::X).length() < EPSILON, "{side}");
    }

    #[test]
    fn test_tilt_uses_camera_axis_after_spin() {
        let mut camera = camera();
        camera.rotation_speed = std::f32::consts::PI;
        camera.rotate(Vec2::new(400.0, 0.0), UVec2::new(800, 600));
        camera.rotate(Vec2::new(0.0, 300.0), UVec2::new(800, 600));

        // Whatever faced the eye after the spin is now at the bottom
        let was_front = camera.model_matrix().transform_point3(-Vec3::X);
        assert!((was_front - -Vec3::Z).length() < EPSILON, "{was_front}");
    }

    #[test]
    fn test_rotate_ignores_empty_viewport() {
        let mut camera = camera();
        camera.rotate(Vec2::new(10.0, 10.0), UVec2::new(0, 600));
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_stays_normalized() {
        let mut camera = camera();
        for i in 0..10_000 {
            camera.rotate(Vec2::new(3.0, (i % 7) as f32 - 3.0), UVec2::new(750, 750));
        }
        assert!(camera.rotation.is_normalized());

        camera.reset_rotation();
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }

    // =============================================================
    // Matrices
    // =============================================================

    #[test]
    fn test_view_matrix_looks_at_origin() {
        let camera = camera();
        let view = camera.view_matrix();

        // Origin lies straight ahead (-Z in view space) at `distance`
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -2.5)).length() < EPSILON, "{origin}");

        // World up stays up
        let up = view.transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < EPSILON, "{up}");
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = camera();
        let clip = camera.view_projection(1.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < EPSILON);
        assert!(ndc.y.abs() < EPSILON);
        assert!((0.0..=1.0).contains(&ndc.z), "depth {} outside 0..1", ndc.z);
    }

    #[test]
    fn test_globe_near_side_closer_than_far_side() {
        let camera = camera();
        let view_projection = camera.view_projection(1.0);
        let depth = |p: Vec3| {
            let clip = view_projection * p.extend(1.0);
            clip.z / clip.w
        };
        assert!(depth(-Vec3::Y) < depth(Vec3::Y));
    }
}
