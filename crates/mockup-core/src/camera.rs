//! Fixed perspective camera looking down -Z at the origin

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Perspective camera placed on the +Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// Create a camera at `(0, 0, distance)`
    pub fn new(config: &CameraConfig, aspect: f32, distance: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near_plane,
            far: config.far_plane,
        }
    }

    /// Update aspect ratio from a viewport size; a zero height falls back to 1
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Move the camera along its viewing axis
    pub fn set_distance(&mut self, distance: f32) {
        self.position.z = distance;
    }

    pub fn distance(&self) -> f32 {
        self.position.z
    }

    /// Get field of view in degrees
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space eye position
    pub fn eye(&self) -> Vec3 {
        self.position
    }
}

/// Width over height, or 1 for a degenerate viewport
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    #[test]
    fn test_new_camera_uses_config() {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 2.0, 5.0);
        assert_relative_eq!(camera.fov_degrees(), 75.0, epsilon = 1e-4);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_set_distance_moves_along_z() {
        let mut camera = PerspectiveCamera::new(&CameraConfig::default(), 1.0, 5.0);
        camera.set_distance(8.0);
        assert_eq!(camera.eye(), Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(camera.distance(), 8.0);
    }

    #[test]
    fn test_zero_height_viewport() {
        assert_eq!(aspect_ratio(800, 0), 1.0);
        assert_eq!(aspect_ratio(800, 400), 2.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 1.5, 5.0);
        let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
