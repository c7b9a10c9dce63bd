//! Camera uniform

use bytemuck::{Pod, Zeroable};
use mockup_core::PerspectiveCamera;

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection times view.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position (w unused).
    pub eye: [f32; 4],
}

impl CameraUniform {
    /// Snapshot a camera's matrices
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye().extend(1.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};
    use mockup_core::config::CameraConfig;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_from_camera() {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 1.5, 5.0);
        let uniform = CameraUniform::from_camera(&camera);
        assert_eq!(uniform.eye, [0.0, 0.0, 5.0, 1.0]);

        // The origin lands in the middle of the clip volume
        let clip = Mat4::from_cols_array_2d(&uniform.view_proj) * Vec4::W;
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }
}
