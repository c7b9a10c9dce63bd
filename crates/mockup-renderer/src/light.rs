//! Light uniform

use bytemuck::{Pod, Zeroable};
use mockup_core::scene::Light;

use crate::constants::lighting::MAX_DIRECTIONAL_LIGHTS;

/// One directional light, as the shader sees it
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// Unit vector pointing from the scene towards the light (w unused).
    pub direction: [f32; 4],
    /// Linear color premultiplied by intensity (w unused).
    pub color: [f32; 4],
}

/// Light uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// Summed ambient light, linear and premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Directional lights; only the first `count` are used.
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    /// Number of active directional lights.
    pub count: u32,
    /// Padding for alignment.
    pub _pad: [u32; 3],
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl LightUniform {
    /// Pack a scene's lights
    ///
    /// Ambient lights add up. Directional lights past the uniform's capacity
    /// are dropped with a warning.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniform = Self::default();
        let mut count = 0;

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let [r, g, b] = color.to_linear();
                    uniform.ambient[0] += r * intensity;
                    uniform.ambient[1] += g * intensity;
                    uniform.ambient[2] += b * intensity;
                }
                Light::Directional {
                    position,
                    color,
                    intensity,
                } => {
                    if count == MAX_DIRECTIONAL_LIGHTS {
                        tracing::warn!(
                            "Only {} directional lights are supported, ignoring the rest",
                            MAX_DIRECTIONAL_LIGHTS
                        );
                        continue;
                    }
                    let [r, g, b] = color.to_linear();
                    uniform.directional[count] = DirectionalLightUniform {
                        direction: position.normalize_or_zero().extend(0.0).to_array(),
                        color: [r * intensity, g * intensity, b * intensity, 1.0],
                    };
                    count += 1;
                }
            }
        }

        uniform.count = count as u32;
        uniform
    }
}
