//! SMAA neighborhood blending material: the final pass of subpixel
//! morphological antialiasing, mixing each pixel with its neighbours using
//! the blend weights computed by the earlier SMAA passes.

use encase::UniformBuffer;
use glam::Vec2;

use super::{
    ShaderMaterial, ShaderSource, StageSource, UniformValue,
    FULLSCREEN_VERTEX,
};
use crate::error::LucentError;
use crate::scene::TextureHandle;

const COLOR_BUFFER: &str = "t_diffuse";
const WEIGHTS_BUFFER: &str = "t_weights";
const TEXEL_SIZE: &str = "texel_size";

/// Texture uniforms in shader binding order.
pub const TEXTURES: [&str; 2] = [COLOR_BUFFER, WEIGHTS_BUFFER];

const FRAGMENT: StageSource = StageSource::embedded(
    include_str!("../../assets/shaders/screen/smaa_blend.wgsl"),
    "screen/smaa_blend.wgsl",
);

/// SMAA blend shader material.
#[derive(Debug, Clone)]
pub struct SmaaBlendMaterial {
    material: ShaderMaterial,
}

impl SmaaBlendMaterial {
    /// Build the material. `texel_size` is `1 / resolution`; zero when not
    /// yet known.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in names are rejected, which would be a bug.
    pub fn new(texel_size: Option<Vec2>) -> Result<Self, LucentError> {
        let material = ShaderMaterial::new(
            "SmaaBlendMaterial",
            ShaderSource {
                vertex: FULLSCREEN_VERTEX,
                fragment: FRAGMENT,
            },
            [],
            [
                (COLOR_BUFFER, UniformValue::Null),
                (WEIGHTS_BUFFER, UniformValue::Null),
                (
                    TEXEL_SIZE,
                    UniformValue::Vec2(texel_size.unwrap_or(Vec2::ZERO)),
                ),
            ],
        )?;
        Ok(Self { material })
    }

    /// The underlying material.
    #[must_use]
    pub fn material(&self) -> &ShaderMaterial {
        &self.material
    }

    /// Mutable access for binding.
    pub fn material_mut(&mut self) -> &mut ShaderMaterial {
        &mut self.material
    }

    /// Absolute screen texel size.
    #[must_use]
    pub fn texel_size(&self) -> Vec2 {
        self.material
            .uniforms()
            .vec2(TEXEL_SIZE)
            .unwrap_or_default()
    }

    /// Update the texel size after a resize.
    pub fn set_texel_size(&mut self, texel_size: Vec2) {
        self.set(TEXEL_SIZE, UniformValue::Vec2(texel_size));
    }

    /// Set the texel size from a render target resolution.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        self.set_texel_size(size.recip());
    }

    /// Color buffer to antialias.
    #[must_use]
    pub fn color_buffer(&self) -> Option<TextureHandle> {
        self.texture(COLOR_BUFFER)
    }

    /// Bind or clear the color buffer.
    pub fn set_color_buffer(&mut self, texture: Option<TextureHandle>) {
        self.set(COLOR_BUFFER, texture.into());
    }

    /// Blend weights from the weight-calculation pass.
    #[must_use]
    pub fn weights_buffer(&self) -> Option<TextureHandle> {
        self.texture(WEIGHTS_BUFFER)
    }

    /// Bind or clear the blend weights.
    pub fn set_weights_buffer(&mut self, texture: Option<TextureHandle>) {
        self.set(WEIGHTS_BUFFER, texture.into());
    }

    /// std140 bytes of the `texel_size` uniform.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::UniformEncode`] if the buffer cannot be
    /// written.
    pub fn uniform_block(&self) -> Result<Vec<u8>, LucentError> {
        let mut buffer = UniformBuffer::new(Vec::<u8>::new());
        buffer
            .write(&self.texel_size())
            .map_err(|e| LucentError::UniformEncode(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.material.uniforms().texture(name).ok().flatten()
    }

    fn set(&mut self, name: &str, value: UniformValue) {
        if let Err(e) = self.material.set_uniform(name, value) {
            log::warn!("SmaaBlendMaterial: {e}");
        }
    }
}
