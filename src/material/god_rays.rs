//! Crepuscular rays material.
//!
//! Radial blur towards a screen-space light position, after Despoulain's
//! WebGL volumetric light approximation and GPU Gems 3 chapter 13
//! ("Volumetric Light Scattering as a Post-Process").

use encase::{ShaderType, UniformBuffer};
use glam::Vec2;

use super::{
    ShaderMaterial, ShaderSource, StageSource, UniformValue,
    FULLSCREEN_VERTEX,
};
use crate::error::LucentError;
use crate::options::GodRaysOptions;
use crate::scene::TextureHandle;

/// Integer-form sample count define.
pub const SAMPLES_INT: &str = "SAMPLES_INT";
/// Float-form sample count define.
pub const SAMPLES_FLOAT: &str = "SAMPLES_FLOAT";
/// Flag define enabling output dithering.
pub const DITHERING: &str = "DITHERING";
/// Sample count of a freshly built material.
pub const DEFAULT_SAMPLES: u32 = 60;

const INPUT_BUFFER: &str = "input_buffer";
const LIGHT_POSITION: &str = "light_position";
const DENSITY: &str = "density";
const DECAY: &str = "decay";
const WEIGHT: &str = "weight";
const EXPOSURE: &str = "exposure";
const CLAMP_MAX: &str = "clamp_max";

/// Texture uniforms in shader binding order.
pub const TEXTURES: [&str; 1] = [INPUT_BUFFER];

const FRAGMENT: StageSource = StageSource::embedded(
    include_str!("../../assets/shaders/screen/god_rays.wgsl"),
    "screen/god_rays.wgsl",
);

/// Layout of the `params` uniform block in `god_rays.wgsl`.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
struct GodRaysParams {
    light_position: Vec2,
    density: f32,
    decay: f32,
    weight: f32,
    exposure: f32,
    clamp_max: f32,
}

/// Crepuscular rays shader material.
#[derive(Debug, Clone)]
pub struct GodRaysMaterial {
    material: ShaderMaterial,
}

impl GodRaysMaterial {
    /// Build the material for a light at `light_position` (screen-space UV).
    ///
    /// # Errors
    ///
    /// Only fails if the built-in names are rejected, which would be a bug.
    pub fn new(light_position: Vec2) -> Result<Self, LucentError> {
        let samples = i64::from(DEFAULT_SAMPLES);
        let material = ShaderMaterial::new(
            "GodRaysMaterial",
            ShaderSource {
                vertex: FULLSCREEN_VERTEX,
                fragment: FRAGMENT,
            },
            [
                (SAMPLES_INT, samples.to_string()),
                (SAMPLES_FLOAT, format!("{samples}.0")),
            ],
            [
                (INPUT_BUFFER, UniformValue::Null),
                (LIGHT_POSITION, UniformValue::Vec2(light_position)),
                (DENSITY, UniformValue::Float(1.0)),
                (DECAY, UniformValue::Float(1.0)),
                (WEIGHT, UniformValue::Float(1.0)),
                (EXPOSURE, UniformValue::Float(1.0)),
                (CLAMP_MAX, UniformValue::Float(1.0)),
            ],
        )?;
        Ok(Self { material })
    }

    /// The underlying material.
    #[must_use]
    pub fn material(&self) -> &ShaderMaterial {
        &self.material
    }

    /// Mutable access for binding and generic define edits.
    pub fn material_mut(&mut self) -> &mut ShaderMaterial {
        &mut self.material
    }

    /// Samples taken per pixel.
    #[must_use]
    pub fn samples(&self) -> i64 {
        self.material.int_define(SAMPLES_INT).unwrap_or_default()
    }

    /// Set the samples per pixel. Fractional values are floored, not
    /// rounded, and counts outside the `i32` range saturate. The program is
    /// rebuilt at the next bind.
    pub fn set_samples(&mut self, value: f64) {
        let _ = self.material.write_quantized(SAMPLES_INT, SAMPLES_FLOAT, value);
    }

    /// Whether output dithering is compiled in.
    #[must_use]
    pub fn dithering(&self) -> bool {
        self.material.defines().get(DITHERING).is_some()
    }

    /// Toggle output dithering, which breaks up banding in dark gradients.
    /// Takes effect at the next bind.
    pub fn set_dithering(&mut self, enabled: bool) {
        self.material.toggle_flag(DITHERING, enabled);
    }

    /// Apply sample count and scattering parameters from options.
    pub fn apply_options(&mut self, options: &GodRaysOptions) {
        self.set_samples(f64::from(options.samples));
        self.set_scalar(DENSITY, options.density);
        self.set_scalar(DECAY, options.decay);
        self.set_scalar(WEIGHT, options.weight);
        self.set_scalar(EXPOSURE, options.exposure);
        self.set_scalar(CLAMP_MAX, options.clamp_max);
    }

    // -- Uniforms -----------------------------------------------------------

    /// Scene color buffer the rays are gathered from; `None` until bound.
    #[must_use]
    pub fn input_buffer(&self) -> Option<TextureHandle> {
        self.material
            .uniforms()
            .texture(INPUT_BUFFER)
            .ok()
            .flatten()
    }

    /// Bind or clear the input buffer.
    pub fn set_input_buffer(&mut self, texture: Option<TextureHandle>) {
        self.set(INPUT_BUFFER, texture.into());
    }

    /// Light position in screen-space UV.
    #[must_use]
    pub fn light_position(&self) -> Vec2 {
        self.material
            .uniforms()
            .vec2(LIGHT_POSITION)
            .unwrap_or_default()
    }

    /// Move the light.
    pub fn set_light_position(&mut self, position: Vec2) {
        self.set(LIGHT_POSITION, UniformValue::Vec2(position));
    }

    /// Sample spacing scale.
    #[must_use]
    pub fn density(&self) -> f32 {
        self.scalar(DENSITY)
    }

    /// Set the sample spacing scale.
    pub fn set_density(&mut self, value: f32) {
        self.set_scalar(DENSITY, value);
    }

    /// Per-sample illumination falloff.
    #[must_use]
    pub fn decay(&self) -> f32 {
        self.scalar(DECAY)
    }

    /// Set the per-sample falloff.
    pub fn set_decay(&mut self, value: f32) {
        self.set_scalar(DECAY, value);
    }

    /// Per-sample contribution.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.scalar(WEIGHT)
    }

    /// Set the per-sample contribution.
    pub fn set_weight(&mut self, value: f32) {
        self.set_scalar(WEIGHT, value);
    }

    /// Overall brightness.
    #[must_use]
    pub fn exposure(&self) -> f32 {
        self.scalar(EXPOSURE)
    }

    /// Set the overall brightness.
    pub fn set_exposure(&mut self, value: f32) {
        self.set_scalar(EXPOSURE, value);
    }

    /// Upper bound of the output intensity.
    #[must_use]
    pub fn clamp_max(&self) -> f32 {
        self.scalar(CLAMP_MAX)
    }

    /// Set the output intensity bound.
    pub fn set_clamp_max(&mut self, value: f32) {
        self.set_scalar(CLAMP_MAX, value);
    }

    /// std140 bytes of the `params` block for upload to a uniform buffer.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::UniformEncode`] if the buffer cannot be
    /// written.
    pub fn uniform_block(&self) -> Result<Vec<u8>, LucentError> {
        let params = GodRaysParams {
            light_position: self.light_position(),
            density: self.density(),
            decay: self.decay(),
            weight: self.weight(),
            exposure: self.exposure(),
            clamp_max: self.clamp_max(),
        };
        let mut buffer = UniformBuffer::new(Vec::<u8>::new());
        buffer
            .write(&params)
            .map_err(|e| LucentError::UniformEncode(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    fn scalar(&self, name: &str) -> f32 {
        self.material.uniforms().float(name).unwrap_or_default()
    }

    fn set_scalar(&mut self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    // Names are declared in `new`, so assignment cannot fail.
    fn set(&mut self, name: &str, value: UniformValue) {
        if let Err(e) = self.material.set_uniform(name, value) {
            log::warn!("GodRaysMaterial: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rays() -> GodRaysMaterial {
        GodRaysMaterial::new(Vec2::new(0.5, 0.5)).unwrap()
    }

    #[test]
    fn defaults_match_reference_material() {
        let m = rays();
        assert_eq!(m.samples(), 60);
        assert_eq!(m.material().defines().get(SAMPLES_FLOAT), Some("60.0"));
        assert_eq!(m.input_buffer(), None);
        assert_eq!(m.light_position(), Vec2::new(0.5, 0.5));
        for value in [m.density(), m.decay(), m.weight(), m.exposure(), m.clamp_max()] {
            assert_eq!(value, 1.0);
        }
        assert_eq!(m.material().uniforms().len(), 7);
        assert!(!m.material().needs_update());
    }

    #[test]
    fn samples_round_trip_through_floor() {
        let mut m = rays();
        for v in [60.0, 59.999, 0.0, -0.0, 0.75, -2.5, -17.0, 1024.4] {
            m.set_samples(v);
            let expected = v.floor() as i64;
            assert_eq!(m.samples(), expected, "samples for {v}");
            assert_eq!(
                m.material().defines().get(SAMPLES_FLOAT),
                Some(format!("{expected}.0").as_str()),
                "float form for {v}"
            );
        }
    }

    #[test]
    fn dithering_toggles_a_flag_define() {
        let mut m = rays();
        assert!(!m.dithering());
        m.set_dithering(false);
        assert!(!m.material().needs_update());

        m.set_dithering(true);
        assert!(m.dithering());
        assert!(m.material().needs_update());
        assert_eq!(m.material().defines().get(DITHERING), Some(""));
        assert!(!m.material().defines().wgsl_constants().contains(DITHERING));

        m.material_mut().clear_needs_update();
        m.set_dithering(true);
        assert!(!m.material().needs_update());
        m.set_dithering(false);
        assert!(!m.dithering());
        assert!(m.material().needs_update());
    }

    #[test]
    fn huge_sample_counts_keep_both_forms_typed() {
        let mut m = rays();
        m.set_samples(3.0e9);
        assert_eq!(m.samples(), i64::from(i32::MAX));

        let constants = m.material().defines().wgsl_constants();
        assert!(constants.contains("const SAMPLES_INT: i32 = 2147483647;"));
        assert!(constants.contains("const SAMPLES_FLOAT: f32 = 2147483647.0;"));
    }

    #[test]
    fn setting_samples_marks_stale_without_touching_uniforms() {
        let mut m = rays();
        m.set_density(0.96);
        let before = m.material().uniforms().clone();
        m.set_samples(30.2);
        assert!(m.material().needs_update());
        assert_eq!(m.material().uniforms(), &before);
    }

    #[test]
    fn uniforms_survive_interleaved_define_writes() {
        let mut m = rays();
        m.set_decay(0.93);
        m.set_samples(10.0);
        m.set_weight(0.4);
        m.set_samples(80.0);
        m.set_decay(0.95);
        m.set_dithering(true);
        m.set_exposure(0.6);

        assert_eq!(m.decay(), 0.95);
        assert_eq!(m.weight(), 0.4);
        assert_eq!(m.exposure(), 0.6);
        assert_eq!(m.samples(), 80);
    }

    #[test]
    fn uniform_writes_keep_program_fresh() {
        let mut m = rays();
        m.set_light_position(Vec2::new(0.2, 0.8));
        m.set_input_buffer(Some(TextureHandle(4)));
        m.set_clamp_max(0.7);
        assert!(!m.material().needs_update());
        assert_eq!(m.input_buffer(), Some(TextureHandle(4)));
        m.set_input_buffer(None);
        assert_eq!(m.input_buffer(), None);
    }

    #[test]
    fn options_apply_samples_and_scattering() {
        let mut m = rays();
        let options = GodRaysOptions {
            samples: 90,
            density: 0.96,
            decay: 0.93,
            weight: 0.4,
            exposure: 0.6,
            clamp_max: 1.0,
        };
        m.apply_options(&options);
        assert_eq!(m.samples(), 90);
        assert_eq!(m.density(), 0.96);
        assert!(m.material().needs_update());
    }

    #[test]
    fn uniform_block_layout() {
        let mut m = rays();
        m.set_light_position(Vec2::new(0.25, 0.75));
        m.set_density(0.5);
        m.set_clamp_max(2.0);
        let bytes = m.uniform_block().unwrap();
        assert_eq!(bytes.len(), 32);

        let read = |offset: usize| {
            f32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        assert_eq!(read(0), 0.25);
        assert_eq!(read(4), 0.75);
        assert_eq!(read(8), 0.5);
        assert_eq!(read(24), 2.0);
    }
}
