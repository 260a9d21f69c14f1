use std::borrow::Cow;
use std::collections::HashMap;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderDefValue, ShaderLanguage, ShaderType,
};

use crate::error::LucentError;
use crate::material::{
    DefineValue, ProgramBuilder, ShaderMaterial, StageSource,
};

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders
/// use `#import lucent::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Both stages of a material, composed to naga IR.
#[derive(Debug, Clone)]
pub struct ComposedProgram {
    /// Vertex stage module.
    pub vertex: naga::Module,
    /// Fragment stage module.
    pub fragment: naga::Module,
}

/// Both stages of a material as wgpu shader modules.
#[derive(Debug)]
pub struct MaterialShaders {
    /// Vertex stage module.
    pub vertex: wgpu::ShaderModule,
    /// Fragment stage module.
    pub fragment: wgpu::ShaderModule,
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::ShaderCompose`] if a bundled module fails to
    /// parse.
    pub fn new() -> Result<Self, LucentError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
            file_path: "modules/fullscreen.wgsl",
        }];

        for m in modules {
            let registered = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map(|_| ());
            if let Err(e) = registered {
                return Err(LucentError::ShaderCompose(format!(
                    "failed to register shader module '{}': {}",
                    m.file_path,
                    e.emit_to_string(&composer)
                )));
            }
        }

        Ok(Self { composer })
    }

    /// Preprocessor defs for `material`.
    ///
    /// Integer defines map to `Int`, booleans to `Bool`, and anything else is
    /// a defined flag usable with `#ifdef`.
    #[must_use]
    pub fn shader_defs(
        material: &ShaderMaterial,
    ) -> HashMap<String, ShaderDefValue> {
        material
            .defines()
            .iter()
            .map(|(symbol, value)| {
                let def = match DefineValue::parse(value) {
                    DefineValue::Int(i) => ShaderDefValue::Int(i),
                    DefineValue::Bool(b) => ShaderDefValue::Bool(b),
                    DefineValue::Float(_) | DefineValue::Flag => {
                        ShaderDefValue::Bool(true)
                    }
                };
                (symbol.to_owned(), def)
            })
            .collect()
    }

    /// Stage source with the material's defines appended as WGSL constants.
    #[must_use]
    pub fn expand_stage(material: &ShaderMaterial, stage: &StageSource) -> String {
        let constants = material.defines().wgsl_constants();
        if constants.is_empty() {
            return stage.source.clone().into_owned();
        }
        format!("{}\n// material defines\n{constants}", stage.source)
    }

    /// Compose one shader source into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::ShaderCompose`] with the rendered diagnostic.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
        shader_defs: HashMap<String, ShaderDefValue>,
    ) -> Result<naga::Module, LucentError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| {
                LucentError::ShaderCompose(format!(
                    "failed to compose shader '{file_path}': {}",
                    e.emit_to_string(&self.composer)
                ))
            })
    }

    /// Compose both stages of `material` as it currently stands.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::ShaderCompose`] for the first failing stage.
    pub fn compose_material(
        &mut self,
        material: &ShaderMaterial,
    ) -> Result<ComposedProgram, LucentError> {
        let defs = Self::shader_defs(material);
        let source = material.source();
        let vertex = self.compose_naga(
            &Self::expand_stage(material, &source.vertex),
            &source.vertex.file_path,
            defs.clone(),
        )?;
        let fragment = self.compose_naga(
            &Self::expand_stage(material, &source.fragment),
            &source.fragment.file_path,
            defs,
        )?;
        Ok(ComposedProgram { vertex, fragment })
    }

    /// Compose `material` into wgpu shader modules ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// See [`ShaderComposer::compose_material`].
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        material: &ShaderMaterial,
    ) -> Result<MaterialShaders, LucentError> {
        let program = self.compose_material(material)?;
        let label = material.name();
        let module = |stage: &str, ir: naga::Module| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label} {stage}")),
                source: wgpu::ShaderSource::Naga(Cow::Owned(ir)),
            })
        };
        Ok(MaterialShaders {
            vertex: module("Vertex", program.vertex),
            fragment: module("Fragment", program.fragment),
        })
    }
}

impl ProgramBuilder for ShaderComposer {
    type Program = ComposedProgram;

    fn build(
        &mut self,
        material: &ShaderMaterial,
    ) -> Result<ComposedProgram, LucentError> {
        self.compose_material(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{
        GodRaysMaterial, ProgramCache, ShaderSource, SmaaBlendMaterial,
        FULLSCREEN_VERTEX,
    };

    #[test]
    fn bundled_materials_compose_across_sample_counts() {
        let mut composer = ShaderComposer::new().unwrap();
        let mut god_rays = GodRaysMaterial::new(glam::Vec2::new(0.5, 0.5))
            .unwrap();
        for samples in [1.0, 8.0, 60.0, 127.9] {
            god_rays.set_samples(samples);
            let _ = composer
                .compose_material(god_rays.material())
                .unwrap_or_else(|e| panic!("god rays ({samples}): {e}"));
        }

        god_rays.set_dithering(true);
        let _ = composer
            .compose_material(god_rays.material())
            .unwrap_or_else(|e| panic!("god rays (dithering): {e}"));

        let smaa = SmaaBlendMaterial::new(None).unwrap();
        let _ = composer
            .compose_material(smaa.material())
            .unwrap_or_else(|e| panic!("smaa blend: {e}"));
    }

    #[test]
    fn defines_map_to_typed_shader_defs() {
        let mut material = ShaderMaterial::new(
            "Defs",
            ShaderSource {
                vertex: FULLSCREEN_VERTEX,
                fragment: FULLSCREEN_VERTEX,
            },
            [
                ("COUNT", "12".to_owned()),
                ("SCALE", "0.5".to_owned()),
                ("ENABLED", "false".to_owned()),
            ],
            [],
        )
        .unwrap();
        material.set_define("USE_NOISE", "").unwrap();

        let defs = ShaderComposer::shader_defs(&material);
        assert_eq!(defs["COUNT"], ShaderDefValue::Int(12));
        assert_eq!(defs["SCALE"], ShaderDefValue::Bool(true));
        assert_eq!(defs["ENABLED"], ShaderDefValue::Bool(false));
        assert_eq!(defs["USE_NOISE"], ShaderDefValue::Bool(true));
        assert_eq!(defs.len(), 4);
    }

    #[test]
    fn sample_constants_are_appended_to_the_fragment() {
        let mut god_rays = GodRaysMaterial::new(glam::Vec2::ZERO).unwrap();
        god_rays.set_samples(30.4);
        let source = ShaderComposer::expand_stage(
            god_rays.material(),
            &god_rays.material().source().fragment,
        );
        assert!(source.contains("const SAMPLES_INT: i32 = 30;"));
        assert!(source.contains("const SAMPLES_FLOAT: f32 = 30.0;"));
    }

    #[test]
    fn broken_source_reports_a_compose_error() {
        let mut material = ShaderMaterial::new(
            "Broken",
            ShaderSource {
                vertex: FULLSCREEN_VERTEX,
                fragment: StageSource::embedded(
                    "@fragment fn fs_main( -> {",
                    "broken.wgsl",
                ),
            },
            [],
            [],
        )
        .unwrap();
        let mut composer = ShaderComposer::new().unwrap();
        let mut cache = ProgramCache::new();

        let err = cache.bind(&mut material, &mut composer).unwrap_err();
        assert!(matches!(err, LucentError::ShaderCompose(_)));
        assert!(!cache.is_built());
    }

    #[test]
    fn cache_recomposes_only_after_define_changes() {
        let mut composer = ShaderComposer::new().unwrap();
        let mut god_rays = GodRaysMaterial::new(glam::Vec2::ZERO).unwrap();
        let mut cache = ProgramCache::new();

        let _ = cache.bind(god_rays.material_mut(), &mut composer).unwrap();
        god_rays.set_density(0.3);
        let _ = cache.bind(god_rays.material_mut(), &mut composer).unwrap();
        assert_eq!(cache.builds(), 1);

        god_rays.set_samples(12.0);
        god_rays.set_samples(24.0);
        let _ = cache.bind(god_rays.material_mut(), &mut composer).unwrap();
        assert_eq!(cache.builds(), 2);
    }
}
