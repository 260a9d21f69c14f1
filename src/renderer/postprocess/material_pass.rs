//! Full-screen pass drawing one parametric shader material.
//!
//! Bind group layout convention, shared by every bundled material shader:
//! texture uniforms occupy bindings `0..n` in [`PassMaterial::textures`]
//! order, a linear sampler sits at `n` and the material's uniform block at
//! `n + 1`.

use rustc_hash::FxHashMap;

use super::screen_pass::ScreenPass;
use crate::error::LucentError;
use crate::gpu::pipeline_helpers::{
    create_material_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture_cache::TextureCache;
use crate::material::{
    god_rays, smaa_blend, GodRaysMaterial, ProgramBuilder, ProgramCache,
    ShaderMaterial, SmaaBlendMaterial,
};
use crate::scene::TextureHandle;

/// A material that can be drawn by [`MaterialPass`].
pub trait PassMaterial {
    /// The wrapped shader material.
    fn material(&self) -> &ShaderMaterial;

    /// Mutable access for program binding.
    fn material_mut(&mut self) -> &mut ShaderMaterial;

    /// Texture uniform names in binding order.
    fn textures(&self) -> &'static [&'static str];

    /// std140 bytes of the material's uniform block.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::UniformEncode`] on encoding failure.
    fn uniform_block(&self) -> Result<Vec<u8>, LucentError>;
}

impl PassMaterial for GodRaysMaterial {
    fn material(&self) -> &ShaderMaterial {
        Self::material(self)
    }

    fn material_mut(&mut self) -> &mut ShaderMaterial {
        Self::material_mut(self)
    }

    fn textures(&self) -> &'static [&'static str] {
        &god_rays::TEXTURES
    }

    fn uniform_block(&self) -> Result<Vec<u8>, LucentError> {
        Self::uniform_block(self)
    }
}

impl PassMaterial for SmaaBlendMaterial {
    fn material(&self) -> &ShaderMaterial {
        Self::material(self)
    }

    fn material_mut(&mut self) -> &mut ShaderMaterial {
        Self::material_mut(self)
    }

    fn textures(&self) -> &'static [&'static str] {
        &smaa_blend::TEXTURES
    }

    fn uniform_block(&self) -> Result<Vec<u8>, LucentError> {
        Self::uniform_block(self)
    }
}

/// Source of texture views for bound texture handles.
pub trait TextureViews {
    /// View for `handle`, if it is GPU-resident.
    fn view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView>;
}

impl TextureViews for TextureCache {
    fn view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.get(handle).map(|texture| &texture.view)
    }
}

impl TextureViews for FxHashMap<TextureHandle, wgpu::TextureView> {
    fn view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.get(&handle)
    }
}

/// Texture handles bound to `names`, or the first name still holding null.
///
/// Null is a legal material state; the pass just cannot draw yet.
///
/// # Errors
///
/// Fails if a name is undeclared or holds a non-texture value.
pub fn bound_textures(
    material: &ShaderMaterial,
    names: &[&str],
) -> Result<TextureBinding, LucentError> {
    let mut handles = Vec::with_capacity(names.len());
    for name in names {
        match material.uniforms().texture(name)? {
            Some(handle) => handles.push(handle),
            None => return Ok(TextureBinding::Unbound((*name).to_owned())),
        }
    }
    Ok(TextureBinding::Ready(handles))
}

/// Outcome of resolving a material's texture uniforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureBinding {
    /// Every texture uniform holds a handle, in binding order.
    Ready(Vec<TextureHandle>),
    /// This texture uniform is still null.
    Unbound(String),
}

/// Why the last prepare could not draw. Warnings fire on changes only, so a
/// pass waiting for its input does not log every frame.
#[derive(Debug, Default)]
struct SkipReason(Option<String>);

impl SkipReason {
    /// Record a skipped frame; `true` if the reason differs from last time.
    fn skip(&mut self, reason: String) -> bool {
        if self.0.as_deref() == Some(reason.as_str()) {
            return false;
        }
        self.0 = Some(reason);
        true
    }

    /// Record a drawable frame; `true` if the previous one was skipped.
    fn resume(&mut self) -> bool {
        self.0.take().is_some()
    }
}

/// Builds render pipelines for materials sharing one bind group layout.
pub struct PipelineBuilder<'a> {
    context: &'a RenderContext,
    composer: &'a mut ShaderComposer,
    layout: &'a wgpu::BindGroupLayout,
}

impl<'a> PipelineBuilder<'a> {
    /// Builder targeting `context.format`.
    #[must_use]
    pub fn new(
        context: &'a RenderContext,
        composer: &'a mut ShaderComposer,
        layout: &'a wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            context,
            composer,
            layout,
        }
    }
}

impl ProgramBuilder for PipelineBuilder<'_> {
    type Program = wgpu::RenderPipeline;

    fn build(
        &mut self,
        material: &ShaderMaterial,
    ) -> Result<wgpu::RenderPipeline, LucentError> {
        let shaders = self.composer.compose(&self.context.device, material)?;
        Ok(create_material_pipeline(
            &self.context.device,
            material.name(),
            &shaders,
            self.context.format,
            &[self.layout],
        ))
    }
}

/// Draws a [`PassMaterial`] over the whole target.
pub struct MaterialPass<M> {
    material: M,
    programs: ProgramCache<wgpu::RenderPipeline>,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
    skipped: SkipReason,
}

impl<M: PassMaterial> MaterialPass<M> {
    /// Create GPU resources for `material`. The pipeline is built on the
    /// first [`ScreenPass::prepare`].
    ///
    /// # Errors
    ///
    /// Fails if the material's uniform block cannot be encoded.
    pub fn new(
        context: &RenderContext,
        material: M,
    ) -> Result<Self, LucentError> {
        let label = material.material().name().to_owned();
        let texture_count = material.textures().len() as u32;

        let mut entries: Vec<wgpu::BindGroupLayoutEntry> =
            (0..texture_count).map(texture_2d).collect();
        entries.push(filtering_sampler(texture_count));
        entries.push(uniform_buffer(texture_count + 1));
        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Bind Group Layout")),
                entries: &entries,
            },
        );

        let block_size = material.uniform_block()?.len() as u64;
        let uniform_buffer =
            context.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} Uniforms")),
                size: block_size,
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

        Ok(Self {
            sampler: linear_sampler(&context.device, &format!("{label} Sampler")),
            material,
            programs: ProgramCache::new(),
            bind_group_layout,
            uniform_buffer,
            bind_group: None,
            skipped: SkipReason::default(),
        })
    }

    /// The drawn material.
    #[must_use]
    pub fn material(&self) -> &M {
        &self.material
    }

    /// Mutable material access. Define changes take effect at the next
    /// prepare; uniform changes at the next draw.
    pub fn material_mut(&mut self) -> &mut M {
        &mut self.material
    }

    /// Number of pipeline builds so far.
    #[must_use]
    pub fn builds(&self) -> u32 {
        self.programs.builds()
    }

    fn skip(&mut self, reason: String) {
        let name = self.material.material().name();
        if self.skipped.skip(reason) {
            if let Some(reason) = &self.skipped.0 {
                log::warn!("{name}: {reason}, skipping draw");
            }
        }
    }

    fn create_bind_group(
        &self,
        context: &RenderContext,
        views: &[&wgpu::TextureView],
    ) -> wgpu::BindGroup {
        let count = views.len() as u32;
        let mut entries: Vec<wgpu::BindGroupEntry<'_>> = views
            .iter()
            .copied()
            .zip(0..)
            .map(|(view, binding)| wgpu::BindGroupEntry {
                binding,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: count,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: count + 1,
            resource: self.uniform_buffer.as_entire_binding(),
        });
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!(
                    "{} Bind Group",
                    self.material.material().name()
                )),
                layout: &self.bind_group_layout,
                entries: &entries,
            })
    }
}

impl<M: PassMaterial> ScreenPass for MaterialPass<M> {
    fn prepare(
        &mut self,
        context: &RenderContext,
        composer: &mut ShaderComposer,
        views: &dyn TextureViews,
    ) -> Result<bool, LucentError> {
        self.bind_group = None;

        let mut builder =
            PipelineBuilder::new(context, composer, &self.bind_group_layout);
        let _ = self
            .programs
            .bind(self.material.material_mut(), &mut builder)?;

        let block = self.material.uniform_block()?;
        context.queue.write_buffer(&self.uniform_buffer, 0, &block);

        let handles = match bound_textures(
            self.material.material(),
            self.material.textures(),
        )? {
            TextureBinding::Ready(handles) => handles,
            TextureBinding::Unbound(name) => {
                self.skip(format!("texture uniform '{name}' is unbound"));
                return Ok(false);
            }
        };
        let mut bound = Vec::with_capacity(handles.len());
        for handle in handles {
            let Some(view) = views.view(handle) else {
                self.skip(format!("{handle} is not resident"));
                return Ok(false);
            };
            bound.push(view);
        }

        if self.skipped.resume() {
            log::debug!("{}: drawing resumed", self.material.material().name());
        }
        self.bind_group = Some(self.create_bind_group(context, &bound));
        Ok(true)
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let (Some(pipeline), Some(bind_group)) =
            (self.programs.get(), self.bind_group.as_ref())
        else {
            return;
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.material.material().name()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn null_textures_block_drawing_until_bound() {
        let mut smaa = SmaaBlendMaterial::new(None).unwrap();
        let names = PassMaterial::textures(&smaa);
        assert_eq!(
            bound_textures(smaa.material(), names).unwrap(),
            TextureBinding::Unbound("t_diffuse".to_owned())
        );

        smaa.set_color_buffer(Some(TextureHandle(1)));
        assert_eq!(
            bound_textures(smaa.material(), names).unwrap(),
            TextureBinding::Unbound("t_weights".to_owned())
        );

        smaa.set_weights_buffer(Some(TextureHandle(2)));
        assert_eq!(
            bound_textures(smaa.material(), names).unwrap(),
            TextureBinding::Ready(vec![TextureHandle(1), TextureHandle(2)])
        );
    }

    #[test]
    fn repeated_skips_report_once_per_reason() {
        let mut skipped = SkipReason::default();
        assert!(!skipped.resume());

        assert!(skipped.skip("t_diffuse unbound".to_owned()));
        for _ in 0..10 {
            assert!(!skipped.skip("t_diffuse unbound".to_owned()));
        }
        assert!(skipped.skip("texture#3 not resident".to_owned()));

        assert!(skipped.resume());
        assert!(!skipped.resume());
        assert!(skipped.skip("t_diffuse unbound".to_owned()));
    }

    #[test]
    fn non_texture_uniform_is_a_type_error() {
        let god_rays = GodRaysMaterial::new(Vec2::ZERO).unwrap();
        let err = bound_textures(god_rays.material(), &["density"]).unwrap_err();
        assert!(matches!(err, LucentError::UniformType { .. }));
    }

    #[test]
    fn god_rays_binds_a_single_input() {
        let god_rays = GodRaysMaterial::new(Vec2::ZERO).unwrap();
        assert_eq!(PassMaterial::textures(&god_rays), ["input_buffer"]);
        assert_eq!(PassMaterial::uniform_block(&god_rays).unwrap().len(), 32);
    }
}
