//! Texture normalization and eager GPU upload for freshly loaded scenes.
//!
//! Deferring texture upload to the first draw stalls the first frame that
//! shows the asset. The prewarmer walks the scene once at load time, clamps
//! each texture's anisotropy to what the hardware supports and asks the
//! renderer to upload it immediately.

use web_time::Instant;

use super::sink::AssetSink;
use crate::options::PrewarmOptions;
use crate::scene::{Mesh, SceneNode, Texture, TextureSlot};

/// Anisotropic filtering level requested when nothing else is configured.
pub const DEFAULT_ANISOTROPY: u16 = 8;

/// Renderer services used during prewarming.
pub trait TextureUploader {
    /// Highest anisotropic filtering level the hardware supports (≥ 1).
    fn max_anisotropy(&self) -> u16;

    /// Make `texture` GPU-resident now. Must tolerate repeated calls for
    /// the same texture.
    fn init_texture(&mut self, texture: &Texture);
}

/// Anisotropy actually applied: `desired` bounded by the hardware maximum,
/// never below 1.
#[must_use]
pub fn clamp_anisotropy(desired: u16, hardware_max: u16) -> u16 {
    desired.min(hardware_max).max(1)
}

/// Counters from one prewarm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrewarmReport {
    /// Meshes visited.
    pub meshes: usize,
    /// Textures clamped and uploaded.
    pub textures: usize,
    /// Anisotropy level applied to every texture.
    pub anisotropy: u16,
}

/// Walks loaded scenes, normalizes texture sampling and forces upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPrewarmer {
    anisotropy: u16,
    slots: Vec<TextureSlot>,
}

impl Default for AssetPrewarmer {
    fn default() -> Self {
        Self::new(DEFAULT_ANISOTROPY)
    }
}

impl AssetPrewarmer {
    /// A prewarmer requesting `anisotropy` for base color and normal maps.
    #[must_use]
    pub fn new(anisotropy: u16) -> Self {
        Self {
            anisotropy,
            slots: vec![TextureSlot::BaseColor, TextureSlot::Normal],
        }
    }

    /// Build from options.
    #[must_use]
    pub fn from_options(options: &PrewarmOptions) -> Self {
        Self::new(options.anisotropy)
    }

    /// Replace the set of texture slots that are prewarmed.
    #[must_use]
    pub fn with_slots(
        mut self,
        slots: impl IntoIterator<Item = TextureSlot>,
    ) -> Self {
        self.slots = slots.into_iter().collect();
        self
    }

    /// Requested anisotropy before clamping.
    #[must_use]
    pub fn anisotropy(&self) -> u16 {
        self.anisotropy
    }

    /// Slots visited on every mesh.
    #[must_use]
    pub fn slots(&self) -> &[TextureSlot] {
        &self.slots
    }

    /// Prewarm `root` and publish it into `sink` under `key`.
    ///
    /// The sink receives exactly one write, after traversal completes, so
    /// readers never see a half-processed scene. Call this only for scenes
    /// that loaded successfully. Repeating it for the same root is harmless:
    /// the clamp is idempotent, uploads are idempotent and the second insert
    /// replaces the first.
    pub fn publish<N, S>(
        &self,
        key: &str,
        mut root: N,
        sink: &mut S,
        uploader: &mut dyn TextureUploader,
    ) -> PrewarmReport
    where
        N: SceneNode,
        S: AssetSink<N> + ?Sized,
    {
        let report = self.prewarm(&mut root, uploader);
        sink.set(key, root);
        report
    }

    /// Traverse the whole tree under `root`, prewarming every mesh.
    pub fn prewarm(
        &self,
        root: &mut dyn SceneNode,
        uploader: &mut dyn TextureUploader,
    ) -> PrewarmReport {
        let started = Instant::now();
        let anisotropy =
            clamp_anisotropy(self.anisotropy, uploader.max_anisotropy());
        let mut report = PrewarmReport {
            anisotropy,
            ..PrewarmReport::default()
        };

        let mut stack: Vec<&mut dyn SceneNode> = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(mesh) = node.as_mesh_mut() {
                report.meshes += 1;
                report.textures +=
                    self.prewarm_mesh(mesh, anisotropy, uploader);
            }
            stack.extend(node.children_mut());
        }

        log::info!(
            "prewarmed {} textures on {} meshes (anisotropy {}) in {:.1} ms",
            report.textures,
            report.meshes,
            anisotropy,
            started.elapsed().as_secs_f64() * 1000.0
        );
        report
    }

    /// Enable shadows on `mesh`, then clamp and upload each configured
    /// texture slot that holds a texture. Returns the number of textures
    /// uploaded.
    pub fn prewarm_mesh(
        &self,
        mesh: &mut dyn Mesh,
        anisotropy: u16,
        uploader: &mut dyn TextureUploader,
    ) -> usize {
        mesh.set_shadows(true, true);

        let mut uploaded = 0;
        for &slot in &self.slots {
            if let Some(texture) = mesh.texture_mut(slot) {
                texture.anisotropy = anisotropy;
                log::debug!(
                    "init {} {} (anisotropy {anisotropy})",
                    slot.name(),
                    texture.handle()
                );
                uploader.init_texture(texture);
                uploaded += 1;
            }
        }
        uploaded
    }
}
