//! Scene textures waiting for, or already in, GPU memory.
//!
//! Loaders register decoded pixels with [`TextureCache::insert`]. Upload
//! happens either on first draw or ahead of time through the cache's
//! [`TextureUploader`], which the asset prewarmer drives.

use rustc_hash::FxHashMap;

use super::pipeline_helpers::anisotropic_sampler;
use super::render_context::RenderContext;
use crate::assets::TextureUploader;
use crate::scene::{Texture, TextureHandle};

/// Decoded RGBA8 pixels of one texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Row-major sRGB pixels, `width * height` entries.
    pub pixels: Vec<[u8; 4]>,
}

impl TextureData {
    /// A single-color texture.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Raw bytes for `write_texture`.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// A texture resident on the GPU.
pub struct GpuTexture {
    /// The texture.
    pub texture: wgpu::Texture,
    /// Default full-texture view.
    pub view: wgpu::TextureView,
    /// Sampler built with `anisotropy`.
    pub sampler: wgpu::Sampler,
    /// Anisotropy the sampler was created with.
    pub anisotropy: u16,
}

/// CPU-side texture registry plus the GPU copies made from it.
#[derive(Default)]
pub struct TextureCache {
    sources: FxHashMap<TextureHandle, TextureData>,
    resident: FxHashMap<TextureHandle, GpuTexture>,
}

impl TextureCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels. A previous GPU copy is discarded.
    pub fn insert(&mut self, handle: TextureHandle, data: TextureData) {
        let _ = self.resident.remove(&handle);
        let _ = self.sources.insert(handle, data);
    }

    /// Whether pixels are registered for `handle`.
    #[must_use]
    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.sources.contains_key(&handle)
    }

    /// Whether `handle` has been uploaded.
    #[must_use]
    pub fn is_resident(&self, handle: TextureHandle) -> bool {
        self.resident.contains_key(&handle)
    }

    /// The GPU copy of `handle`, if uploaded.
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.resident.get(&handle)
    }

    /// Registered but not yet uploaded handles.
    pub fn pending(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.sources
            .keys()
            .copied()
            .filter(|handle| !self.resident.contains_key(handle))
    }

    /// Uploader bound to `context`.
    #[must_use]
    pub fn uploader<'a>(
        &'a mut self,
        context: &'a RenderContext,
    ) -> CacheUploader<'a> {
        CacheUploader {
            cache: self,
            context,
        }
    }

    /// Upload `texture` now, or refresh its sampler if only the requested
    /// anisotropy changed. Unknown handles are skipped with a warning.
    pub fn upload(&mut self, context: &RenderContext, texture: &Texture) {
        let handle = texture.handle();
        let anisotropy = texture.anisotropy.max(1);
        let label = handle.to_string();

        if let Some(gpu) = self.resident.get_mut(&handle) {
            if gpu.anisotropy != anisotropy {
                gpu.sampler =
                    anisotropic_sampler(&context.device, &label, anisotropy);
                gpu.anisotropy = anisotropy;
            }
            return;
        }

        let Some(data) = self.sources.get(&handle) else {
            log::warn!("{handle}: no pixels registered, skipping upload");
            return;
        };

        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let gpu_texture =
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data.bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.width * 4),
                rows_per_image: Some(data.height),
            },
            size,
        );

        log::debug!(
            "{handle}: uploaded {}x{} (anisotropy {anisotropy})",
            data.width,
            data.height
        );
        let view = gpu_texture.create_view(&Default::default());
        let _ = self.resident.insert(
            handle,
            GpuTexture {
                texture: gpu_texture,
                view,
                sampler: anisotropic_sampler(&context.device, &label, anisotropy),
                anisotropy,
            },
        );
    }
}

/// [`TextureUploader`] backed by a [`TextureCache`] and a device.
pub struct CacheUploader<'a> {
    cache: &'a mut TextureCache,
    context: &'a RenderContext,
}

impl TextureUploader for CacheUploader<'_> {
    fn max_anisotropy(&self) -> u16 {
        self.context.max_anisotropy()
    }

    fn init_texture(&mut self, texture: &Texture) {
        self.cache.upload(self.context, texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_texture_bytes_are_tightly_packed() {
        let data = TextureData::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(data.pixels.len(), 6);
        assert_eq!(data.bytes().len(), 24);
        assert_eq!(&data.bytes()[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn registered_textures_start_pending() {
        let mut cache = TextureCache::new();
        cache.insert(TextureHandle(1), TextureData::solid(1, 1, [0; 4]));
        cache.insert(TextureHandle(2), TextureData::solid(1, 1, [0; 4]));

        assert!(cache.contains(TextureHandle(1)));
        assert!(!cache.is_resident(TextureHandle(1)));
        let mut pending: Vec<_> = cache.pending().collect();
        pending.sort();
        assert_eq!(pending, [TextureHandle(1), TextureHandle(2)]);
    }
}
