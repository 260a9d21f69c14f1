use std::fmt;

/// Highest sampler anisotropy wgpu accepts.
pub const MAX_SAMPLER_ANISOTROPY: u16 = 16;

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
        }
    }
}

/// Owns the core wgpu resources: device, queue and the target format.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// Color format material passes render into.
    pub format: wgpu::TextureFormat,
    max_anisotropy: u16,
}

impl RenderContext {
    /// Create a headless render context.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if the adapter or device request fails.
    pub async fn new(
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let anisotropic = adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::ANISOTROPIC_FILTERING);
        let info = adapter.get_info();
        log::info!(
            "using {} ({:?}), anisotropic filtering: {anisotropic}",
            info.name,
            info.backend
        );

        Ok(Self {
            device,
            queue,
            format,
            max_anisotropy: if anisotropic {
                MAX_SAMPLER_ANISOTROPY
            } else {
                1
            },
        })
    }

    /// Blocking variant of [`RenderContext::new`].
    ///
    /// # Errors
    ///
    /// See [`RenderContext::new`].
    pub fn new_blocking(
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderContextError> {
        pollster::block_on(Self::new(format))
    }

    /// Create a render context from an externally-owned device and queue.
    ///
    /// The owner knows the adapter; pass its downlevel flags so anisotropy
    /// support is reported correctly.
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        downlevel: wgpu::DownlevelFlags,
    ) -> Self {
        let max_anisotropy =
            if downlevel.contains(wgpu::DownlevelFlags::ANISOTROPIC_FILTERING) {
                MAX_SAMPLER_ANISOTROPY
            } else {
                1
            };
        Self {
            device,
            queue,
            format,
            max_anisotropy,
        }
    }

    /// Highest sampler anisotropy the hardware supports (≥ 1).
    #[must_use]
    pub fn max_anisotropy(&self) -> u16 {
        self.max_anisotropy
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}
