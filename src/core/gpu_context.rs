use std::sync::Arc;

use wgpu::{Adapter, Device, Instance, Queue, Surface};

use crate::error::{BackdropError, Result};

/// Shared GPU device and queue
///
/// Cloning is cheap (Arc), so every surface created by a host can share
/// one device.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a context whose adapter can present to `surface`
    pub async fn new_with_surface(instance: &Instance, surface: &Surface<'_>) -> Result<Self> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let info = adapter.get_info();
        log::info!("Using {} ({:?})", info.name, info.backend);

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| BackdropError::Gpu(format!("no suitable adapter: {e}")))
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await?;
        Ok((device, queue))
    }
}
