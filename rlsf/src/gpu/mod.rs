use std::sync::Arc;
use std::sync::mpsc;

use bytemuck::Pod;

use crate::common::error::try_alloc_zeroed;
use crate::common::{Error, Result};

/// Shared wgpu device and queue used by the compute backends.
///
/// Cloning is cheap; clones submit to the same queue.
#[derive(Debug, Clone)]
pub struct Gpu {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    adapter_name: Arc<str>,
}

impl Gpu {
    /// Picks the high-performance adapter and opens a device with default limits.
    pub fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| Error::Gpu(format!("no usable GPU adapter: {}", e)))?;

        let info = adapter.get_info();
        tracing::debug!(adapter = %info.name, backend = ?info.backend, "GPU adapter selected");

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("rlsf_device"),
                ..Default::default()
            }))
            .map_err(|e| Error::Gpu(format!("failed to open device on {}: {}", info.name, e)))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_name: info.name.into(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Fails if `bytes` exceeds the largest storage buffer binding.
    pub fn check_storage_size(&self, bytes: u64) -> Result<()> {
        let limit = self.device.limits().max_storage_buffer_binding_size as u64;
        if bytes > limit {
            return Err(Error::Gpu(format!(
                "{} needs a {} byte storage binding, limit is {}",
                self.adapter_name, bytes, limit
            )));
        }
        Ok(())
    }

    /// Fails if a 2-D dispatch of `x` by `y` workgroups exceeds the device limit.
    pub fn check_dispatch(&self, x: u32, y: u32) -> Result<()> {
        let limit = self.device.limits().max_compute_workgroups_per_dimension;
        if x > limit || y > limit {
            return Err(Error::Gpu(format!(
                "dispatch of {}x{} workgroups exceeds {} per dimension on {}",
                x, y, limit, self.adapter_name
            )));
        }
        Ok(())
    }

    /// Blocks until all submitted work has finished and pending map callbacks have fired.
    pub fn wait(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait)
            .map(|_| ())
            .map_err(|e| Error::Gpu(format!("device poll failed: {}", e)))
    }

    /// Maps a `MAP_READ` buffer after submitted work finishes and copies its
    /// first `len` elements into a new vector.
    ///
    /// `size_of::<T>()` must be a multiple of 4 to satisfy the map alignment.
    pub(crate) fn read_buffer<T: Pod + Default>(
        &self,
        buffer: &wgpu::Buffer,
        len: usize,
    ) -> Result<Vec<T>> {
        let mut out = try_alloc_zeroed::<T>(len)?;
        let byte_len = std::mem::size_of_val(out.as_slice()) as u64;
        if byte_len > buffer.size() {
            return Err(Error::Gpu(format!(
                "readback of {} bytes from a {} byte buffer",
                byte_len,
                buffer.size()
            )));
        }
        if len == 0 {
            return Ok(out);
        }

        let (sender, receiver) = mpsc::channel();
        let slice = buffer.slice(..byte_len);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.wait()?;

        receiver
            .recv()
            .map_err(|_| Error::Gpu("buffer map callback was dropped".to_string()))?
            .map_err(|e| Error::Gpu(format!("failed to map buffer: {}", e)))?;

        {
            let data = slice.get_mapped_range();
            out.copy_from_slice(bytemuck::try_cast_slice(&data[..])?);
        }
        buffer.unmap();

        Ok(out)
    }
}
