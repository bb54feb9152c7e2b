use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RlsfKernelParams;
use super::pipeline::{GpuRlsfPipeline, WORKGROUP_SIZE};
use super::work_image::WorkImage;
use crate::prelude::*;

/// GPU shader parameters buffer layout.
/// Must match the WGSL struct exactly (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GpuParams {
    rows: u32,
    cols: u32,
    radius: u32,
    alpha: u32,
    two_sigma_sq: f32,
    max_iterations: u32,
    margin: u32,
    _padding: u32,
}

/// Runs the filter as a compute shader, one invocation per pixel.
///
/// The packed input is uploaded, the kernel runs over a 2-D grid of 16x16
/// workgroups, and the result is copied back after the device is idle.
pub(super) fn apply(
    params: &RlsfKernelParams,
    gpu: &Gpu,
    pipeline: &GpuRlsfPipeline,
    input: &WorkImage,
) -> Result<WorkImage> {
    let rows = input.rows();
    let cols = input.cols();
    if input.is_empty() {
        return WorkImage::new_black(rows, cols);
    }

    let device = gpu.device();
    let queue = gpu.queue();

    let size = std::mem::size_of_val(input.pixels()) as u64;
    gpu.check_storage_size(size)?;

    let workgroups_x = (cols as u32).div_ceil(WORKGROUP_SIZE);
    let workgroups_y = (rows as u32).div_ceil(WORKGROUP_SIZE);
    gpu.check_dispatch(workgroups_x, workgroups_y)?;

    let uniform_params = GpuParams {
        rows: rows as u32,
        cols: cols as u32,
        radius: params.radius,
        alpha: params.alpha,
        two_sigma_sq: params.two_sigma_sq,
        max_iterations: params.max_iterations,
        margin: params.margin,
        _padding: 0,
    };

    let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("rlsf_params_buffer"),
        contents: bytemuck::bytes_of(&uniform_params),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let input_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("rlsf_input_buffer"),
        contents: bytemuck::cast_slice(input.pixels()),
        usage: wgpu::BufferUsages::STORAGE,
    });

    // wgpu zero-initializes new buffers, so skipped border pixels read back as black
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("rlsf_output_buffer"),
        size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("rlsf_bind_group"),
        layout: &pipeline.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output_buffer.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("rlsf_encoder"),
    });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("rlsf_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline.compute_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(workgroups_x, workgroups_y, 1);
    }

    let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("rlsf_staging_buffer"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, size);

    queue.submit(std::iter::once(encoder.finish()));

    let pixels = gpu.read_buffer::<PackedRgb>(&staging_buffer, rows * cols)?;

    Ok(WorkImage::from_packed(rows, cols, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::test_gpu;
    use crate::ops::rlsf::Rlsf;

    #[test]
    fn params_layout_is_32_bytes() {
        assert_eq!(std::mem::size_of::<GpuParams>(), 32);
    }

    #[test]
    fn test_gpu_border_stays_black() {
        let Some(gpu) = test_gpu() else {
            return;
        };
        let pipeline = GpuRlsfPipeline::new(&gpu).unwrap();

        let work = WorkImage::from_packed(7, 9, vec![PackedRgb::pack(Rgb8::WHITE); 63]);
        let params = Rlsf::new(1, 3, 20.0, 3).kernel_params().unwrap();

        let output = apply(&params, &gpu, &pipeline, &work).unwrap();
        for row in 0..7 {
            for col in 0..9 {
                let inside = (2..5).contains(&row) && (2..7).contains(&col);
                let expected = if inside { Rgb8::WHITE } else { Rgb8::BLACK };
                assert_eq!(output.get(row, col).unpack(), expected, "({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_gpu_pipeline_reuse() {
        let Some(gpu) = test_gpu() else {
            return;
        };
        let pipeline = GpuRlsfPipeline::new(&gpu).unwrap();
        let work = WorkImage::from_packed(6, 6, vec![PackedRgb::pack(Rgb8::new(1, 2, 3)); 36]);

        let first = apply(&Rlsf::default().kernel_params().unwrap(), &gpu, &pipeline, &work);
        let second = apply(
            &Rlsf::new(1, 1, 10.0, 1).kernel_params().unwrap(),
            &gpu,
            &pipeline,
            &work,
        );
        assert!(first.is_ok());
        assert!(second.is_ok());
    }
}
