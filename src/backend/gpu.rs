use std::sync::mpsc;

use crate::backend::PlaneKernel;
use crate::deint::parity::Parity;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::plane::{PlaneView, PlaneViewMut};

const WORKGROUP_SIZE: usize = 16;
const PARAMS_SIZE: u64 = 32;

/// wgpu compute implementation.
///
/// Device, queue and pipeline live as long as the kernel. Plane buffers are created per call and
/// destroyed before the call returns.
pub struct GpuKernel {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuKernel {
    /// Acquire an adapter and build the compute pipeline.
    ///
    /// Fails with a backend error containing `no gpu adapter available` when none is found.
    pub fn new() -> DeintResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                DeintError::backend("no gpu adapter available")
            }
            other => DeintError::backend(format!("wgpu request_adapter failed: {other:?}")),
        })?;
        tracing::debug!(adapter = %adapter.get_info().name, "gpu adapter selected");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("tapdeint_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| DeintError::backend(format!("wgpu request_device failed: {e:?}")))?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tapdeint_bob_bgl"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(PARAMS_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tapdeint_bob_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("bob.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tapdeint_bob_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("tapdeint_bob_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
        })
    }
}

impl PlaneKernel for GpuKernel {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn interpolate(
        &self,
        src: PlaneView<'_>,
        mut dst: PlaneViewMut<'_>,
        missing: Parity,
        is_chroma: bool,
    ) -> DeintResult<()> {
        if src.width() != dst.width() || src.height() != dst.height() {
            return Err(DeintError::validation(format!(
                "plane geometry mismatch: src {}x{}, dst {}x{}",
                src.width(),
                src.height(),
                dst.width(),
                dst.height()
            )));
        }
        let (width, height) = (src.width(), src.height());
        if width == 0 || height == 0 {
            return Ok(());
        }

        let words_per_row = width.div_ceil(4);
        let row_bytes = words_per_row * 4;
        let mut packed = vec![0u8; row_bytes * height];
        for (y, row) in packed.chunks_exact_mut(row_bytes).enumerate() {
            row[..width].copy_from_slice(src.row(y));
        }
        let params: Vec<u8> = [
            width as u32,
            height as u32,
            words_per_row as u32,
            missing.as_u32(),
            u32::from(is_chroma),
            0,
            0,
            0,
        ]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffers = PlaneBuffers::new(&self.device, packed.len() as u64);
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            let _ = pollster::block_on(self.device.pop_error_scope());
            return Err(DeintError::resource(format!(
                "gpu plane buffers ({} bytes): {err}",
                packed.len()
            )));
        }

        self.queue.write_buffer(&buffers.src, 0, &packed);
        self.queue.write_buffer(&buffers.params, 0, &params);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tapdeint_bob_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.src.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.dst.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.params.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tapdeint_bob_encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("tapdeint_bob_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(
                words_per_row.div_ceil(WORKGROUP_SIZE) as u32,
                height.div_ceil(WORKGROUP_SIZE) as u32,
                1,
            );
        }
        encoder.copy_buffer_to_buffer(&buffers.dst, 0, &buffers.readback, 0, packed.len() as u64);
        self.queue.submit(Some(encoder.finish()));

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(DeintError::backend(format!("gpu dispatch failed: {err}")));
        }

        let slice = buffers.readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| DeintError::backend(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| DeintError::backend("readback channel closed"))?
            .map_err(|e| DeintError::backend(format!("readback map failed: {e:?}")))?;

        {
            let mapped = slice.get_mapped_range();
            for (y, row) in mapped.chunks_exact(row_bytes).enumerate() {
                dst.row_mut(y).copy_from_slice(&row[..width]);
            }
        }
        buffers.readback.unmap();
        Ok(())
    }
}

/// Device buffers for one plane; destroyed on drop.
struct PlaneBuffers {
    src: wgpu::Buffer,
    dst: wgpu::Buffer,
    readback: wgpu::Buffer,
    params: wgpu::Buffer,
}

impl PlaneBuffers {
    fn new(device: &wgpu::Device, size: u64) -> Self {
        let make = |label: &str, size: u64, usage: wgpu::BufferUsages| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            })
        };
        Self {
            src: make(
                "tapdeint_src",
                size,
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            ),
            dst: make(
                "tapdeint_dst",
                size,
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            ),
            readback: make(
                "tapdeint_readback",
                size,
                wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            ),
            params: make(
                "tapdeint_params",
                PARAMS_SIZE,
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            ),
        }
    }
}

impl Drop for PlaneBuffers {
    fn drop(&mut self) {
        self.src.destroy();
        self.dst.destroy();
        self.readback.destroy();
        self.params.destroy();
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
