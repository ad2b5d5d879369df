//! GPU State management - WebGPU device, queue, surface initialization

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use super::mesh::{TerrainMesh, Vertex};
use super::uniform_block::TerrainUniformBlock;
use crate::bridge;

/// Device pixel ratio is capped here to bound fragment cost
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Screens denser than this render at this ratio instead
const HIGH_DPR_CAP: f64 = 1.75;

/// Backing-store scale for a reported `devicePixelRatio`
fn pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if !device_pixel_ratio.is_finite() {
        return 1.0;
    }
    if device_pixel_ratio > HIGH_DPR_CAP {
        return HIGH_DPR_CAP;
    }
    device_pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
}

/// Errors that can occur during GPU initialization
#[derive(Debug, thiserror::Error)]
pub enum GpuStateError {
    #[error("No window found")]
    NoWindow,
    #[error("No document found")]
    NoDocument,
    #[error("No canvas with id '{0}' found")]
    NoCanvas(String),
    #[error("Surface creation failed: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to find a suitable GPU adapter")]
    NoAdapter,
    #[error("Device creation failed: {0}")]
    DeviceCreationFailed(String),
}

impl From<GpuStateError> for JsValue {
    fn from(err: GpuStateError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Holds all WebGPU state for rendering
pub(crate) struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub mesh: TerrainMesh,
    pub max_dimension: u32,
}

impl GpuState {
    /// Reconfigure the surface; zero sizes are clamped to one pixel
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.clamp(1, self.max_dimension);
        self.config.height = height.clamp(1, self.max_dimension);
        self.surface.configure(&self.device, &self.config);
    }

    /// Rebuild the grid when plane size or resolution changed
    pub fn ensure_mesh(&mut self, size: f32, segments: u32) {
        if !self.mesh.matches(size, segments) {
            self.mesh = TerrainMesh::new(&self.device, size, segments);
        }
    }
}

// Thread-local storage for GPU state (WASM is single-threaded)
thread_local! {
    pub(crate) static GPU_STATE: RefCell<Option<GpuState>> = RefCell::new(None);
}

#[cfg(target_arch = "wasm32")]
fn create_surface(
    instance: &wgpu::Instance,
    canvas: web_sys::HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, GpuStateError> {
    instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
        .map_err(|e| GpuStateError::SurfaceCreationFailed(format!("{:?}", e)))
}

// Canvas surfaces only exist in the browser; native builds (unit tests) never get here
#[cfg(not(target_arch = "wasm32"))]
fn create_surface(
    _instance: &wgpu::Instance,
    _canvas: web_sys::HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, GpuStateError> {
    Err(GpuStateError::SurfaceCreationFailed("canvas surfaces need a wasm32 target".into()))
}

/// Initialize WebGPU: adapter, device, surface, pipeline, terrain mesh
pub async fn initialize_gpu(canvas_id: &str) -> Result<(), GpuStateError> {
    let window = web_sys::window().ok_or(GpuStateError::NoWindow)?;
    let document = window.document().ok_or(GpuStateError::NoDocument)?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| GpuStateError::NoCanvas(canvas_id.to_string()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| GpuStateError::NoCanvas(canvas_id.to_string()))?;

    let pixel_ratio = pixel_ratio(window.device_pixel_ratio());
    let width = ((canvas.client_width().max(1) as f64) * pixel_ratio) as u32;
    let height = ((canvas.client_height().max(1) as f64) * pixel_ratio) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });

    let surface = create_surface(&instance, canvas)?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuStateError::NoAdapter)?;

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Topography Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        )
        .await
        .map_err(|e| GpuStateError::DeviceCreationFailed(format!("{:?}", e)))?;

    // Configure surface
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| GpuStateError::SurfaceCreationFailed("no surface formats".into()))?;
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let max_dimension = device.limits().max_texture_dimension_2d;
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: width.clamp(1, max_dimension),
        height: height.clamp(1, max_dimension),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    // Uniforms
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Terrain Uniform Buffer"),
        size: std::mem::size_of::<TerrainUniformBlock>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Terrain Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Terrain Bind Group"),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    // Create shader and pipeline
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Terrain Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("terrain.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    // Additive: lines glow over the clear color, gaps are discarded
    let additive = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    };

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Terrain Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(additive),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let (plane_size, segments) = bridge::with_scene(|scene| {
        scene.set_viewport(config.width as f32, config.height as f32);
        (scene.config().plane.size, scene.config().plane.segments)
    });
    let mesh = TerrainMesh::new(&device, plane_size, segments);

    log::info!(
        "🖥️ Surface {}x{} ({:?}), grid {}x{}",
        config.width,
        config.height,
        surface_format,
        segments,
        segments
    );

    GPU_STATE.with(|state| {
        *state.borrow_mut() = Some(GpuState {
            device,
            queue,
            surface,
            config,
            render_pipeline,
            uniform_buffer,
            bind_group,
            mesh,
            max_dimension,
        });
    });

    Ok(())
}

/// Resize the drawing surface (physical pixels) and the camera aspect
#[wasm_bindgen]
pub fn resize(width: u32, height: u32) {
    bridge::with_scene(|scene| scene.set_viewport(width as f32, height as f32));
    GPU_STATE.with(|state| {
        if let Some(state) = state.borrow_mut().as_mut() {
            state.resize(width, height);
        }
    });
}

/// Drop all GPU resources
pub fn release_gpu() {
    let state = GPU_STATE.with(|state| state.borrow_mut().take());
    if state.is_some() {
        log::info!("🧹 GPU resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_dpr_screens_render_at_reduced_ratio() {
        assert_eq!(pixel_ratio(3.0), HIGH_DPR_CAP);
        assert_eq!(pixel_ratio(2.0), HIGH_DPR_CAP);
        assert_eq!(pixel_ratio(1.75), 1.75);
    }

    #[test]
    fn test_low_and_invalid_dpr() {
        assert_eq!(pixel_ratio(1.5), 1.5);
        assert_eq!(pixel_ratio(1.0), 1.0);
        assert_eq!(pixel_ratio(0.5), 1.0);
        assert_eq!(pixel_ratio(f64::NAN), 1.0);
        assert_eq!(pixel_ratio(f64::INFINITY), 1.0);
    }
}
