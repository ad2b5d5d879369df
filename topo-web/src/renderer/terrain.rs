//! Terrain rendering - tick the scene, upload uniforms, draw the grid

use super::state::GPU_STATE;
use super::uniform_block::TerrainUniformBlock;
use crate::bridge;
use crate::terrain::Rgb;

fn clear_color([r, g, b]: Rgb) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

/// Advance the scene by `dt` seconds and draw it.
/// Dynamics keep running before the GPU is ready.
pub fn render_frame(dt: f32) {
    let frame = bridge::tick_scene(dt);

    GPU_STATE.with(|state_cell| {
        let mut state_ref = state_cell.borrow_mut();
        let state = match state_ref.as_mut() {
            Some(s) => s,
            None => return,
        };

        state.ensure_mesh(frame.uniforms.plane_size, frame.plane_segments);

        let block = TerrainUniformBlock::from_snapshot(&frame);
        state
            .queue
            .write_buffer(&state.uniform_buffer, 0, bytemuck::bytes_of(&block));

        // Get surface and render
        let output = match state.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.surface.configure(&state.device, &state.config);
                return;
            }
            Err(e) => {
                log::warn!("⚠️ Skipping frame: {}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") }
        );

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Terrain Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(frame.background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&state.render_pipeline);
            pass.set_bind_group(0, &state.bind_group, &[]);
            pass.set_vertex_buffer(0, state.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(state.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..state.mesh.index_count, 0, 0..1);
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    });
}
