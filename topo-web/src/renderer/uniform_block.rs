//! GPU uniform block - std140-compatible copy of one frame snapshot
//!
//! Field order and padding mirror `Uniforms` in terrain.wgsl.

use crate::scene::FrameSnapshot;
use crate::terrain::CRIMSON;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainUniformBlock {
    pub view_proj: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub line_color: [f32; 4],
    pub tint_color: [f32; 4],
    pub noise_offset: [f32; 2],
    pub noise_drift: [f32; 2],
    pub ripple_center: [f32; 2],
    pub plane_size: f32,
    pub time: f32,
    pub noise_scale: f32,
    pub line_step: f32,
    pub line_thickness: f32,
    pub emissive_strength: f32,
    pub ripple_strength: f32,
    pub ripple_freq: f32,
    pub ripple_decay: f32,
    pub ripple_speed: f32,
    /// Sentinel-encoded; see `HeightFieldUniforms::global_ripple_start_encoded`
    pub global_ripple_start: f32,
    pub red_tint: f32,
    pub peakyness: f32,
    pub _pad: f32,
}

fn rgba([r, g, b]: [f32; 3]) -> [f32; 4] {
    [r, g, b, 1.0]
}

impl TerrainUniformBlock {
    pub fn from_snapshot(frame: &FrameSnapshot) -> Self {
        let u = &frame.uniforms;
        Self {
            view_proj: frame.view_projection.into(),
            base_color: rgba(u.base_color),
            line_color: rgba(u.line_color),
            tint_color: rgba(CRIMSON),
            noise_offset: [u.noise_offset.x, u.noise_offset.y],
            noise_drift: [u.noise_drift.x, u.noise_drift.y],
            ripple_center: u.ripple_center,
            plane_size: u.plane_size,
            time: u.time,
            noise_scale: u.noise_scale,
            line_step: u.line_step,
            line_thickness: u.line_thickness,
            emissive_strength: u.emissive_strength,
            ripple_strength: u.ripple_strength,
            ripple_freq: u.ripple_freq,
            ripple_decay: u.ripple_decay,
            ripple_speed: u.ripple_speed,
            global_ripple_start: u.global_ripple_start_encoded(),
            red_tint: u.red_tint,
            peakyness: u.peakyness,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TopographyScene;
    use crate::terrain::NO_GLOBAL_RIPPLE;

    #[test]
    fn test_block_size_is_multiple_of_16() {
        assert_eq!(std::mem::size_of::<TerrainUniformBlock>(), 192);
    }

    #[test]
    fn test_sentinel_and_matrix_layout() {
        let mut scene = TopographyScene::default();
        let frame = scene.tick(1.0 / 60.0);
        let block = TerrainUniformBlock::from_snapshot(&frame);

        assert_eq!(block.global_ripple_start, NO_GLOBAL_RIPPLE);
        // Column-major: translation lives in the last column
        let m = frame.view_projection;
        assert_eq!(block.view_proj[3][0], m[(0, 3)]);
        assert_eq!(block.view_proj[0][3], m[(3, 0)]);

        scene.set_fist(true);
        let frame = scene.tick(1.0 / 60.0);
        let block = TerrainUniformBlock::from_snapshot(&frame);
        assert!(block.global_ripple_start > 0.0);
    }
}
