//! Renderer module - WebGPU rendering for the contour terrain
//!
//! Re-exports only. All logic in submodules.

mod state;
mod mesh;
mod uniform_block;
mod terrain;

pub use state::{initialize_gpu, release_gpu, resize};
pub use terrain::render_frame;
