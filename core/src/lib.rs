//! Globe core - GPU-free building blocks for the globe viewer
//!
//! Everything in this crate is plain computation so it can be tested without a
//! window or graphics device:
//!
//! - [`procedural`]: the UV-sphere mesh generator and mesh export helpers
//! - [`config`]: `config.toml` loading, saving and validation
//! - [`camera`]: orbit camera state and matrix math
//! - [`input`]: pointer drag/scroll accumulation between frames

pub mod camera;
pub mod config;
pub mod input;
pub mod procedural;

pub use procedural::{GenerationError, Mesh, SphereSpec, generate};
