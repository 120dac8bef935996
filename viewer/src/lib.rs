//! Globe viewer
//!
//! Renders a textured globe inside a textured space sphere with wgpu and
//! lets the user orbit it with the mouse.
//!
//! - [`app`] - window and event loop
//! - [`cli`] - command-line entry points
//! - [`graphics`] - wgpu device, pipelines, buffers and textures
//! - [`scene`] - the two spheres and their GPU resources

pub mod app;
pub mod cli;
pub mod graphics;
pub mod scene;
