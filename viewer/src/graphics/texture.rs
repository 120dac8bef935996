//! Sphere texture loading
//!
//! Decodes equirectangular images into RGBA8 and uploads them. A missing or
//! broken image never stops the viewer: the sphere gets a magenta/black
//! checkerboard instead and a warning is logged.

use std::path::{Path, PathBuf};

use thiserror::Error;
use wgpu::util::DeviceExt;

/// Side length of the fallback checkerboard
pub const CHECKERBOARD_SIZE: u32 = 8;

/// Why an image could not be used as a texture
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {path} is {width}x{height}, the device allows at most {max}x{max}")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Decoded RGBA8 pixels, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TexturePixels {
    /// Magenta/black checkerboard used for missing textures
    pub fn checkerboard() -> Self {
        let size = CHECKERBOARD_SIZE;
        let mut rgba = vec![0u8; (size * size * 4) as usize];
        for y in 0..size {
            for x in 0..size {
                let idx = ((y * size + x) * 4) as usize;
                let is_magenta = (x + y) % 2 == 0;
                if is_magenta {
                    rgba[idx] = 255; // R
                    rgba[idx + 2] = 255; // B
                }
                rgba[idx + 3] = 255; // A
            }
        }

        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// RGBA value of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }
}

/// Decode an image file into RGBA8
///
/// Any format the `image` features enable (PNG, JPEG) is accepted; the format
/// is detected from the file contents, not the extension.
pub fn decode(path: &Path, max_dimension: u32) -> Result<TexturePixels, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let image = image::load_from_memory(&bytes)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max: max_dimension,
        });
    }

    Ok(TexturePixels {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Decode an image file, falling back to the checkerboard on any failure
pub fn decode_or_checkerboard(path: &Path, max_dimension: u32) -> TexturePixels {
    match decode(path, max_dimension) {
        Ok(pixels) => {
            tracing::info!(
                "Loaded texture {} ({}x{})",
                path.display(),
                pixels.width,
                pixels.height
            );
            pixels
        }
        Err(e) => {
            tracing::warn!("{e}; using checkerboard");
            TexturePixels::checkerboard()
        }
    }
}

/// Uploaded texture and its default view
pub struct SphereTexture {
    #[allow(dead_code)] // Keeps the texture alive for `view`
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl SphereTexture {
    /// Upload decoded pixels as an sRGB texture
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &TexturePixels,
        label: &str,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: pixels.width,
                    height: pixels.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &pixels.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        tracing::debug!(
            "Uploaded texture '{}': {}x{}, {} bytes",
            label,
            pixels.width,
            pixels.height,
            pixels.rgba.len()
        );

        Self { texture, view }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Sampler for equirectangular textures
///
/// `u` repeats across the seam; `v` clamps so the poles never pick up the
/// opposite edge of the image.
pub fn create_sphere_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Sphere Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
