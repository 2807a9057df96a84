//! Board textures: decoded from disk with `image`, or generated when missing.

use std::path::Path;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use rand::Rng;
use tracing::warn;

use crate::error::AssetError;

/// Largest 2D texture side the renderer requests from the device.
pub fn max_texture_size() -> u32 {
    wgpu::Limits::downlevel_defaults().max_texture_dimension_2d
}

/// Downscales `image` so neither side exceeds `max_size`, keeping the aspect.
fn fit_within(image: RgbaImage, max_size: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_size {
        return image;
    }
    let scale = |side: u32| ((side as u64 * max_size as u64) / longest as u64).max(1) as u32;
    imageops::resize(&image, scale(width), scale(height), FilterType::Triangle)
}

/// Which procedural pattern to generate when a texture file is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Marble,
    Wood,
}

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes an image file, shrinking it to [`max_texture_size`] if needed.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path)
            .map_err(|source| AssetError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (original_width, original_height) = image.dimensions();
        let image = fit_within(image, max_texture_size());
        let (width, height) = image.dimensions();
        if (width, height) != (original_width, original_height) {
            warn!(
                path = %path.display(),
                original_width,
                original_height,
                width,
                height,
                "texture too large, downscaled"
            );
        }
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// A tileable grey-scale pattern: veined marble or ringed wood.
    pub fn generate<R: Rng>(surface: Surface, size: u32, rng: &mut R) -> Self {
        let phase: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        let scale = std::f32::consts::TAU / size as f32;

        for y in 0..size {
            for x in 0..size {
                let (u, v) = (x as f32 * scale, y as f32 * scale);
                let noise: f32 = rng.gen_range(-0.04..0.04);
                let (r, g, b) = match surface {
                    Surface::Marble => {
                        let vein = ((u + 2.0 * v.sin() + phase).sin() * 0.5 + 0.5).powf(6.0);
                        let shade = 0.92 - 0.45 * vein + noise;
                        (shade, shade, shade * 0.98)
                    }
                    Surface::Wood => {
                        let ring = ((v * 6.0 + (u * 2.0).sin() * 0.6 + phase).sin() * 0.5 + 0.5) * 0.25;
                        let shade = 0.45 + ring + noise;
                        (shade, shade * 0.68, shade * 0.42)
                    }
                };
                rgba.extend([r, g, b].map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8));
                rgba.push(255);
            }
        }

        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Uploads into a new sRGB texture and returns its default view.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            size,
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Repeating linear sampler so texture coordinates may run past 1.
pub fn create_repeat_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Board Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
