use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::Release;

/// Decoded RGBA8 pixels, rows ordered bottom-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
pub enum TextureLoadError {
    Io { path: PathBuf, source: io::Error },
    Decode(image::ImageError),
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureLoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            TextureLoadError::Decode(e) => write!(f, "failed to decode image: {e}"),
        }
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureLoadError::Io { source, .. } => Some(source),
            TextureLoadError::Decode(e) => Some(e),
        }
    }
}

/// Decodes an encoded image and flips it vertically, so the first row in
/// memory is the bottom of the picture and `v = 0` samples the bottom edge.
///
/// Any channel layout is expanded to RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<TextureImage, TextureLoadError> {
    let img = image::load_from_memory(bytes).map_err(TextureLoadError::Decode)?;
    let rgba = img.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

pub fn load_image(path: &Path) -> Result<TextureImage, TextureLoadError> {
    let bytes = std::fs::read(path).map_err(|source| TextureLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}

/// 2D texture plus the linear sampler the quad program reads it with.
pub struct QuadTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl QuadTexture {
    /// Uploads `image` into a new texture; bytes are sampled as stored.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &TextureImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = create_texture(device, label, size);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        log::info!("texture '{label}' uploaded: {}x{}", image.width, image.height);
        Self::finish(device, texture)
    }

    /// 1x1 texture that is allocated but never written; sampling it yields
    /// whatever the backend zero-initialized it to.
    pub fn placeholder(device: &wgpu::Device, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };
        let texture = create_texture(device, label, size);
        Self::finish(device, texture)
    }

    /// Loads `path`, or falls back to [`QuadTexture::placeholder`] with a
    /// warning when the file is missing or cannot be decoded.
    pub fn load_or_placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Self {
        let label = path.display().to_string();
        match load_image(path) {
            Ok(image) => Self::from_image(device, queue, &label, &image),
            Err(e) => {
                log::warn!("{e}; drawing with an empty texture");
                Self::placeholder(device, &label)
            }
        }
    }

    fn finish(device: &wgpu::Device, texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessel quad sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

}

impl Release for QuadTexture {
    fn release(self) {
        self.texture.destroy();
        log::debug!("released texture");
    }
}

fn create_texture(device: &wgpu::Device, label: &str, size: wgpu::Extent3d) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}
