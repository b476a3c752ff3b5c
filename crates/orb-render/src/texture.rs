//! Texture decoding, mip generation, upload and caching.
//!
//! Images are decoded with the `image` crate, mipmapped on the CPU, and
//! uploaded as `Rgba8UnormSrgb`. Textures are cached by name for the life of
//! the renderer, so switching scenes never decodes the same file twice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },

    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A resident GPU texture and its default view.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

/// Stand-ins used when an image is missing or cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// 1×1 white; leaves the material color untouched.
    White,
    Day,
    Night,
    Clouds,
}

impl Placeholder {
    const WIDTH: u32 = 128;
    const HEIGHT: u32 = 64;

    /// Procedural equirectangular image that reads as the right kind of map.
    #[must_use]
    pub fn image(self) -> RgbaImage {
        if self == Self::White {
            return RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        }
        RgbaImage::from_fn(Self::WIDTH, Self::HEIGHT, |x, y| {
            let lon = x as f32 / Self::WIDTH as f32 * std::f32::consts::TAU;
            let lat = (y as f32 / Self::HEIGHT as f32 - 0.5) * std::f32::consts::PI;
            let land = (lon * 3.0).sin() * (lat * 4.0).cos() + (lon * 7.0 + lat * 5.0).sin() * 0.4;
            let pixel = match self {
                Self::Day if lat.abs() > 1.3 => [235, 240, 245],
                Self::Day if land > 0.35 => [70, 110, 50],
                Self::Day => [20, 50, 110],
                Self::Night if land > 0.35 && (x * 7 + y * 13) % 11 == 0 => [255, 200, 120],
                Self::Night => [4, 6, 14],
                Self::Clouds => {
                    let c = ((lon * 5.0 + lat * 9.0).sin() * (lat * 6.0).cos()).max(0.0);
                    let v = (c * 255.0) as u8;
                    [v, v, v]
                }
                Self::White => [255, 255, 255],
            };
            image::Rgba([pixel[0], pixel[1], pixel[2], 255])
        })
    }
}

/// Number of mip levels for a full chain down to 1×1.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Base image followed by successively halved levels.
#[must_use]
pub fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut chain = vec![base];
    while let Some(prev) = chain.last()
        && (prev.width() > 1 || prev.height() > 1)
    {
        let (w, h) = ((prev.width() / 2).max(1), (prev.height() / 2).max(1));
        let next = image::imageops::resize(prev, w, h, image::imageops::FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// Decode an image file into RGBA8.
pub fn decode_image(path: &Path) -> Result<RgbaImage, TextureError> {
    let img = image::open(path).map_err(|source| TextureError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Name-keyed cache of uploaded textures.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Arc<ManagedTexture>>,
}

impl TextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ManagedTexture>> {
        self.textures.get(name).cloned()
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    /// Upload `image` under `name`, or return the cached texture.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: RgbaImage,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }

        let (width, height) = image.dimensions();
        validate_dimensions(width, height, device.limits().max_texture_dimension_2d)?;

        let levels = mip_chain(image);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, img) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                img.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * img.width()),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: img.width(),
                    height: img.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let managed = Arc::new(ManagedTexture {
            texture,
            view,
            dimensions: (width, height),
            mip_level_count: levels.len() as u32,
        });
        self.textures.insert(name.to_string(), Arc::clone(&managed));
        log::info!(
            "Uploaded texture '{name}' ({width}x{height}, {} mips)",
            levels.len()
        );
        Ok(managed)
    }

    /// Load `path` keyed by its display string. Falls back to `placeholder`
    /// with a warning when the file is missing, undecodable or oversized.
    pub fn load_or_placeholder(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        placeholder: Placeholder,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        let name = path.display().to_string();
        if let Some(existing) = self.get(&name) {
            return Ok(existing);
        }
        match decode_image(path).and_then(|img| self.upload(device, queue, &name, img)) {
            Ok(texture) => Ok(texture),
            Err(err) => {
                log::warn!("{err}; using {placeholder:?} placeholder");
                let texture = self.placeholder(device, queue, placeholder)?;
                self.textures.insert(name, Arc::clone(&texture));
                Ok(texture)
            }
        }
    }

    /// The shared 1×1 white texture.
    pub fn white(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        self.placeholder(device, queue, Placeholder::White)
    }

    fn placeholder(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        kind: Placeholder,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        let key = format!("placeholder:{kind:?}");
        match self.get(&key) {
            Some(texture) => Ok(texture),
            None => self.upload(device, queue, &key, kind.image()),
        }
    }
}

fn validate_dimensions(width: u32, height: u32, limit: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > limit || height > limit {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device_queue;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(2048, 1024), 12);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn test_mip_chain_halves_to_one() {
        let chain = mip_chain(RgbaImage::new(16, 4));
        let sizes: Vec<_> = chain.iter().map(|i| i.dimensions()).collect();
        assert_eq!(sizes, vec![(16, 4), (8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(matches!(
            validate_dimensions(0, 4, 8192),
            Err(TextureError::ZeroDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(16384, 8, 8192),
            Err(TextureError::TooLarge { .. })
        ));
        assert!(validate_dimensions(2048, 1024, 8192).is_ok());
    }

    #[test]
    fn test_placeholder_shapes() {
        assert_eq!(Placeholder::White.image().dimensions(), (1, 1));
        let day = Placeholder::Day.image();
        assert_eq!(day.dimensions(), (128, 64));
        assert!(day.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_night_placeholder_is_darker_than_day() {
        let mean = |img: RgbaImage| {
            img.pixels()
                .map(|p| p.0[..3].iter().map(|&c| u64::from(c)).sum::<u64>())
                .sum::<u64>()
        };
        assert!(mean(Placeholder::Night.image()) < mean(Placeholder::Day.image()));
    }

    #[test]
    fn test_decode_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2k_earth_daymap.jpg");
        let err = decode_image(&path).unwrap_err();
        assert!(err.to_string().contains("2k_earth_daymap.jpg"));
    }

    #[test]
    fn test_decode_png_roundtrip_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let img = decode_image(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_cache_falls_back_and_dedupes() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut cache = TextureCache::new();
        let missing = Path::new("/nonexistent/2k_earth_clouds.jpg");
        let a = cache
            .load_or_placeholder(&device, &queue, missing, Placeholder::Clouds)
            .unwrap();
        let b = cache
            .load_or_placeholder(&device, &queue, missing, Placeholder::Clouds)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.dimensions, (128, 64));
        assert_eq!(a.mip_level_count, 8);
    }
}
