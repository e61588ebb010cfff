use std::path::Path;

/// Decoded sprite pixels, tightly packed RGBA8, rows top to bottom.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Decode an image file. RGB and grayscale sources are expanded to RGBA.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Load `path`, or fall back to a single opaque white texel so the quad
    /// still draws when the file is missing or unreadable.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(img) => {
                log::info!("Loaded texture {} ({}x{})", path.display(), img.width, img.height);
                img
            }
            Err(e) => {
                log::error!("Failed to load texture {}: {e}", path.display());
                Self::fallback()
            }
        }
    }

    /// Keep the image if both sides fit in `max_dimension` texels, otherwise
    /// log and swap in the fallback.
    pub fn fit_or_fallback(self, max_dimension: u32) -> Self {
        if self.width <= max_dimension && self.height <= max_dimension {
            return self;
        }
        log::error!(
            "Failed to load texture: {}x{} exceeds {max_dimension}",
            self.width,
            self.height
        );
        Self::fallback()
    }

    pub fn fallback() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![0xFF; 4],
        }
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// GPU copy of a sprite image plus the sampler used to read it.
pub struct SpriteTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SpriteTexture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &SpriteImage) -> Self {
        let size = image.extent();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
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
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Mirrored repeat so UVs outside [0, 1] reflect instead of smearing the edge.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_one_white_texel() {
        let img = SpriteImage::fallback();
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.rgba, vec![255, 255, 255, 255]);
    }

    #[test]
    fn oversized_image_falls_back() {
        let wide = SpriteImage {
            width: 9,
            height: 1,
            rgba: vec![0; 9 * 4],
        };
        let img = wide.fit_or_fallback(8);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.rgba, vec![255; 4]);

        let tall = SpriteImage {
            width: 1,
            height: 9,
            rgba: vec![0; 9 * 4],
        };
        assert_eq!(tall.fit_or_fallback(8).height, 1);
    }

    #[test]
    fn image_at_limit_is_kept() {
        let img = SpriteImage {
            width: 8,
            height: 8,
            rgba: vec![7; 8 * 8 * 4],
        };
        let kept = img.fit_or_fallback(8);
        assert_eq!((kept.width, kept.height), (8, 8));
        assert_eq!(kept.rgba[0], 7);
    }

    #[test]
    fn missing_file_falls_back() {
        let img = SpriteImage::load_or_fallback("definitely/not/here.png");
        assert_eq!(img.rgba.len(), 4);
    }

    #[test]
    fn rgb_source_expands_to_rgba() {
        let path = std::env::temp_dir().join(format!("huebounce_rgb_{}.png", std::process::id()));
        let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        rgb.save(&path).unwrap();

        let img = SpriteImage::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.rgba.len(), 3 * 2 * 4);
        assert_eq!(&img.rgba[..4], &[10, 20, 30, 255]);
    }
}
