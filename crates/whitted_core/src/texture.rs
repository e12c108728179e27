//! Texture loading and caching for materials.
//!
//! Textures are decoded once, before rendering, into an immutable byte
//! buffer. Render threads only ever read them through an `Arc`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use whitted_math::{Color, Vec2};

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported texture layout: {0}")]
    UnsupportedFormat(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture.
///
/// Pixels are 8-bit, row-major, `channels` bytes per pixel, with row 0 at
/// `v = 0`.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
    path: String,
}

impl Texture {
    /// Create a texture from raw bytes, checking the buffer matches the
    /// declared dimensions.
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::UnsupportedFormat(format!(
                "{} channels",
                channels
            )));
        }
        if width == 0 || height == 0 {
            return Err(TextureError::UnsupportedFormat(format!(
                "empty image {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(TextureError::LoadError(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
            path: path.into(),
        })
    }

    /// Create a solid color texture (1x1, RGB).
    pub fn solid_color(color: Color) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            width: 1,
            height: 1,
            channels: 3,
            pixels: vec![to_byte(color.x), to_byte(color.y), to_byte(color.z)],
            path: "<solid>".to_string(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Nearest-neighbor lookup.
    ///
    /// UV is clamped to `[0, 1]` rather than wrapped. Values are returned as
    /// `byte / 255` with no color-space conversion. One- and two-channel
    /// images are read as grey.
    pub fn lookup(&self, uv: Vec2) -> Color {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);

        let x = (u * (self.width - 1) as f32).round() as usize;
        let y = (v * (self.height - 1) as f32).round() as usize;

        let stride = self.channels as usize;
        let offset = (y * self.width as usize + x) * stride;
        let texel = &self.pixels[offset..offset + stride];

        let channel = |i: usize| texel[i] as f32 / 255.0;
        match stride {
            1 | 2 => Color::splat(channel(0)),
            _ => Color::new(channel(0), channel(1), channel(2)),
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Cache for loaded textures.
///
/// Materials sharing an image path share one decoded buffer.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);

        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.channels,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Register an already decoded texture under a path.
    pub fn insert(&mut self, path: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(path.into(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file, keeping alpha only when the source has it.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let (width, height, channels, pixels) = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        (w, h, 4, rgba.into_raw())
    } else {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        (w, h, 3, rgb.into_raw())
    };

    Texture::new(width, height, channels, pixels, path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_2x2() -> Texture {
        // Row 0: red, green. Row 1: blue, white.
        let pixels = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        Texture::new(2, 2, 3, pixels, "checker").unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 1);

        let sample = tex.lookup(Vec2::new(0.3, 0.9));
        assert!((sample.x - 1.0).abs() < 0.01);
        assert!((sample.y - 0.5).abs() < 0.01);
        assert!(sample.z.abs() < 0.01);
    }

    #[test]
    fn test_lookup_nearest_texel() {
        let tex = checker_2x2();
        assert_eq!(tex.lookup(Vec2::new(0.0, 0.0)), Color::X);
        assert_eq!(tex.lookup(Vec2::new(1.0, 0.0)), Color::Y);
        assert_eq!(tex.lookup(Vec2::new(0.0, 1.0)), Color::Z);
        assert_eq!(tex.lookup(Vec2::new(0.9, 0.8)), Color::ONE);
    }

    #[test]
    fn test_lookup_clamps_instead_of_wrapping() {
        let tex = checker_2x2();
        // Wrapping would bring 1.1 back to the left column
        assert_eq!(tex.lookup(Vec2::new(1.1, -0.5)), Color::Y);
        assert_eq!(tex.lookup(Vec2::new(-3.0, 7.0)), Color::Z);
    }

    #[test]
    fn test_grey_texture() {
        let tex = Texture::new(1, 1, 1, vec![51], "grey").unwrap();
        assert!((tex.lookup(Vec2::ZERO) - Color::splat(0.2)).length() < 1e-6);
    }

    #[test]
    fn test_texture_rejects_bad_buffers() {
        assert!(matches!(
            Texture::new(2, 2, 3, vec![0; 11], "short"),
            Err(TextureError::LoadError(_))
        ));
        assert!(matches!(
            Texture::new(1, 1, 5, vec![0; 5], "five"),
            Err(TextureError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Texture::new(0, 4, 3, vec![], "empty"),
            Err(TextureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_texture_cache_insert_and_get() {
        let mut cache = TextureCache::new();
        assert!(cache.is_empty());

        cache.insert("checker.png", checker_2x2());
        assert_eq!(cache.len(), 1);

        // Cached entries never touch the filesystem
        let loaded = cache.load("checker.png").unwrap();
        assert_eq!(loaded.width(), 2);
        assert!(cache.get("missing.png").is_none());
    }

    #[test]
    fn test_texture_cache_missing_file() {
        let mut cache = TextureCache::with_base_dir("/definitely/not/here");
        let err = cache.load("nope.png").unwrap_err();
        assert!(matches!(err, TextureError::LoadError(_)));
    }

    #[test]
    fn test_texture_cache_decodes_png_once() {
        let dir = std::env::temp_dir().join(format!("whitted_core_png_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 255, 128]))
            .save(dir.join("blue.png"))
            .unwrap();

        let mut cache = TextureCache::with_base_dir(&dir);
        let first = cache.load("blue.png").unwrap();
        assert_eq!((first.width(), first.height(), first.channels()), (3, 2, 4));
        assert_eq!(first.lookup(Vec2::new(0.5, 0.5)), Color::Z);

        let second = cache.load("blue.png").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        std::fs::remove_dir_all(dir).ok();
    }
}
