//! Sprite and sound pools
//!
//! Assets are loaded once when a simulation is created and are read-only
//! afterwards. Bouncers refer to them by index (`ImageId`), never by reference.
//!
//! Loading never fails outward: a missing directory or an undecodable file
//! leaves the corresponding pool empty and logs a warning.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::audio::synth_ping_wav;
use crate::settings::Settings;
use crate::sim::{ImageId, SoundId};

/// A decoded image ready to be scaled onto a surface
#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    pixels: RgbaImage,
}

impl Sprite {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    /// Single-colour sprite
    pub fn solid(name: &str, width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self::new(name, RgbaImage::from_pixel(width, height, color))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Encoded audio (WAV, OGG, ...) handed to an `AudioSink` as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundClip {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Something that can produce the image and sound pools
pub trait AssetProvider {
    fn load_images(&self) -> Vec<Sprite>;
    fn load_sounds(&self) -> Vec<SoundClip>;
}

/// Images and sounds owned by one simulation
#[derive(Debug, Clone, Default)]
pub struct AssetPool {
    images: Vec<Sprite>,
    sounds: Vec<SoundClip>,
}

impl AssetPool {
    pub fn new(images: Vec<Sprite>, sounds: Vec<SoundClip>) -> Self {
        Self { images, sounds }
    }

    pub fn load(provider: &dyn AssetProvider) -> Self {
        let pool = Self::new(provider.load_images(), provider.load_sounds());
        log::info!(
            "Loaded {} images and {} sounds",
            pool.images.len(),
            pool.sounds.len()
        );
        pool
    }

    pub fn images(&self) -> &[Sprite] {
        &self.images
    }

    pub fn sounds(&self) -> &[SoundClip] {
        &self.sounds
    }

    pub fn image(&self, id: ImageId) -> Option<&Sprite> {
        self.images.get(id.0)
    }

    pub fn sound(&self, id: SoundId) -> Option<&SoundClip> {
        self.sounds.get(id.0)
    }
}

/// Loads every file of an image directory and a sound directory
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    pub image_dir: PathBuf,
    pub sound_dir: PathBuf,
}

impl DirectoryAssets {
    pub fn new(image_dir: impl Into<PathBuf>, sound_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            sound_dir: sound_dir.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.image_dir, &settings.sound_dir)
    }

    /// Decode every file in the image directory; the first failure aborts
    pub fn try_load_images(&self) -> Result<Vec<Sprite>, String> {
        list_files(&self.image_dir)?
            .iter()
            .map(|path| -> Result<Sprite, String> {
                let pixels = image::open(path)
                    .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))?
                    .to_rgba8();
                Ok(Sprite::new(file_name(path), pixels))
            })
            .collect()
    }

    /// Read every file in the sound directory; the first failure aborts
    pub fn try_load_sounds(&self) -> Result<Vec<SoundClip>, String> {
        list_files(&self.sound_dir)?
            .iter()
            .map(|path| -> Result<SoundClip, String> {
                let bytes = fs::read(path)
                    .map_err(|e| format!("Failed to read sound {}: {e}", path.display()))?;
                Ok(SoundClip {
                    name: file_name(path),
                    bytes,
                })
            })
            .collect()
    }
}

impl AssetProvider for DirectoryAssets {
    fn load_images(&self) -> Vec<Sprite> {
        self.try_load_images().unwrap_or_else(|e| {
            log::warn!("{e}; image pool left empty");
            Vec::new()
        })
    }

    fn load_sounds(&self) -> Vec<SoundClip> {
        self.try_load_sounds().unwrap_or_else(|e| {
            log::warn!("{e}; sound pool left empty");
            Vec::new()
        })
    }
}

/// Regular files of `dir`, sorted by name so pool order is reproducible
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| format!("Failed to list directory {}: {e}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Bright ball colours for generated sprites
const PALETTE: [[u8; 3]; 6] = [
    [230, 57, 70],
    [244, 162, 97],
    [233, 196, 106],
    [42, 157, 143],
    [69, 123, 157],
    [155, 93, 229],
];

/// Generated assets: shaded discs and short pings, no files needed
#[derive(Debug, Clone)]
pub struct ProceduralAssets {
    pub image_count: usize,
    pub sprite_size: u32,
    /// Ping frequencies in Hz, one sound each
    pub tones: Vec<f32>,
}

impl Default for ProceduralAssets {
    fn default() -> Self {
        Self {
            image_count: PALETTE.len(),
            sprite_size: 32,
            tones: vec![440.0, 660.0, 880.0],
        }
    }
}

impl AssetProvider for ProceduralAssets {
    fn load_images(&self) -> Vec<Sprite> {
        (0..self.image_count)
            .map(|i| {
                let [r, g, b] = PALETTE[i % PALETTE.len()];
                Sprite::new(format!("disc-{i}"), disc(self.sprite_size, [r, g, b]))
            })
            .collect()
    }

    fn load_sounds(&self) -> Vec<SoundClip> {
        self.tones
            .iter()
            .map(|&freq| SoundClip {
                name: format!("ping-{freq:.0}"),
                bytes: synth_ping_wav(freq, 80),
            })
            .collect()
    }
}

/// Disc with a soft highlight towards the top-left, transparent outside
fn disc(size: u32, [r, g, b]: [u8; 3]) -> RgbaImage {
    let radius = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > radius {
            return Rgba([0, 0, 0, 0]);
        }
        // Highlight centred a third of the way towards the top-left
        let hx = dx + radius / 3.0;
        let hy = dy + radius / 3.0;
        let shine = (1.0 - (hx * hx + hy * hy).sqrt() / radius).clamp(0.0, 1.0) * 0.6;
        let lift = |c: u8| (c as f32 + (255.0 - c as f32) * shine) as u8;
        Rgba([lift(r), lift(g), lift(b), 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bouncers-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_directories_give_empty_pools() {
        let assets = DirectoryAssets::new("/definitely/not/here", "/nor/here");
        let pool = AssetPool::load(&assets);
        assert!(pool.images().is_empty());
        assert!(pool.sounds().is_empty());
        assert!(assets.try_load_images().is_err());
    }

    #[test]
    fn test_loads_images_in_name_order() {
        let dir = scratch_dir("images");
        RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]))
            .save(dir.join("b.png"))
            .unwrap();
        RgbaImage::from_pixel(5, 5, Rgba([0, 255, 0, 255]))
            .save(dir.join("a.png"))
            .unwrap();

        let images = DirectoryAssets::new(&dir, &dir).load_images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].name(), "a.png");
        assert_eq!((images[0].width(), images[0].height()), (5, 5));
        assert_eq!(images[1].name(), "b.png");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_undecodable_file_empties_image_pool() {
        let dir = scratch_dir("broken");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
            .save(dir.join("ok.png"))
            .unwrap();
        fs::write(dir.join("zz.png"), b"not a png").unwrap();

        let assets = DirectoryAssets::new(&dir, &dir);
        assert!(assets.load_images().is_empty());
        // Sounds are raw bytes, so the same directory still loads
        assert_eq!(assets.load_sounds().len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_procedural_pool() {
        let pool = AssetPool::load(&ProceduralAssets::default());
        assert_eq!(pool.images().len(), PALETTE.len());
        assert_eq!(pool.sounds().len(), 3);
        assert!(pool.sounds().iter().all(|s| s.bytes.starts_with(b"RIFF")));

        let sprite = pool.image(ImageId(0)).unwrap();
        assert_eq!(sprite.pixels().get_pixel(0, 0)[3], 0);
        assert_eq!(sprite.pixels().get_pixel(16, 16)[3], 255);
        assert!(pool.image(ImageId(99)).is_none());
    }
}
