//! Host device behind the graphics, keyboard and storage builtins.
//!
//! The compiler only knows how to call these; what a pixel or a file means
//! is up to the [`Device`] installed in the session.

use crate::config::Config;
use std::collections::VecDeque;
use std::io;
use std::path::{Component, Path, PathBuf};

pub trait Device {
    fn pixel(&mut self, x: i64, y: i64, color: i64);

    fn rectfill(&mut self, x: i64, y: i64, w: i64, h: i64, color: i64);

    /// Paint a 1-bit-per-pixel bitmap whose rows are padded to whole bytes,
    /// most significant bit first. Set bits are painted, or clear bits when
    /// `inverted` is true.
    #[allow(clippy::too_many_arguments)]
    fn blit_mono(&mut self, bitmap: &[u8], x: i64, y: i64, w: i64, h: i64, color: i64, inverted: bool);

    /// Present the frame drawn so far.
    fn flip(&mut self);

    /// Next pending key code, or 0.
    fn inkey(&mut self) -> i64;

    fn load(&mut self, path: &str) -> io::Result<Vec<u8>>;

    fn save(&mut self, path: &str, data: &[u8]) -> io::Result<()>;

    /// Names of the stored files, sorted.
    fn list_files(&mut self) -> io::Result<Vec<String>>;

    fn framebuffer(&self) -> Option<&Framebuffer> {
        None
    }
}

/// 32-bit RGB pixels, row-major. Writes outside the frame are dropped.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i64, y: i64, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }
}

/// Default device: an in-memory framebuffer, a key queue, and files in a
/// storage directory.
#[derive(Debug)]
pub struct HostDevice {
    framebuffer: Framebuffer,
    flips: usize,
    keys: VecDeque<i64>,
    root: PathBuf,
}

impl HostDevice {
    pub fn new(config: &Config) -> Self {
        HostDevice {
            framebuffer: Framebuffer::new(config.screen_width, config.screen_height),
            flips: 0,
            keys: VecDeque::new(),
            root: config.storage_root.clone(),
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = i64>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn push_key(&mut self, key: i64) {
        self.keys.push_back(key);
    }

    pub fn flips(&self) -> usize {
        self.flips
    }

    /// Resolve a user path inside the storage root, refusing anything that
    /// would leave it.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("path `{}` is outside the storage root", path),
            ));
        }
        Ok(self.root.join(rel))
    }
}

impl Device for HostDevice {
    fn pixel(&mut self, x: i64, y: i64, color: i64) {
        self.framebuffer.set(x, y, color as u32);
    }

    fn rectfill(&mut self, x: i64, y: i64, w: i64, h: i64, color: i64) {
        for row in y..y.saturating_add(h.max(0)) {
            for col in x..x.saturating_add(w.max(0)) {
                self.framebuffer.set(col, row, color as u32);
            }
        }
    }

    fn blit_mono(&mut self, bitmap: &[u8], x: i64, y: i64, w: i64, h: i64, color: i64, inverted: bool) {
        let (Ok(w), Ok(h)) = (usize::try_from(w), usize::try_from(h)) else {
            return;
        };
        let pitch = w.div_ceil(8);
        for row in 0..h {
            for col in 0..w {
                let Some(&byte) = bitmap.get(row * pitch + col / 8) else {
                    return;
                };
                let set = byte & (0x80 >> (col % 8)) != 0;
                if set != inverted {
                    self.framebuffer
                        .set(x + col as i64, y + row as i64, color as u32);
                }
            }
        }
    }

    fn flip(&mut self) {
        self.flips += 1;
    }

    fn inkey(&mut self) -> i64 {
        self.keys.pop_front().unwrap_or(0)
    }

    fn load(&mut self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path)?)
    }

    fn save(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        std::fs::write(self.resolve(path)?, data)
    }

    fn list_files(&mut self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn framebuffer(&self) -> Option<&Framebuffer> {
        Some(&self.framebuffer)
    }
}
