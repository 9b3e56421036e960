//! Compiler and session configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Cranelift optimization level for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptLevel {
    None,
    #[default]
    Speed,
    SpeedAndSize,
}

impl OptLevel {
    /// Value of Cranelift's `opt_level` setting.
    pub fn as_flag(self) -> &'static str {
        match self {
            OptLevel::None => "none",
            OptLevel::Speed => "speed",
            OptLevel::SpeedAndSize => "speed_and_size",
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

impl FromStr for OptLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "0" => Ok(OptLevel::None),
            "speed" | "1" => Ok(OptLevel::Speed),
            "speed_and_size" | "speed-and-size" | "2" => Ok(OptLevel::SpeedAndSize),
            other => Err(format!("unknown optimization level `{}`", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub opt_level: OptLevel,
    /// Framebuffer geometry of the host device.
    pub screen_width: usize,
    pub screen_height: usize,
    /// Directory that `load`, `save` and `ls` work in.
    pub storage_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            opt_level: OptLevel::default(),
            screen_width: 320,
            screen_height: 240,
            storage_root: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
        self.opt_level = opt_level;
        self
    }

    pub fn with_screen(mut self, width: usize, height: usize) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }
}
