//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for viewer settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::procedural::SphereSpec;

/// Name of the configuration file inside [`config_dir`]
pub const CONFIG_FILE: &str = "config.toml";

/// Errors from reading or writing a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Viewer configuration.
///
/// Contains all user-configurable settings organized into sections.
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Orbit camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// The textured globe
    #[serde(default)]
    pub earth: EarthConfig,
    /// The star sphere surrounding everything, seen from inside
    #[serde(default)]
    pub space: SpaceConfig,
    /// Debug settings
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title (default: "Cheap Google Earth")
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial inner width in pixels (default: 750)
    #[serde(default = "default_window_extent")]
    pub width: u32,
    /// Initial inner height in pixels (default: 750)
    #[serde(default = "default_window_extent")]
    pub height: u32,
    /// Smallest allowed width and height (default: 200)
    #[serde(default = "default_min_size")]
    pub min_size: u32,
    /// Largest allowed width and height (default: 2000)
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    /// Whether to start in borderless fullscreen (default: false)
    #[serde(default)]
    pub fullscreen: bool,
    /// Whether to enable vertical sync (default: true)
    #[serde(default = "default_true")]
    pub vsync: bool,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees (default: 90)
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    /// Radians of rotation for a drag across the whole window (default: 5.0)
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    /// Scroll divisor, the LOWER the FASTER (default: 5.0)
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f32,
    /// Initial distance from the globe center (default: 2.5)
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Closest zoom (default: 1.2)
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    /// Farthest zoom (default: 50.0)
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Near clip plane (default: 0.01)
    #[serde(default = "default_near")]
    pub near: f32,
    /// Far clip plane (default: 1000.0)
    #[serde(default = "default_far")]
    pub far: f32,
}

/// Globe sphere configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthConfig {
    /// Equirectangular texture (default: img/earth_960.jpg)
    #[serde(default = "default_earth_texture")]
    pub texture: PathBuf,
    /// Sphere radius (default: 1.0)
    #[serde(default = "default_earth_radius")]
    pub radius: f32,
    /// Latitude bands (default: 64)
    #[serde(default = "default_earth_stacks")]
    pub stacks: u32,
    /// Longitude slices (default: 128)
    #[serde(default = "default_earth_sectors")]
    pub sectors: u32,
}

/// Space sphere configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Equirectangular texture (default: img/space.jpg)
    #[serde(default = "default_space_texture")]
    pub texture: PathBuf,
    /// Sphere radius (default: 100.0)
    #[serde(default = "default_space_radius")]
    pub radius: f32,
    /// Latitude bands (default: 32)
    #[serde(default = "default_space_stacks")]
    pub stacks: u32,
    /// Longitude slices (default: 64)
    #[serde(default = "default_space_sectors")]
    pub sectors: u32,
}

/// Debug configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    /// Log every generated vertex, index and texcoord at trace level (default: false)
    #[serde(default)]
    pub log_mesh: bool,
    /// Draw triangle edges instead of filled faces when supported (default: false)
    #[serde(default)]
    pub wireframe: bool,
}

fn default_title() -> String {
    "Cheap Google Earth".to_string()
}
fn default_window_extent() -> u32 {
    750
}
fn default_min_size() -> u32 {
    200
}
fn default_max_size() -> u32 {
    2000
}
fn default_true() -> bool {
    true
}

fn default_fov() -> f32 {
    90.0
}
fn default_rotation_speed() -> f32 {
    5.0
}
fn default_scroll_speed() -> f32 {
    5.0
}
fn default_distance() -> f32 {
    2.5
}
fn default_min_distance() -> f32 {
    1.2
}
fn default_max_distance() -> f32 {
    50.0
}
fn default_near() -> f32 {
    0.01
}
fn default_far() -> f32 {
    1000.0
}

fn default_earth_texture() -> PathBuf {
    PathBuf::from("img/earth_960.jpg")
}
fn default_earth_radius() -> f32 {
    1.0
}
fn default_earth_stacks() -> u32 {
    64
}
fn default_earth_sectors() -> u32 {
    128
}

fn default_space_texture() -> PathBuf {
    PathBuf::from("img/space.jpg")
}
fn default_space_radius() -> f32 {
    100.0
}
fn default_space_stacks() -> u32 {
    32
}
fn default_space_sectors() -> u32 {
    64
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_extent(),
            height: default_window_extent(),
            min_size: default_min_size(),
            max_size: default_max_size(),
            fullscreen: false,
            vsync: default_true(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            rotation_speed: default_rotation_speed(),
            scroll_speed: default_scroll_speed(),
            distance: default_distance(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for EarthConfig {
    fn default() -> Self {
        Self {
            texture: default_earth_texture(),
            radius: default_earth_radius(),
            stacks: default_earth_stacks(),
            sectors: default_earth_sectors(),
        }
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            texture: default_space_texture(),
            radius: default_space_radius(),
            stacks: default_space_stacks(),
            sectors: default_space_sectors(),
        }
    }
}

impl EarthConfig {
    /// Sphere parameters for the globe, centered at the origin
    pub fn spec(&self) -> SphereSpec {
        SphereSpec::new(Vec3::ZERO, self.radius, self.stacks, self.sectors)
    }
}

impl SpaceConfig {
    /// Sphere parameters for the space backdrop, centered at the origin
    pub fn spec(&self) -> SphereSpec {
        SphereSpec::new(Vec3::ZERO, self.radius, self.stacks, self.sectors)
    }
}

impl Config {
    /// Check settings that parse fine but would make the viewer misbehave.
    ///
    /// Returns a list of warning messages; an empty list means the config is sane.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let camera = &self.camera;

        if let Err(e) = self.earth.spec().validate() {
            warnings.push(format!("earth: {e}"));
        }
        if let Err(e) = self.space.spec().validate() {
            warnings.push(format!("space: {e}"));
        }
        if self.earth.radius >= self.space.radius {
            warnings.push(format!(
                "earth.radius {} should be smaller than space.radius {}",
                self.earth.radius, self.space.radius
            ));
        }

        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            warnings.push(format!(
                "camera.fov_degrees {} must be between 0 and 180",
                camera.fov_degrees
            ));
        }
        if camera.scroll_speed <= 0.0 {
            warnings.push(format!(
                "camera.scroll_speed {} must be positive",
                camera.scroll_speed
            ));
        }
        if camera.min_distance >= camera.max_distance {
            warnings.push(format!(
                "camera.min_distance {} should be less than camera.max_distance {}",
                camera.min_distance, camera.max_distance
            ));
        }
        if camera.distance < camera.min_distance || camera.distance > camera.max_distance {
            warnings.push(format!(
                "camera.distance {} is outside [{}, {}] and will be clamped",
                camera.distance, camera.min_distance, camera.max_distance
            ));
        }
        if camera.min_distance <= self.earth.radius {
            warnings.push(format!(
                "camera.min_distance {} lets the camera enter the globe (radius {})",
                camera.min_distance, self.earth.radius
            ));
        }
        if camera.max_distance >= self.space.radius {
            warnings.push(format!(
                "camera.max_distance {} lets the camera leave the space sphere (radius {})",
                camera.max_distance, self.space.radius
            ));
        }
        if camera.near <= 0.0 || camera.near >= camera.far {
            warnings.push(format!(
                "camera.near {} must be positive and less than camera.far {}",
                camera.near, camera.far
            ));
        }
        if camera.far < camera.max_distance + self.space.radius {
            warnings.push(format!(
                "camera.far {} clips the space sphere at max zoom (needs at least {})",
                camera.far,
                camera.max_distance + self.space.radius
            ));
        }

        let window = &self.window;
        if window.min_size > window.max_size {
            warnings.push(format!(
                "window.min_size {} is larger than window.max_size {}",
                window.min_size, window.max_size
            ));
        }

        warnings
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Globe\config`
/// On macOS: `~/Library/Application Support/io.globe.Globe`
/// On Linux: `~/.config/globe`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.globe", "", "Globe")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Full path of the default configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        debug!("No config directory available, using defaults");
        return Config::default();
    };

    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{e}; using defaults");
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit path.
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Saves the configuration to disk.
///
/// Writes `config.toml` to the platform's configuration directory.
/// Creates the directory if it doesn't exist. Does nothing when no
/// configuration directory is available.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to an explicit path, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_error)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_error)?;

    debug!("Saved config to {}", path.display());
    Ok(())
}
