//! Boot Configuration
//!
//! Resolves the zone layout and grid before the walk starts.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. First positional argument: `zone-walk my_zones.toml`
//! 2. Environment variable: `VOID_ZONES_CONFIG=my_zones.toml`
//! 3. `zones.toml` in the working directory
//! 4. Built-in two-zone layout
//!
//! `VOID_ZONES_SLOW=1` turns on simulated slow loads whatever the source.
//!
//! # Example Config File
//!
//! ```toml
//! simulate_slow_load = false
//!
//! [grid]
//! width = 10
//! height = 10
//! cell_size = 1.0
//!
//! [[zones]]
//! id = "West"
//! address = "scenes/west"
//! center = [-4.5, 0.0, 0.5]
//! enter_radius = 2.0
//! exit_radius = 3.0
//! ```

use crate::error::{Result, WalkError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use void_streaming::{StreamingConfig, Vec3, ZoneConfig, ZoneError};

/// Zone file path override
pub const CONFIG_ENV: &str = "VOID_ZONES_CONFIG";
/// Simulated slow loads override
pub const SLOW_ENV: &str = "VOID_ZONES_SLOW";
/// Searched when no path is given
pub const DEFAULT_PATHS: &[&str] = &["zones.toml"];

/// Grid the cursor walks on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns
    pub width: i32,
    /// Number of rows
    pub height: i32,
    /// World size of one cell
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 1.0,
        }
    }
}

impl GridConfig {
    /// The central start cells must fit, so each side needs two cells
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 || self.height < 2 {
            return Err(WalkError::InvalidGrid(format!(
                "grid must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(WalkError::InvalidGrid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// The `[grid]` table of a zone file; everything else is ignored here
#[derive(Debug, Default, Deserialize)]
struct GridSection {
    #[serde(default)]
    grid: GridConfig,
}

/// Complete boot configuration
#[derive(Debug, Clone)]
pub struct BootConfig {
    /// Zones and streamer options
    pub streaming: StreamingConfig,
    /// Grid dimensions
    pub grid: GridConfig,
    /// File the zones came from, `None` for the built-in layout
    pub config_path: Option<PathBuf>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BootConfig {
    /// Two small zones on opposite edges of the default grid
    pub fn builtin() -> Self {
        let zones = vec![
            ZoneConfig::new("West", "scenes/west")
                .with_center(Vec3::new(-4.5, 0.0, 0.5))
                .with_radii(2.0, 3.0),
            ZoneConfig::new("East", "scenes/east")
                .with_center(Vec3::new(4.5, 0.0, 0.5))
                .with_radii(2.0, 3.0),
        ];

        Self {
            streaming: StreamingConfig {
                simulate_slow_load: false,
                zones,
            },
            grid: GridConfig::default(),
            config_path: None,
        }
    }

    /// Load boot configuration from the process arguments and environment
    pub fn load() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok(), DEFAULT_PATHS)
    }

    /// Resolve configuration from explicit sources.
    ///
    /// An explicitly named file must load; the default paths are only tried
    /// if they exist.
    pub fn from_sources(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
        default_paths: &[&str],
    ) -> Result<Self> {
        // First non-flag argument, then the environment
        let explicit = args
            .iter()
            .find(|arg| !arg.starts_with("--"))
            .cloned()
            .or_else(|| env(CONFIG_ENV).filter(|path| !path.is_empty()));

        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match default_paths.iter().find(|path| Path::new(path).exists()) {
                Some(path) => Self::load_from_file(path)?,
                None => {
                    log::info!("No zone file found, using built-in layout");
                    Self::builtin()
                }
            },
        };

        if env(SLOW_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
        {
            config.streaming.simulate_slow_load = true;
            log::info!("Slow loads from env");
        }

        config.grid.validate()?;
        config.streaming.validate()?;
        Ok(config)
    }

    /// Load zones and the `[grid]` table from one TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let streaming = StreamingConfig::from_toml_str(&content)?;
        let section: GridSection = toml::from_str(&content).map_err(ZoneError::from)?;
        log::info!("Loaded boot config from {}", path.display());

        Ok(Self {
            streaming,
            grid: section.grid,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Boot Configuration:");
        log::info!(
            "  Grid: {}x{}, cell {}",
            self.grid.width,
            self.grid.height,
            self.grid.cell_size
        );
        log::info!("  Zones: {}", self.streaming.zones.len());
        for zone in &self.streaming.zones {
            log::info!(
                "    {} at {} (enter {}, exit {})",
                zone.id,
                zone.center,
                zone.enter_radius,
                zone.exit_radius
            );
        }
        log::info!("  Slow loads: {}", self.streaming.simulate_slow_load);
        match &self.config_path {
            Some(path) => log::info!("  Config: {}", path.display()),
            None => log::info!("  Config: built-in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = r#"
[grid]
width = 20
height = 6

[[zones]]
id = "Cave"
address = "scenes/cave"
center = [3.0, 0.0, 1.0]
"#;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn sample_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_fallback() {
        let config = BootConfig::from_sources(&[], env_of(&[]), &[]).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.streaming.zones.len(), 2);
        assert_eq!(config.grid, GridConfig::default());
        assert!(!config.streaming.simulate_slow_load);
    }

    #[test]
    fn test_positional_arg_wins() {
        let file = sample_file(SAMPLE);
        let args = vec![
            "--verbose".to_string(),
            file.path().display().to_string(),
        ];
        let env = env_of(&[(CONFIG_ENV, "/not/used.toml")]);

        let config = BootConfig::from_sources(&args, env, &[]).unwrap();
        assert_eq!(config.streaming.zones[0].id.as_str(), "Cave");
        assert_eq!(config.grid.width, 20);
        assert_eq!(config.grid.height, 6);
        // Omitted keys keep their defaults
        assert_eq!(config.grid.cell_size, 1.0);
    }

    #[test]
    fn test_env_path_and_slow_override() {
        let file = sample_file(SAMPLE);
        let path = file.path().display().to_string();
        let env = env_of(&[(CONFIG_ENV, path.as_str()), (SLOW_ENV, "1")]);

        let config = BootConfig::from_sources(&[], env, &[]).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
        assert!(config.streaming.simulate_slow_load);
        assert!(config.streaming.streamer_options().simulate_latency);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let args = vec!["/definitely/not/here.toml".to_string()];
        let err = BootConfig::from_sources(&args, env_of(&[]), &[]).unwrap_err();
        assert!(matches!(err, WalkError::Zones(ZoneError::Io { .. })));
    }

    #[test]
    fn test_invalid_zone_is_error() {
        let file = sample_file(
            "[[zones]]\nid = \"Bad\"\naddress = \"x\"\nenter_radius = 5.0\nexit_radius = 1.0\n",
        );
        let args = vec![file.path().display().to_string()];
        let err = BootConfig::from_sources(&args, env_of(&[]), &[]).unwrap_err();
        assert!(matches!(err, WalkError::Zones(ZoneError::InvalidZone { .. })));
    }

    #[test]
    fn test_grid_validation() {
        assert!(GridConfig::default().validate().is_ok());
        let narrow = GridConfig {
            width: 1,
            ..GridConfig::default()
        };
        assert!(matches!(narrow.validate(), Err(WalkError::InvalidGrid(_))));
        let flat = GridConfig {
            cell_size: 0.0,
            ..GridConfig::default()
        };
        assert!(flat.validate().is_err());
    }
}
