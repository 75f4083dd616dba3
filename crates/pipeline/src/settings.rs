//! User settings, loaded from `<config_dir>/lazyhand/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lazyhand_gesture::{
    ActiveRegion, ScreenSize, BACKSPACE_INTERVAL, CONFIRM_FRAMES, FRAME_HEIGHT, FRAME_REDUCTION,
    FRAME_WIDTH, SCROLL_DEAD_ZONE_PX, SMOOTHENING,
};
use lazyhand_protocol::{parse_key_combo, KeyCombo};
use serde::{Deserialize, Serialize};

/// Key string sent for the four-finger gesture unless configured otherwise.
pub const DEFAULT_FOUR_FINGERS_UP_SEND: &str = "f";

const CONFIG_DIR_NAME: &str = "lazyhand";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid setting {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

/// Everything the pipeline reads from configuration. Every field has a
/// default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Key combination bound to the four-finger gesture.
    pub four_fingers_up_send: String,
    pub camera_index: u32,
    pub show_detect_window: bool,
    pub frame_width: f32,
    pub frame_height: f32,
    pub frame_reduction: f32,
    /// Explicit active region; overrides `frame_reduction` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_region: Option<ActiveRegion>,
    /// Used when the executor cannot report the display size.
    pub screen_width: f32,
    pub screen_height: f32,
    pub smoothening: f32,
    pub scroll_dead_zone: f32,
    pub confirm_frames: u32,
    pub backspace_interval_ms: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            four_fingers_up_send: DEFAULT_FOUR_FINGERS_UP_SEND.to_string(),
            camera_index: 0,
            show_detect_window: false,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            frame_reduction: FRAME_REDUCTION,
            active_region: None,
            screen_width: 1920.0,
            screen_height: 1080.0,
            smoothening: SMOOTHENING,
            scroll_dead_zone: SCROLL_DEAD_ZONE_PX,
            confirm_frames: CONFIRM_FRAMES,
            backspace_interval_ms: BACKSPACE_INTERVAL.as_millis() as u64,
        }
    }
}

impl PipelineSettings {
    /// `<config_dir>/lazyhand/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load and validate settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;

        tracing::info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Load from `path` if given, else from the default location.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) => Self::load(&p),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.fullscreen_keys()?;
        self.region()
            .validate()
            .map_err(|e| SettingsError::Validation {
                field: "active_region",
                message: e.to_string(),
            })?;
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(SettingsError::Validation {
                field: "screen_width/screen_height",
                message: "must be positive".to_string(),
            });
        }
        if self.smoothening < 1.0 {
            return Err(SettingsError::Validation {
                field: "smoothening",
                message: format!("must be at least 1, got {}", self.smoothening),
            });
        }
        Ok(())
    }

    pub fn fullscreen_keys(&self) -> Result<KeyCombo, SettingsError> {
        parse_key_combo(&self.four_fingers_up_send).map_err(|e| SettingsError::Validation {
            field: "four_fingers_up_send",
            message: e.to_string(),
        })
    }

    pub fn region(&self) -> ActiveRegion {
        self.active_region.unwrap_or_else(|| {
            ActiveRegion::inset(self.frame_width, self.frame_height, self.frame_reduction)
        })
    }

    pub fn fallback_screen(&self) -> ScreenSize {
        ScreenSize::new(self.screen_width, self.screen_height)
    }

    pub fn backspace_interval(&self) -> Duration {
        Duration::from_millis(self.backspace_interval_ms)
    }
}
