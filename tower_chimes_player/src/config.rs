// Player configuration.
//
// `PlayerConfig` holds the viewer-facing knobs: tower height, pace (moves per
// minute), volume, and colour palette. It loads from JSON and every field is
// optional; missing fields take the control bar's starting values (height
// 3, 150 BPM, volume 100, red/yellow/blue).
//
// `Pace` and `Volume` are validated newtypes, so an out-of-range value is
// rejected at parse time rather than discovered mid-solve. Height is checked
// against the tower's supported range in `validate()`.
//
// See also: `driver.rs` which consumes these as `DriverSettings`,
// `session.rs` which tracks live edits, `main.rs` for CLI overrides.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tower_chimes_sim::tower::validate_height;

use crate::error::PlayerError;

/// Moves per minute. The pause between steps is `60 s / bpm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Pace(u32);

impl Pace {
    pub const MIN_BPM: u32 = 30;
    pub const MAX_BPM: u32 = 300;
    pub const DEFAULT_BPM: u32 = 150;

    pub fn new(bpm: u32) -> Result<Self, PlayerError> {
        if (Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm) {
            Ok(Self(bpm))
        } else {
            Err(PlayerError::Invalid(format!(
                "pace {bpm} BPM is outside {}..={}",
                Self::MIN_BPM,
                Self::MAX_BPM
            )))
        }
    }

    pub fn bpm(self) -> u32 {
        self.0
    }

    /// Pause after each move.
    pub fn interval(self) -> Duration {
        Duration::from_secs(60) / self.0
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self(Self::DEFAULT_BPM)
    }
}

impl TryFrom<u32> for Pace {
    type Error = PlayerError;

    fn try_from(bpm: u32) -> Result<Self, Self::Error> {
        Self::new(bpm)
    }
}

impl From<Pace> for u32 {
    fn from(pace: Pace) -> u32 {
        pace.0
    }
}

/// Playback volume, 0 (muted) to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    pub fn new(level: u8) -> Result<Self, PlayerError> {
        if level <= Self::MAX {
            Ok(Self(level))
        } else {
            Err(PlayerError::Invalid(format!(
                "volume {level} is above {}",
                Self::MAX
            )))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn is_muted(self) -> bool {
        self.0 == 0
    }

    pub fn gain(self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Volume {
    type Error = PlayerError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> u8 {
        volume.0
    }
}

/// Colour palettes blocks cycle through, bottom-up from width 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Ryb,
    Rgb,
    Rainbow,
    Light1,
    Light2,
}

impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Ryb,
        Palette::Rgb,
        Palette::Rainbow,
        Palette::Light1,
        Palette::Light2,
    ];

    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Ryb => &["red", "yellow", "blue"],
            Palette::Rgb => &["red", "green", "blue"],
            Palette::Rainbow => &[
                "red", "orange", "yellow", "green", "blue", "indigo", "violet",
            ],
            Palette::Light1 => &[
                "rgb(255, 248, 243)",
                "rgb(163, 228, 219)",
                "rgb(28, 109, 208)",
                "rgb(254, 209, 239)",
            ],
            Palette::Light2 => &[
                "rgb(19, 148, 135)",
                "rgb(134, 198, 244)",
                "rgb(255, 241, 206)",
                "rgb(210, 157, 43)",
            ],
        }
    }

    pub fn size(self) -> usize {
        self.colors().len()
    }

    /// Colour for a block's `color_index`, wrapping if out of range.
    pub fn color(self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Ryb => "ryb",
            Palette::Rgb => "rgb",
            Palette::Rainbow => "rainbow",
            Palette::Light1 => "light1",
            Palette::Light2 => "light2",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Palette::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| PlayerError::Invalid(format!("unknown palette '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub height: u32,
    #[serde(rename = "pace_bpm")]
    pub pace: Pace,
    pub volume: Volume,
    pub palette: Palette,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            height: 3,
            pace: Pace::default(),
            volume: Volume::default(),
            palette: Palette::default(),
        }
    }
}

impl PlayerConfig {
    /// Parse a JSON config. Height is not checked; call `validate()`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let text = std::fs::read_to_string(path).map_err(|source| PlayerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| PlayerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlayerError> {
        validate_height(self.height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_bar() {
        let config = PlayerConfig::default();
        assert_eq!(config.height, 3);
        assert_eq!(config.pace.bpm(), 150);
        assert_eq!(config.volume.level(), 100);
        assert_eq!(config.palette, Palette::Ryb);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pace_interval_is_sixty_seconds_over_bpm() {
        assert_eq!(Pace::new(60).unwrap().interval(), Duration::from_secs(1));
        assert_eq!(
            Pace::new(300).unwrap().interval(),
            Duration::from_millis(200)
        );
        assert_eq!(
            Pace::new(150).unwrap().interval(),
            Duration::from_millis(400)
        );
        assert!(Pace::new(29).is_err());
        assert!(Pace::new(301).is_err());
    }

    #[test]
    fn volume_gain() {
        assert_eq!(Volume::new(50).unwrap().gain(), 0.5);
        assert!(Volume::new(0).unwrap().is_muted());
        assert!(Volume::new(101).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = PlayerConfig::from_json_str(r#"{"height": 5, "palette": "rainbow"}"#).unwrap();
        assert_eq!(config.height, 5);
        assert_eq!(config.palette.size(), 7);
        assert_eq!(config.pace, Pace::default());
    }

    #[test]
    fn json_rejects_out_of_range_pace() {
        assert!(PlayerConfig::from_json_str(r#"{"pace_bpm": 1000}"#).is_err());
        assert!(PlayerConfig::from_json_str(r#"{"volume": 200}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_height() {
        let config = PlayerConfig {
            height: 49,
            ..PlayerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlayerError::Sim(_))));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = PlayerConfig {
            height: 12,
            pace: Pace::new(240).unwrap(),
            volume: Volume::new(0).unwrap(),
            palette: Palette::Light2,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"pace_bpm\":240"));
        assert_eq!(PlayerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn palette_parsing_and_wrapping() {
        assert_eq!("Rainbow".parse::<Palette>().unwrap(), Palette::Rainbow);
        assert!("plaid".parse::<Palette>().is_err());
        assert_eq!(Palette::Ryb.color(4), "yellow");
        assert_eq!(Palette::Light1.size(), 4);
    }
}
