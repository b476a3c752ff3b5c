//! Scene and day/night selectors.

use serde::{Deserialize, Serialize};

/// Which scene is on screen. Exactly one is alive at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneMode {
    #[default]
    Ball,
    Earth,
}

/// Which surface map the Earth body shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayNightMode {
    #[default]
    Day,
    Night,
}

impl SceneMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Earth => "earth",
        }
    }
}

impl std::str::FromStr for SceneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ball" => Ok(Self::Ball),
            "earth" => Ok(Self::Earth),
            other => Err(format!("unknown scene '{other}' (expected 'ball' or 'earth')")),
        }
    }
}

impl DayNightMode {
    #[must_use]
    pub fn is_night(self) -> bool {
        self == Self::Night
    }
}

/// A user request to change what is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    ShowBall,
    ShowEarth,
    SetDayNight(DayNightMode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_first_paint() {
        assert_eq!(SceneMode::default(), SceneMode::Ball);
        assert_eq!(DayNightMode::default(), DayNightMode::Day);
    }

    #[test]
    fn test_scene_mode_parse() {
        assert_eq!("Earth".parse::<SceneMode>(), Ok(SceneMode::Earth));
        assert_eq!("ball".parse::<SceneMode>(), Ok(SceneMode::Ball));
        assert!("moon".parse::<SceneMode>().is_err());
    }

    #[test]
    fn test_modes_serialize_as_ron_identifiers() {
        assert_eq!(ron::to_string(&SceneMode::Earth).unwrap(), "Earth");
        let night: DayNightMode = ron::from_str("Night").unwrap();
        assert!(night.is_night());
    }
}
