//! Maps a condition description to the background treatment shown behind it.

use serde::{Deserialize, Serialize};

/// Style identifier derived from a condition string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationToken {
    Sunny,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Mist,
    #[default]
    Default,
}

/// Keyword groups, tested in order. First hit wins.
const KEYWORD_GROUPS: &[(&[&str], PresentationToken)] = &[
    (&["sunny", "clear"], PresentationToken::Sunny),
    (&["cloudy", "overcast"], PresentationToken::Cloudy),
    (&["rain", "drizzle"], PresentationToken::Rain),
    (&["snow"], PresentationToken::Snow),
    (&["thunderstorm"], PresentationToken::Thunderstorm),
    (&["mist", "fog"], PresentationToken::Mist),
];

/// Gradient stops for a background, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub stops: &'static [&'static str],
}

impl PresentationToken {
    pub fn from_condition(condition: &str) -> Self {
        let lower = condition.to_lowercase();

        KEYWORD_GROUPS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, token)| *token)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationToken::Sunny => "sunny",
            PresentationToken::Cloudy => "cloudy",
            PresentationToken::Rain => "rain",
            PresentationToken::Snow => "snow",
            PresentationToken::Thunderstorm => "thunderstorm",
            PresentationToken::Mist => "mist",
            PresentationToken::Default => "default",
        }
    }

    pub fn background(&self) -> Background {
        let stops: &'static [&'static str] = match self {
            PresentationToken::Sunny => &["yellow-400", "orange-500", "red-500"],
            PresentationToken::Cloudy => &["yellow-400", "gray-600"],
            PresentationToken::Rain => &["blue-400", "blue-600"],
            PresentationToken::Snow => &["gray-200", "white", "black"],
            PresentationToken::Thunderstorm => &["gray-600", "gray-900"],
            PresentationToken::Mist => &["slate-300", "slate-500"],
            PresentationToken::Default => &["gray-100"],
        };
        Background { stops }
    }

    pub const fn all() -> &'static [PresentationToken] {
        &[
            PresentationToken::Sunny,
            PresentationToken::Cloudy,
            PresentationToken::Rain,
            PresentationToken::Snow,
            PresentationToken::Thunderstorm,
            PresentationToken::Mist,
            PresentationToken::Default,
        ]
    }
}

impl std::fmt::Display for PresentationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
