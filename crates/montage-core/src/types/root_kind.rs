//! The two asset namespaces a browser can be rooted at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which storage namespace is browsed.
///
/// Each kind maps to its own bucket; folder paths are unique only within
/// a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    /// Video assets.
    Video,
    /// Music assets.
    Music,
}

impl RootKind {
    /// Both kinds, video first.
    pub const ALL: [RootKind; 2] = [RootKind::Video, RootKind::Music];

    /// Build from the host's boolean root flag.
    pub fn from_is_video(is_video: bool) -> Self {
        if is_video { Self::Video } else { Self::Music }
    }

    /// Whether this is the video namespace.
    pub fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }

    /// Lowercase name used in config, logs and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Music => "music",
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "music" => Ok(Self::Music),
            other => Err(AppError::validation(format!(
                "Unknown root kind '{other}' (expected 'video' or 'music')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_is_video() {
        assert_eq!(RootKind::from_is_video(true), RootKind::Video);
        assert_eq!(RootKind::from_is_video(false), RootKind::Music);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Video".parse::<RootKind>().unwrap(), RootKind::Video);
        assert_eq!(" music ".parse::<RootKind>().unwrap(), RootKind::Music);
        assert!("audio".parse::<RootKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RootKind::Music).expect("serialize");
        assert_eq!(json, "\"music\"");
    }
}
