use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a call participant, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Roster entry as supplied by the session client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub has_video_on: bool,
}

impl Participant {
    pub fn new(user_id: u32, display_name: impl Into<String>, has_video_on: bool) -> Self {
        Self {
            user_id: UserId(user_id),
            display_name: display_name.into(),
            has_video_on,
        }
    }
}

/// Size of the video container in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decode resolution requested for a tile, ordered coarsest to finest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    #[default]
    Video90p,
    Video180p,
    Video360p,
    Video720p,
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityTier::Video90p => "90p",
            QualityTier::Video180p => "180p",
            QualityTier::Video360p => "360p",
            QualityTier::Video720p => "720p",
        };
        f.write_str(label)
    }
}

/// One tile of a gallery layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub quality: QualityTier,
}

impl TileRect {
    /// Same size and position, ignoring quality
    pub fn same_placement(&self, other: &TileRect) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.x == other.x
            && self.y == other.y
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn top(&self) -> u32 {
        self.y + self.height
    }

    /// True if the two rectangles share any interior area
    pub fn overlaps(&self, other: &TileRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.top() && other.y < self.top()
    }
}
