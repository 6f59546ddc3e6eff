//! Level data model and validation
//!
//! A `LevelSpec` is immutable once produced: generators build one, the
//! pipeline validates it, the simulation consumes it. The wire form is plain
//! JSON; the layout travels either as a raw 2-D grid or as an explicit
//! run-length object `{width, runs}`, which are structurally distinct so the
//! consumer never needs out-of-band knowledge to pick a decoder.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::core::codec::{self, CodecError};
use crate::core::grid::Grid;
use crate::types::{CollectibleKind, ObstacleKind, MAX_THEME_LEN};

/// Grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Obstacle placement, wire shape `{x, y, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: i32,
    pub y: i32,
    #[serde(
        rename = "type",
        serialize_with = "ser_obstacle_kind",
        deserialize_with = "de_obstacle_kind"
    )]
    pub kind: ObstacleKind,
}

/// Collectible placement, wire shape `{x, y, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub x: i32,
    pub y: i32,
    #[serde(
        rename = "type",
        serialize_with = "ser_item_kind",
        deserialize_with = "de_item_kind"
    )]
    pub kind: CollectibleKind,
}

fn ser_obstacle_kind<S: Serializer>(k: &ObstacleKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(k.as_str())
}

fn de_obstacle_kind<'de, D: Deserializer<'de>>(d: D) -> Result<ObstacleKind, D::Error> {
    Ok(ObstacleKind::from_str(&String::deserialize(d)?))
}

fn ser_item_kind<S: Serializer>(k: &CollectibleKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(k.as_str())
}

fn de_item_kind<'de, D: Deserializer<'de>>(d: D) -> Result<CollectibleKind, D::Error> {
    Ok(CollectibleKind::from_str(&String::deserialize(d)?))
}

/// Wall layout in flight: raw rows or run-length encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Layout {
    Raw(Vec<Vec<u8>>),
    Rle { width: usize, runs: Vec<u32> },
}

impl Layout {
    pub fn raw(grid: &Grid) -> Self {
        Layout::Raw(grid.to_rows())
    }

    pub fn rle(grid: &Grid) -> Self {
        Layout::Rle {
            width: grid.size(),
            runs: codec::encode(grid),
        }
    }

    /// Materialize the grid, decoding the RLE form when present
    pub fn to_grid(&self) -> Result<Grid, ValidationError> {
        match self {
            Layout::Raw(rows) => {
                Grid::from_rows(rows).ok_or(ValidationError::MalformedLayout)
            }
            Layout::Rle { width, runs } => Ok(codec::decode(runs, *width)?),
        }
    }
}

/// Immutable description of a playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSpec {
    pub level_id: String,
    pub layout: Layout,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    pub start_position: Position,
    pub end_position: Position,
    pub difficulty_rating: u8,
    pub theme: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("layout is not a square binary grid")]
    MalformedLayout,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("{what} at ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds {
        what: &'static str,
        x: i32,
        y: i32,
        size: usize,
    },
    #[error("{what} at ({x}, {y}) sits on a wall")]
    OnWall { what: &'static str, x: i32, y: i32 },
    #[error("start and goal positions coincide")]
    StartEqualsGoal,
    #[error("goal is unreachable from the start position")]
    GoalUnreachable,
    #[error("difficulty rating {0} outside 1..=10")]
    BadDifficulty(u8),
    #[error("level id is empty")]
    EmptyLevelId,
}

impl LevelSpec {
    /// Check every structural invariant a level must satisfy before play.
    ///
    /// Remote generators are unverified; everything they produce passes
    /// through here before the pipeline accepts it. Returns the materialized
    /// grid so callers do not decode twice.
    pub fn validate(&self) -> Result<Grid, ValidationError> {
        if self.level_id.is_empty() {
            return Err(ValidationError::EmptyLevelId);
        }
        if !(1..=10).contains(&self.difficulty_rating) {
            return Err(ValidationError::BadDifficulty(self.difficulty_rating));
        }

        let grid = self.layout.to_grid()?;
        let size = grid.size();

        let endpoint = |what: &'static str, p: Position| -> Result<(), ValidationError> {
            if !grid.in_bounds(p.x, p.y) {
                return Err(ValidationError::OutOfBounds {
                    what,
                    x: p.x,
                    y: p.y,
                    size,
                });
            }
            if grid.is_wall(p.x, p.y) {
                return Err(ValidationError::OnWall {
                    what,
                    x: p.x,
                    y: p.y,
                });
            }
            Ok(())
        };
        endpoint("start position", self.start_position)?;
        endpoint("goal position", self.end_position)?;

        if self.start_position == self.end_position {
            return Err(ValidationError::StartEqualsGoal);
        }

        for ob in &self.obstacles {
            if !grid.in_bounds(ob.x, ob.y) {
                return Err(ValidationError::OutOfBounds {
                    what: "obstacle",
                    x: ob.x,
                    y: ob.y,
                    size,
                });
            }
        }
        for item in &self.items {
            if !grid.in_bounds(item.x, item.y) {
                return Err(ValidationError::OutOfBounds {
                    what: "item",
                    x: item.x,
                    y: item.y,
                    size,
                });
            }
            if grid.is_wall(item.x, item.y) {
                return Err(ValidationError::OnWall {
                    what: "item",
                    x: item.x,
                    y: item.y,
                });
            }
        }

        if !grid.reachable(
            (self.start_position.x, self.start_position.y),
            (self.end_position.x, self.end_position.y),
        ) {
            return Err(ValidationError::GoalUnreachable);
        }

        Ok(grid)
    }
}

/// Restrict a theme to lowercase alphanumerics and hyphens.
///
/// Themes end up interpolated into provider prompts and shown in the UI, so
/// anything else is dropped. Whitespace collapses to single hyphens and the
/// result is length-bounded; an empty result falls back to "default".
pub fn sanitize_theme(raw: &str) -> String {
    let mut out = String::new();
    let mut last_hyphen = false;
    for ch in raw.trim().to_lowercase().chars() {
        let mapped = if ch.is_ascii_alphanumeric() {
            Some(ch)
        } else if ch == '-' || ch.is_whitespace() || ch == '_' {
            Some('-')
        } else {
            None
        };
        if let Some(c) = mapped {
            if c == '-' {
                if last_hyphen || out.is_empty() {
                    continue;
                }
                last_hyphen = true;
            } else {
                last_hyphen = false;
            }
            out.push(c);
            if out.len() == MAX_THEME_LEN {
                break;
            }
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "default".to_string()
    } else {
        out
    }
}

/// Derive a level id from theme and generation timestamp (base-36 millis)
pub fn derive_level_id(theme: &str, timestamp_ms: u64) -> String {
    format!("{}-{}", theme, to_base36(timestamp_ms))
}

fn to_base36(mut v: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if v == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while v > 0 {
        buf.push(DIGITS[(v % 36) as usize]);
        v /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_spec() -> LevelSpec {
        LevelSpec {
            level_id: "sci-fi-test".to_string(),
            layout: Layout::Raw(vec![
                vec![0, 1, 0],
                vec![0, 0, 0],
                vec![1, 0, 0],
            ]),
            obstacles: vec![ObstacleSpec {
                x: 1,
                y: 1,
                kind: ObstacleKind::Spike,
            }],
            items: vec![ItemSpec {
                x: 2,
                y: 1,
                kind: CollectibleKind::Gem,
            }],
            start_position: Position::new(0, 0),
            end_position: Position::new(2, 2),
            difficulty_rating: 4,
            theme: "sci-fi".to_string(),
        }
    }

    #[test]
    fn test_valid_spec_passes() {
        assert!(valid_spec().validate().is_ok());
    }

    #[test]
    fn test_start_equals_goal_rejected() {
        let mut spec = valid_spec();
        spec.end_position = spec.start_position;
        assert_eq!(spec.validate(), Err(ValidationError::StartEqualsGoal));
    }

    #[test]
    fn test_goal_on_wall_rejected() {
        let mut spec = valid_spec();
        spec.end_position = Position::new(0, 2);
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::OnWall { what: "goal position", .. })
        ));
    }

    #[test]
    fn test_obstacle_out_of_bounds_rejected() {
        let mut spec = valid_spec();
        spec.obstacles.push(ObstacleSpec {
            x: 5,
            y: 0,
            kind: ObstacleKind::Laser,
        });
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::OutOfBounds { what: "obstacle", .. })
        ));
    }

    #[test]
    fn test_unreachable_goal_rejected() {
        let mut spec = valid_spec();
        spec.layout = Layout::Raw(vec![
            vec![0, 1, 0],
            vec![1, 1, 0],
            vec![0, 0, 0],
        ]);
        spec.end_position = Position::new(2, 2);
        // Start is boxed in by walls
        assert_eq!(spec.validate(), Err(ValidationError::GoalUnreachable));
    }

    #[test]
    fn test_ragged_layout_rejected() {
        let mut spec = valid_spec();
        spec.layout = Layout::Raw(vec![vec![0, 1], vec![0]]);
        assert_eq!(spec.validate(), Err(ValidationError::MalformedLayout));
    }

    #[test]
    fn test_bad_difficulty_rejected() {
        let mut spec = valid_spec();
        spec.difficulty_rating = 11;
        assert_eq!(spec.validate(), Err(ValidationError::BadDifficulty(11)));
    }

    #[test]
    fn test_layout_rle_roundtrip_through_wire() {
        let grid = valid_spec().layout.to_grid().unwrap();
        let rle = Layout::rle(&grid);
        assert_eq!(rle.to_grid().unwrap(), grid);

        // RLE and raw forms deserialize to distinct variants
        let json = serde_json::to_string(&rle).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Layout::Rle { .. }));
        assert_eq!(back.to_grid().unwrap(), grid);
    }

    #[test]
    fn test_spec_wire_roundtrip_camel_case() {
        let spec = valid_spec();
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("levelId").is_some());
        assert!(json.get("startPosition").is_some());
        assert!(json.get("difficultyRating").is_some());
        assert_eq!(json["obstacles"][0]["type"], "spike");

        let back: LevelSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_sanitize_theme() {
        assert_eq!(sanitize_theme("Sci-Fi"), "sci-fi");
        assert_eq!(sanitize_theme("  Neon   City "), "neon-city");
        assert_eq!(sanitize_theme("a}{|;<script>"), "ascript");
        assert_eq!(sanitize_theme("!!!"), "default");
        assert!(sanitize_theme(&"x".repeat(100)).len() <= MAX_THEME_LEN);
    }

    #[test]
    fn test_derive_level_id_base36() {
        assert_eq!(derive_level_id("sci-fi", 0), "sci-fi-0");
        assert_eq!(derive_level_id("sci-fi", 36), "sci-fi-10");
        assert_eq!(derive_level_id("cave", 35), "cave-z");
    }
}
