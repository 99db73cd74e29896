//! # Family Members and Birth Order
//!
//! The archive follows a small, closed cast. Their birth order is a total
//! order used in two places: as the tie-break when several encounters share
//! a date, and as the enumeration order for member filters and groupings.
//!
//! The order is a value, not a constant baked into the engine. The default
//! cast is provided by [`BirthOrder::default`], and configuration may
//! replace it with any other list.
//!
//! ## Example
//!
//! ```rust
//! use archive_core::members::BirthOrder;
//!
//! let order = BirthOrder::default();
//! assert!(order.rank("にこ") < order.rank("いん"));
//! // Unknown members rank after everyone
//! assert_eq!(order.rank("だれ"), order.len());
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{ArchiveError, ArchiveResult};

/// Label used for the household as a whole (header accent colour)
pub const HOUSEHOLD_NAME: &str = "暦家";

/// Accent colour of the household label
pub const HOUSEHOLD_COLOR: &str = "#b28c6e";

/// Colour used for members missing from the birth order
pub const FALLBACK_COLOR: &str = "#666666";

/// Relative luma below which a colour counts as dark (white text on top)
const DARK_LUMA_THRESHOLD: f64 = 0.3;

/// One member of the cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Name exactly as it appears in the feed's member column
    pub name: String,
    /// `#rrggbb` display colour
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    FALLBACK_COLOR.to_string()
}

impl Member {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Parse the colour into RGB components
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.color)
    }

    /// Whether light text should be drawn on this member's colour
    pub fn is_dark(&self) -> bool {
        self.rgb().map(is_dark_rgb).unwrap_or(false)
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = channels.next()??;
            let g = channels.next()??;
            let b = channels.next()??;
            Some((r, g, b))
        }
        _ => None,
    }
}

fn is_dark_rgb((r, g, b): (u8, u8, u8)) -> bool {
    let luma = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
    luma < DARK_LUMA_THRESHOLD
}

static DEFAULT_CAST: Lazy<Vec<Member>> = Lazy::new(|| {
    [
        ("にこ", "#e7609e"),
        ("いん", "#113c70"),
        ("ゆうみ", "#2ca9e1"),
        ("しんあ", "#2e8b57"),
        ("あずみ", "#7ebea5"),
        ("ひるの", "#000b00"),
        ("みう", "#afafb0"),
        ("あやの", "#b7282e"),
        ("ゆん", "#b44c97"),
        ("いのん", "#f08300"),
    ]
    .into_iter()
    .map(|(name, color)| Member::new(name, color))
    .collect()
});

/// Ordered, closed set of members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Member>", into = "Vec<Member>")]
pub struct BirthOrder {
    members: Vec<Member>,
}

impl TryFrom<Vec<Member>> for BirthOrder {
    type Error = ArchiveError;

    fn try_from(members: Vec<Member>) -> ArchiveResult<Self> {
        BirthOrder::new(members)
    }
}

impl From<BirthOrder> for Vec<Member> {
    fn from(order: BirthOrder) -> Self {
        order.members
    }
}

impl Default for BirthOrder {
    fn default() -> Self {
        BirthOrder {
            members: DEFAULT_CAST.clone(),
        }
    }
}

impl BirthOrder {
    /// Build a birth order, rejecting duplicate names and malformed colours.
    pub fn new(members: Vec<Member>) -> ArchiveResult<Self> {
        let mut seen = HashSet::new();
        for member in &members {
            if member.name.is_empty() {
                return Err(ArchiveError::invalid_input("members", "", "Member name must not be empty"));
            }
            if !seen.insert(member.name.as_str()) {
                return Err(ArchiveError::invalid_input(
                    "members",
                    member.name.as_str(),
                    "Member listed more than once",
                ));
            }
            if parse_hex_color(&member.color).is_none() {
                return Err(ArchiveError::invalid_input(
                    format!("members.{}.color", member.name),
                    member.color.as_str(),
                    "Expected #rgb or #rrggbb",
                ));
            }
        }
        Ok(BirthOrder { members })
    }

    /// Build a birth order from bare names, all using the fallback colour.
    pub fn from_names<I, S>(names: I) -> ArchiveResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BirthOrder::new(names.into_iter().map(|n| Member::new(n, FALLBACK_COLOR)).collect())
    }

    /// Position of `name`, or `len()` for members outside the order.
    pub fn rank(&self, name: &str) -> usize {
        self.members
            .iter()
            .position(|m| m.name == name)
            .unwrap_or(self.members.len())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member names in birth order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Display colour for `name`, falling back for unknown members
    pub fn color_for(&self, name: &str) -> &str {
        self.get(name).map(|m| m.color.as_str()).unwrap_or(FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let order = BirthOrder::default();
        assert_eq!(order.len(), 10);
        assert_eq!(order.rank("にこ"), 0);
        assert_eq!(order.rank("いん"), 1);
        assert_eq!(order.rank("いのん"), 9);
        assert!(!order.contains(HOUSEHOLD_NAME));
    }

    #[test]
    fn test_unknown_member_ranks_last() {
        let order = BirthOrder::from_names(["a", "b"]).unwrap();
        assert_eq!(order.rank("zzz"), 2);
        assert_eq!(order.color_for("zzz"), FALLBACK_COLOR);
    }

    #[test]
    fn test_rejects_duplicates_and_bad_colors() {
        let dup = BirthOrder::from_names(["a", "a"]);
        assert!(matches!(dup, Err(ArchiveError::InvalidInput { .. })));

        let bad = BirthOrder::new(vec![Member::new("a", "red")]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(parse_hex_color("#e7609e"), Some((0xe7, 0x60, 0x9e)));
        assert_eq!(parse_hex_color("#666"), Some((0x66, 0x66, 0x66)));
        assert_eq!(parse_hex_color("e7609e"), None);
        assert_eq!(parse_hex_color("#e7609"), None);
    }

    #[test]
    fn test_dark_colors() {
        let order = BirthOrder::default();
        let dark: Vec<&str> = order
            .members()
            .iter()
            .filter(|m| m.is_dark())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(dark, vec!["いん", "ひるの"]);
    }

    #[test]
    fn test_serializes_as_list() {
        let order = BirthOrder::from_names(["a"]).unwrap();
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r##"[{"name":"a","color":"#666666"}]"##);
    }

    #[test]
    fn test_deserialize_validates() {
        let order: BirthOrder = serde_json::from_str(r##"[{"name":"a"},{"name":"b","color":"#fff"}]"##).unwrap();
        assert_eq!(order.names().collect::<Vec<_>>(), vec!["a", "b"]);

        let duplicate = serde_json::from_str::<BirthOrder>(r#"[{"name":"a"},{"name":"a"}]"#);
        assert!(duplicate.unwrap_err().to_string().contains("more than once"));

        let bad_color = serde_json::from_str::<BirthOrder>(r#"[{"name":"a","color":"red"}]"#);
        assert!(bad_color.is_err());
    }
}
