//! # Encounter Records
//!
//! One [`Encounter`] is one row of the feed: a family member meeting a
//! resident on a given date. Every field is plain text. Columns missing from
//! the feed, and empty cells, both come through as empty strings, so nothing
//! downstream ever deals with an absent value.
//!
//! ## Column headers
//!
//! The feed is a spreadsheet export whose headers are Japanese. Each field
//! accepts its semantic (camelCase) name and the spreadsheet header:
//!
//! ```text
//! date                 日付
//! familyMember         暦家キャラ
//! residentName         住民キャラ
//! residentNamePhonetic 住民キャラ読み
//! residentHandle       住民プレイヤー
//! residentHandleLink   住民プレイヤーリンク
//! location             場所
//! attribute            属性
//! attributePhonetic    属性読み
//! season               シーズン
//! platform             配信
//! url                  URL
//! note                 備考
//! id                   ID
//! ```
//!
//! Unknown columns are ignored.

use serde::{Deserialize, Serialize};

/// Placeholder shown when an encounter has no location
pub const UNKNOWN_LOCATION: &str = "不明";

/// A single encounter row.
///
/// Records are immutable once loaded; the engine only selects and orders
/// references to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Encounter {
    /// Sortable date, `YYYY/MM/DD`
    #[serde(alias = "日付")]
    pub date: String,

    /// The family member this encounter belongs to
    #[serde(alias = "暦家キャラ", alias = "family_member")]
    pub family_member: String,

    /// Resident character name
    #[serde(alias = "住民キャラ", alias = "resident_name")]
    pub resident_name: String,

    /// Reading of the resident name (kana)
    #[serde(alias = "住民キャラ読み", alias = "resident_name_phonetic")]
    pub resident_name_phonetic: String,

    /// Resident player handle
    #[serde(alias = "住民プレイヤー", alias = "resident_handle")]
    pub resident_handle: String,

    /// Link to the resident player's channel
    #[serde(alias = "住民プレイヤーリンク", alias = "resident_handle_link")]
    pub resident_handle_link: String,

    #[serde(alias = "場所")]
    pub location: String,

    /// Free-text tag
    #[serde(alias = "属性")]
    pub attribute: String,

    #[serde(alias = "属性読み", alias = "attribute_phonetic")]
    pub attribute_phonetic: String,

    #[serde(alias = "シーズン")]
    pub season: String,

    /// Streaming service hosting the archived clip
    #[serde(alias = "配信")]
    pub platform: String,

    /// Link to the archived clip; not validated
    #[serde(alias = "URL")]
    pub url: String,

    #[serde(alias = "備考")]
    pub note: String,

    #[serde(alias = "ID")]
    pub id: String,
}

impl Encounter {
    /// Create an encounter with the three fields every row carries.
    ///
    /// # Example
    ///
    /// ```rust
    /// use archive_core::record::Encounter;
    ///
    /// let e = Encounter::new("2024/05/01", "いん", "Alpha")
    ///     .with_handle("alpha_player")
    ///     .with_platform("YouTube");
    /// assert_eq!(e.resident_handle, "alpha_player");
    /// ```
    pub fn new(date: impl Into<String>, family_member: impl Into<String>, resident_name: impl Into<String>) -> Self {
        Encounter {
            date: date.into(),
            family_member: family_member.into(),
            resident_name: resident_name.into(),
            ..Default::default()
        }
    }

    pub fn with_name_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.resident_name_phonetic = phonetic.into();
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.resident_handle = handle.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the attribute tag and its reading
    pub fn with_attribute(mut self, attribute: impl Into<String>, phonetic: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self.attribute_phonetic = phonetic.into();
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Location for display, falling back to `placeholder` when empty
    pub fn location_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.location.is_empty() {
            placeholder
        } else {
            &self.location
        }
    }

    /// Lowercased text searched by the resident query
    pub fn resident_haystack(&self) -> String {
        [
            self.resident_name.as_str(),
            self.resident_name_phonetic.as_str(),
            self.resident_handle.as_str(),
        ]
        .concat()
        .to_lowercase()
    }

    /// Lowercased text searched by the attribute query
    pub fn attribute_haystack(&self) -> String {
        [self.attribute.as_str(), self.attribute_phonetic.as_str()]
            .concat()
            .to_lowercase()
    }

    /// Lowercased text searched by the catch-all keyword
    pub fn keyword_haystack(&self) -> String {
        [
            self.resident_name.as_str(),
            self.resident_handle.as_str(),
            self.location.as_str(),
            self.note.as_str(),
            self.attribute.as_str(),
        ]
        .concat()
        .to_lowercase()
    }

    /// True when every field is empty (a spacer row in the spreadsheet)
    pub fn is_blank(&self) -> bool {
        *self == Encounter::default()
    }
}
