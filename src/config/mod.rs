//! Render configuration: built-in defaults, persisted settings and
//! per-document front-matter merged into one [`EffectiveConfig`] per pass.
//!
//! Precedence, highest first: front-matter, persisted settings, built-in
//! defaults. Every layer is a [`SettingsLayer`] whose fields are all optional;
//! the defaults are a complete [`EffectiveConfig`].

mod front_matter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use front_matter::parse_front_matter;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "4:3",
            Self::Widescreen => "16:9",
        }
    }

    /// Slide dimensions in CSS pixels, matching the usual deck sizes.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Standard => (960, 720),
            Self::Widescreen => (1280, 720),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:3" => Ok(Self::Standard),
            "16:9" => Ok(Self::Widescreen),
            other => Err(ParseValueError::new("aspect ratio", other)),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CSS color value: hex, functional notation or a named color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let valid = if let Some(hex) = value.strip_prefix('#') {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        } else if let Some(open) = value.find('(') {
            let name = value[..open].to_ascii_lowercase();
            matches!(name.as_str(), "rgb" | "rgba" | "hsl" | "hsla")
                && value.ends_with(')')
                && !value[open + 1..value.len() - 1].contains(['(', ')', ';', '{', '}'])
        } else {
            !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
        };

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(ParseValueError::new("color", s))
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the font size is chosen. `Custom` defers to a separate pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizeMode {
    Small,
    Medium,
    Large,
    Custom,
}

impl FromStr for FontSizeMode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseValueError::new("font size mode", s)),
        }
    }
}

/// A resolved font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
    Custom(u32),
}

impl FontSize {
    pub const SMALL_PX: u32 = 12;
    pub const MEDIUM_PX: u32 = 16;
    pub const LARGE_PX: u32 = 20;

    pub fn px(&self) -> u32 {
        match self {
            Self::Small => Self::SMALL_PX,
            Self::Medium => Self::MEDIUM_PX,
            Self::Large => Self::LARGE_PX,
            Self::Custom(px) => *px,
        }
    }

    pub fn mode(&self) -> FontSizeMode {
        match self {
            Self::Small => FontSizeMode::Small,
            Self::Medium => FontSizeMode::Medium,
            Self::Large => FontSizeMode::Large,
            Self::Custom(_) => FontSizeMode::Custom,
        }
    }

    /// Resolve a mode and an optional custom value. A custom mode without a
    /// usable value resolves to `None`.
    pub fn resolve(mode: FontSizeMode, custom_px: Option<u32>) -> Option<Self> {
        match mode {
            FontSizeMode::Small => Some(Self::Small),
            FontSizeMode::Medium => Some(Self::Medium),
            FontSizeMode::Large => Some(Self::Large),
            FontSizeMode::Custom => custom_px.filter(|px| *px > 0).map(Self::Custom),
        }
    }
}

/// One layer of optional settings: the persisted user settings, or the
/// options found in a document's front-matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSizeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_font_size: Option<u32>,
}

impl SettingsLayer {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine with a higher-precedence layer; its values win field by field.
    pub fn overlay(&self, higher: &SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            theme: higher.theme.clone().or_else(|| self.theme.clone()),
            aspect_ratio: higher.aspect_ratio.or(self.aspect_ratio),
            background_color: higher
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            text_color: higher.text_color.clone().or_else(|| self.text_color.clone()),
            font_size: higher.font_size.or(self.font_size),
            custom_font_size: higher.custom_font_size.or(self.custom_font_size),
        }
    }
}

/// The fully resolved options for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub theme: String,
    pub aspect_ratio: AspectRatio,
    pub background_color: Color,
    pub text_color: Color,
    pub font_size: FontSize,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            aspect_ratio: AspectRatio::Widescreen,
            background_color: Color("#ffffff".to_string()),
            text_color: Color("#000000".to_string()),
            font_size: FontSize::Medium,
        }
    }
}

impl EffectiveConfig {
    pub fn font_size_px(&self) -> u32 {
        self.font_size.px()
    }

    /// Front-matter block expressing this config, delimiters included.
    ///
    /// [`parse_front_matter`] reads it back to an equivalent layer.
    pub fn to_front_matter(&self) -> String {
        let font_size = match self.font_size {
            FontSize::Custom(px) => px.to_string(),
            named => yaml_quote(match named.mode() {
                FontSizeMode::Small => "small",
                FontSizeMode::Large => "large",
                _ => "medium",
            }),
        };
        format!(
            "---\ntheme: {}\nsize: {}\nbackgroundColor: {}\ncolor: {}\nfontSize: {}\n---\n",
            yaml_quote(&self.theme),
            yaml_quote(self.aspect_ratio.as_str()),
            yaml_quote(self.background_color.as_str()),
            yaml_quote(self.text_color.as_str()),
            font_size,
        )
    }
}

/// A YAML double-quoted scalar. Line breaks and other control characters are
/// escaped so the value always stays on one line.
fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Merge the three configuration sources into one effective config.
///
/// `front_matter` is the already-parsed front-matter layer, if any.
pub fn merge(
    defaults: &EffectiveConfig,
    persisted: &SettingsLayer,
    front_matter: Option<&SettingsLayer>,
) -> EffectiveConfig {
    let merged = match front_matter {
        Some(front_matter) => persisted.overlay(front_matter),
        None => persisted.clone(),
    };

    let font_size = merged
        .font_size
        .and_then(|mode| FontSize::resolve(mode, merged.custom_font_size))
        .unwrap_or(defaults.font_size);

    EffectiveConfig {
        theme: merged
            .theme
            .filter(|theme| !theme.trim().is_empty())
            .unwrap_or_else(|| defaults.theme.clone()),
        aspect_ratio: merged.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        background_color: merged
            .background_color
            .unwrap_or_else(|| defaults.background_color.clone()),
        text_color: merged
            .text_color
            .unwrap_or_else(|| defaults.text_color.clone()),
        font_size,
    }
}

/// Merge with an unparsed front-matter block. Malformed blocks count as absent.
pub fn merge_with_front_matter(
    defaults: &EffectiveConfig,
    persisted: &SettingsLayer,
    front_matter: Option<&str>,
) -> EffectiveConfig {
    let layer = front_matter.map(parse_front_matter);
    merge(defaults, persisted, layer.as_ref())
}
