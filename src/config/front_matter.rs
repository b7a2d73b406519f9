//! Lowering a YAML front-matter block into a [`SettingsLayer`].
//!
//! Front-matter is advisory: unknown keys, keys with malformed values, and
//! blocks that are not a YAML mapping are all ignored rather than reported.

use super::{AspectRatio, Color, FontSizeMode, SettingsLayer};
use serde_yaml::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Parse the raw text between the front-matter delimiters.
pub fn parse_front_matter(raw: &str) -> SettingsLayer {
    let value: Value = match serde_yaml::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "malformed front-matter ignored");
            return SettingsLayer::default();
        }
    };

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return SettingsLayer::default(),
        _ => {
            warn!("front-matter is not a mapping; ignored");
            return SettingsLayer::default();
        }
    };

    let mut layer = SettingsLayer::default();
    for (key, value) in &mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        let applied = match key {
            "theme" => scalar(value)
                .filter(|theme| !theme.trim().is_empty())
                .map(|theme| layer.theme = Some(theme))
                .is_some(),
            "size" | "aspectRatio" => parsed::<AspectRatio>(value)
                .map(|ratio| layer.aspect_ratio = Some(ratio))
                .is_some(),
            "backgroundColor" => parsed::<Color>(value)
                .map(|color| layer.background_color = Some(color))
                .is_some(),
            "color" | "textColor" => parsed::<Color>(value)
                .map(|color| layer.text_color = Some(color))
                .is_some(),
            "fontSize" => apply_font_size(&mut layer, value),
            "customFontSize" => pixels(value)
                .map(|px| layer.custom_font_size = Some(px))
                .is_some(),
            _ => {
                debug!(key, "unrecognized front-matter key");
                continue;
            }
        };
        if !applied {
            debug!(key, "front-matter value ignored");
        }
    }
    layer
}

/// `fontSize` takes either a mode name or a pixel size; a pixel size selects
/// the custom mode.
fn apply_font_size(layer: &mut SettingsLayer, value: &Value) -> bool {
    if let Some(px) = pixels(value) {
        layer.font_size = Some(FontSizeMode::Custom);
        layer.custom_font_size = Some(px);
        return true;
    }
    match parsed::<FontSizeMode>(value) {
        Some(mode) => {
            layer.font_size = Some(mode);
            true
        }
        None => false,
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parsed<T: FromStr>(value: &Value) -> Option<T> {
    scalar(value)?.parse().ok()
}

/// A positive pixel count, written as `18`, `"18"` or `"18px"`.
fn pixels(value: &Value) -> Option<u32> {
    let px = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let s = s.trim();
            s.strip_suffix("px").unwrap_or(s).trim().parse().ok()
        }
        _ => None,
    }?;
    (px > 0).then_some(px)
}
