//! Resume style settings.
//!
//! Persisted style state is always a total [`ResumeSettings`]; clients send
//! [`PartialSettings`] and the merge against documented defaults happens in
//! exactly one place, [`ResumeSettings::with_defaults`]. Rendering code never
//! needs a fallback for a missing field.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Option enums
// ────────────────────────────────────────────────────────────────────────────

/// Three-step size scale shared by font size, header size and profile image
/// size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeOption {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingOption {
    Compact,
    Comfortable,
    Spacious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Modern,
    Classic,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Left,
    Center,
    Right,
}

// ────────────────────────────────────────────────────────────────────────────
// Text colors
// ────────────────────────────────────────────────────────────────────────────

/// Per-role text colors (hex strings) for the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextColors {
    pub name: String,
    pub labels: String,
    pub values: String,
    pub section_titles: String,
    pub section_content: String,
    pub links: String,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            name: "#1f2937".to_string(),
            labels: "#4b5563".to_string(),
            values: "#1f2937".to_string(),
            section_titles: "#8B5CF6".to_string(),
            section_content: "#1f2937".to_string(),
            links: "#3B82F6".to_string(),
        }
    }
}

impl TextColors {
    /// Key-by-key merge: each role falls back to its own default, so an
    /// override of one color never resets its siblings.
    pub fn with_defaults(partial: PartialTextColors) -> Self {
        let defaults = TextColors::default();
        Self {
            name: partial.name.unwrap_or(defaults.name),
            labels: partial.labels.unwrap_or(defaults.labels),
            values: partial.values.unwrap_or(defaults.values),
            section_titles: partial.section_titles.unwrap_or(defaults.section_titles),
            section_content: partial.section_content.unwrap_or(defaults.section_content),
            links: partial.links.unwrap_or(defaults.links),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialTextColors {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub section_titles: Option<String>,
    #[serde(default)]
    pub section_content: Option<String>,
    #[serde(default)]
    pub links: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

/// Total style state for one editing session. Every field always holds a
/// value; construction goes through [`Default`] or [`with_defaults`].
///
/// [`with_defaults`]: ResumeSettings::with_defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub font_size: SizeOption,
    pub header_size: SizeOption,
    pub spacing: SpacingOption,
    pub layout: LayoutStyle,
    pub show_profile_image: bool,
    pub profile_image_size: SizeOption,
    pub profile_image_position: ImagePosition,
    pub text_colors: TextColors,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#8B5CF6".to_string(),
            secondary_color: "#3B82F6".to_string(),
            font_family: "Arial".to_string(),
            font_size: SizeOption::Medium,
            header_size: SizeOption::Large,
            spacing: SpacingOption::Comfortable,
            layout: LayoutStyle::Modern,
            show_profile_image: false,
            profile_image_size: SizeOption::Medium,
            profile_image_position: ImagePosition::Center,
            text_colors: TextColors::default(),
        }
    }
}

impl ResumeSettings {
    /// Resolves a partial update into a total value. Absent fields take their
    /// documented defaults, never whatever happened to be stored before; a
    /// client that wants to keep a custom value resends it.
    pub fn with_defaults(partial: PartialSettings) -> Self {
        let defaults = ResumeSettings::default();
        Self {
            primary_color: partial.primary_color.unwrap_or(defaults.primary_color),
            secondary_color: partial.secondary_color.unwrap_or(defaults.secondary_color),
            font_family: partial.font_family.unwrap_or(defaults.font_family),
            font_size: partial.font_size.unwrap_or(defaults.font_size),
            header_size: partial.header_size.unwrap_or(defaults.header_size),
            spacing: partial.spacing.unwrap_or(defaults.spacing),
            layout: partial.layout.unwrap_or(defaults.layout),
            show_profile_image: partial
                .show_profile_image
                .unwrap_or(defaults.show_profile_image),
            profile_image_size: partial
                .profile_image_size
                .unwrap_or(defaults.profile_image_size),
            profile_image_position: partial
                .profile_image_position
                .unwrap_or(defaults.profile_image_position),
            text_colors: TextColors::with_defaults(partial.text_colors.unwrap_or_default()),
        }
    }
}

/// Wire shape for settings updates: every field optional, including each
/// text-color role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialSettings {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<SizeOption>,
    #[serde(default)]
    pub header_size: Option<SizeOption>,
    #[serde(default)]
    pub spacing: Option<SpacingOption>,
    #[serde(default)]
    pub layout: Option<LayoutStyle>,
    #[serde(default)]
    pub show_profile_image: Option<bool>,
    #[serde(default)]
    pub profile_image_size: Option<SizeOption>,
    #[serde(default)]
    pub profile_image_position: Option<ImagePosition>,
    #[serde(default)]
    pub text_colors: Option<PartialTextColors>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_partial_yields_full_defaults() {
        let merged = ResumeSettings::with_defaults(PartialSettings::default());
        assert_eq!(merged, ResumeSettings::default());
        assert_eq!(merged.primary_color, "#8B5CF6");
        assert_eq!(merged.font_family, "Arial");
        assert_eq!(merged.font_size, SizeOption::Medium);
        assert_eq!(merged.header_size, SizeOption::Large);
        assert_eq!(merged.spacing, SpacingOption::Comfortable);
        assert_eq!(merged.layout, LayoutStyle::Modern);
        assert!(!merged.show_profile_image);
        assert_eq!(merged.text_colors.section_titles, "#8B5CF6");
        assert_eq!(merged.text_colors.links, "#3B82F6");
    }

    #[test]
    fn test_overrides_survive_the_merge() {
        let partial = PartialSettings {
            primary_color: Some("#000000".to_string()),
            layout: Some(LayoutStyle::Classic),
            show_profile_image: Some(true),
            ..PartialSettings::default()
        };
        let merged = ResumeSettings::with_defaults(partial);
        assert_eq!(merged.primary_color, "#000000");
        assert_eq!(merged.layout, LayoutStyle::Classic);
        assert!(merged.show_profile_image);
        // untouched fields still default
        assert_eq!(merged.secondary_color, "#3B82F6");
        assert_eq!(merged.spacing, SpacingOption::Comfortable);
    }

    #[test]
    fn test_text_color_merge_is_per_key() {
        let partial = PartialSettings {
            text_colors: Some(PartialTextColors {
                name: Some("#ff0000".to_string()),
                ..PartialTextColors::default()
            }),
            ..PartialSettings::default()
        };
        let merged = ResumeSettings::with_defaults(partial);
        assert_eq!(merged.text_colors.name, "#ff0000");
        // sibling roles keep their own defaults
        assert_eq!(merged.text_colors.labels, "#4b5563");
        assert_eq!(merged.text_colors.values, "#1f2937");
        assert_eq!(merged.text_colors.section_content, "#1f2937");
    }

    #[test]
    fn test_enum_wire_values_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&SpacingOption::Comfortable).unwrap(),
            "\"comfortable\""
        );
        assert_eq!(
            serde_json::to_string(&ImagePosition::Center).unwrap(),
            "\"center\""
        );
        let size: SizeOption = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(size, SizeOption::Large);
        let bad: Result<LayoutStyle, _> = serde_json::from_str("\"futuristic\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_partial_deserializes_from_sparse_json() {
        let partial: PartialSettings =
            serde_json::from_str(r##"{"font_size":"small","text_colors":{"links":"#123456"}}"##)
                .unwrap();
        let merged = ResumeSettings::with_defaults(partial);
        assert_eq!(merged.font_size, SizeOption::Small);
        assert_eq!(merged.text_colors.links, "#123456");
        assert_eq!(merged.text_colors.name, "#1f2937");
    }
}
