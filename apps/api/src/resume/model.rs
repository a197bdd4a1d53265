//! Core editor data model: personal info, section kinds, sections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact block shown in the resume header. One instance per editing
/// session, mutated in place, discarded with the session.
///
/// The three optionals arrive from editors as empty strings once a field has
/// been touched and cleared; [`non_empty`] is the canonical presence check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Data URI or URL.
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Treats `None` and `Some("")` alike: both mean the field is absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The closed set of resume section kinds. A section list never contains the
/// same kind twice; an unknown or empty kind is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Interests,
    Achievements,
    Publications,
}

impl SectionKind {
    /// Every kind, in the order the add-section picker offers them.
    pub const ALL: [SectionKind; 10] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Interests,
        SectionKind::Achievements,
        SectionKind::Publications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Interests => "interests",
            SectionKind::Achievements => "achievements",
            SectionKind::Publications => "publications",
        }
    }

    /// Display title for the rendered document.
    pub fn title(&self) -> String {
        section_title(self.as_str())
    }
}

/// Uppercases only the first character, leaving the remainder untouched:
/// `"experience"` → `"Experience"`, `"fullStack"` → `"FullStack"`.
/// Exported documents depend on this exact rule; do not title-case.
pub fn section_title(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One named block of resume content. The id is stable across reorders; the
/// position in the owning list is the ordering, with no separate sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub kind: SectionKind,
    pub content: String,
}

impl Section {
    /// A new empty section with a freshly generated id.
    pub fn new(kind: SectionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_title_capitalizes_first_char_only() {
        assert_eq!(section_title("experience"), "Experience");
        assert_eq!(section_title("skills"), "Skills");
    }

    #[test]
    fn test_section_title_is_not_title_case() {
        // Multi-word camelCase input keeps its interior capitalization and
        // nothing else changes.
        assert_eq!(section_title("fullStack"), "FullStack");
        assert_eq!(section_title("two words"), "Two words");
    }

    #[test]
    fn test_section_title_empty_input() {
        assert_eq!(section_title(""), "");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&SectionKind::Certifications).unwrap();
        assert_eq!(json, "\"certifications\"");
        let back: SectionKind = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(back, SectionKind::Summary);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<SectionKind, _> = serde_json::from_str("\"hobbies\"");
        assert!(result.is_err());
        let empty: Result<SectionKind, _> = serde_json::from_str("\"\"");
        assert!(empty.is_err());
    }

    #[test]
    fn test_all_kinds_covered_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in SectionKind::ALL {
            assert!(seen.insert(kind.as_str()), "duplicate kind in ALL");
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn test_new_section_is_empty_with_fresh_id() {
        let a = Section::new(SectionKind::Projects);
        let b = Section::new(SectionKind::Projects);
        assert!(a.content.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(
            non_empty(&Some("linkedin.com/in/dev".to_string())),
            Some("linkedin.com/in/dev")
        );
    }

    #[test]
    fn test_personal_info_deserializes_from_partial_json() {
        let info: PersonalInfo = serde_json::from_str(r#"{"full_name":"Ada"}"#).unwrap();
        assert_eq!(info.full_name, "Ada");
        assert!(info.email.is_empty());
        assert!(info.linkedin.is_none());
    }
}
