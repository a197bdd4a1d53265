//! Prompt builders for section generation.
//!
//! The system prompt pins the writer persona and embeds the contact details
//! that ground the output; the user prompt is either the caller's own
//! instruction or a default derived from the section kind.

use crate::resume::model::{non_empty, PersonalInfo, SectionKind};

const GENERATION_GUIDELINES: &str = "\
1. Make the content concise, professional, and impactful
2. Use action verbs and quantifiable achievements
3. Tailor the content to the section type
4. Maintain a consistent professional tone
5. Focus on relevant skills and experiences
6. Use industry-standard formatting and terminology";

/// System prompt for generating one section. Absent optional fields are
/// omitted entirely rather than sent as empty placeholder lines.
pub fn section_system_prompt(kind: SectionKind, info: &PersonalInfo) -> String {
    let mut prompt = format!(
        "You are a professional resume writer. Generate content for the {} section of a resume for {}.\n\n",
        kind.as_str(),
        info.full_name
    );
    prompt.push_str("Personal Information:\n");
    prompt.push_str(&format!("- Name: {}\n", info.full_name));
    prompt.push_str(&format!("- Location: {}\n", info.location));
    if let Some(linkedin) = non_empty(&info.linkedin) {
        prompt.push_str(&format!("- LinkedIn: {linkedin}\n"));
    }
    if let Some(website) = non_empty(&info.website) {
        prompt.push_str(&format!("- Website: {website}\n"));
    }
    prompt.push_str("\nGuidelines:\n");
    prompt.push_str(GENERATION_GUIDELINES);
    prompt
}

/// User prompt: the caller's instruction when one was given, otherwise a
/// default built from the section kind and name.
pub fn section_user_prompt(kind: SectionKind, info: &PersonalInfo, hint: Option<&str>) -> String {
    match hint {
        Some(h) if !h.trim().is_empty() => h.to_string(),
        _ => format!(
            "Generate professional content for the {} section of a resume for {}. \
             Make it concise, professional, and impactful.",
            kind.as_str(),
            info.full_name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> PersonalInfo {
        PersonalInfo {
            full_name: "Ada Lovelace".to_string(),
            location: "London".to_string(),
            ..PersonalInfo::default()
        }
    }

    #[test]
    fn test_system_prompt_embeds_kind_and_contact_details() {
        let prompt = section_system_prompt(SectionKind::Experience, &info());
        assert!(prompt.starts_with(
            "You are a professional resume writer. Generate content for the experience section of a resume for Ada Lovelace."
        ));
        assert!(prompt.contains("- Name: Ada Lovelace"));
        assert!(prompt.contains("- Location: London"));
        assert!(prompt.contains("Guidelines:"));
        assert!(prompt.contains("6. Use industry-standard formatting and terminology"));
    }

    #[test]
    fn test_system_prompt_omits_absent_optionals() {
        let mut i = info();
        i.linkedin = Some(String::new());
        let prompt = section_system_prompt(SectionKind::Skills, &i);
        assert!(!prompt.contains("LinkedIn"));
        assert!(!prompt.contains("Website"));
    }

    #[test]
    fn test_system_prompt_includes_present_optionals() {
        let mut i = info();
        i.linkedin = Some("linkedin.com/in/ada".to_string());
        i.website = Some("ada.dev".to_string());
        let prompt = section_system_prompt(SectionKind::Skills, &i);
        assert!(prompt.contains("- LinkedIn: linkedin.com/in/ada"));
        assert!(prompt.contains("- Website: ada.dev"));
    }

    #[test]
    fn test_user_prompt_default_phrasing() {
        let prompt = section_user_prompt(SectionKind::Summary, &info(), None);
        assert_eq!(
            prompt,
            "Generate professional content for the summary section of a resume for Ada Lovelace. \
             Make it concise, professional, and impactful."
        );
    }

    #[test]
    fn test_user_prompt_prefers_caller_hint() {
        let prompt = section_user_prompt(
            SectionKind::Summary,
            &info(),
            Some("Emphasize analytical engines."),
        );
        assert_eq!(prompt, "Emphasize analytical engines.");
    }

    #[test]
    fn test_blank_hint_falls_back_to_default() {
        let prompt = section_user_prompt(SectionKind::Summary, &info(), Some("   "));
        assert!(prompt.starts_with("Generate professional content"));
    }
}
