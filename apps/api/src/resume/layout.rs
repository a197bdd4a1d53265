//! Deterministic pagination of an editing session into A4 pages.
//!
//! [`layout`] is a pure function: same personal info, sections and settings
//! in, same [`Document`] out, no clock or randomness. The document carries
//! everything a renderer needs (text, titles, resolved style, page geometry),
//! so the export boundary consumes it without reaching back into the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resume::model::{non_empty, PersonalInfo, Section};
use crate::resume::settings::ResumeSettings;

/// A4 portrait in PostScript points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// How many sections the first page holds; everything after overflows to the
/// second page. Count-based on purpose, so pagination never depends on font
/// metrics and stays identical across renderers.
const FIRST_PAGE_SECTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// One labeled row in the header contact block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledLine {
    pub label: String,
    pub value: String,
}

impl LabeledLine {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: blank_to_space(value),
        }
    }
}

/// Contact block rendered at the top of page one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub name: LabeledLine,
    pub email: LabeledLine,
    pub phone: LabeledLine,
    pub location: LabeledLine,
    /// LinkedIn/website rows, present only when the field is non-empty.
    pub links: Vec<LabeledLine>,
    /// Image source, present only when enabled in settings and non-empty.
    pub profile_image: Option<String>,
}

/// A section as it appears on a page: stable id, derived title, content with
/// the blank placeholder applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// 1-based page number.
    pub number: u32,
    /// Present on page one only.
    pub header: Option<HeaderBlock>,
    pub sections: Vec<RenderedSection>,
    /// `"N / total"`.
    pub footer: String,
}

/// The complete laid-out resume, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<PageContent>,
    pub geometry: PageGeometry,
    /// Total resolved style; renderers apply it as-is with no fallbacks.
    pub style: ResumeSettings,
}

/// Lays out a resume onto one or two A4 pages. Page one carries the header
/// and the first three sections; the rest, if any, fill page two.
pub fn layout(info: &PersonalInfo, sections: &[Section], settings: &ResumeSettings) -> Document {
    let first: Vec<RenderedSection> = sections
        .iter()
        .take(FIRST_PAGE_SECTIONS)
        .map(render_section)
        .collect();
    let rest: Vec<RenderedSection> = sections
        .iter()
        .skip(FIRST_PAGE_SECTIONS)
        .map(render_section)
        .collect();

    let mut pages = vec![PageContent {
        number: 1,
        header: Some(header_block(info, settings)),
        sections: first,
        footer: String::new(),
    }];
    if !rest.is_empty() {
        pages.push(PageContent {
            number: 2,
            header: None,
            sections: rest,
            footer: String::new(),
        });
    }

    // Footers reflect the final page count, so they are stamped only after
    // the page set is complete.
    let total = pages.len();
    for page in &mut pages {
        page.footer = format!("{} / {}", page.number, total);
    }

    Document {
        pages,
        geometry: PageGeometry {
            width_pt: PAGE_WIDTH_PT,
            height_pt: PAGE_HEIGHT_PT,
        },
        style: settings.clone(),
    }
}

fn render_section(section: &Section) -> RenderedSection {
    RenderedSection {
        id: section.id,
        title: section.kind.title(),
        content: blank_to_space(&section.content),
    }
}

fn header_block(info: &PersonalInfo, settings: &ResumeSettings) -> HeaderBlock {
    let mut links = Vec::new();
    if let Some(linkedin) = non_empty(&info.linkedin) {
        links.push(LabeledLine::new("LinkedIn:", linkedin));
    }
    if let Some(website) = non_empty(&info.website) {
        links.push(LabeledLine::new("Website:", website));
    }
    let profile_image = if settings.show_profile_image {
        non_empty(&info.profile_image).map(str::to_string)
    } else {
        None
    };
    HeaderBlock {
        name: LabeledLine::new("Name:", &info.full_name),
        email: LabeledLine::new("Email:", &info.email),
        phone: LabeledLine::new("Phone:", &info.phone),
        location: LabeledLine::new("Location:", &info.location),
        links,
        profile_image,
    }
}

/// Blank text renders as a single space so the slot keeps its height instead
/// of collapsing.
fn blank_to_space(text: &str) -> String {
    if text.is_empty() {
        " ".to_string()
    } else {
        text.to_string()
    }
}
