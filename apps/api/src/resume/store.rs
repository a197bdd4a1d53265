//! In-memory editing sessions: the section store and its generation ledger.
//!
//! The list operations at the top are pure functions over `Vec<Section>` and
//! carry the ordering semantics on their own; [`SessionManager`] wraps them
//! with ownership checks and concurrency bookkeeping. No lock or map guard is
//! ever held across an await point: generation works through a begin/complete
//! ticket protocol so the provider call happens with no session borrowed, and
//! a ticket dropped unsettled releases its reservation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::model::{PersonalInfo, Section, SectionKind};
use crate::resume::settings::{PartialSettings, ResumeSettings};

/// Sections every new session starts with, in order.
pub const DEFAULT_SECTION_KINDS: [SectionKind; 4] = [
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
];

// ────────────────────────────────────────────────────────────────────────────
// Pure list operations
// ────────────────────────────────────────────────────────────────────────────

/// Appends a new empty section of `kind`. Rejects a kind that is already
/// present; the list never holds two sections of the same kind.
pub fn add_section(sections: &mut Vec<Section>, kind: SectionKind) -> Result<Section, AppError> {
    if sections.iter().any(|s| s.kind == kind) {
        return Err(AppError::Validation(format!(
            "section '{}' already exists",
            kind.as_str()
        )));
    }
    let section = Section::new(kind);
    sections.push(section.clone());
    Ok(section)
}

/// Removes the section with `id`. Returns `false` (and changes nothing) when
/// no such section exists.
pub fn delete_section(sections: &mut Vec<Section>, id: Uuid) -> bool {
    let before = sections.len();
    sections.retain(|s| s.id != id);
    sections.len() != before
}

/// Replaces the content of the section with `id`, preserving its identity and
/// position. Returns the updated section, or `None` if absent.
pub fn update_content(sections: &mut [Section], id: Uuid, content: &str) -> Option<Section> {
    let section = sections.iter_mut().find(|s| s.id == id)?;
    section.content = content.to_string();
    Some(section.clone())
}

/// Moves the section at `source_index` so it ends up at `dest_index`, shifting
/// everything between by one. Splice semantics: remove at source, insert at
/// destination. Either index out of bounds is a no-op returning `false`, the
/// shape a cancelled drag arrives in.
pub fn reorder(sections: &mut Vec<Section>, source_index: usize, dest_index: usize) -> bool {
    if source_index >= sections.len() || dest_index >= sections.len() {
        return false;
    }
    let section = sections.remove(source_index);
    sections.insert(dest_index, section);
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Editing session
// ────────────────────────────────────────────────────────────────────────────

/// One user's complete editing state. Lives only in memory and is discarded
/// when the session ends.
#[derive(Debug)]
pub struct EditorSession {
    pub id: Uuid,
    pub owner: String,
    pub personal_info: PersonalInfo,
    pub settings: ResumeSettings,
    pub sections: Vec<Section>,
    /// Section id → ticket token for the single in-flight generation allowed
    /// per section.
    in_flight: HashMap<Uuid, u64>,
    next_token: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EditorSession {
    fn new(owner: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            personal_info: PersonalInfo::default(),
            settings: ResumeSettings::default(),
            sections: DEFAULT_SECTION_KINDS.into_iter().map(Section::new).collect(),
            in_flight: HashMap::new(),
            next_token: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(&self) -> EditorSnapshot {
        let mut generating: Vec<Uuid> = self.in_flight.keys().copied().collect();
        generating.sort();
        let available_kinds = SectionKind::ALL
            .into_iter()
            .filter(|kind| !self.sections.iter().any(|s| s.kind == *kind))
            .collect();
        EditorSnapshot {
            id: self.id,
            personal_info: self.personal_info.clone(),
            settings: self.settings.clone(),
            sections: self.sections.clone(),
            generating,
            available_kinds,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client-facing view of a session, returned by every read and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub id: Uuid,
    pub personal_info: PersonalInfo,
    pub settings: ResumeSettings,
    pub sections: Vec<Section>,
    /// Ids of sections with a generation in flight, sorted for stable output.
    pub generating: Vec<Uuid>,
    /// Kinds not yet present, in picker order.
    pub available_kinds: Vec<SectionKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Capability to finish one reserved generation. Carries a snapshot of the
/// prompt inputs so the provider call runs with no session guard held; the
/// private token ties the ticket to exactly one reservation.
///
/// An unsettled ticket releases its reservation on drop, so a handler future
/// dropped mid-call cannot leave the section reserved.
#[derive(Debug)]
pub struct GenerationTicket {
    pub session_id: Uuid,
    pub section_id: Uuid,
    pub kind: SectionKind,
    pub personal_info: PersonalInfo,
    token: u64,
    manager: SessionManager,
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        self.manager
            .release_reservation(self.session_id, self.section_id, self.token);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session manager
// ────────────────────────────────────────────────────────────────────────────

/// Concurrent map of live editing sessions. Cheap to clone; all clones share
/// the same map.
#[derive(Clone, Debug)]
pub struct SessionManager {
    sessions: Arc<DashMap<Uuid, EditorSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Creates a session seeded with the default sections and settings.
    pub fn create(&self, owner: &str) -> EditorSnapshot {
        let session = EditorSession::new(owner);
        let snapshot = session.snapshot();
        self.sessions.insert(session.id, session);
        snapshot
    }

    /// Ends a session, discarding all state. Ending an absent session is a
    /// no-op so the call is idempotent.
    pub fn end(&self, id: Uuid, owner: &str) -> Result<(), AppError> {
        if let Some(entry) = self.sessions.get(&id) {
            if entry.owner != owner {
                return Err(AppError::Forbidden);
            }
        } else {
            return Ok(());
        }
        self.sessions.remove(&id);
        Ok(())
    }

    pub fn snapshot(&self, id: Uuid, owner: &str) -> Result<EditorSnapshot, AppError> {
        self.read_session(id, owner, |s| s.snapshot())
    }

    pub fn update_personal_info(
        &self,
        id: Uuid,
        owner: &str,
        info: PersonalInfo,
    ) -> Result<EditorSnapshot, AppError> {
        self.with_session(id, owner, |s| {
            s.personal_info = info;
            Ok(s.snapshot())
        })
    }

    /// Applies a partial settings update. The merge target is the documented
    /// defaults, not the currently stored settings: a client that omits a
    /// field gets the default back for it.
    pub fn update_settings(
        &self,
        id: Uuid,
        owner: &str,
        partial: PartialSettings,
    ) -> Result<EditorSnapshot, AppError> {
        self.with_session(id, owner, |s| {
            s.settings = ResumeSettings::with_defaults(partial);
            Ok(s.snapshot())
        })
    }

    pub fn add_section(
        &self,
        id: Uuid,
        owner: &str,
        kind: SectionKind,
    ) -> Result<EditorSnapshot, AppError> {
        self.with_session(id, owner, |s| {
            add_section(&mut s.sections, kind)?;
            Ok(s.snapshot())
        })
    }

    /// Deletes a section and forgets any generation reserved for it, so a
    /// response still in flight finds nothing to write into.
    pub fn delete_section(
        &self,
        id: Uuid,
        owner: &str,
        section_id: Uuid,
    ) -> Result<EditorSnapshot, AppError> {
        self.with_session(id, owner, |s| {
            if delete_section(&mut s.sections, section_id) {
                s.in_flight.remove(&section_id);
            }
            Ok(s.snapshot())
        })
    }

    pub fn update_section_content(
        &self,
        id: Uuid,
        owner: &str,
        section_id: Uuid,
        content: &str,
    ) -> Result<EditorSnapshot, AppError> {
        self.with_session(id, owner, |s| {
            update_content(&mut s.sections, section_id, content).ok_or_else(|| {
                AppError::NotFound(format!("Section {section_id} not found"))
            })?;
            Ok(s.snapshot())
        })
    }

    /// Returns whether anything moved plus the resulting snapshot. An
    /// out-of-bounds index reports `false` with the order unchanged.
    pub fn reorder_sections(
        &self,
        id: Uuid,
        owner: &str,
        source_index: usize,
        dest_index: usize,
    ) -> Result<(bool, EditorSnapshot), AppError> {
        self.with_session(id, owner, |s| {
            let moved = reorder(&mut s.sections, source_index, dest_index);
            Ok((moved, s.snapshot()))
        })
    }

    /// Reserves a generation slot for one section and returns the ticket used
    /// to settle it. At most one reservation per section may exist; a second
    /// call while the first is unsettled is rejected.
    pub fn begin_generation(
        &self,
        id: Uuid,
        owner: &str,
        section_id: Uuid,
    ) -> Result<GenerationTicket, AppError> {
        self.with_session(id, owner, |s| {
            let kind = match s.sections.iter().find(|x| x.id == section_id) {
                Some(section) => section.kind,
                None => {
                    return Err(AppError::NotFound(format!(
                        "Section {section_id} not found"
                    )))
                }
            };
            if s.in_flight.contains_key(&section_id) {
                return Err(AppError::Validation(
                    "a generation for this section is already in flight".to_string(),
                ));
            }
            let token = s.next_token;
            s.next_token += 1;
            s.in_flight.insert(section_id, token);
            Ok(GenerationTicket {
                session_id: id,
                section_id,
                kind,
                personal_info: s.personal_info.clone(),
                token,
                manager: self.clone(),
            })
        })
    }

    /// Settles a ticket with generated text, consuming it. Writes the content
    /// only when the session still exists and the reservation is still the
    /// ticket's own; otherwise the text is discarded and `None` comes back.
    /// Only a successful write touches section content.
    pub fn complete_generation(&self, ticket: GenerationTicket, text: String) -> Option<Section> {
        let mut entry = self.sessions.get_mut(&ticket.session_id)?;
        let session = entry.value_mut();
        if session.in_flight.get(&ticket.section_id) != Some(&ticket.token) {
            return None;
        }
        session.in_flight.remove(&ticket.section_id);
        let updated = {
            let section = session
                .sections
                .iter_mut()
                .find(|s| s.id == ticket.section_id)?;
            section.content = text;
            section.clone()
        };
        session.updated_at = Utc::now();
        Some(updated)
    }

    /// Removes the reservation a dropped ticket still holds. The token check
    /// makes this a no-op once the ticket has settled or the reservation has
    /// been rotated to a newer ticket.
    fn release_reservation(&self, session_id: Uuid, section_id: Uuid, token: u64) {
        if let Some(mut entry) = self.sessions.get_mut(&session_id) {
            let session = entry.value_mut();
            if session.in_flight.get(&section_id) == Some(&token) {
                session.in_flight.remove(&section_id);
            }
        }
    }

    /// Discards every session idle longer than `idle_ttl_secs`, returning how
    /// many were removed. Explicit end and this sweep are the only ways a
    /// session leaves the map.
    pub fn sweep_idle(&self, idle_ttl_secs: i64, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| (now - session.updated_at).num_seconds() <= idle_ttl_secs);
        before - self.sessions.len()
    }

    fn read_session<T>(
        &self,
        id: Uuid,
        owner: &str,
        f: impl FnOnce(&EditorSession) -> T,
    ) -> Result<T, AppError> {
        let entry = self
            .sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Editing session {id} not found")))?;
        if entry.owner != owner {
            return Err(AppError::Forbidden);
        }
        Ok(f(entry.value()))
    }

    fn with_session<T>(
        &self,
        id: Uuid,
        owner: &str,
        f: impl FnOnce(&mut EditorSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Editing session {id} not found")))?;
        if entry.owner != owner {
            return Err(AppError::Forbidden);
        }
        let result = f(entry.value_mut())?;
        entry.updated_at = Utc::now();
        Ok(result)
    }
}
