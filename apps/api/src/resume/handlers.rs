//! Route handlers for the resume editor.
//!
//! Every mutation returns the full session snapshot so the client never has
//! to reconcile partial state. Handlers stay thin: ownership checks and list
//! semantics live in the store, pagination in the layout module.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::errors::AppError;
use crate::llm_client::prompts::{section_system_prompt, section_user_prompt};
use crate::llm_client::ChatMessage;
use crate::resume::layout::{layout, Document};
use crate::resume::model::{PersonalInfo, Section, SectionKind};
use crate::resume::settings::PartialSettings;
use crate::resume::store::EditorSnapshot;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub kind: SectionKind,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub source_index: usize,
    pub dest_index: usize,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    /// `false` when either index was out of bounds and nothing moved.
    pub moved: bool,
    pub session: EditorSnapshot,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateSectionRequest {
    /// Optional caller instruction; the default prompt is used when absent.
    #[serde(default)]
    pub prompt_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSectionResponse {
    pub section: Section,
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<EditorSnapshot>, AppError> {
    let snapshot = state.sessions.create(&auth.user_id);
    info!("created editing session {} for {}", snapshot.id, auth.user_id);
    Ok(Json(snapshot))
}

/// GET /api/v1/resume/sessions/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.snapshot(session_id, &auth.user_id)?))
}

/// DELETE /api/v1/resume/sessions/:session_id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.end(session_id, &auth.user_id)?;
    info!("ended editing session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info and settings
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/resume/sessions/:session_id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(info): Json<PersonalInfo>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.update_personal_info(
        session_id,
        &auth.user_id,
        info,
    )?))
}

/// PUT /api/v1/resume/sessions/:session_id/settings
///
/// Takes a partial body; omitted fields come back as their defaults.
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(partial): Json<PartialSettings>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.update_settings(
        session_id,
        &auth.user_id,
        partial,
    )?))
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/sessions/:session_id/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AddSectionRequest>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.add_section(
        session_id,
        &auth.user_id,
        request.kind,
    )?))
}

/// DELETE /api/v1/resume/sessions/:session_id/sections/:section_id
pub async fn handle_delete_section(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path((session_id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.delete_section(
        session_id,
        &auth.user_id,
        section_id,
    )?))
}

/// PUT /api/v1/resume/sessions/:session_id/sections/:section_id
pub async fn handle_update_section_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path((session_id, section_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<EditorSnapshot>, AppError> {
    Ok(Json(state.sessions.update_section_content(
        session_id,
        &auth.user_id,
        section_id,
        &request.content,
    )?))
}

/// POST /api/v1/resume/sessions/:session_id/sections/reorder
pub async fn handle_reorder_sections(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, AppError> {
    let (moved, session) = state.sessions.reorder_sections(
        session_id,
        &auth.user_id,
        request.source_index,
        request.dest_index,
    )?;
    Ok(Json(ReorderResponse { moved, session }))
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/sessions/:session_id/sections/:section_id/generate
///
/// Reserves the section, calls the provider with no session guard held, then
/// settles the ticket; an unsettled ticket releases its reservation when
/// dropped. A provider failure or a section that disappeared mid-flight
/// leaves existing content untouched.
pub async fn handle_generate_section(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path((session_id, section_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<GenerateSectionRequest>,
) -> Result<Json<GenerateSectionResponse>, AppError> {
    let ticket = state
        .sessions
        .begin_generation(session_id, &auth.user_id, section_id)?;

    let messages = [
        ChatMessage::system(section_system_prompt(ticket.kind, &ticket.personal_info)),
        ChatMessage::user(section_user_prompt(
            ticket.kind,
            &ticket.personal_info,
            request.prompt_hint.as_deref(),
        )),
    ];

    let generated = state
        .llm
        .complete(
            &messages,
            state.config.generation_max_tokens,
            state.config.generation_temperature,
        )
        .await;

    // Every path that does not settle the ticket drops it, which releases the
    // reservation: the provider error below, or this future being dropped on
    // client disconnect during the await above.
    let text = match generated {
        Ok(text) => text,
        Err(e) => return Err(AppError::Generation(format!("Section generation failed: {e}"))),
    };
    match state.sessions.complete_generation(ticket, text) {
        Some(section) => {
            info!(
                "generated {} content for section {} in session {}",
                section.kind.as_str(),
                section.id,
                session_id
            );
            Ok(Json(GenerateSectionResponse { section }))
        }
        None => Err(AppError::NotFound(
            "section was removed before generation completed; content discarded".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume/sessions/:session_id/layout
///
/// Returns the paginated document for preview or export.
pub async fn handle_layout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let snapshot = state.sessions.snapshot(session_id, &auth.user_id)?;
    Ok(Json(layout(
        &snapshot.personal_info,
        &snapshot.sections,
        &snapshot.settings,
    )))
}
