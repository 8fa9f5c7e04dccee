use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills::{extract_skills, resume_text_from_bytes, SkillProfile};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct ResumeSkillsRequest {
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeSkillsResponse {
    pub skills: SkillProfile,
    pub fallback_used: bool,
}

fn skills_response(state: &AppState, resume_text: &str) -> ResumeSkillsResponse {
    let extraction = extract_skills(resume_text, &state.catalog);
    ResumeSkillsResponse {
        skills: extraction.profile,
        fallback_used: extraction.fallback_used,
    }
}

/// POST /api/v1/resume/skills
pub async fn handle_resume_skills(
    State(state): State<AppState>,
    Json(req): Json<ResumeSkillsRequest>,
) -> Result<Json<ResumeSkillsResponse>, AppError> {
    Ok(Json(skills_response(&state, &req.resume_text)))
}

/// POST /api/v1/resume/skills/upload
/// Multipart body with a `resume` file field (PDF or plain text).
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeSkillsResponse>, AppError> {
    let mut upload: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read resume upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("resume file field is required".to_string()))?;

    let resume_text =
        tokio::task::spawn_blocking(move || resume_text_from_bytes(file_name.as_deref(), &data))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume extraction: {e}")))?;

    Ok(Json(skills_response(&state, &resume_text)))
}
