use axum::{extract::State, Json};
use tracing::info;

use super::AppJson;
use crate::errors::AppError;
use crate::generator::{generate_json, prompts, GenerationOptions};
use crate::models::ai::{
    resume_brief, ActionVerbsReply, ActionVerbsRequest, ActionVerbsResult, AiHealth,
    AtsOptimizeRequest, AtsReply, AtsReport, CoverLetter, CoverLetterReply, CoverLetterRequest,
    Tone, ToneAdjustRequest, ToneAdjustment, ToneReply,
};
use crate::models::response::ApiResponse;
use crate::state::AppState;

const MIN_RESUME_CHARS: usize = 20;
const MIN_TEXT_CHARS: usize = 5;
const MIN_ACTION_VERB_CHARS: usize = 10;
const MIN_JOB_DESCRIPTION_CHARS: usize = 10;

/// Checks a required string field; length is measured on the trimmed value.
fn require_len<'a>(
    value: Option<&'a str>,
    missing: &str,
    too_short: &str,
    min_chars: usize,
) -> Result<&'a str, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(missing.to_string()))?;
    if value.trim().chars().count() < min_chars {
        return Err(AppError::Validation(too_short.to_string()));
    }
    Ok(value)
}

fn require_text(text: Option<&str>, min_chars: usize) -> Result<&str, AppError> {
    require_len(text, "text is required", "text is too short", min_chars)
}

/// GET /api/v1/ai/health
/// Always 200; `success` mirrors whether the generator answered.
pub async fn handle_ai_health(State(state): State<AppState>) -> Json<ApiResponse<AiHealth>> {
    let health = state.generator.check_health().await;
    let data = AiHealth {
        gemini_status: if health.available { "available" } else { "unavailable" },
        configured: state.generator.is_configured(),
        response_time: health.response_time_ms,
    };

    if health.available {
        Json(ApiResponse::ok(data))
    } else {
        let message = health
            .error
            .unwrap_or_else(|| "Gemini AI is not available".to_string());
        Json(ApiResponse::failure(data, message))
    }
}

/// POST /api/v1/ai/ats-optimize
pub async fn handle_ats_optimize(
    State(state): State<AppState>,
    AppJson(req): AppJson<AtsOptimizeRequest>,
) -> Result<Json<ApiResponse<AtsReport>>, AppError> {
    let resume_text = require_len(
        req.resume_text.as_deref(),
        "resumeText is required",
        "resume text is too short",
        MIN_RESUME_CHARS,
    )?;

    let prompt = prompts::ats_optimize(resume_text, req.job_description.as_deref());
    let reply: AtsReply =
        generate_json(state.generator.as_ref(), &prompt, GenerationOptions::new(0.3, 2048)).await?;
    let report = AtsReport::from(reply);

    info!(score = report.score, "ATS review generated");
    Ok(Json(ApiResponse::ok(report)))
}

/// POST /api/v1/ai/tone-adjust
pub async fn handle_tone_adjust(
    State(state): State<AppState>,
    AppJson(req): AppJson<ToneAdjustRequest>,
) -> Result<Json<ApiResponse<ToneAdjustment>>, AppError> {
    let text = require_text(req.text.as_deref(), MIN_TEXT_CHARS)?;
    let tone = req
        .tone
        .as_deref()
        .and_then(Tone::parse)
        .ok_or_else(|| AppError::Validation(r#"tone must be "formal" or "casual""#.to_string()))?;

    let prompt = prompts::tone_adjust(text, tone);
    let reply: ToneReply =
        generate_json(state.generator.as_ref(), &prompt, GenerationOptions::new(0.5, 2048)).await?;

    info!(tone = tone.as_str(), "tone adjusted");
    Ok(Json(ApiResponse::ok(ToneAdjustment::from_reply(reply, text, tone))))
}

/// POST /api/v1/ai/action-verbs
pub async fn handle_action_verbs(
    State(state): State<AppState>,
    AppJson(req): AppJson<ActionVerbsRequest>,
) -> Result<Json<ApiResponse<ActionVerbsResult>>, AppError> {
    let text = require_text(req.text.as_deref(), MIN_ACTION_VERB_CHARS)?;

    let prompt = prompts::action_verbs(text);
    let reply: ActionVerbsReply =
        generate_json(state.generator.as_ref(), &prompt, GenerationOptions::new(0.5, 2048)).await?;
    let result = ActionVerbsResult::from_reply(reply, text);

    info!(changes = result.total_changes, "action verbs enhanced");
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/v1/ai/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    AppJson(req): AppJson<CoverLetterRequest>,
) -> Result<Json<ApiResponse<CoverLetter>>, AppError> {
    let resume_data = req
        .resume_data
        .as_ref()
        .filter(|data| !data.is_null())
        .ok_or_else(|| AppError::Validation("resumeData is required".to_string()))?;
    let job_description = require_len(
        req.job_description.as_deref().filter(|jd| !jd.is_empty()),
        "jobDescription is required",
        "job description is too short",
        MIN_JOB_DESCRIPTION_CHARS,
    )?;

    let prompt = prompts::cover_letter(
        &resume_brief(resume_data),
        job_description,
        req.company_name.as_deref(),
    );
    let reply: CoverLetterReply =
        generate_json(state.generator.as_ref(), &prompt, GenerationOptions::new(0.7, 4096)).await?;
    let letter = CoverLetter::from(reply);

    info!(words = letter.word_count, "cover letter generated");
    Ok(Json(ApiResponse::ok(letter)))
}
