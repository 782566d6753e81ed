//! Generation endpoint: request schema, validation, and handler

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::AppState;
use super::error::ApiError;
use crate::ai;

/// Tone used when the request does not specify one
const DEFAULT_TONE: &str = "professional";

/// Raw body of `POST /api/generate`.
///
/// `mode` is carried as a plain string and validated explicitly so that an
/// unrecognized value produces the documented "Invalid mode" error rather
/// than a deserializer rejection. Missing fields deserialize to empty/None
/// and are handled by `validate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bullet action items plus a one-to-two sentence summary
    Condense,
    /// Drafted response with a subject suggestion
    Reply,
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "condense" => Ok(Mode::Condense),
            "reply" => Ok(Mode::Reply),
            _ => Err(()),
        }
    }
}

/// A validated generation request with defaults applied
#[derive(Debug)]
pub struct Generation {
    pub email: String,
    pub mode: Mode,
    pub tone: String,
    pub model: String,
}

impl GenerateRequest {
    /// Validate the raw body and apply defaults. Runs before any upstream
    /// call; a request that fails here never reaches the provider.
    pub fn validate(self, default_model: &str) -> Result<Generation, ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::Validation("Email text required".to_string()));
        }

        let mode = self
            .mode
            .parse()
            .map_err(|_| ApiError::Validation("Invalid mode".to_string()))?;

        Ok(Generation {
            email: self.email,
            mode,
            tone: self.tone.unwrap_or_else(|| DEFAULT_TONE.to_string()),
            model: self.model.unwrap_or_else(|| default_model.to_string()),
        })
    }
}

impl Generation {
    /// The user instruction sent to the provider
    pub fn user_prompt(&self) -> String {
        match self.mode {
            Mode::Condense => ai::condense_prompt(&self.tone, &self.email),
            Mode::Reply => ai::reply_prompt(&self.tone, &self.email),
        }
    }
}

/// Handle `POST /api/generate`
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = body.validate(&state.ai.model)?;

    tracing::debug!(mode = ?request.mode, model = %request.model, "dispatching generation");

    let text = state
        .client
        .complete(
            &request.model,
            ai::EMAIL_ASSISTANT_SYSTEM,
            &request.user_prompt(),
            state.ai.max_tokens,
            state.ai.temperature,
        )
        .await
        .map_err(|e| ApiError::Provider(e.to_string()))?;

    Ok(Json(GenerateResponse { text }))
}
