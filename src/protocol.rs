//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names follow the browser widget's camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ProviderKind;

/// Body of `POST /api/ai-hint`. The client replays the whole conversation on every call.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    pub user_input: String,
    pub current_step: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub problem_data: ProblemData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conversation_history: Vec<Turn>,
}

/// The widget sends `null` for fields it has not filled in yet; treat it like an absent field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_answer: String,
    #[serde(default)]
    pub full_solution: Option<String>,
}

/// One earlier exchange: what the student wrote and what the tutor answered.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Turn {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HintResponse {
    pub hint: String,
    /// Absent when the attempt limit revealed the solution without asking a provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub provider: ProviderKind,
    pub details: String,
}

#[derive(Serialize)]
pub struct MethodNotAllowed {
    pub error: &'static str,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub provider: ProviderKind,
}
