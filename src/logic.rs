//! Core hint pipeline shared by both binaries.
//!
//! attempt gate → validate → prompt → provider. Transport concerns (CORS, body
//! buffering, status codes) live in `routes`.

use tracing::{debug, info, instrument};

use crate::domain::MAX_ATTEMPTS;
use crate::error::HintError;
use crate::prompt::{build_prompt, hints_for_step, PromptInput, HINT_LADDER};
use crate::protocol::{HintRequest, HintResponse};
use crate::providers::HintProvider;

/// Notice prepended to the full solution once the attempts are used up.
pub fn attempts_exhausted_notice() -> String {
  format!("הסתיימה מכסת {} ניסיונות. להלן הפתרון המלא:\n\n", MAX_ATTEMPTS)
}

/// Attempt-limit gate. `Some(text)` means: reveal this instead of asking the model.
/// A missing `fullSolution` on the reveal branch is a client error.
pub fn attempt_gate(req: &HintRequest) -> Result<Option<String>, HintError> {
  if req.conversation_history.len() < MAX_ATTEMPTS {
    return Ok(None);
  }
  match req.problem_data.full_solution.as_deref() {
    Some(solution) => Ok(Some(format!("{}{}", attempts_exhausted_notice(), solution))),
    None => Err(HintError::InvalidRequest(
      "problemData.fullSolution is required once the attempt limit is reached".into(),
    )),
  }
}

/// Field checks the widget is expected to satisfy. Valid steps are the ones the hint ladder covers.
pub fn validate(req: &HintRequest) -> Result<(), HintError> {
  if hints_for_step(req.current_step).is_none() {
    return Err(HintError::InvalidRequest(format!(
      "currentStep must be between 1 and {}, got {}",
      HINT_LADDER.len(),
      req.current_step
    )));
  }
  Ok(())
}

/// Decode a raw request body. Anything that is not a well-formed `HintRequest` is malformed.
pub fn parse_request(body: &[u8]) -> Result<HintRequest, HintError> {
  Ok(serde_json::from_slice::<HintRequest>(body)?)
}

#[instrument(level = "info", skip(provider, req), fields(
  provider = %provider.kind(),
  step = req.current_step,
  attempts = req.conversation_history.len(),
  input_len = req.user_input.len(),
))]
pub async fn respond(provider: &dyn HintProvider, req: &HintRequest) -> Result<HintResponse, HintError> {
  if let Some(hint) = attempt_gate(req)? {
    info!(target: "ode_tutor", "Attempt limit reached; revealing full solution");
    return Ok(HintResponse { hint, provider: None });
  }
  validate(req)?;

  let prompt = build_prompt(&PromptInput {
    current_step: req.current_step,
    expected_answer: &req.problem_data.correct_answer,
    student_input: &req.user_input,
    history: &req.conversation_history,
  });
  debug!(target: "ode_tutor", prompt_len = prompt.len(), "Prompt assembled");

  let hint = provider.generate_hint(&prompt).await?;
  info!(target: "ode_tutor", hint_len = hint.len(), "Hint generated");
  Ok(HintResponse { hint, provider: Some(provider.kind()) })
}
