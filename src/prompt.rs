//! Prompt assembly for the hint model.
//!
//! The exercise, its worked solution and the hint ladder are fixed text; only the
//! current step, the expected answer, the latest input and the replayed
//! conversation vary between calls. Nothing here judges the student's math: the
//! model does that from the instructions.

use std::fmt::Write as _;

use crate::domain::MAX_ATTEMPTS;
use crate::protocol::Turn;

/// The exercise statement and the complete reference solution.
pub const PROBLEM_AND_SOLUTION: &str = r#"# The Exercise: 3×3 Non-Homogeneous ODE System with Double Eigenvalue

## The Problem:
x' = Ax + b

A = [4, -1, -1; 1, 5, 2; 0, 1, 5]
b = e^{3t}[1, 1, 0]^T

Find the general solution.

## COMPLETE SOLUTIONS (your reference):

**Step 1 - Find Eigenvalues:**
- Characteristic polynomial: |λI - A| = (λ-4)²(λ-6)
- ANSWER: λ₁ = 6 (simple), λ₂ = 4 (double, multiplicity 2)

**Step 2 - Eigenvector for λ = 6:**
- (6I - A)v = 0
- Row reduce [2, 1, 1; -1, 1, -2; 0, -1, 1]
- ANSWER: v₁ = [-1, 1, 1]^T

**Step 3 - Eigenvector for λ = 4:**
- (4I - A)v = 0
- Row reduce [0, 1, 1; -1, -1, -2; 0, -1, -1]
- Geometric multiplicity = 1 (only one eigenvector)
- ANSWER: v₂ = [1, 1, -1]^T

**Step 4 - Generalized Eigenvector (Third Solution):**
- Since λ=4 has algebraic multiplicity 2 but geometric multiplicity 1, need generalized eigenvector
- Solve (A - 4I)w = v₂
- w₁ is free, choose w₁ = 0: w₂ = -3, w₃ = 2
- ANSWER: w = [0, -3, 2]^T
- Third solution: x₃(t) = te^{4t}v₂ + e^{4t}w = e^{4t}[t, t-3, 2-t]^T

**Step 5 - Particular Solution:**
- Since 3 is NOT an eigenvalue, try x_p = e^{3t}[a₁, a₂, a₃]^T
- Solve (3I - A)[a₁, a₂, a₃]^T = [1, 1, 0]^T
- ANSWER: a₁ = -1, a₂ = 0, a₃ = 0
- x_p(t) = e^{3t}[-1, 0, 0]^T

**General Solution:**
x(t) = -C₁e^{6t} + C₂e^{4t} + C₃te^{4t} - e^{3t}
y(t) = C₁e^{6t} + C₂e^{4t} + C₃(t-3)e^{4t}
z(t) = C₁e^{6t} - C₂e^{4t} + C₃(2-t)e^{4t}"#;

const COMMON_ERRORS: &str = r#"# COMMON ERRORS TO CHECK:
- Wrong determinant calculation for 3×3 matrix
- Confusing simple and double eigenvalue
- Not recognizing that geometric multiplicity < algebraic multiplicity
- Wrong sign in (A - 4I) vs (4I - A)
- Forgetting that 3 is not an eigenvalue (so simple ansatz works)
- Sign errors in the particular solution system"#;

const RESPONSE_RULES: &str = r#"# YOUR RESPONSE:
1. If CORRECT: "נכון! [brief confirmation]" and encourage next step
2. If INCORRECT: Identify the specific error and give the appropriate hint from above
3. If student asks for help/hint: Give the next hint in progression
4. After 3+ attempts: Give more explicit guidance, show intermediate steps"#;

/// Four progressively more explicit hints for one step.
pub struct StepHints {
  pub title: &'static str,
  pub hints: [&'static str; 4],
}

/// The hint ladder, indexed by `step - 1`.
pub const HINT_LADDER: [StepHints; 5] = [
  StepHints {
    title: "eigenvalues",
    hints: [
      "חשבו את הפולינום האופייני |λI - A| = 0. זוהי מטריצה 3×3.",
      "פתחו את הדטרמיננטה לפי שורה או עמודה. נסו לפי העמודה הראשונה.",
      "הפולינום האופייני הוא (λ-4)²(λ-6).",
      "λ₁ = 6 (ערך עצמי פשוט), λ₂ = 4 (ערך עצמי כפול).",
    ],
  },
  StepHints {
    title: "eigenvector for λ=6",
    hints: [
      "הציבו λ = 6 במטריצה (λI - A) ופתרו (6I - A)v = 0.",
      "המטריצה היא [2, 1, 1; -1, 1, -2; 0, -1, 1]. דרגו אותה.",
      "אחרי דירוג: v₃ = t (חופשי), v₂ = t, v₁ = -t.",
      "הוקטור העצמי הוא v₁ = [-1, 1, 1]^T.",
    ],
  },
  StepHints {
    title: "eigenvector for λ=4",
    hints: [
      "הציבו λ = 4 במטריצה (λI - A) ופתרו (4I - A)v = 0.",
      "המטריצה היא [0, 1, 1; -1, -1, -2; 0, -1, -1]. דרגו אותה.",
      "שימו לב שהריבוי הגאומטרי הוא 1 - יש רק וקטור עצמי אחד!",
      "הוקטור העצמי הוא v₂ = [1, 1, -1]^T.",
    ],
  },
  StepHints {
    title: "generalized eigenvector",
    hints: [
      "מכיוון שלערך העצמי הכפול λ=4 יש רק וקטור עצמי אחד, צריך וקטור מוכלל w.",
      "פתרו את המערכת (A - 4I)w = v₂, כלומר [0,-1,-1; 1,1,2; 0,1,1]w = [1,1,-1]^T.",
      "w₁ הוא פרמטר חופשי. בחרו w₁ = 0 ומצאו w₂ ו-w₃.",
      "w₂ = -3, w₃ = 2. הוקטור המוכלל הוא w = [0, -3, 2]^T.",
    ],
  },
  StepHints {
    title: "particular solution",
    hints: [
      "מכיוון ש-3 אינו ערך עצמי, ננסה פתרון פרטי x_p = e^{3t}[a₁, a₂, a₃]^T.",
      "הציבו במערכת וצמצמו את e^{3t}. תקבלו (3I - A)a = [1, 1, 0]^T.",
      "המטריצה (3I - A) = [-1, 1, 1; -1, -2, -2; 0, -1, -2]. פתרו את המערכת.",
      "a₁ = -1, a₂ = 0, a₃ = 0. הפתרון הפרטי הוא x_p = e^{3t}[-1, 0, 0]^T.",
    ],
  },
];

/// Hints for a 1-based step, if the step exists.
pub fn hints_for_step(step: u32) -> Option<&'static StepHints> {
  let idx = usize::try_from(step).ok()?.checked_sub(1)?;
  HINT_LADDER.get(idx)
}

fn preamble() -> String {
  format!(
    "# CRITICAL INSTRUCTIONS\n\
     1. Respond in HEBREW only\n\
     2. Be PRACTICAL and SPECIFIC - give concrete mathematical guidance\n\
     3. Keep responses 2-4 sentences\n\
     4. Use gender-neutral language (plural forms)\n\
     5. NEVER give the complete final answer until {MAX_ATTEMPTS} attempts exhausted\n\
     6. NEVER repeat the same hint - check conversation history and progress\n\
     7. NEVER put quotes around equations - write them directly without '' or \"\" marks\n\
     8. ACCEPT ANY MATHEMATICALLY EQUIVALENT FORM of the correct answer"
  )
}

/// Render replayed turns as student/tutor pairs. Empty history renders as "".
pub fn render_history(history: &[Turn]) -> String {
  let mut out = String::new();
  for turn in history {
    let _ = write!(out, "תשובת סטודנט: {}\nתגובת מורה: {}\n\n", turn.user, turn.ai);
  }
  out
}

fn render_hint_ladder() -> String {
  let mut out = String::from("# SPECIFIC HINTS BY STEP (give progressively):\n");
  for (i, step) in HINT_LADDER.iter().enumerate() {
    let _ = write!(out, "\n## If Step {} ({}):\n", i + 1, step.title);
    for (n, hint) in step.hints.iter().enumerate() {
      let _ = writeln!(out, "- Hint {}: \"{}\"", n + 1, hint);
    }
  }
  out
}

/// Inputs that vary from one call to the next.
pub struct PromptInput<'a> {
  pub current_step: u32,
  pub expected_answer: &'a str,
  pub student_input: &'a str,
  pub history: &'a [Turn],
}

/// Build the full instruction block sent to the model.
pub fn build_prompt(input: &PromptInput<'_>) -> String {
  let conversation = render_history(input.history);
  let previous = if conversation.is_empty() {
    String::new()
  } else {
    format!("## Previous Conversation:\n{conversation}")
  };

  format!(
    "\n{preamble}\n\n---\n\n{problem}\n\n---\n\n\
     ## Current Step: {step}\n\
     ## Expected Answer: {expected}\n\
     ## Student Input: {student}\n\n\
     {previous}\n\n---\n\n\
     {ladder}\n\
     {errors}\n\n\
     {rules}\n",
    preamble = preamble(),
    problem = PROBLEM_AND_SOLUTION,
    step = input.current_step,
    expected = input.expected_answer,
    student = input.student_input,
    previous = previous,
    ladder = render_hint_ladder(),
    errors = COMMON_ERRORS,
    rules = RESPONSE_RULES,
  )
}
