//! Bounded feedback rounds.
//!
//! Stages tagged for feedback collect client revision requests; stages
//! that also declare a round limit (branding) stop accepting new rounds
//! once the limit is reached. The counter is monotonic: never
//! decremented, reset only by re-creating the project.

use crate::catalog;
use crate::error::CoreError;
use crate::project::{FeedbackEntry, Project, Stage};
use crate::types::{StageId, Timestamp};

/// Count one revision cycle against the stage.
///
/// Fails with [`CoreError::FeedbackLimitExceeded`] if the stage's limit
/// was already reached before this call; the counter never silently caps.
/// Returns the new round count.
pub fn record_feedback_round(stage: &mut Stage) -> Result<u32, CoreError> {
    if let Some(limit) = stage.max_feedback_rounds {
        if stage.feedback_rounds >= limit {
            return Err(CoreError::FeedbackLimitExceeded { limit });
        }
    }
    stage.feedback_rounds += 1;
    Ok(stage.feedback_rounds)
}

/// Append one feedback entry to a feedback-capable stage, counting a
/// round first.
///
/// The round check runs before anything is written, so a rejected
/// submission leaves the stage untouched.
pub fn append_feedback(
    project: &mut Project,
    stage_id: StageId,
    author: &str,
    text: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    let behavior = catalog::behavior(stage_id).ok_or(CoreError::StageNotFound { stage_id })?;
    if !behavior.feedback {
        return Err(CoreError::FieldNotSupported {
            stage_id,
            field: "feedback",
        });
    }
    if text.trim().is_empty() {
        return Err(CoreError::EmptyComment);
    }

    let stage = project
        .stage_mut(stage_id)
        .ok_or(CoreError::StageNotFound { stage_id })?;
    record_feedback_round(stage)?;
    stage.feedback.push(FeedbackEntry {
        author: author.to_string(),
        text: text.to_string(),
        created_at: now,
    });
    Ok(())
}
