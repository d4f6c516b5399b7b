//! The stage transition engine.
//!
//! Enforces the single-active-stage invariant and the only two
//! state-changing moves, advance and revert, plus the generic field,
//! comment, and file-attachment updates. Every operation validates before
//! it mutates, so a failed call never leaves a partially-applied aggregate
//! visible to the caller.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::CoreError;
use crate::project::{Comment, FileRef, Project, StageStatus};
use crate::types::{StageId, Timestamp};

// ---------------------------------------------------------------------------
// Advance / revert
// ---------------------------------------------------------------------------

/// Mark the current stage `done` and open the next one.
///
/// Sets the current stage to `done` with `date = now`, the next stage to
/// `in-progress` with `date = now`, and advances the pointer. Each call is
/// one forward step; the operation is deliberately not idempotent and
/// callers must not double-submit.
pub fn complete_current_stage(project: &mut Project, now: Timestamp) -> Result<(), CoreError> {
    let current = project
        .stages
        .iter()
        .position(|s| s.id == project.current_stage)
        .ok_or(CoreError::NoActiveStage {
            current_stage: project.current_stage,
        })?;
    let next = project
        .stages
        .iter()
        .position(|s| s.id == project.current_stage + 1)
        .ok_or(CoreError::NoNextStage)?;

    project.stages[current].status = StageStatus::Done;
    project.stages[current].date = Some(now);
    project.stages[next].status = StageStatus::InProgress;
    project.stages[next].date = Some(now);
    project.current_stage += 1;
    Ok(())
}

/// Re-open the previous stage.
///
/// The current stage flips back to `locked` (its historical date is
/// preserved), the previous stage becomes `in-progress` again, and the
/// pointer moves back one step. Stage payload (files, links, feedback
/// rounds) is never rolled back; revert is status-only.
pub fn revert_to_previous_stage(project: &mut Project) -> Result<(), CoreError> {
    if project.current_stage <= 1 {
        return Err(CoreError::AlreadyAtFirstStage);
    }
    let previous = project
        .stages
        .iter()
        .position(|s| s.id == project.current_stage - 1)
        .ok_or(CoreError::StageNotFound {
            stage_id: project.current_stage - 1,
        })?;

    // In the terminal state the pointer sits one past the last stage and
    // there is no current stage row to lock.
    if let Some(current) = project
        .stages
        .iter()
        .position(|s| s.id == project.current_stage)
    {
        project.stages[current].status = StageStatus::Locked;
    }
    project.stages[previous].status = StageStatus::InProgress;
    project.current_stage -= 1;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stage field updates
// ---------------------------------------------------------------------------

/// The closed set of non-status stage fields writable through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageField {
    LinkUrl,
    FormAnswers,
}

impl StageField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinkUrl => "link_url",
            Self::FormAnswers => "form_answers",
        }
    }
}

/// Write a configuration field on a stage.
///
/// Allowed regardless of the stage's lock status: these are configuration
/// values an admin pre-fills, not progress signals, so gating does not
/// apply. Dispatch is by catalog behavior tag; a `null` value clears the
/// field.
pub fn set_stage_field(
    project: &mut Project,
    stage_id: StageId,
    field: StageField,
    value: serde_json::Value,
) -> Result<(), CoreError> {
    let behavior = catalog::behavior(stage_id).ok_or(CoreError::StageNotFound { stage_id })?;
    let supported = match field {
        StageField::LinkUrl => behavior.link,
        StageField::FormAnswers => behavior.form,
    };
    if !supported {
        return Err(CoreError::FieldNotSupported {
            stage_id,
            field: field.as_str(),
        });
    }

    // Validate the payload shape before touching the stage.
    let link = match (field, &value) {
        (StageField::LinkUrl, serde_json::Value::Null) => None,
        (StageField::LinkUrl, serde_json::Value::String(url)) => {
            if url.trim().is_empty() {
                return Err(CoreError::Validation(
                    "link_url must not be an empty string".to_string(),
                ));
            }
            Some(url.clone())
        }
        (StageField::LinkUrl, _) => {
            return Err(CoreError::Validation(
                "link_url must be a string or null".to_string(),
            ));
        }
        (StageField::FormAnswers, _) => None,
    };

    let stage = project
        .stage_mut(stage_id)
        .ok_or(CoreError::StageNotFound { stage_id })?;
    match field {
        StageField::LinkUrl => stage.link_url = link,
        StageField::FormAnswers => {
            stage.form_answers = if value.is_null() { None } else { Some(value) };
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Append a comment to the project's single ordered list, optionally
/// tagged with the stage it was written against. Append-only; comments
/// are never edited or removed.
pub fn append_comment(
    project: &mut Project,
    stage_id: Option<StageId>,
    author: &str,
    text: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::EmptyComment);
    }
    if author.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment author must not be empty".to_string(),
        ));
    }
    if let Some(stage_id) = stage_id {
        if project.stage(stage_id).is_none() {
            return Err(CoreError::StageNotFound { stage_id });
        }
    }
    project.comments.push(Comment {
        author: author.to_string(),
        text: text.to_string(),
        created_at: now,
        stage_id,
    });
    Ok(())
}

// ---------------------------------------------------------------------------
// File attachments
// ---------------------------------------------------------------------------

/// Attach a blob-store reference to a file-capable stage.
///
/// Invoked only after the blob store has confirmed storage, so a storage
/// failure never corrupts project state.
pub fn attach_file(
    project: &mut Project,
    stage_id: StageId,
    file: FileRef,
) -> Result<(), CoreError> {
    let behavior = catalog::behavior(stage_id).ok_or(CoreError::StageNotFound { stage_id })?;
    if !behavior.files {
        return Err(CoreError::FieldNotSupported {
            stage_id,
            field: "files",
        });
    }
    let stage = project
        .stage_mut(stage_id)
        .ok_or(CoreError::StageNotFound { stage_id })?;
    stage.files.push(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STAGE_COUNT;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn fresh_project() -> Project {
        Project::create("Site relaunch", "Acme", "pm@acme.test", Utc::now())
    }

    #[test]
    fn complete_advances_one_step() {
        let mut project = fresh_project();
        let now = Utc::now();

        complete_current_stage(&mut project, now).unwrap();

        assert_eq!(project.current_stage, 2);
        assert_eq!(project.stages[0].status, StageStatus::Done);
        assert_eq!(project.stages[0].date, Some(now));
        assert_eq!(project.stages[1].status, StageStatus::InProgress);
        assert_eq!(project.stages[1].date, Some(now));
        assert!(project.invariant_holds());
    }

    #[test]
    fn complete_walks_the_whole_pipeline() {
        let mut project = fresh_project();

        for _ in 1..STAGE_COUNT {
            complete_current_stage(&mut project, Utc::now()).unwrap();
            assert!(project.invariant_holds());
        }

        assert_eq!(project.current_stage, STAGE_COUNT);
        for stage in &project.stages[..(STAGE_COUNT - 1) as usize] {
            assert_eq!(stage.status, StageStatus::Done);
        }
        assert_eq!(
            project.stages[(STAGE_COUNT - 1) as usize].status,
            StageStatus::InProgress
        );
    }

    #[test]
    fn complete_at_final_stage_fails_and_leaves_state_unchanged() {
        let mut project = fresh_project();
        for _ in 1..STAGE_COUNT {
            complete_current_stage(&mut project, Utc::now()).unwrap();
        }
        let before = serde_json::to_value(&project).unwrap();

        let err = complete_current_stage(&mut project, Utc::now()).unwrap_err();

        assert_matches!(err, CoreError::NoNextStage);
        assert_eq!(serde_json::to_value(&project).unwrap(), before);
    }

    #[test]
    fn complete_with_dangling_pointer_reports_no_active_stage() {
        let mut project = fresh_project();
        project.current_stage = 99;

        let err = complete_current_stage(&mut project, Utc::now()).unwrap_err();
        assert_matches!(err, CoreError::NoActiveStage { current_stage: 99 });
    }

    #[test]
    fn revert_at_first_stage_fails_and_leaves_state_unchanged() {
        let mut project = fresh_project();
        let before = serde_json::to_value(&project).unwrap();

        let err = revert_to_previous_stage(&mut project).unwrap_err();

        assert_matches!(err, CoreError::AlreadyAtFirstStage);
        assert_eq!(serde_json::to_value(&project).unwrap(), before);
    }

    #[test]
    fn complete_then_revert_is_a_deliberately_lossy_round_trip() {
        let mut project = fresh_project();
        let completed_at = Utc::now();

        complete_current_stage(&mut project, completed_at).unwrap();
        revert_to_previous_stage(&mut project).unwrap();

        assert_eq!(project.current_stage, 1);
        // The re-opened stage is in-progress again, but the stage that was
        // briefly current is locked, not done -- the round trip is not an
        // undo.
        assert_eq!(project.stages[0].status, StageStatus::InProgress);
        assert_eq!(project.stages[1].status, StageStatus::Locked);
        // Historical dates survive the revert.
        assert_eq!(project.stages[0].date, Some(completed_at));
        assert_eq!(project.stages[1].date, Some(completed_at));
        assert!(project.invariant_holds());
    }

    #[test]
    fn revert_preserves_stage_payload() {
        let mut project = fresh_project();
        // Walk to the branding stage and give it payload.
        for _ in 1..7 {
            complete_current_stage(&mut project, Utc::now()).unwrap();
        }
        set_stage_field(
            &mut project,
            7,
            StageField::LinkUrl,
            serde_json::json!("https://moodboards.test/acme"),
        )
        .unwrap();
        project.stage_mut(7).unwrap().feedback_rounds = 2;

        revert_to_previous_stage(&mut project).unwrap();

        let branding = project.stage(7).unwrap();
        assert_eq!(branding.status, StageStatus::Locked);
        assert_eq!(
            branding.link_url.as_deref(),
            Some("https://moodboards.test/acme")
        );
        assert_eq!(branding.feedback_rounds, 2);
    }

    #[test]
    fn set_field_is_allowed_on_locked_stages() {
        let mut project = fresh_project();

        // Stage 9 (design preview) is locked on a fresh project; admins
        // pre-fill links ahead of time.
        set_stage_field(
            &mut project,
            9,
            StageField::LinkUrl,
            serde_json::json!("https://preview.test/acme"),
        )
        .unwrap();

        let stage = project.stage(9).unwrap();
        assert_eq!(stage.status, StageStatus::Locked);
        assert_eq!(stage.link_url.as_deref(), Some("https://preview.test/acme"));
    }

    #[test]
    fn set_field_rejects_untagged_stages() {
        let mut project = fresh_project();

        // The development stage carries no link field.
        let err = set_stage_field(
            &mut project,
            11,
            StageField::LinkUrl,
            serde_json::json!("https://nope.test"),
        )
        .unwrap_err();

        assert_matches!(
            err,
            CoreError::FieldNotSupported {
                stage_id: 11,
                field: "link_url"
            }
        );
    }

    #[test]
    fn set_field_null_clears_the_value() {
        let mut project = fresh_project();
        set_stage_field(
            &mut project,
            4,
            StageField::LinkUrl,
            serde_json::json!("https://sign.test/doc"),
        )
        .unwrap();

        set_stage_field(&mut project, 4, StageField::LinkUrl, serde_json::Value::Null).unwrap();

        assert!(project.stage(4).unwrap().link_url.is_none());
    }

    #[test]
    fn set_field_on_unknown_stage_fails() {
        let mut project = fresh_project();
        let err = set_stage_field(
            &mut project,
            42,
            StageField::LinkUrl,
            serde_json::json!("https://x.test"),
        )
        .unwrap_err();
        assert_matches!(err, CoreError::StageNotFound { stage_id: 42 });
    }

    #[test]
    fn form_answers_accepts_an_arbitrary_blob() {
        let mut project = fresh_project();
        let answers = serde_json::json!({
            "pages": ["home", "about", "contact"],
            "has_webshop": false,
        });

        set_stage_field(&mut project, 2, StageField::FormAnswers, answers.clone()).unwrap();

        assert_eq!(project.stage(2).unwrap().form_answers, Some(answers));
    }

    #[test]
    fn empty_comment_is_rejected() {
        let mut project = fresh_project();

        assert_matches!(
            append_comment(&mut project, None, "Ana", "", Utc::now()),
            Err(CoreError::EmptyComment)
        );
        assert_matches!(
            append_comment(&mut project, None, "Ana", "   \n\t", Utc::now()),
            Err(CoreError::EmptyComment)
        );
        assert!(project.comments.is_empty());
    }

    #[test]
    fn comments_append_in_order() {
        let mut project = fresh_project();
        append_comment(&mut project, None, "Ana", "Kickoff went well", Utc::now()).unwrap();
        append_comment(&mut project, Some(7), "Ben", "Logo drafts next week", Utc::now()).unwrap();

        assert_eq!(project.comments.len(), 2);
        assert_eq!(project.comments[0].author, "Ana");
        assert_eq!(project.comments[0].stage_id, None);
        assert_eq!(project.comments[1].text, "Logo drafts next week");
        assert_eq!(project.comments[1].stage_id, Some(7));
    }

    #[test]
    fn stage_tagged_comment_requires_a_real_stage() {
        let mut project = fresh_project();
        assert_matches!(
            append_comment(&mut project, Some(42), "Ana", "Where is this?", Utc::now()),
            Err(CoreError::StageNotFound { stage_id: 42 })
        );
    }

    #[test]
    fn attach_file_requires_the_files_tag() {
        let mut project = fresh_project();
        let file = FileRef {
            file_id: "2cf24dba5fb0a30e".to_string(),
            file_name: "brief.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            uploaded_at: Utc::now(),
        };

        // Signature (4) has a link but no file payload.
        let err = attach_file(&mut project, 4, file.clone()).unwrap_err();
        assert_matches!(err, CoreError::FieldNotSupported { field: "files", .. });

        attach_file(&mut project, 2, file).unwrap();
        assert_eq!(project.stage(2).unwrap().files.len(), 1);
    }
}
