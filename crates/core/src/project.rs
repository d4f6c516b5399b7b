//! The project aggregate and its child entities.
//!
//! A project owns its stage list, comment list, and file references, and
//! is persisted as a single document. Stage identity is fixed at creation
//! from the [`catalog`](crate::catalog); only stage content mutates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, StageTemplate};
use crate::types::{StageId, Timestamp};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    /// Not yet actionable; a predecessor is still open.
    Locked,
    /// The currently active stage.
    InProgress,
    /// Completed; the pipeline has moved past this stage.
    Done,
}

impl StageStatus {
    /// The wire/document string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

/// Negotiation status of a meeting proposal.
///
/// `Accepted` and `Rejected` are terminal; a proposal never returns to
/// `Proposed`. Deletion is allowed from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Proposed,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

// ---------------------------------------------------------------------------
// Child entities
// ---------------------------------------------------------------------------

/// A candidate kickoff appointment on the discovery stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingProposal {
    pub id: Uuid,
    pub date_time: Timestamp,
    pub status: ProposalStatus,
}

/// A comment on the project, append-only. Comments live on the project's
/// single ordered list; `stage_id` records which stage the comment was
/// written against, when any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<StageId>,
}

/// Reference to a file persisted in the blob store.
///
/// Only the opaque `file_id` is stored here; bytes live externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    pub file_name: String,
    pub content_type: String,
    pub uploaded_at: Timestamp,
}

/// One client feedback entry on a feedback-capable stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub author: String,
    pub text: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One gated phase of the pipeline.
///
/// Optional payload fields are populated only where the stage's catalog
/// behavior tags allow; the engine rejects writes to untagged fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub status: StageStatus,
    /// Set when the stage enters `in-progress` or `done`; also set by an
    /// accepted meeting proposal on the discovery stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_answers: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<FeedbackEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meeting_proposals: Vec<MeetingProposal>,
    /// Monotonic revision counter; never decremented, reset only by
    /// re-creating the project.
    #[serde(default)]
    pub feedback_rounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_feedback_rounds: Option<u32>,
}

impl Stage {
    /// Seed a locked, empty stage from its catalog template.
    fn from_template(template: &StageTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name.to_string(),
            status: StageStatus::Locked,
            date: None,
            link_url: None,
            form_answers: None,
            files: Vec::new(),
            feedback: Vec::new(),
            meeting_proposals: Vec::new(),
            feedback_rounds: 0,
            max_feedback_rounds: template.behavior.max_feedback_rounds,
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// The aggregate root. Persisted as one document; mutated only through
/// engine operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub client: String,
    pub client_email: String,
    pub start_date: Timestamp,
    /// Stage-sequence pointer: the id of the single `in-progress` stage,
    /// or `STAGE_COUNT + 1` once every stage is complete.
    pub current_stage: StageId,
    /// Alerting flag; not authoritative to workflow logic.
    #[serde(default)]
    pub is_late: bool,
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Project {
    /// Create a new project seeded from the stage catalog: stage 1
    /// `in-progress` with `date = now`, all later stages `locked`.
    pub fn create(name: &str, client: &str, client_email: &str, now: Timestamp) -> Self {
        let mut stages: Vec<Stage> = catalog::STAGE_CATALOG
            .iter()
            .map(Stage::from_template)
            .collect();

        if let Some(first) = stages.first_mut() {
            first.status = StageStatus::InProgress;
            first.date = Some(now);
        }

        Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            client: client.to_string(),
            client_email: client_email.to_string(),
            start_date: now,
            current_stage: 1,
            is_late: false,
            stages,
            comments: Vec::new(),
        }
    }

    /// The stage with the given catalog id, if present.
    pub fn stage(&self, stage_id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// Mutable access to the stage with the given catalog id.
    pub fn stage_mut(&mut self, stage_id: StageId) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == stage_id)
    }

    /// The stage the `current_stage` pointer designates, if any.
    pub fn active_stage(&self) -> Option<&Stage> {
        self.stage(self.current_stage)
    }

    /// True once the pointer has moved past the final stage.
    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(|s| s.id < self.current_stage)
    }

    /// Check the single-active-stage invariant: stages before the pointer
    /// are `done`, stages after it are `locked`, and the pointed-at stage
    /// (when it exists) is `in-progress`.
    pub fn invariant_holds(&self) -> bool {
        self.stages.iter().all(|s| {
            let expected = if s.id < self.current_stage {
                StageStatus::Done
            } else if s.id == self.current_stage {
                StageStatus::InProgress
            } else {
                StageStatus::Locked
            };
            s.status == expected
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STAGE_COUNT;
    use chrono::Utc;

    #[test]
    fn fresh_project_starts_at_stage_one() {
        let project = Project::create("Site relaunch", "Acme", "pm@acme.test", Utc::now());

        assert_eq!(project.current_stage, 1);
        assert_eq!(project.stages.len() as StageId, STAGE_COUNT);
        assert_eq!(project.active_stage().unwrap().name, "Discovery call");
        assert_eq!(project.stages[0].status, StageStatus::InProgress);
        assert!(project.stages[0].date.is_some());
        for stage in &project.stages[1..] {
            assert_eq!(stage.status, StageStatus::Locked);
            assert!(stage.date.is_none());
        }
        assert!(project.invariant_holds());
        assert!(!project.is_complete());
    }

    #[test]
    fn branding_stage_is_seeded_with_its_round_limit() {
        let project = Project::create("p", "c", "c@c.test", Utc::now());
        let branding = project.stage(crate::catalog::BRANDING_STAGE_ID).unwrap();
        assert_eq!(branding.max_feedback_rounds, Some(3));
        assert_eq!(branding.feedback_rounds, 0);
    }

    #[test]
    fn document_round_trips_through_json() {
        let project = Project::create("p", "c", "c@c.test", Utc::now());
        let doc = serde_json::to_value(&project).unwrap();

        // Statuses serialize kebab-case per the document format.
        assert_eq!(doc["stages"][0]["status"], "in-progress");
        assert_eq!(doc["stages"][1]["status"], "locked");

        let back: Project = serde_json::from_value(doc).unwrap();
        assert_eq!(back.id, project.id);
        assert_eq!(back.stages.len(), project.stages.len());
        assert!(back.invariant_holds());
    }

    #[test]
    fn status_strings_match_document_format() {
        assert_eq!(StageStatus::Locked.as_str(), "locked");
        assert_eq!(StageStatus::InProgress.as_str(), "in-progress");
        assert_eq!(StageStatus::Done.as_str(), "done");
        assert_eq!(ProposalStatus::Proposed.as_str(), "proposed");
    }
}
