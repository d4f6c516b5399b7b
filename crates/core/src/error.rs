use uuid::Uuid;

use crate::types::StageId;

/// Domain-level error for all engine operations.
///
/// Every workflow failure maps to exactly one variant with a stable
/// message; the API layer translates variants into HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An operation addressed a stage id outside the catalog range.
    #[error("Stage {stage_id} does not exist on this project")]
    StageNotFound { stage_id: StageId },

    /// The project's stage pointer does not match any stage.
    #[error("No stage matches the current stage pointer {current_stage}")]
    NoActiveStage { current_stage: StageId },

    /// Attempted to complete the final stage of the pipeline.
    #[error("Project is already at the final stage; there is no next stage to start")]
    NoNextStage,

    /// Attempted to revert past the first stage.
    #[error("Project is already at the first stage")]
    AlreadyAtFirstStage,

    /// A proposal id did not match any proposal on the discovery stage.
    #[error("Meeting proposal {proposal_id} not found")]
    ProposalNotFound { proposal_id: Uuid },

    /// Comment or feedback text was empty or whitespace-only.
    #[error("Comment text must not be empty")]
    EmptyComment,

    /// The stage's feedback round limit was reached before this call.
    #[error("Feedback limit of {limit} rounds reached for this stage")]
    FeedbackLimitExceeded { limit: u32 },

    /// The stage's catalog entry does not carry the behavior tag required
    /// for the requested field or payload.
    #[error("Stage {stage_id} does not support '{field}'")]
    FieldNotSupported {
        stage_id: StageId,
        field: &'static str,
    },

    /// The project document was modified since it was read.
    #[error("Project was modified by another request; reload and retry")]
    StaleProject,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
