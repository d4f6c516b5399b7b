//! The fixed stage catalog.
//!
//! Pure configuration: an ordered list of stage templates with behavior
//! tags. The catalog seeds every new project's stage list and tells the
//! engine which optional operations apply to which stage id. Extending the
//! pipeline means extending this table: it is a closed, enumerable set,
//! not a plugin system.

use crate::types::StageId;

/// Number of stages in the pipeline.
pub const STAGE_COUNT: StageId = 17;

/// Catalog id of the discovery-call stage, the only stage that carries
/// meeting proposals.
pub const DISCOVERY_STAGE_ID: StageId = 1;

/// Catalog id of the branding stage, the only round-limited stage.
pub const BRANDING_STAGE_ID: StageId = 7;

/// Feedback round limit on the branding stage.
pub const BRANDING_MAX_FEEDBACK_ROUNDS: u32 = 3;

/// Capability tags deciding which optional payloads and operations apply
/// to a stage. Replaces the legacy name-substring dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageBehavior {
    /// Stage accepts uploaded file references.
    pub files: bool,
    /// Stage carries an external URL (quote, signature, payment, preview).
    pub link: bool,
    /// Stage carries a form-answers blob.
    pub form: bool,
    /// Stage accepts client feedback entries.
    pub feedback: bool,
    /// Stage owns the meeting-proposal sub-protocol.
    pub meeting_scheduling: bool,
    /// Bounded revision cycles; `None` means unlimited feedback.
    pub max_feedback_rounds: Option<u32>,
}

/// A behavior with every tag switched off.
const QUIET: StageBehavior = StageBehavior {
    files: false,
    link: false,
    form: false,
    feedback: false,
    meeting_scheduling: false,
    max_feedback_rounds: None,
};

/// One entry in the catalog: a stage's fixed id, display name, and tags.
#[derive(Debug, Clone, Copy)]
pub struct StageTemplate {
    pub id: StageId,
    pub name: &'static str,
    pub behavior: StageBehavior,
}

/// The fixed, ordered pipeline. Ids are 1-based and contiguous.
pub const STAGE_CATALOG: &[StageTemplate] = &[
    StageTemplate {
        id: 1,
        name: "Discovery call",
        behavior: StageBehavior {
            meeting_scheduling: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 2,
        name: "Specification",
        behavior: StageBehavior {
            form: true,
            files: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 3,
        name: "Quote",
        behavior: StageBehavior {
            link: true,
            files: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 4,
        name: "Signature",
        behavior: StageBehavior { link: true, ..QUIET },
    },
    StageTemplate {
        id: 5,
        name: "Deposit payment",
        behavior: StageBehavior { link: true, ..QUIET },
    },
    StageTemplate {
        id: 6,
        name: "Content collection",
        behavior: StageBehavior { files: true, ..QUIET },
    },
    StageTemplate {
        id: 7,
        name: "Branding",
        behavior: StageBehavior {
            link: true,
            feedback: true,
            max_feedback_rounds: Some(BRANDING_MAX_FEEDBACK_ROUNDS),
            ..QUIET
        },
    },
    StageTemplate {
        id: 8,
        name: "Copywriting",
        behavior: StageBehavior {
            files: true,
            feedback: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 9,
        name: "Design preview",
        behavior: StageBehavior {
            link: true,
            feedback: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 10,
        name: "Final validation",
        behavior: StageBehavior { form: true, ..QUIET },
    },
    StageTemplate {
        id: 11,
        name: "Development",
        behavior: QUIET,
    },
    StageTemplate {
        id: 12,
        name: "Internal QA",
        behavior: QUIET,
    },
    StageTemplate {
        id: 13,
        name: "Acceptance testing",
        behavior: StageBehavior {
            feedback: true,
            ..QUIET
        },
    },
    StageTemplate {
        id: 14,
        name: "Final payment",
        behavior: StageBehavior { link: true, ..QUIET },
    },
    StageTemplate {
        id: 15,
        name: "Training",
        behavior: StageBehavior { files: true, ..QUIET },
    },
    StageTemplate {
        id: 16,
        name: "Go-live",
        behavior: QUIET,
    },
    StageTemplate {
        id: 17,
        name: "Post-launch review",
        behavior: StageBehavior {
            feedback: true,
            ..QUIET
        },
    },
];

/// Look up a stage template by catalog id.
pub fn template(stage_id: StageId) -> Option<&'static StageTemplate> {
    STAGE_CATALOG.iter().find(|t| t.id == stage_id)
}

/// Look up a stage's behavior tags by catalog id.
pub fn behavior(stage_id: StageId) -> Option<&'static StageBehavior> {
    template(stage_id).map(|t| &t.behavior)
}
