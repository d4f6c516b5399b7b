//! The meeting-proposal sub-protocol.
//!
//! A small negotiation state machine embedded in the discovery-call stage:
//! candidate kickoff times are proposed, then accepted or rejected, or
//! deleted outright. Scheduling is decoupled from stage completion:
//! accepting a time stamps the client-visible stage date but never
//! advances the pipeline; the admin still completes the stage once the
//! meeting has actually happened.

use uuid::Uuid;

use crate::catalog::DISCOVERY_STAGE_ID;
use crate::error::CoreError;
use crate::project::{MeetingProposal, Project, ProposalStatus, Stage, StageStatus};
use crate::types::Timestamp;

fn discovery_stage(project: &mut Project) -> Result<&mut Stage, CoreError> {
    project
        .stage_mut(DISCOVERY_STAGE_ID)
        .ok_or(CoreError::StageNotFound {
            stage_id: DISCOVERY_STAGE_ID,
        })
}

/// Add a new candidate appointment time.
///
/// There is no upper bound on concurrent proposals; negotiation may keep
/// several open at once. Returns the fresh proposal id.
pub fn propose_meeting(project: &mut Project, date_time: Timestamp) -> Result<Uuid, CoreError> {
    let stage = discovery_stage(project)?;
    let id = Uuid::new_v4();
    stage.meeting_proposals.push(MeetingProposal {
        id,
        date_time,
        status: ProposalStatus::Proposed,
    });
    Ok(id)
}

/// Accept a proposal.
///
/// Side effects on the discovery stage: its `date` becomes the proposal's
/// appointment time and its status is re-affirmed `in-progress`. The
/// pointer is untouched. At most one proposal holds `accepted` at a time;
/// a previously accepted sibling is demoted to `rejected`.
pub fn accept_proposal(project: &mut Project, proposal_id: Uuid) -> Result<(), CoreError> {
    let stage = discovery_stage(project)?;
    if !stage.meeting_proposals.iter().any(|p| p.id == proposal_id) {
        return Err(CoreError::ProposalNotFound { proposal_id });
    }

    let mut accepted_at = None;
    for proposal in &mut stage.meeting_proposals {
        if proposal.id == proposal_id {
            proposal.status = ProposalStatus::Accepted;
            accepted_at = Some(proposal.date_time);
        } else if proposal.status == ProposalStatus::Accepted {
            proposal.status = ProposalStatus::Rejected;
        }
    }

    stage.date = accepted_at;
    stage.status = StageStatus::InProgress;
    Ok(())
}

/// Reject a proposal. No other side effect.
pub fn reject_proposal(project: &mut Project, proposal_id: Uuid) -> Result<(), CoreError> {
    let stage = discovery_stage(project)?;
    let proposal = stage
        .meeting_proposals
        .iter_mut()
        .find(|p| p.id == proposal_id)
        .ok_or(CoreError::ProposalNotFound { proposal_id })?;
    proposal.status = ProposalStatus::Rejected;
    Ok(())
}

/// Remove a proposal from the list, whatever its state.
pub fn delete_proposal(project: &mut Project, proposal_id: Uuid) -> Result<(), CoreError> {
    let stage = discovery_stage(project)?;
    let before = stage.meeting_proposals.len();
    stage.meeting_proposals.retain(|p| p.id != proposal_id);
    if stage.meeting_proposals.len() == before {
        return Err(CoreError::ProposalNotFound { proposal_id });
    }
    Ok(())
}
