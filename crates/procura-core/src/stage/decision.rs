//! Decision handlers ("was the conference held?").

use log::{debug, error, info};

use super::{StageData, StageOutcome};
use crate::{
    error::{ProcurementError, Result},
    models::{
        EventCategory, EventEntry, OutcomeTag, RequestContext, Severity, StageNotification,
        StatusUpdate, EVENT_DOMAIN,
    },
    params::DecisionRequest,
    services::Collaborators,
    transitions::{StageKind, TransitionRule},
};

/// Runs a decision handler.
///
/// The held branch records the rule's held status and keeps the procurement
/// in its phase; the skip branch records the skipped status and moves it to
/// the rule's skip target. Both branches perform the same three calls, in
/// order: `update_status`, `log_event`, `notify_stage_update`.
///
/// Never fails: errors become `StageOutcome { success: false, .. }` with the
/// message `"Failed to process <phase> decision: <error>"`.
pub fn handle_decision(
    rule: &TransitionRule,
    services: Collaborators<'_>,
    ctx: &RequestContext,
    request: &DecisionRequest,
) -> StageOutcome {
    match decide(rule, services, ctx, request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                "Decision '{}' failed for procurement '{}': {e}",
                rule.handler, request.procurement_id
            );
            StageOutcome::failure(format!(
                "Failed to process {} decision: {e}",
                rule.from_phase
            ))
        }
    }
}

fn decide(
    rule: &TransitionRule,
    services: Collaborators<'_>,
    ctx: &RequestContext,
    request: &DecisionRequest,
) -> Result<StageOutcome> {
    let StageKind::Decision {
        held,
        skipped,
        skip_to,
    } = rule.kind
    else {
        return Err(ProcurementError::invalid_input("handler")
            .with_reason(format!("'{}' is not a decision handler", rule.handler)));
    };

    let data = StageData::normalize(
        rule,
        ctx,
        &request.procurement_id,
        &request.procurement_title,
    )?;
    let phase = data.current_phase;

    let (status, next_phase, outcome) = if request.conference_held {
        (held, data.next_phase, OutcomeTag::Held)
    } else {
        (skipped, skip_to, OutcomeTag::Skipped)
    };
    let phase_changed = next_phase != phase;

    debug!(
        "{}: procurement '{}' -> {status} ({next_phase})",
        rule.handler, data.procurement_id
    );

    services.chain.update_status(&StatusUpdate {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        expected: rule.expected_state(),
        status,
        phase: next_phase,
        actor: data.actor.clone(),
        timestamp: data.timestamp,
    })?;

    let description = if phase_changed {
        format!(
            "{phase} skipped for '{}'. Advanced to {next_phase}.",
            data.title
        )
    } else {
        format!(
            "{phase} held for '{}'. Awaiting conference documents.",
            data.title
        )
    };
    services.chain.log_event(&EventEntry {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        phase,
        description,
        related_count: 0,
        actor: data.actor.clone(),
        category: EventCategory::Decision,
        domain: EVENT_DOMAIN.to_string(),
        severity: Severity::Info,
        timestamp: data.timestamp,
    })?;

    services.notifier.notify_stage_update(&StageNotification {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        phase,
        status,
        timestamp: data.timestamp,
        document_count: 0,
        outcome,
        phase_changed,
        next_phase: phase_changed.then_some(next_phase),
    })?;

    info!(
        "Recorded {status} for procurement '{}' by {}",
        data.procurement_id, data.actor
    );

    Ok(if phase_changed {
        StageOutcome::advanced(
            format!(
                "{phase} skipped for {}. Proceeding to {next_phase}.",
                data.title
            ),
            next_phase,
        )
    } else {
        StageOutcome::success(format!(
            "{phase} marked as held for {}. Please upload documents.",
            data.title
        ))
    })
}
