//! Document upload handlers.

use std::path::{Path, PathBuf};

use jiff::{civil::Date, tz::TimeZone};
use log::{debug, error, info};

use super::{StageData, StageOutcome};
use crate::{
    catalog,
    error::{ProcurementError, Result},
    models::{
        DocumentBatch, DocumentMetadata, OutcomeTag, RequestContext, StageNotification,
        StageTransition,
    },
    params::UploadRequest,
    services::Collaborators,
    transitions::{StageKind, TransitionRule},
};

/// Runs a document upload handler.
///
/// Each provided file is paired with a metadata record for its slot; slots
/// without a file are left out, so the batch may be empty. The handler then
/// calls, in order, `publish_documents`, `handle_stage_transition` (phase
/// advance plus the rule's completed status) and `notify_stage_update` with
/// the document count.
///
/// Never fails: errors become `StageOutcome { success: false, .. }` with the
/// message `"Failed to process <phase> documents: <error>"`.
pub fn handle_upload(
    rule: &TransitionRule,
    services: Collaborators<'_>,
    ctx: &RequestContext,
    request: &UploadRequest,
) -> StageOutcome {
    match upload(rule, services, ctx, request) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                "Upload '{}' failed for procurement '{}': {e}",
                rule.handler, request.procurement_id
            );
            StageOutcome::failure(format!(
                "Failed to process {} documents: {e}",
                rule.from_phase
            ))
        }
    }
}

fn upload(
    rule: &TransitionRule,
    services: Collaborators<'_>,
    ctx: &RequestContext,
    request: &UploadRequest,
) -> Result<StageOutcome> {
    let StageKind::Upload { completed, .. } = rule.kind else {
        return Err(ProcurementError::invalid_input("handler")
            .with_reason(format!("'{}' is not an upload handler", rule.handler)));
    };

    let data = StageData::normalize(
        rule,
        ctx,
        &request.procurement_id,
        &request.procurement_title,
    )?;
    let phase = data.current_phase;
    let next_phase = data.next_phase;

    let submission_date = submission_date(request.submission_date.as_deref(), ctx)?;
    let documents = collect_documents(rule, request, submission_date)?;
    let document_count = documents.len();

    debug!(
        "{}: publishing {document_count} document(s) for procurement '{}'",
        rule.handler, data.procurement_id
    );

    services.chain.publish_documents(&DocumentBatch {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        expected: rule.expected_state(),
        phase,
        status: completed,
        documents,
        actor: data.actor.clone(),
        timestamp: data.timestamp,
    })?;

    services.chain.handle_stage_transition(&StageTransition {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        expected: rule.expected_state(),
        from_status: rule.declared_from_status(),
        to_status: completed,
        from_phase: phase,
        to_phase: next_phase,
        actor: data.actor.clone(),
        timestamp: data.timestamp,
        note: request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(String::from),
    })?;

    services.notifier.notify_stage_update(&StageNotification {
        procurement_id: data.procurement_id.clone(),
        title: data.title.clone(),
        phase,
        status: completed,
        timestamp: data.timestamp,
        document_count,
        outcome: OutcomeTag::DocumentsUploaded,
        phase_changed: true,
        next_phase: Some(next_phase),
    })?;

    info!(
        "Procurement '{}' moved from {phase} to {next_phase} by {}",
        data.procurement_id, data.actor
    );

    Ok(StageOutcome::advanced(
        format!("Uploaded {document_count} document(s) for {phase}. Proceeding to {next_phase}."),
        next_phase,
    ))
}

fn submission_date(raw: Option<&str>, ctx: &RequestContext) -> Result<Date> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => raw.parse::<Date>().map_err(|e| {
            ProcurementError::invalid_input("submission_date")
                .with_reason(format!("'{raw}' is not a YYYY-MM-DD date: {e}"))
        }),
        None => Ok(ctx.received_at.to_zoned(TimeZone::UTC).date()),
    }
}

fn collect_documents(
    rule: &TransitionRule,
    request: &UploadRequest,
    submission_date: Date,
) -> Result<Vec<DocumentMetadata>> {
    let storage_path_segment = catalog::phase(rule.from_phase).storage_path_segment;
    let participants = request
        .participants
        .as_deref()
        .map(str::trim)
        .filter(|participants| !participants.is_empty())
        .map(String::from);

    let mut documents = Vec::with_capacity(request.documents.len());
    for upload in &request.documents {
        let path = upload.path.trim();
        if path.is_empty() {
            continue;
        }

        let slot = rule.slot(&upload.document_type).ok_or_else(|| {
            let expected: Vec<&str> = rule.slots().iter().map(|s| s.document_type).collect();
            ProcurementError::invalid_input("document_type").with_reason(format!(
                "'{}' is not a {} document; expected one of: {}",
                upload.document_type,
                rule.from_phase,
                expected.join(", ")
            ))
        })?;

        let source_path = PathBuf::from(path);
        let file_name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ProcurementError::invalid_input("path")
                    .with_reason(format!("'{path}' does not name a file"))
            })?;

        documents.push(DocumentMetadata {
            document_type: slot.document_type.to_string(),
            submission_date,
            participants: participants.clone(),
            storage_path_segment: storage_path_segment.to_string(),
            file_name,
            source_path,
        });
    }

    Ok(documents)
}
