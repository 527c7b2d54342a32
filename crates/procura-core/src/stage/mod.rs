//! Stage handlers: one legal phase transition per handler.
//!
//! Every handler follows the same contract:
//!
//! ```text
//! request ─▶ normalize (ids, actor, timestamp, phases from the rule)
//!         ─▶ branch (decision flag / document slots)
//!         ─▶ side effects, strictly in order, stop at first failure
//!         ─▶ StageOutcome { success, message, next_phase? }
//! ```
//!
//! - [`handle_decision`]: `update_status` → `log_event` → `notify_stage_update`
//! - [`handle_upload`]: `publish_documents` → `handle_stage_transition` →
//!   `notify_stage_update`
//! - [`show_stage_form`]: read path; checks the procurement is where the
//!   handler expects it before a form is shown
//!
//! The current and next phase always come from the [`TransitionRule`], never
//! from request data. Handlers do not return errors: any input or
//! collaborator failure is logged and turned into a failed
//! [`StageOutcome`]. Nothing is rolled back and nothing is retried, and
//! calling a handler twice with the same input performs the whole sequence
//! twice.

use jiff::Timestamp;

use crate::{
    catalog::Phase,
    error::{ProcurementError, Result},
    models::{Actor, RequestContext},
    transitions::TransitionRule,
};

mod decision;
mod form;
mod outcome;
mod upload;

#[cfg(test)]
mod tests;

pub use decision::handle_decision;
pub use form::{show_stage_form, FormView, Redirect, StageForm, LIST_ROUTE};
pub use outcome::StageOutcome;
pub use upload::handle_upload;

/// Normalized request data shared by all handlers.
#[derive(Debug, Clone)]
struct StageData {
    procurement_id: String,
    title: String,
    timestamp: Timestamp,
    actor: Actor,
    current_phase: Phase,
    next_phase: Phase,
}

impl StageData {
    fn normalize(
        rule: &TransitionRule,
        ctx: &RequestContext,
        procurement_id: &str,
        title: &str,
    ) -> Result<Self> {
        Ok(Self {
            procurement_id: required("procurement_id", procurement_id)?,
            title: required("procurement_title", title)?,
            timestamp: ctx.received_at,
            actor: ctx.actor.clone(),
            current_phase: rule.from_phase,
            next_phase: rule.to_phase,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProcurementError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(value.to_string())
}
