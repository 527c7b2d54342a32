//! Read path: show the form bound to a stage handler.

use log::{debug, warn};
use serde::Serialize;

use crate::{
    catalog::Phase,
    models::ProcurementState,
    services::StatusReader,
    transitions::{HandlerId, TransitionRule},
};

/// Route of the procurement list view that failed form lookups redirect to.
pub const LIST_ROUTE: &str = "procurements.index";

/// A form ready to be rendered for a procurement in the expected state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageForm {
    pub handler: HandlerId,
    pub phase: Phase,
    /// `None` for the form that creates a procurement
    pub procurement: Option<ProcurementState>,
    /// Whether the form asks for a held/skipped decision
    pub decision: bool,
    /// Document categories the form accepts
    pub document_types: Vec<&'static str>,
}

/// Redirect to the list view with a flashed error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub route: &'static str,
    pub error: String,
}

/// What the form path renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum FormView {
    Form(StageForm),
    Redirect(Redirect),
}

impl FormView {
    fn redirect(error: String) -> Self {
        FormView::Redirect(Redirect {
            route: LIST_ROUTE,
            error,
        })
    }
}

/// Looks up the procurement and returns the handler's form when the
/// procurement is in the state the rule expects; otherwise, or when the
/// lookup fails, a redirect to the list view with an error message.
///
/// The initiation form is shown without an id, or for an id that does not
/// exist yet.
pub fn show_stage_form(
    rule: &TransitionRule,
    reader: &dyn StatusReader,
    procurement_id: Option<&str>,
) -> FormView {
    let procurement_id = procurement_id.map(str::trim).filter(|id| !id.is_empty());

    let state = match procurement_id {
        None if rule.accepts(None) => None,
        None => {
            return FormView::redirect(format!(
                "A procurement id is required to open the {} form.",
                rule.from_phase
            ))
        }
        Some(id) => match reader.procurement_state(id) {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to load procurement '{id}' for {}: {e}", rule.handler);
                return FormView::redirect(format!("Unable to load procurement {id}: {e}"));
            }
        },
    };

    if !rule.accepts(state.as_ref()) {
        let id = procurement_id.unwrap_or_default();
        let error = match &state {
            None => format!("Procurement {id} was not found."),
            Some(current) if rule.from_statuses.is_empty() => {
                format!("Procurement {id} already exists ({}).", current.status)
            }
            Some(current) => format!(
                "Procurement {id} is at {} ({}), not ready for {}.",
                current.phase, current.status, rule.handler
            ),
        };
        debug!("Form '{}' refused: {error}", rule.handler);
        return FormView::redirect(error);
    }

    FormView::Form(StageForm {
        handler: rule.handler,
        phase: rule.from_phase,
        procurement: state,
        decision: rule.is_decision(),
        document_types: rule.slots().iter().map(|slot| slot.document_type).collect(),
    })
}
