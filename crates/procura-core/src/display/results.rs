//! Display for handler outcomes and the stage form view.

use std::fmt;

use crate::stage::{FormView, Redirect, StageForm, StageOutcome};

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.success { "✓" } else { "✗" };
        writeln!(f, "{icon} {}", self.message)?;
        if let Some(next) = &self.next_phase {
            writeln!(f)?;
            writeln!(f, "Next phase: **{next}**")?;
        }
        Ok(())
    }
}

impl fmt::Display for StageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.phase, self.handler)?;
        writeln!(f)?;

        match &self.procurement {
            Some(state) => writeln!(
                f,
                "Procurement {}. {}: {}",
                state.procurement_id, state.title, state.status
            )?,
            None => writeln!(f, "New procurement")?,
        }
        writeln!(f)?;

        if self.decision {
            writeln!(f, "Was the {} held? Answer held or skipped.", self.phase)?;
        } else {
            writeln!(f, "Documents:")?;
            writeln!(f)?;
            for document_type in &self.document_types {
                writeln!(f, "- {document_type}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✗ {}", self.error)?;
        writeln!(f)?;
        writeln!(f, "Redirected to `{}`.", self.route)
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormView::Form(form) => form.fmt(f),
            FormView::Redirect(redirect) => redirect.fmt(f),
        }
    }
}
