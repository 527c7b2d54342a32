//! Display implementations for procurement state, ledger rows and
//! transition rules.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{EntryKind, LedgerEntry, ProcurementState, StoredDocument},
    transitions::{StageKind, TransitionRule},
};

impl fmt::Display for ProcurementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}. {}", self.procurement_id, self.title)?;
        writeln!(f)?;
        writeln!(f, "- Phase: {}", self.phase)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(
            f,
            "- Updated: {} by {}",
            LocalDateTime(&self.updated_at),
            self.updated_by
        )?;
        writeln!(f)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::StatusUpdate => "Status update",
            EntryKind::Event => "Event",
            EntryKind::Documents => "Documents",
            EntryKind::Transition => "Transition",
            EntryKind::Notification => "Notification",
        };
        f.write_str(label)
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {} ({})", self.id, self.kind, self.phase)?;
        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;
        if let Some(status) = self.status {
            writeln!(f, "- Status: {status}")?;
        }
        writeln!(f, "- Actor: {}", self.actor)?;
        writeln!(f, "- Recorded: {}", LocalDateTime(&self.recorded_at))?;
        writeln!(f)
    }
}

impl fmt::Display for StoredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}**: {} ({}, submitted {})",
            self.document_type, self.file_name, self.phase, self.submission_date
        )?;
        if let Some(participants) = &self.participants {
            write!(f, ", participants: {participants}")?;
        }
        writeln!(f)?;
        if let Some(path) = &self.stored_path {
            writeln!(f, "  - Stored at `{path}`")?;
        }
        Ok(())
    }
}

impl fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.handler, self.from_phase)?;
        writeln!(f)?;

        if self.from_statuses.is_empty() {
            writeln!(f, "- Accepts: a new procurement")?;
        } else {
            let accepted: Vec<String> = self.from_statuses.iter().map(ToString::to_string).collect();
            writeln!(f, "- Accepts: {}", accepted.join(" or "))?;
        }

        match self.kind {
            StageKind::Decision {
                held,
                skipped,
                skip_to,
            } => {
                writeln!(f, "- Held: {held}, stays in {}", self.to_phase)?;
                writeln!(f, "- Skipped: {skipped}, moves to {skip_to}")?;
            }
            StageKind::Upload { completed, slots } => {
                let types: Vec<&str> = slots.iter().map(|slot| slot.document_type).collect();
                writeln!(f, "- Documents: {}", types.join(", "))?;
                writeln!(f, "- Completes: {completed}, moves to {}", self.to_phase)?;
            }
        }
        writeln!(f)
    }
}
