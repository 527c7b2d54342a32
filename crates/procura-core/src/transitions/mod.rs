//! Declarative transition table.
//!
//! Every stage handler performs exactly one legal transition. Rather than
//! scattering phase literals through handler bodies, each handler is a row
//! in this table:
//!
//! ```text
//! handler ─▶ (expected phase, accepted statuses) ─▶ outcome
//!                                                  ├─ Decision: held status (stay) | skipped status (jump to skip_to)
//!                                                  └─ Upload:   completed status, advance to to_phase
//! ```
//!
//! The table is validated once, when it is built, against the full
//! phase/status catalog. A table that would allow an out-of-order jump, a
//! status used outside its phase, or an unreachable phase is rejected with
//! [`ProcurementError::InvalidTransitionTable`].
//!
//! ```rust
//! use procura_core::{catalog::Phase, transitions::{HandlerId, TransitionTable}};
//!
//! let table = TransitionTable::standard()?;
//! let rule = table.rule(HandlerId::PreProcurementDecision).expect("standard rule");
//! assert_eq!(rule.from_phase, Phase::PreProcurementConference);
//! # Ok::<(), procura_core::ProcurementError>(())
//! ```

use std::{collections::HashSet, fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, Phase, Status},
    error::{ProcurementError, Result},
    models::{ExpectedState, ProcurementState},
};

mod standard;


/// Identifier of a stage handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum HandlerId {
    Initiation,
    PreProcurementDecision,
    PreProcurementDocuments,
    BiddingDocuments,
    PreBidDecision,
    PreBidDocuments,
    SupplementalBulletin,
    BidOpening,
    BidEvaluation,
    PostQualification,
    BacResolution,
    NoticeOfAward,
    PerformanceBond,
    NoticeToProceed,
    Monitoring,
}

impl HandlerId {
    /// All handler ids in lifecycle order.
    pub const ALL: [HandlerId; 15] = [
        HandlerId::Initiation,
        HandlerId::PreProcurementDecision,
        HandlerId::PreProcurementDocuments,
        HandlerId::BiddingDocuments,
        HandlerId::PreBidDecision,
        HandlerId::PreBidDocuments,
        HandlerId::SupplementalBulletin,
        HandlerId::BidOpening,
        HandlerId::BidEvaluation,
        HandlerId::PostQualification,
        HandlerId::BacResolution,
        HandlerId::NoticeOfAward,
        HandlerId::PerformanceBond,
        HandlerId::NoticeToProceed,
        HandlerId::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerId::Initiation => "initiation",
            HandlerId::PreProcurementDecision => "pre-procurement-decision",
            HandlerId::PreProcurementDocuments => "pre-procurement-documents",
            HandlerId::BiddingDocuments => "bidding-documents",
            HandlerId::PreBidDecision => "pre-bid-decision",
            HandlerId::PreBidDocuments => "pre-bid-documents",
            HandlerId::SupplementalBulletin => "supplemental-bulletin",
            HandlerId::BidOpening => "bid-opening",
            HandlerId::BidEvaluation => "bid-evaluation",
            HandlerId::PostQualification => "post-qualification",
            HandlerId::BacResolution => "bac-resolution",
            HandlerId::NoticeOfAward => "notice-of-award",
            HandlerId::PerformanceBond => "performance-bond",
            HandlerId::NoticeToProceed => "notice-to-proceed",
            HandlerId::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        HandlerId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid stage handler: {s}"))
    }
}

/// A document category accepted by an upload handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentSlot {
    pub document_type: &'static str,
}

/// What a handler does once its expected state is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageKind {
    /// Yes/no decision. The held branch stays in the phase with `held`; the
    /// skip branch records `skipped` and jumps to `skip_to`.
    Decision {
        held: Status,
        skipped: Status,
        skip_to: Phase,
    },
    /// Document upload completing the phase with `completed`.
    Upload {
        completed: Status,
        slots: &'static [DocumentSlot],
    },
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRule {
    pub handler: HandlerId,
    /// Phase the procurement must be in
    pub from_phase: Phase,
    /// Statuses the procurement may carry on entry; empty means the handler
    /// creates the procurement. The first entry is the declared from-status
    /// written to the transition record.
    pub from_statuses: &'static [Status],
    /// Phase after the normal branch
    pub to_phase: Phase,
    #[serde(flatten)]
    pub kind: StageKind,
}

impl TransitionRule {
    pub fn is_decision(&self) -> bool {
        matches!(self.kind, StageKind::Decision { .. })
    }

    /// The from-status declared for the transition record.
    pub fn declared_from_status(&self) -> Option<Status> {
        self.from_statuses.first().copied()
    }

    /// The state this handler expects, carried on every record it writes so
    /// the ledger can refuse out-of-order calls.
    pub fn expected_state(&self) -> ExpectedState {
        ExpectedState {
            phase: self.from_phase,
            statuses: self.from_statuses.to_vec(),
        }
    }

    /// Whether a procurement in `state` (or a not yet existing one) is where
    /// this handler expects it.
    pub fn accepts(&self, state: Option<&ProcurementState>) -> bool {
        match state {
            None => self.from_statuses.is_empty(),
            Some(state) => {
                state.phase == self.from_phase && self.from_statuses.contains(&state.status)
            }
        }
    }

    /// Document slots for upload handlers, empty for decisions.
    pub fn slots(&self) -> &'static [DocumentSlot] {
        match self.kind {
            StageKind::Upload { slots, .. } => slots,
            StageKind::Decision { .. } => &[],
        }
    }

    /// Finds the slot for a document type (case-insensitive).
    pub fn slot(&self, document_type: &str) -> Option<&'static DocumentSlot> {
        let wanted = document_type.trim();
        self.slots()
            .iter()
            .find(|slot| slot.document_type.eq_ignore_ascii_case(wanted))
    }

    /// `(phase, status)` pairs a procurement can be left in by this rule.
    fn produced_states(&self) -> Vec<(Phase, Status)> {
        match self.kind {
            StageKind::Decision {
                held,
                skipped,
                skip_to,
            } => vec![(self.to_phase, held), (skip_to, skipped)],
            StageKind::Upload { completed, .. } => vec![(self.to_phase, completed)],
        }
    }
}

/// Validated set of transition rules.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Validates `rules` against the catalog and builds the table.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidTransitionTable` describing the first
    /// inconsistency found.
    pub fn new(rules: Vec<TransitionRule>) -> Result<Self> {
        catalog::check_integrity().map_err(ProcurementError::invalid_table)?;
        validate(&rules)?;
        Ok(Self { rules })
    }

    /// The built-in procurement lifecycle.
    pub fn standard() -> Result<Self> {
        Self::new(standard::RULES.to_vec())
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn rule(&self, handler: HandlerId) -> Option<&TransitionRule> {
        self.rules.iter().find(|rule| rule.handler == handler)
    }

    /// Handlers that may act on a procurement in `state` right now.
    pub fn available_for(&self, state: Option<&ProcurementState>) -> Vec<&TransitionRule> {
        self.rules.iter().filter(|rule| rule.accepts(state)).collect()
    }
}

fn validate(rules: &[TransitionRule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.handler) {
            return Err(ProcurementError::invalid_table(format!(
                "handler '{}' is declared more than once",
                rule.handler
            )));
        }
        validate_rule(rule)?;
    }

    let produced: HashSet<(Phase, Status)> =
        rules.iter().flat_map(TransitionRule::produced_states).collect();

    for rule in rules {
        for status in rule.from_statuses {
            if !produced.contains(&(rule.from_phase, *status)) {
                return Err(ProcurementError::invalid_table(format!(
                    "handler '{}' expects '{}' in '{}', which no handler produces",
                    rule.handler, status, rule.from_phase
                )));
            }
        }
    }

    let reached: HashSet<Phase> = produced.iter().map(|(phase, _)| *phase).collect();
    for entry in catalog::phases().iter().skip(1) {
        if !reached.contains(&entry.phase) {
            return Err(ProcurementError::invalid_table(format!(
                "phase '{}' is not reachable by any handler",
                entry.label
            )));
        }
    }

    Ok(())
}

fn validate_rule(rule: &TransitionRule) -> Result<()> {
    let from = catalog::ordinal(rule.from_phase);
    let fail = |reason: String| -> Result<()> {
        Err(ProcurementError::invalid_table(format!(
            "handler '{}': {reason}",
            rule.handler
        )))
    };

    if rule.from_phase == Phase::Completed {
        return fail("no transition may leave the Completed phase".to_string());
    }
    if rule.from_statuses.is_empty() && from != 0 {
        return fail(format!(
            "only the first phase may accept a new procurement, not '{}'",
            rule.from_phase
        ));
    }

    let owned_statuses = match rule.kind {
        StageKind::Decision {
            held,
            skipped,
            skip_to,
        } => {
            if rule.to_phase != rule.from_phase {
                return fail("the held branch of a decision must stay in its phase".to_string());
            }
            if catalog::ordinal(skip_to) <= from {
                return fail(format!(
                    "skip target '{skip_to}' is not after '{}'",
                    rule.from_phase
                ));
            }
            vec![held, skipped]
        }
        StageKind::Upload { completed, slots } => {
            if catalog::ordinal(rule.to_phase) <= from {
                return fail(format!(
                    "target '{}' is not after '{}'",
                    rule.to_phase, rule.from_phase
                ));
            }
            if slots.is_empty() {
                return fail("an upload handler needs at least one document slot".to_string());
            }
            vec![completed]
        }
    };

    for status in owned_statuses {
        let owner = catalog::status(status).phase;
        if owner != rule.from_phase {
            return fail(format!(
                "status '{status}' belongs to '{owner}', not '{}'",
                rule.from_phase
            ));
        }
    }

    Ok(())
}
