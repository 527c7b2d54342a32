//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own `Display` impl and prints a
//! short message when empty.
//!
//! ```rust
//! use procura_core::display::Procurements;
//!
//! assert_eq!(Procurements(vec![]).to_string(), "No procurements found.\n");
//! ```

use std::{fmt, ops::Index};

use crate::{
    models::{LedgerEntry, ProcurementState, StoredDocument},
    transitions::TransitionRule,
};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty, $empty:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    writeln!(f, $empty)
                } else {
                    for item in &self.0 {
                        write!(f, "{item}")?;
                    }
                    Ok(())
                }
            }
        }
    };
}

collection!(
    /// Procurements as returned by a list query.
    Procurements,
    ProcurementState,
    "No procurements found."
);

collection!(
    /// Audit trail of one procurement, oldest first.
    LedgerEntries,
    LedgerEntry,
    "No ledger entries found."
);

collection!(
    /// Documents published for one procurement.
    StoredDocuments,
    StoredDocument,
    "No documents found."
);

collection!(
    /// Stage handlers in lifecycle order.
    Stages,
    TransitionRule,
    "No stage handlers available."
);
