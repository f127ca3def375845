//! Diagnostic codes with category prefixes for structured error identification.
//!
//! The well-known codes emitted by the workspace live here as constants so
//! tests and callers can match on them without repeating magic numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Informational diagnostics, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `E101`, `W203`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A device record is structurally invalid (missing or non-numeric field, unknown kind).
    pub const MALFORMED_RECORD: Self = Self::new(Category::Error, 101);
    /// An edge names a node id absent from the node list.
    pub const UNKNOWN_EDGE_ENDPOINT: Self = Self::new(Category::Error, 102);
    /// A route entry or metric query names a node id absent from the graph.
    pub const UNKNOWN_NODE_REFERENCE: Self = Self::new(Category::Error, 103);
    /// A node id appeared twice; the later record replaced the earlier one.
    pub const DUPLICATE_NODE: Self = Self::new(Category::Warning, 201);
    /// A node line appeared before any net header.
    pub const ORPHAN_ROUTE_NODE: Self = Self::new(Category::Warning, 202);
    /// A route header or node line could not be parsed.
    pub const MALFORMED_ROUTE_LINE: Self = Self::new(Category::Warning, 203);
    /// A route hop's recorded kind disagrees with the graph.
    pub const ROUTE_KIND_MISMATCH: Self = Self::new(Category::Warning, 204);
    /// A net has no node with a position; its wirelength is reported as zero.
    pub const NET_WITHOUT_POSITION: Self = Self::new(Category::Warning, 205);
    /// A node has no position and was excluded from an aggregate.
    pub const UNMAPPABLE_NODE: Self = Self::new(Category::Warning, 206);
    /// A net serial index appeared twice; the later net replaced the earlier one.
    pub const DUPLICATE_NET: Self = Self::new(Category::Warning, 207);
    /// Informational summary.
    pub const SUMMARY: Self = Self::new(Category::Note, 301);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Note.prefix(), 'N');
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::MALFORMED_RECORD), "E101");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Warning, 3)), "W003");
        assert_eq!(format!("{}", DiagnosticCode::SUMMARY), "N301");
    }

    #[test]
    fn well_known_codes_are_distinct() {
        let codes = [
            DiagnosticCode::MALFORMED_RECORD,
            DiagnosticCode::UNKNOWN_EDGE_ENDPOINT,
            DiagnosticCode::UNKNOWN_NODE_REFERENCE,
            DiagnosticCode::DUPLICATE_NODE,
            DiagnosticCode::ORPHAN_ROUTE_NODE,
            DiagnosticCode::MALFORMED_ROUTE_LINE,
            DiagnosticCode::ROUTE_KIND_MISMATCH,
            DiagnosticCode::NET_WITHOUT_POSITION,
            DiagnosticCode::UNMAPPABLE_NODE,
            DiagnosticCode::DUPLICATE_NET,
            DiagnosticCode::SUMMARY,
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::UNKNOWN_EDGE_ENDPOINT;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
