//! Where in the ingested input a diagnostic originated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The section of a structured device description a record came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RecordSection {
    /// The node list.
    Node,
    /// The edge list.
    Edge,
}

/// The origin of a diagnostic within the ingested input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Location {
    /// No input location applies (e.g. a metric computed over the whole route).
    #[default]
    None,
    /// A 1-based line of a line-oriented input.
    Line(u32),
    /// A 0-based record index within a section of a structured input.
    Record {
        /// The section the record belongs to.
        section: RecordSection,
        /// Index of the record within its section.
        index: usize,
    },
}

impl Location {
    /// Returns `true` if no location is attached.
    pub fn is_none(&self) -> bool {
        matches!(self, Location::None)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => write!(f, "<unknown>"),
            Location::Line(line) => write!(f, "line {line}"),
            Location::Record { section, index } => {
                let name = match section {
                    RecordSection::Node => "node",
                    RecordSection::Edge => "edge",
                };
                write!(f, "{name} record #{index}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(format!("{}", Location::Line(12)), "line 12");
        let loc = Location::Record {
            section: RecordSection::Edge,
            index: 3,
        };
        assert_eq!(format!("{loc}"), "edge record #3");
    }

    #[test]
    fn default_is_none() {
        assert!(Location::default().is_none());
        assert!(!Location::Line(1).is_none());
    }
}
