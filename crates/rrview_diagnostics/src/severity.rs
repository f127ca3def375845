//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic. Declaration order is severity order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Context about what was loaded or measured.
    Note,
    /// A record was skipped or a value excluded; the pass continued.
    Warning,
    /// A record was rejected or a reference could not be resolved.
    Error,
}

impl Severity {
    /// Every severity, least serious first.
    pub const ALL: [Severity; 3] = [Severity::Note, Severity::Warning, Severity::Error];

    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// The lowercase label used in rendered and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_and_only_error_fails() {
        assert!(Severity::ALL.windows(2).all(|w| w[0] < w[1]));
        let failing: Vec<_> = Severity::ALL.into_iter().filter(|s| s.is_error()).collect();
        assert_eq!(failing, [Severity::Error]);
    }

    #[test]
    fn label_matches_serde_name() {
        for sev in Severity::ALL {
            let json = serde_json::to_string(&sev).unwrap();
            assert_eq!(json, format!("\"{sev}\""));
        }
    }
}
