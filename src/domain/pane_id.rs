//! Smart-constructed pane identifier (`%<digits>`, the multiplexer's own syntax).

use std::fmt;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(String);

impl PaneId {
    /// Parses `s.trim()` as a pane id. Succeeds iff the trimmed value matches `^%\d+$`.
    pub fn create(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if !is_valid_pane_id(trimmed) {
            return Err(EngineError::InvalidFormat {
                input: trimmed.to_string(),
                expected: "%<digits>".to_string(),
            });
        }
        Ok(PaneId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part, used to sort panes deterministically during naming.
    pub fn numeric_value(&self) -> u64 {
        self.0[1..].parse().unwrap_or(u64::MAX)
    }
}

fn is_valid_pane_id(s: &str) -> bool {
    let mut chars = s.chars();
    if chars.next() != Some('%') {
        return false;
    }
    let rest = &s[1..];
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PaneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_ids() {
        assert_eq!(PaneId::create("%0").unwrap().as_str(), "%0");
        assert_eq!(PaneId::create("%123").unwrap().as_str(), "%123");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(PaneId::create("  %7  ").unwrap().as_str(), "%7");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(PaneId::create("").unwrap_err(), EngineError::EmptyInput);
        assert_eq!(PaneId::create("   ").unwrap_err(), EngineError::EmptyInput);
    }

    #[test]
    fn rejects_malformed() {
        assert!(PaneId::create("0").is_err());
        assert!(PaneId::create("%").is_err());
        assert!(PaneId::create("%1a").is_err());
        assert!(PaneId::create("pane1").is_err());
    }

    #[test]
    fn numeric_value_orders_panes() {
        let mut ids = vec![
            PaneId::create("%10").unwrap(),
            PaneId::create("%2").unwrap(),
            PaneId::create("%1").unwrap(),
        ];
        ids.sort_by_key(|id| id.numeric_value());
        assert_eq!(
            ids.iter().map(PaneId::as_str).collect::<Vec<_>>(),
            vec!["%1", "%2", "%10"]
        );
    }
}
