//! Pre-close checklist types.
//!
//! The controller assembles the items from collaborator state (draft entries
//! in range, earlier-period statuses); blocking failures stop the close and
//! are returned to the caller itemized.

use serde::{Deserialize, Serialize};

/// One item of the pre-close checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item name (e.g., "no unposted entries in period").
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Whether a failure blocks the close.
    pub blocking: bool,
    /// Optional detail (e.g., the offending count).
    pub detail: Option<String>,
}

impl ChecklistItem {
    /// Creates a passed item.
    #[must_use]
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            blocking: true,
            detail: None,
        }
    }

    /// Creates a failed blocking item with a detail message.
    #[must_use]
    pub fn blocked(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            blocking: true,
            detail: Some(detail.into()),
        }
    }

    /// Creates a failed advisory (non-blocking) item.
    #[must_use]
    pub fn warning(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            blocking: false,
            detail: Some(detail.into()),
        }
    }
}

/// The assembled pre-close checklist for a period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosingChecklist {
    /// All evaluated items.
    pub items: Vec<ChecklistItem>,
}

impl ClosingChecklist {
    /// Creates a checklist from items.
    #[must_use]
    pub fn new(items: Vec<ChecklistItem>) -> Self {
        Self { items }
    }

    /// Returns true if no blocking item failed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.items.iter().all(|item| item.passed || !item.blocking)
    }

    /// Returns the names of failed blocking items.
    #[must_use]
    pub fn blocking_failures(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| !item.passed && item.blocking)
            .map(|item| item.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_checklist_is_ready() {
        assert!(ClosingChecklist::default().is_ready());
    }

    #[test]
    fn test_all_passed_is_ready() {
        let checklist = ClosingChecklist::new(vec![
            ChecklistItem::passed("period open"),
            ChecklistItem::passed("no unposted entries in period"),
        ]);
        assert!(checklist.is_ready());
        assert!(checklist.blocking_failures().is_empty());
    }

    #[test]
    fn test_blocking_failure_stops_close() {
        let checklist = ClosingChecklist::new(vec![
            ChecklistItem::passed("period open"),
            ChecklistItem::blocked("no unposted entries in period", "2 draft entries"),
        ]);
        assert!(!checklist.is_ready());
        assert_eq!(
            checklist.blocking_failures(),
            vec!["no unposted entries in period".to_string()]
        );
    }

    #[test]
    fn test_warning_does_not_block() {
        let checklist = ClosingChecklist::new(vec![ChecklistItem::warning(
            "bank reconciliation",
            "1 unreconciled statement",
        )]);
        assert!(checklist.is_ready());
        assert!(checklist.blocking_failures().is_empty());
    }
}
