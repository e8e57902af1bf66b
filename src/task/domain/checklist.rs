//! Checklist entries attached to a task.

use super::{ChecklistItemId, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    id: ChecklistItemId,
    label: String,
    checked: bool,
}

impl ChecklistItem {
    /// Creates a validated checklist entry.
    ///
    /// The label is trimmed; `position` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistLabel`] when the label is
    /// blank.
    pub fn new(
        id: ChecklistItemId,
        label: impl Into<String>,
        checked: bool,
        position: usize,
    ) -> Result<Self, TaskDomainError> {
        let raw = label.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyChecklistLabel { position });
        }
        Ok(Self {
            id,
            label: trimmed.to_owned(),
            checked,
        })
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistItemId {
        self.id
    }

    /// Returns the entry label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether the entry is ticked.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }
}

/// Unvalidated checklist entry as supplied by a caller.
///
/// Entries without an identifier receive a fresh one on validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChecklistItemDraft {
    /// Existing identifier to preserve, if any.
    pub id: Option<ChecklistItemId>,
    /// Entry label.
    pub label: String,
    /// Whether the entry is ticked.
    pub checked: bool,
}

impl ChecklistItemDraft {
    /// Creates an unchecked draft entry without an identifier.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            checked: false,
        }
    }

    /// Marks the draft entry as ticked or not.
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Preserves an existing identifier.
    #[must_use]
    pub const fn with_id(mut self, id: ChecklistItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Validates a list of draft entries into checklist items.
///
/// # Errors
///
/// Returns [`TaskDomainError::EmptyChecklistLabel`] for blank labels and
/// [`TaskDomainError::DuplicateChecklistItem`] when two entries carry the
/// same identifier.
pub fn build_checklist(
    drafts: impl IntoIterator<Item = ChecklistItemDraft>,
) -> Result<Vec<ChecklistItem>, TaskDomainError> {
    let mut seen = HashSet::new();
    drafts
        .into_iter()
        .enumerate()
        .map(|(position, draft)| {
            let id = draft.id.unwrap_or_default();
            if !seen.insert(id) {
                return Err(TaskDomainError::DuplicateChecklistItem(id.into_inner()));
            }
            ChecklistItem::new(id, draft.label, draft.checked, position)
        })
        .collect()
}
