//! Completion percentage and its derivation from checklist state.

use super::{ChecklistItem, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    /// No progress.
    pub const ZERO: Self = Self(0);

    /// Full completion.
    pub const COMPLETE: Self = Self(100);

    /// Creates a validated percentage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPercent`] when the value falls
    /// outside `0..=100`.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|percent| *percent <= 100)
            .map(Self)
            .ok_or(TaskDomainError::InvalidPercent(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Rounds `numerator / denominator` expressed as a percentage, half up.
    ///
    /// Returns `None` when `denominator` is zero. The ratio is clamped to
    /// `100`.
    #[must_use]
    pub fn from_ratio(numerator: u64, denominator: u64) -> Option<Self> {
        let doubled = numerator.min(denominator).saturating_mul(200);
        let rounded = doubled
            .saturating_add(denominator)
            .checked_div(denominator.saturating_mul(2))?;
        u8::try_from(rounded).ok().map(Self)
    }
}

impl TryFrom<i64> for Percent {
    type Error = TaskDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Derives the completion percentage of a checklist.
///
/// An empty checklist carries no information, so `fallback` (the last value
/// set explicitly on the task) is returned unchanged.
#[must_use]
pub fn derive_percent(items: &[ChecklistItem], fallback: Percent) -> Percent {
    let total = items.len() as u64;
    let checked = items.iter().filter(|item| item.is_checked()).count() as u64;
    Percent::from_ratio(checked, total).unwrap_or(fallback)
}

/// Averages a set of percentages, rounding half up.
///
/// Returns [`Percent::ZERO`] for an empty input.
#[must_use]
pub fn average_percent(values: impl IntoIterator<Item = Percent>) -> Percent {
    let (sum, count) = values
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), percent| {
            (sum + u64::from(percent.value()), count + 1)
        });
    sum.checked_mul(2)
        .and_then(|doubled| doubled.saturating_add(count).checked_div(count.saturating_mul(2)))
        .and_then(|rounded| u8::try_from(rounded).ok())
        .map_or(Percent::ZERO, Percent)
}
