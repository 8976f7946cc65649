//! # Aggregation Functions
//!
//! Pure hour sums and percentages over a snapshot of components.
//!
//! - No side effects, no caching: callers re-derive on every read
//! - Input order is irrelevant
//! - Empty input yields zero, never an error

use crate::rules::{self, HOURS_PER_WEEKLY_CLASS};
use crate::{Component, ComponentKind, Hours, Nucleus, Percentage, Semester};
use std::fmt;

/// Total hours of a single component.
///
/// `Disciplina` is derived from its weekly classes (`weekly_classes * 18`);
/// every other kind uses the manually supplied total.
#[must_use]
pub fn total_hours(kind: ComponentKind, weekly_classes: u32, manual_hours: Hours) -> Hours {
    if kind == ComponentKind::Disciplina {
        Hours::from_whole(u64::from(weekly_classes).saturating_mul(HOURS_PER_WEEKLY_CLASS))
    } else {
        manual_hours
    }
}

/// Sum one hour field over any iterator of components.
pub(crate) fn sum_field<'a, I, F>(components: I, field: F) -> Hours
where
    I: IntoIterator<Item = &'a Component>,
    F: Fn(&Component) -> Hours,
{
    components.into_iter().map(field).sum()
}

/// Sum of `ch_total` over the components of `nucleus`.
#[must_use]
pub fn hours_by_nucleus(components: &[Component], nucleus: Nucleus) -> Hours {
    sum_field(
        components.iter().filter(|c| c.nucleo() == nucleus),
        |c| c.ch_total,
    )
}

/// Sum of `ch_total` over the components of one period (`None` = global).
#[must_use]
pub fn hours_by_semester(components: &[Component], semester: Option<Semester>) -> Hours {
    sum_field(
        components.iter().filter(|c| c.semestre == semester),
        |c| c.ch_total,
    )
}

/// Sum of `ch_total` over every component.
#[must_use]
pub fn total_course_hours(components: &[Component]) -> Hours {
    sum_field(components, |c| c.ch_total)
}

/// Sum of `ch_extensao` over every component.
#[must_use]
pub fn extension_hours(components: &[Component]) -> Hours {
    sum_field(components, |c| c.ch_extensao)
}

/// Extension hours as a share of the course total; zero for an empty course.
#[must_use]
pub fn extension_percentage(components: &[Component]) -> Percentage {
    Percentage::of(extension_hours(components), total_course_hours(components))
}

/// Sum of `ch_pratica` over every component.
#[must_use]
pub fn practice_hours(components: &[Component]) -> Hours {
    sum_field(components, |c| c.ch_pratica)
}

/// Practice hours as a share of the course total; zero for an empty course.
#[must_use]
pub fn practice_percentage(components: &[Component]) -> Percentage {
    Percentage::of(practice_hours(components), total_course_hours(components))
}

/// Sum of `ch_teorica` over every component.
#[must_use]
pub fn theory_hours(components: &[Component]) -> Hours {
    sum_field(components, |c| c.ch_teorica)
}

/// Minimum hours of a nucleus: I=880, II=1600, III=320, IV=400.
#[must_use]
pub const fn minimum_hours_for_nucleus(nucleus: Nucleus) -> Hours {
    rules::nucleus_minimum(nucleus)
}

/// Minimum hours for a raw nucleus label; zero when the label is unknown.
#[must_use]
pub fn minimum_hours_for_label(label: &str) -> Hours {
    label
        .parse::<Nucleus>()
        .map(minimum_hours_for_nucleus)
        .unwrap_or(Hours::ZERO)
}

// =============================================================================
// MINIMUM CHECK
// =============================================================================

/// Outcome of comparing an amount of hours against its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumCheck {
    pub actual: Hours,
    pub minimum: Hours,
}

impl MinimumCheck {
    /// Whether `actual` reaches `minimum`.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.actual >= self.minimum
    }

    /// Hours still missing; zero when passing.
    #[must_use]
    pub fn shortfall(&self) -> Hours {
        self.minimum.saturating_sub(self.actual)
    }

    /// Human-readable verdict.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MinimumCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "✓ Conforme: {} (mínimo: {})", self.actual, self.minimum)
        } else {
            write!(
                f,
                "✗ Não conforme: {} (faltam {} do mínimo de {})",
                self.actual,
                self.shortfall(),
                self.minimum
            )
        }
    }
}

/// Compare `actual` against `minimum`.
#[must_use]
pub fn check_minimum(actual: Hours, minimum: Hours) -> MinimumCheck {
    MinimumCheck { actual, minimum }
}

// =============================================================================
// TESTS
// =============================================================================
