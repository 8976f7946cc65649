//! # Curriculum Validator
//!
//! Checks the whole working set: every component again, then the course
//! total, the per-nucleus minimums and the extension threshold.
//!
//! Aggregate non-conformity is reported, never raised. Insertion is not gated
//! by this module.

use crate::aggregate::{extension_percentage, hours_by_nucleus, total_course_hours};
use crate::rules::{self, COURSE_MINIMUM_HOURS, EXTENSION_MINIMUM_PERCENT};
use crate::validate::{Violation, validate_component};
use crate::{Component, Hours, Nucleus, Percentage};
use serde::Serialize;
use std::fmt;

/// One finding of the curriculum validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConformityIssue {
    /// A stored component no longer passes the component validator.
    Component {
        /// 1-based position in the working set.
        position: usize,
        nome: String,
        violations: Vec<Violation>,
    },
    CourseHoursBelowMinimum { actual: Hours, minimum: Hours },
    NucleusBelowMinimum {
        nucleus: Nucleus,
        actual: Hours,
        minimum: Hours,
    },
    ExtensionBelowMinimum {
        actual: Percentage,
        minimum: Percentage,
    },
}

impl ConformityIssue {
    /// Hours missing to reach the minimum, for hour-based issues.
    #[must_use]
    pub fn shortfall_hours(&self) -> Option<Hours> {
        match self {
            ConformityIssue::CourseHoursBelowMinimum { actual, minimum }
            | ConformityIssue::NucleusBelowMinimum {
                actual, minimum, ..
            } => Some(minimum.saturating_sub(*actual)),
            _ => None,
        }
    }

    /// Percentage points missing, for the extension issue.
    #[must_use]
    pub fn shortfall_percentage(&self) -> Option<Percentage> {
        match self {
            ConformityIssue::ExtensionBelowMinimum { actual, minimum } => {
                Some(minimum.saturating_sub(*actual))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ConformityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConformityIssue::Component {
                position,
                nome,
                violations,
            } => {
                let joined = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Componente {} ({}): {}", position, nome, joined)
            }
            ConformityIssue::CourseHoursBelowMinimum { actual, minimum } => write!(
                f,
                "CH total do curso ({}) está abaixo do mínimo exigido ({}), faltam {}",
                actual,
                minimum,
                minimum.saturating_sub(*actual)
            ),
            ConformityIssue::NucleusBelowMinimum {
                nucleus,
                actual,
                minimum,
            } => write!(
                f,
                "Núcleo {}: ✗ Não conforme: {} (faltam {} do mínimo de {})",
                nucleus,
                actual,
                minimum.saturating_sub(*actual),
                minimum
            ),
            ConformityIssue::ExtensionBelowMinimum { actual, minimum } => write!(
                f,
                "Percentual de extensão ({}) está abaixo do mínimo exigido ({}), faltam {}",
                actual,
                minimum,
                minimum.saturating_sub(*actual)
            ),
        }
    }
}

/// Every finding over a snapshot, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CurriculumReport {
    pub issues: Vec<ConformityIssue>,
}

impl CurriculumReport {
    /// Conformant iff there are no issues.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The `{valido, erros, avisos}` shape.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            valido: self.is_valid(),
            erros: self.issues.iter().map(ToString::to_string).collect(),
            avisos: Vec::new(),
        }
    }
}

/// Rendered curriculum report. `avisos` is reserved and always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub valido: bool,
    pub erros: Vec<String>,
    pub avisos: Vec<String>,
}

/// Validate a whole curriculum snapshot.
#[doc(alias = "validar_curso_completo")]
#[must_use]
pub fn validate_curriculum(components: &[Component]) -> CurriculumReport {
    let mut issues = Vec::new();

    for (i, component) in components.iter().enumerate() {
        let result = validate_component(&component.to_draft());
        if !result.is_valid() {
            issues.push(ConformityIssue::Component {
                position: i.saturating_add(1),
                nome: component.nome.clone(),
                violations: result.violations().to_vec(),
            });
        }
    }

    let total = total_course_hours(components);
    if total < COURSE_MINIMUM_HOURS {
        issues.push(ConformityIssue::CourseHoursBelowMinimum {
            actual: total,
            minimum: COURSE_MINIMUM_HOURS,
        });
    }

    for nucleus in Nucleus::ALL {
        let actual = hours_by_nucleus(components, nucleus);
        let minimum = rules::nucleus_minimum(nucleus);
        if actual < minimum {
            issues.push(ConformityIssue::NucleusBelowMinimum {
                nucleus,
                actual,
                minimum,
            });
        }
    }

    let extension = extension_percentage(components);
    if extension < EXTENSION_MINIMUM_PERCENT {
        issues.push(ConformityIssue::ExtensionBelowMinimum {
            actual: extension,
            minimum: EXTENSION_MINIMUM_PERCENT,
        });
    }

    CurriculumReport { issues }
}

// =============================================================================
// TESTS
// =============================================================================
