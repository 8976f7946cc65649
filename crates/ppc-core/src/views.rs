//! # Reporting Views
//!
//! Tabular projections of a snapshot, all built on the aggregation primitives:
//!
//! - `period_matrix`: the curricular matrix by academic period
//! - `semester_nucleus_summary`: hours per semester and nucleus
//! - `ConformityDashboard`: the headline indicators and their minimums
//! - `components_by_nucleus` / `global_components`: filtered listings

use crate::aggregate::{
    self, MinimumCheck, check_minimum, extension_hours, extension_percentage, practice_hours,
    practice_percentage, theory_hours, total_course_hours,
};
use crate::curriculum::validate_curriculum;
use crate::rules::{COURSE_MINIMUM_HOURS, EXTENSION_MINIMUM_PERCENT};
use crate::{Component, ComponentKind, Hours, Nucleus, Percentage, Semester};
use serde::Serialize;

/// Name of the closing row of each period in the matrix.
pub const PERIOD_TOTAL_LABEL: &str = "TOTAL DO PERÍODO";

/// Label of the closing row of the semester summary.
pub const SUMMARY_TOTAL_LABEL: &str = "TOTAL";

/// Label of the row of components without a period.
pub const GLOBAL_LABEL: &str = "Global";

fn by_semester_then_name(a: &&Component, b: &&Component) -> std::cmp::Ordering {
    (a.semestre, &a.nome).cmp(&(b.semestre, &b.nome))
}

// =============================================================================
// PERIOD MATRIX
// =============================================================================

/// One line of the period matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "linha", rename_all = "snake_case")]
pub enum MatrixRow {
    Component {
        semestre: Option<Semester>,
        nome: String,
        tipo: ComponentKind,
        ch_semanal: Option<u32>,
        ch_teorica: Hours,
        ch_pratica: Hours,
        ch_extensao: Hours,
        ch_total: Hours,
        nucleo: Nucleus,
    },
    PeriodTotal {
        semestre: Option<Semester>,
        ch_teorica: Hours,
        ch_pratica: Hours,
        ch_extensao: Hours,
        ch_total: Hours,
    },
}

impl MatrixRow {
    /// The period this row belongs to.
    #[must_use]
    pub fn semestre(&self) -> Option<Semester> {
        match self {
            MatrixRow::Component { semestre, .. } | MatrixRow::PeriodTotal { semestre, .. } => {
                *semestre
            }
        }
    }

    /// Column values in matrix order, as display text.
    #[must_use]
    pub fn cells(&self) -> [String; 9] {
        let period = period_label(self.semestre());
        match self {
            MatrixRow::Component {
                nome,
                tipo,
                ch_semanal,
                ch_teorica,
                ch_pratica,
                ch_extensao,
                ch_total,
                nucleo,
                ..
            } => [
                period,
                nome.clone(),
                tipo.label().to_string(),
                ch_semanal.map(|n| n.to_string()).unwrap_or_default(),
                ch_teorica.to_string(),
                ch_pratica.to_string(),
                ch_extensao.to_string(),
                ch_total.to_string(),
                nucleo.label().to_string(),
            ],
            MatrixRow::PeriodTotal {
                ch_teorica,
                ch_pratica,
                ch_extensao,
                ch_total,
                ..
            } => [
                period,
                PERIOD_TOTAL_LABEL.to_string(),
                String::new(),
                String::new(),
                ch_teorica.to_string(),
                ch_pratica.to_string(),
                ch_extensao.to_string(),
                ch_total.to_string(),
                String::new(),
            ],
        }
    }
}

/// Column headers of the period matrix.
pub const MATRIX_COLUMNS: [&str; 9] = [
    "Semestre",
    "Nome",
    "Tipo",
    "CH Semanal",
    "CH Teórica",
    "CH Prática",
    "CH Extensão",
    "CH Total",
    "Núcleo",
];

/// Display label of a period: its number, or `Global`.
#[must_use]
pub fn period_label(semester: Option<Semester>) -> String {
    semester.map_or_else(|| GLOBAL_LABEL.to_string(), |s| s.to_string())
}

fn period_total(semestre: Option<Semester>, group: &[&Component]) -> MatrixRow {
    let group = group.iter().copied();
    MatrixRow::PeriodTotal {
        semestre,
        ch_teorica: aggregate::sum_field(group.clone(), |c| c.ch_teorica),
        ch_pratica: aggregate::sum_field(group.clone(), |c| c.ch_pratica),
        ch_extensao: aggregate::sum_field(group.clone(), |c| c.ch_extensao),
        ch_total: aggregate::sum_field(group, |c| c.ch_total),
    }
}

/// The curricular matrix: components sorted by (semester, name), global ones
/// first, each period closed by a `TOTAL DO PERÍODO` row.
#[must_use]
pub fn period_matrix(components: &[Component]) -> Vec<MatrixRow> {
    let mut sorted: Vec<&Component> = components.iter().collect();
    sorted.sort_by(by_semester_then_name);

    let mut rows = Vec::with_capacity(sorted.len().saturating_mul(2));
    for group in sorted.chunk_by(|a, b| a.semestre == b.semestre) {
        let Some(first) = group.first() else {
            continue;
        };
        for c in group {
            rows.push(MatrixRow::Component {
                semestre: c.semestre,
                nome: c.nome.clone(),
                tipo: c.tipo,
                ch_semanal: c.aulas_semanais,
                ch_teorica: c.ch_teorica,
                ch_pratica: c.ch_pratica,
                ch_extensao: c.ch_extensao,
                ch_total: c.ch_total,
                nucleo: c.nucleo(),
            });
        }
        rows.push(period_total(first.semestre, group));
    }
    rows
}

// =============================================================================
// SEMESTER x NUCLEUS SUMMARY
// =============================================================================

/// Which line of the semester summary a row is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Semester(Semester),
    Global,
    Total,
}

impl SummaryPeriod {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            SummaryPeriod::Semester(s) => s.to_string(),
            SummaryPeriod::Global => GLOBAL_LABEL.to_string(),
            SummaryPeriod::Total => SUMMARY_TOTAL_LABEL.to_string(),
        }
    }
}

/// Hours per nucleus for one period, plus the row total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub semestre: String,
    #[serde(skip)]
    pub period: SummaryPeriod,
    /// `ch_total` sums in `Nucleus::ALL` order.
    pub nucleos: [Hours; 4],
    pub total: Hours,
}

impl SummaryRow {
    fn from_group<'a, I>(period: SummaryPeriod, group: I) -> Self
    where
        I: IntoIterator<Item = &'a Component>,
    {
        let mut nucleos = [Hours::ZERO; 4];
        for c in group {
            let slot = &mut nucleos[c.nucleo().index()];
            *slot = slot.saturating_add(c.ch_total);
        }
        Self {
            semestre: period.label(),
            period,
            total: nucleos.into_iter().sum(),
            nucleos,
        }
    }

    /// Hours of one nucleus in this row.
    #[must_use]
    pub fn hours(&self, nucleus: Nucleus) -> Hours {
        self.nucleos[nucleus.index()]
    }
}

/// Column headers of the semester summary.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Semestre",
    "CH Núc. I",
    "CH Núc. II",
    "CH Núc. III",
    "CH Núc. IV",
    "Total",
];

/// One row per semester (ascending), a `Global` row when any component has
/// no period, and a closing `TOTAL` row. Empty input yields no rows.
#[must_use]
pub fn semester_nucleus_summary(components: &[Component]) -> Vec<SummaryRow> {
    if components.is_empty() {
        return Vec::new();
    }

    let mut semesters: Vec<Semester> = components.iter().filter_map(|c| c.semestre).collect();
    semesters.sort_unstable();
    semesters.dedup();

    let mut rows: Vec<SummaryRow> = semesters
        .into_iter()
        .map(|s| {
            SummaryRow::from_group(
                SummaryPeriod::Semester(s),
                components.iter().filter(|c| c.semestre == Some(s)),
            )
        })
        .collect();

    if components.iter().any(|c| c.semestre.is_none()) {
        rows.push(SummaryRow::from_group(
            SummaryPeriod::Global,
            components.iter().filter(|c| c.semestre.is_none()),
        ));
    }

    rows.push(SummaryRow::from_group(SummaryPeriod::Total, components));
    rows
}

// =============================================================================
// CONFORMITY DASHBOARD
// =============================================================================

/// Hours of one nucleus against its minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NucleusStatus {
    pub nucleus: Nucleus,
    pub title: &'static str,
    pub hours: Hours,
    pub minimum: Hours,
    pub conforme: bool,
    pub mensagem: String,
}

impl NucleusStatus {
    fn new(nucleus: Nucleus, check: MinimumCheck) -> Self {
        Self {
            nucleus,
            title: nucleus.title(),
            hours: check.actual,
            minimum: check.minimum,
            conforme: check.passed(),
            mensagem: check.message(),
        }
    }
}

/// Headline indicators of a curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformityDashboard {
    pub component_count: usize,
    pub ch_total: Hours,
    pub ch_total_minimum: Hours,
    pub ch_total_conforme: bool,
    pub ch_total_mensagem: String,
    pub nucleos: Vec<NucleusStatus>,
    pub ch_teorica: Hours,
    pub ch_pratica: Hours,
    pub ch_extensao: Hours,
    pub percentual_extensao: Percentage,
    pub percentual_extensao_minimo: Percentage,
    pub extensao_conforme: bool,
    pub percentual_pratica: Percentage,
    pub issue_count: usize,
}

impl ConformityDashboard {
    /// Compute every indicator from a snapshot.
    #[must_use]
    pub fn from_components(components: &[Component]) -> Self {
        let total = check_minimum(total_course_hours(components), COURSE_MINIMUM_HOURS);
        let nucleos = Nucleus::ALL
            .into_iter()
            .map(|n| {
                let check = check_minimum(
                    aggregate::hours_by_nucleus(components, n),
                    aggregate::minimum_hours_for_nucleus(n),
                );
                NucleusStatus::new(n, check)
            })
            .collect();
        let extension = extension_percentage(components);

        Self {
            component_count: components.len(),
            ch_total: total.actual,
            ch_total_minimum: total.minimum,
            ch_total_conforme: total.passed(),
            ch_total_mensagem: total.message(),
            nucleos,
            ch_teorica: theory_hours(components),
            ch_pratica: practice_hours(components),
            ch_extensao: extension_hours(components),
            percentual_extensao: extension,
            percentual_extensao_minimo: EXTENSION_MINIMUM_PERCENT,
            extensao_conforme: extension >= EXTENSION_MINIMUM_PERCENT,
            percentual_pratica: practice_percentage(components),
            issue_count: validate_curriculum(components).issues.len(),
        }
    }

    /// Whether every indicator and every component conforms.
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        self.issue_count == 0
    }
}

// =============================================================================
// FILTERED LISTINGS
// =============================================================================

/// Components of one nucleus, sorted by (semester, name).
#[must_use]
pub fn components_by_nucleus(components: &[Component], nucleus: Nucleus) -> Vec<&Component> {
    let mut selected: Vec<&Component> = components
        .iter()
        .filter(|c| c.nucleo() == nucleus)
        .collect();
    selected.sort_by(by_semester_then_name);
    selected
}

/// Components not tied to any period, in insertion order.
#[must_use]
pub fn global_components(components: &[Component]) -> Vec<&Component> {
    components.iter().filter(|c| c.semestre.is_none()).collect()
}

// =============================================================================
// TESTS
// =============================================================================
