//! # ppc-core
//!
//! The rule-evaluation and aggregation engine for PPC - THE LOGIC.
//!
//! PPC ("Projeto Pedagógico de Curso") registers the curricular components of
//! a teacher-education program and checks the curriculum against the fixed
//! rubric of Res. CNE/CP nº 4/2024: minimum hours per nucleus, minimum course
//! total, minimum extension share, and the field combinations each nucleus
//! requires.
//!
//! ## Layout
//!
//! - `types`: scalar types, fixed-point hours, errors
//! - `model`: the loose `ComponentDraft` and the typed `Component`
//! - `rules`: the regulatory constants
//! - `aggregate`: hour sums and percentages
//! - `validate`: the component validator
//! - `curriculum`: the curriculum validator
//! - `views`: matrix, semester summary, dashboard
//! - `formats`: the JSON backup interchange
//! - `store`: the working set
//!
//! ## Architectural Constraints
//!
//! - Pure and synchronous: NO async, NO network, NO file I/O
//! - Integer arithmetic only; floats appear only at the JSON boundary
//! - Aggregates are recomputed from the snapshot on every call
//! - Never panics; every failure is a returned value

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod curriculum;
pub mod formats;
pub mod model;
pub mod rules;
pub mod store;
pub mod types;
pub mod validate;
pub mod views;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{ComponentId, ComponentKind, Hours, Nucleus, Percentage, PpcError, Semester};

pub use model::{Component, ComponentDraft, NucleusDetails};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use aggregate::{
    MinimumCheck, check_minimum, extension_hours, extension_percentage, hours_by_nucleus,
    hours_by_semester, minimum_hours_for_label, minimum_hours_for_nucleus, practice_hours,
    practice_percentage, theory_hours, total_course_hours, total_hours,
};
pub use curriculum::{ConformityIssue, CurriculumReport, ReportSummary, validate_curriculum};
pub use validate::{ComponentValidation, Violation, validate_component};
pub use views::{
    ConformityDashboard, MatrixRow, NucleusStatus, SummaryPeriod, SummaryRow,
    components_by_nucleus, global_components, period_matrix, semester_nucleus_summary,
};

// =============================================================================
// RE-EXPORTS: Store & Formats
// =============================================================================

pub use formats::{BACKUP_VERSION, Backup, backup_to_json, parse_backup};
pub use store::CurriculumStore;
