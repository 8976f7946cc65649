//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//! Component bodies use the core wire format (`ComponentDraft` / `Component`).

use ppc_core::{
    Component, ComponentId, CurriculumReport, Hours, Nucleus, Percentage, rules,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Generic failure body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

/// Listing of the working set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentListResponse {
    pub count: usize,
    pub ultimo_id: u64,
    pub componentes: Vec<Component>,
}

/// Result of `POST /components`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComponentResponse {
    pub success: bool,
    pub id: Option<u64>,
    /// Every violation, in check order, when the draft was rejected.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CreateComponentResponse {
    pub fn success(id: ComponentId) -> Self {
        Self {
            success: true,
            id: Some(id.0),
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            id: None,
            errors,
        }
    }
}

/// Result of `DELETE /components/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveComponentResponse {
    pub success: bool,
    pub id: u64,
    pub removed: Option<String>,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Curriculum report in the `{valido, erros, avisos}` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valido: bool,
    pub erros: Vec<String>,
    pub avisos: Vec<String>,
}

impl From<&CurriculumReport> for ValidationResponse {
    fn from(report: &CurriculumReport) -> Self {
        let summary = report.summary();
        Self {
            valido: summary.valido,
            erros: summary.erros,
            avisos: summary.avisos,
        }
    }
}

// =============================================================================
// BACKUP
// =============================================================================

/// Result of `POST /backup/restore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub ultimo_id: u64,
}

// =============================================================================
// RULES
// =============================================================================

/// Minimum of one nucleus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NucleusRuleJson {
    pub nucleo: String,
    pub titulo: String,
    pub minimo: Hours,
}

/// The fixed regulatory rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    pub ch_por_aula_semanal: u64,
    pub ch_minima_curso: Hours,
    pub percentual_minimo_extensao: Percentage,
    pub ch_minima_estagio: Hours,
    pub semestre_maximo: u8,
    pub nucleos: Vec<NucleusRuleJson>,
    pub temas_art13: Vec<String>,
    pub etapas_estagio: Vec<String>,
}

impl Default for RulesResponse {
    fn default() -> Self {
        Self {
            ch_por_aula_semanal: rules::HOURS_PER_WEEKLY_CLASS,
            ch_minima_curso: rules::COURSE_MINIMUM_HOURS,
            percentual_minimo_extensao: rules::EXTENSION_MINIMUM_PERCENT,
            ch_minima_estagio: rules::INTERNSHIP_MINIMUM_HOURS,
            semestre_maximo: rules::MAX_SEMESTER,
            nucleos: Nucleus::ALL
                .into_iter()
                .map(|n| NucleusRuleJson {
                    nucleo: n.label().to_string(),
                    titulo: n.title().to_string(),
                    minimo: rules::nucleus_minimum(n),
                })
                .collect(),
            temas_art13: rules::ART13_THEMES.iter().map(|t| t.to_string()).collect(),
            etapas_estagio: rules::INTERNSHIP_STAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
