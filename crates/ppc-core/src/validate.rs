//! # Component Validator
//!
//! Checks a single [`ComponentDraft`] against the structural rules and the
//! nucleus-specific field combinations of the rubric.
//!
//! Every check runs; nothing short-circuits. The result lists violations in
//! check order, so a form can show every problem at once.

use crate::rules::INTERNSHIP_MINIMUM_HOURS;
use crate::{ComponentDraft, ComponentKind, Hours, Nucleus, PpcError};
use serde::Serialize;
use std::fmt;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// One broken rule of a component.
///
/// The structured payload is the control data; the Portuguese text shown to
/// coordinators comes from `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    MissingName,
    MissingKind,
    UnknownKind { tipo: String },
    MissingNucleus,
    UnknownNucleus { nucleo: String },
    ExtensionOutsideNucleusIii { ch_extensao: Hours },
    InternshipOutsideNucleusIv,
    DisciplineWithoutWeeklyClasses,
    MissingArt13Themes,
    MissingAreaGuidelines,
    NucleusIiiRequiresExtension,
    MissingExtensionProject,
    ExtensionHoursMismatch { ch_extensao: Hours, ch_total: Hours },
    NucleusIvRequiresInternship,
    MissingInternshipVenue,
    MissingInternshipStage,
    InternshipBelowMinimum { ch_total: Hours, minimum: Hours },
    PracticeHoursMismatch { ch_pratica: Hours, ch_total: Hours },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingName => f.write_str("Nome do componente é obrigatório"),
            Violation::MissingKind => f.write_str("Tipo do componente é obrigatório"),
            Violation::UnknownKind { tipo } => write!(f, "Tipo do componente inválido: {}", tipo),
            Violation::MissingNucleus => f.write_str("Núcleo é obrigatório"),
            Violation::UnknownNucleus { nucleo } => write!(f, "Núcleo inválido: {}", nucleo),
            Violation::ExtensionOutsideNucleusIii { .. } => {
                f.write_str("Componentes com CH de extensão devem pertencer ao Núcleo III")
            }
            Violation::InternshipOutsideNucleusIv => {
                f.write_str("Componentes do tipo Estágio devem pertencer ao Núcleo IV")
            }
            Violation::DisciplineWithoutWeeklyClasses => {
                f.write_str("Disciplinas devem ter número de aulas semanais maior que zero")
            }
            Violation::MissingArt13Themes => {
                f.write_str("Núcleo I requer seleção de pelo menos um tema do Art. 13")
            }
            Violation::MissingAreaGuidelines => {
                f.write_str("Núcleo II requer indicação das diretrizes específicas da área")
            }
            Violation::NucleusIiiRequiresExtension => {
                f.write_str("Núcleo III aceita apenas componentes do tipo Extensão")
            }
            Violation::MissingExtensionProject => {
                f.write_str("Núcleo III requer indicação do vínculo com projeto extensionista")
            }
            Violation::ExtensionHoursMismatch { .. } => {
                f.write_str("No Núcleo III, toda a carga horária deve ser registrada como Extensão")
            }
            Violation::NucleusIvRequiresInternship => {
                f.write_str("Núcleo IV aceita apenas componentes do tipo Estágio")
            }
            Violation::MissingInternshipVenue => f.write_str("Núcleo IV requer local de realização"),
            Violation::MissingInternshipStage => f.write_str("Núcleo IV requer etapa do estágio"),
            Violation::InternshipBelowMinimum { minimum, .. } => {
                write!(f, "Estágios devem ter carga horária mínima de {}", minimum)
            }
            Violation::PracticeHoursMismatch { .. } => {
                f.write_str("No Núcleo IV, a carga horária deve ser integralmente prática")
            }
        }
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Outcome of [`validate_component`]: valid iff no violations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentValidation {
    violations: Vec<Violation>,
}

impl ComponentValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in check order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Rendered messages in check order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when valid, `PpcError::Rejected` carrying every violation otherwise.
    pub fn into_result(self) -> Result<(), PpcError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(PpcError::Rejected(self.violations))
        }
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Check one draft against every component rule.
#[must_use]
pub fn validate_component(draft: &ComponentDraft) -> ComponentValidation {
    let mut violations = Vec::new();

    // Structural
    if is_blank(&draft.nome) {
        violations.push(Violation::MissingName);
    }

    let kind = if is_blank(&draft.tipo) {
        violations.push(Violation::MissingKind);
        None
    } else {
        match draft.tipo.parse::<ComponentKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                violations.push(Violation::UnknownKind {
                    tipo: draft.tipo.trim().to_string(),
                });
                None
            }
        }
    };

    let nucleus = if is_blank(&draft.nucleo) {
        violations.push(Violation::MissingNucleus);
        None
    } else {
        match draft.nucleo.parse::<Nucleus>() {
            Ok(nucleus) => Some(nucleus),
            Err(_) => {
                violations.push(Violation::UnknownNucleus {
                    nucleo: draft.nucleo.trim().to_string(),
                });
                None
            }
        }
    };

    // Cross-field
    if !draft.ch_extensao.is_zero() && nucleus != Some(Nucleus::III) {
        violations.push(Violation::ExtensionOutsideNucleusIii {
            ch_extensao: draft.ch_extensao,
        });
    }

    if kind == Some(ComponentKind::Estagio) && nucleus != Some(Nucleus::IV) {
        violations.push(Violation::InternshipOutsideNucleusIv);
    }

    if kind == Some(ComponentKind::Disciplina) && draft.aulas_semanais.is_none_or(|n| n <= 0) {
        violations.push(Violation::DisciplineWithoutWeeklyClasses);
    }

    // Nucleus-specific
    match nucleus {
        Some(Nucleus::I) => {
            if draft.temas_nucleo_i.iter().all(|t| is_blank(t)) {
                violations.push(Violation::MissingArt13Themes);
            }
        }
        Some(Nucleus::II) => {
            if is_blank(&draft.diretrizes_nucleo_ii) {
                violations.push(Violation::MissingAreaGuidelines);
            }
        }
        Some(Nucleus::III) => {
            if kind != Some(ComponentKind::Extensao) {
                violations.push(Violation::NucleusIiiRequiresExtension);
            }
            if is_blank(&draft.descricao_extensao) {
                violations.push(Violation::MissingExtensionProject);
            }
            if draft.ch_extensao != draft.ch_total {
                violations.push(Violation::ExtensionHoursMismatch {
                    ch_extensao: draft.ch_extensao,
                    ch_total: draft.ch_total,
                });
            }
        }
        Some(Nucleus::IV) => {
            if kind != Some(ComponentKind::Estagio) {
                violations.push(Violation::NucleusIvRequiresInternship);
            }
            if is_blank(&draft.local_realizacao) {
                violations.push(Violation::MissingInternshipVenue);
            }
            if is_blank(&draft.etapa_estagio) {
                violations.push(Violation::MissingInternshipStage);
            }
            if draft.ch_total < INTERNSHIP_MINIMUM_HOURS {
                violations.push(Violation::InternshipBelowMinimum {
                    ch_total: draft.ch_total,
                    minimum: INTERNSHIP_MINIMUM_HOURS,
                });
            }
            if draft.ch_pratica != draft.ch_total {
                violations.push(Violation::PracticeHoursMismatch {
                    ch_pratica: draft.ch_pratica,
                    ch_total: draft.ch_total,
                });
            }
        }
        None => {}
    }

    ComponentValidation { violations }
}

// =============================================================================
// TESTS
// =============================================================================
