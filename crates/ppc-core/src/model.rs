//! # Component Model
//!
//! Two shapes of the same curricular item:
//!
//! - [`ComponentDraft`]: the flat, loosely-typed record as it arrives from a
//!   form, an API request or a backup file. Every field is optional and text is
//!   kept verbatim so the validator can report every problem at once.
//! - [`Component`]: the typed record held by the store. Its nucleus is carried by
//!   [`NucleusDetails`], so the payload of a foreign nucleus cannot exist.
//!
//! On the wire a component is `{"id": …, <draft fields>}` with every key present;
//! the fields of the other nuclei are written empty.

use crate::{ComponentId, ComponentKind, Hours, Nucleus, PpcError, Semester};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// NUCLEUS DETAILS
// =============================================================================

/// The nucleus of a component together with the fields that nucleus requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NucleusDetails {
    /// Formação Pedagógica: selected Art. 13 themes.
    I { temas_nucleo_i: Vec<String> },
    /// Formação Específica: link to the area's guidelines.
    II { diretrizes_nucleo_ii: String },
    /// Extensão: link to the extension project.
    III { descricao_extensao: String },
    /// Estágio: venue and stage of the internship.
    IV {
        local_realizacao: String,
        etapa_estagio: String,
    },
}

impl NucleusDetails {
    /// The nucleus these details belong to.
    #[must_use]
    pub const fn nucleus(&self) -> Nucleus {
        match self {
            NucleusDetails::I { .. } => Nucleus::I,
            NucleusDetails::II { .. } => Nucleus::II,
            NucleusDetails::III { .. } => Nucleus::III,
            NucleusDetails::IV { .. } => Nucleus::IV,
        }
    }

    /// Pick the payload of `nucleus` out of a draft, dropping the others.
    fn from_draft(nucleus: Nucleus, draft: &ComponentDraft) -> Self {
        match nucleus {
            Nucleus::I => {
                let mut temas: Vec<String> = Vec::with_capacity(draft.temas_nucleo_i.len());
                for tema in &draft.temas_nucleo_i {
                    if !temas.contains(tema) {
                        temas.push(tema.clone());
                    }
                }
                NucleusDetails::I {
                    temas_nucleo_i: temas,
                }
            }
            Nucleus::II => NucleusDetails::II {
                diretrizes_nucleo_ii: draft.diretrizes_nucleo_ii.clone(),
            },
            Nucleus::III => NucleusDetails::III {
                descricao_extensao: draft.descricao_extensao.clone(),
            },
            Nucleus::IV => NucleusDetails::IV {
                local_realizacao: draft.local_realizacao.clone(),
                etapa_estagio: draft.etapa_estagio.clone(),
            },
        }
    }
}

// =============================================================================
// DRAFT (loose input record)
// =============================================================================

/// A component as submitted, before typing.
///
/// `ch_total` is the manually supplied total; for `Disciplina` the store
/// replaces it with `aulas_semanais * 18` on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDraft {
    #[serde(default, deserialize_with = "semester_or_global")]
    pub semestre: Option<u32>,
    #[serde(default, deserialize_with = "text_or_null")]
    pub nome: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub tipo: String,
    #[serde(default)]
    pub aulas_semanais: Option<i64>,
    #[serde(default)]
    pub ch_total: Hours,
    #[serde(default)]
    pub ch_teorica: Hours,
    #[serde(default)]
    pub ch_pratica: Hours,
    #[serde(default)]
    pub ch_extensao: Hours,
    #[serde(default, deserialize_with = "text_or_null")]
    pub nucleo: String,
    #[serde(default, deserialize_with = "list_or_null")]
    pub temas_nucleo_i: Vec<String>,
    #[serde(default, deserialize_with = "text_or_null")]
    pub diretrizes_nucleo_ii: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub descricao_extensao: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub local_realizacao: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub etapa_estagio: String,
    /// Input-only flag: the submitter declared group membership, so `bloco`
    /// must be filled in.
    #[serde(default, skip_serializing)]
    pub faz_parte_bloco: bool,
    #[serde(default, deserialize_with = "text_or_null")]
    pub bloco: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub observacoes: String,
}

fn text_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn list_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, `0` and `"global"` all mean "not tied to a period".
fn semester_or_global<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Number(0)) => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("global") {
                Ok(None)
            } else {
                trimmed
                    .parse::<u32>()
                    .map(|n| (n != 0).then_some(n))
                    .map_err(|_| serde::de::Error::custom(format!("semestre inválido: {}", s)))
            }
        }
    }
}

// =============================================================================
// COMPONENT (typed record)
// =============================================================================

/// A curricular component held in the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredComponent", into = "StoredComponent")]
pub struct Component {
    pub id: ComponentId,
    /// `None` for components not tied to a period (e.g. TCC, global extension).
    pub semestre: Option<Semester>,
    pub nome: String,
    pub tipo: ComponentKind,
    /// Present only for `Disciplina`.
    pub aulas_semanais: Option<u32>,
    pub ch_total: Hours,
    pub ch_teorica: Hours,
    pub ch_pratica: Hours,
    pub ch_extensao: Hours,
    pub details: NucleusDetails,
    pub bloco: Option<String>,
    pub observacoes: Option<String>,
}

impl Component {
    /// The nucleus this component belongs to.
    #[must_use]
    pub const fn nucleo(&self) -> Nucleus {
        self.details.nucleus()
    }

    /// Type a draft.
    ///
    /// Fails only on values that have no typed form: unknown `tipo` or `nucleo`,
    /// semester out of range, negative weekly classes, or a declared group with
    /// an empty label. Rule violations are the validator's concern.
    pub fn from_draft(id: ComponentId, draft: &ComponentDraft) -> Result<Self, PpcError> {
        let tipo: ComponentKind = draft.tipo.parse()?;
        let nucleo: Nucleus = draft.nucleo.parse()?;
        let semestre = draft.semestre.map(Semester::new).transpose()?;

        let aulas_semanais = if tipo == ComponentKind::Disciplina {
            draft
                .aulas_semanais
                .map(|n| {
                    u32::try_from(n).map_err(|_| PpcError::InvalidField {
                        field: "aulas_semanais",
                        reason: format!("{} não é um número de aulas válido", n),
                    })
                })
                .transpose()?
        } else {
            None
        };

        if draft.faz_parte_bloco && draft.bloco.trim().is_empty() {
            return Err(PpcError::InvalidField {
                field: "bloco",
                reason: "componente marcado como parte de um bloco sem nome do bloco".to_string(),
            });
        }

        Ok(Self {
            id,
            semestre,
            nome: draft.nome.clone(),
            tipo,
            aulas_semanais,
            ch_total: draft.ch_total,
            ch_teorica: draft.ch_teorica,
            ch_pratica: draft.ch_pratica,
            ch_extensao: draft.ch_extensao,
            details: NucleusDetails::from_draft(nucleo, draft),
            // Free text is kept verbatim; only an absent value maps to `None`.
            bloco: (!draft.bloco.is_empty()).then(|| draft.bloco.clone()),
            observacoes: (!draft.observacoes.is_empty()).then(|| draft.observacoes.clone()),
        })
    }

    /// The flat draft view of this component (used for re-validation and the wire format).
    #[must_use]
    pub fn to_draft(&self) -> ComponentDraft {
        let mut draft = ComponentDraft {
            semestre: self.semestre.map(|s| u32::from(s.get())),
            nome: self.nome.clone(),
            tipo: self.tipo.label().to_string(),
            aulas_semanais: self.aulas_semanais.map(i64::from),
            ch_total: self.ch_total,
            ch_teorica: self.ch_teorica,
            ch_pratica: self.ch_pratica,
            ch_extensao: self.ch_extensao,
            nucleo: self.nucleo().label().to_string(),
            faz_parte_bloco: self.bloco.as_deref().is_some_and(|b| !b.trim().is_empty()),
            bloco: self.bloco.clone().unwrap_or_default(),
            observacoes: self.observacoes.clone().unwrap_or_default(),
            ..ComponentDraft::default()
        };

        match &self.details {
            NucleusDetails::I { temas_nucleo_i } => draft.temas_nucleo_i = temas_nucleo_i.clone(),
            NucleusDetails::II {
                diretrizes_nucleo_ii,
            } => draft.diretrizes_nucleo_ii = diretrizes_nucleo_ii.clone(),
            NucleusDetails::III { descricao_extensao } => {
                draft.descricao_extensao = descricao_extensao.clone();
            }
            NucleusDetails::IV {
                local_realizacao,
                etapa_estagio,
            } => {
                draft.local_realizacao = local_realizacao.clone();
                draft.etapa_estagio = etapa_estagio.clone();
            }
        }

        draft
    }
}

/// Wire shape of a stored component.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredComponent {
    id: u64,
    #[serde(flatten)]
    draft: ComponentDraft,
}

impl TryFrom<StoredComponent> for Component {
    type Error = PpcError;

    fn try_from(stored: StoredComponent) -> Result<Self, Self::Error> {
        Component::from_draft(ComponentId(stored.id), &stored.draft)
    }
}

impl From<Component> for StoredComponent {
    fn from(component: Component) -> Self {
        Self {
            id: component.id.0,
            draft: component.to_draft(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
