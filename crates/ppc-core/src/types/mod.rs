//! # Core Type Definitions
//!
//! This module contains the scalar types of the PPC engine:
//! - Identifiers (`ComponentId`)
//! - Fixed-point quantities (`Hours`, `Percentage`)
//! - Closed vocabularies (`ComponentKind`, `Nucleus`, `Semester`)
//! - Error types (`PpcError`)
//!
//! ## Determinism Guarantees
//!
//! - Hours are stored as hundredths of an hour (`u64`), percentages as
//!   hundredths of a percent. Sums, comparisons and ratios are integer-only.
//! - Float conversion happens only at the JSON boundary and rounds to two
//!   decimal places.
//! - Counters use saturating arithmetic.

use crate::validate::Violation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of a component in the working set.
///
/// Assigned sequentially by the store and never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// HOURS (fixed-point)
// =============================================================================

/// A non-negative amount of hours ("carga horária"), in hundredths of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hours(u64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Hours = Hours(0);

    /// Build from a whole number of hours.
    #[must_use]
    pub const fn from_whole(hours: u64) -> Self {
        Self(hours.saturating_mul(100))
    }

    /// Build from a raw count of hundredths of an hour.
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Raw value in hundredths of an hour.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// Check whether this amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Hours) -> Hours {
        Hours(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction (never below zero).
    #[must_use]
    pub const fn saturating_sub(self, other: Hours) -> Hours {
        Hours(self.0.saturating_sub(other.0))
    }

    /// Convert a JSON number into hours, rounding to two decimals.
    ///
    /// Rejects negative, NaN and infinite values.
    #[allow(clippy::float_arithmetic)]
    pub fn from_f64(value: f64) -> Result<Self, PpcError> {
        if !value.is_finite() || value < 0.0 {
            return Err(PpcError::InvalidHours(value.to_string()));
        }
        let scaled = (value * 100.0).round();
        if scaled >= u64::MAX as f64 {
            return Err(PpcError::InvalidHours(value.to_string()));
        }
        Ok(Self(scaled as u64))
    }

    /// Convert to a float for JSON output.
    #[allow(clippy::float_arithmetic)]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Self {
        iter.fold(Hours::ZERO, Hours::saturating_add)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}h", whole)
        } else {
            write!(f, "{}.{:02}h", whole, frac)
        }
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Hours {
    /// `null` decodes as zero, matching records written with missing sub-splits.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
        Hours::from_f64(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// PERCENTAGE (fixed-point)
// =============================================================================

/// A percentage in hundredths of a percent (1000 = 10.00%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(u64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Percentage = Percentage(0);

    /// Build from a whole percent value.
    #[must_use]
    pub const fn from_whole(percent: u64) -> Self {
        Self(percent.saturating_mul(100))
    }

    /// Build from hundredths of a percent.
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Raw value in hundredths of a percent.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// `part / whole * 100`, truncated to two decimals.
    ///
    /// Zero when `whole` is zero.
    #[must_use]
    pub fn of(part: Hours, whole: Hours) -> Self {
        if whole.is_zero() {
            return Self::ZERO;
        }
        let ratio = u128::from(part.hundredths()) * 10_000 / u128::from(whole.hundredths());
        Self(u64::try_from(ratio).unwrap_or(u64::MAX))
    }

    /// Saturating subtraction (never below zero).
    #[must_use]
    pub const fn saturating_sub(self, other: Percentage) -> Percentage {
        Percentage(self.0.saturating_sub(other.0))
    }

    /// Convert a JSON number into a percentage, rounding to two decimals.
    #[allow(clippy::float_arithmetic)]
    pub fn from_f64(value: f64) -> Result<Self, PpcError> {
        if !value.is_finite() || value < 0.0 {
            return Err(PpcError::InvalidHours(value.to_string()));
        }
        Ok(Self((value * 100.0).round() as u64))
    }

    /// Convert to a float for JSON output.
    #[allow(clippy::float_arithmetic)]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Percentage::from_f64(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// SEMESTER
// =============================================================================

/// An academic period, 1 through 20.
///
/// Components not tied to a period are represented as `Option::<Semester>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Semester(u8);

impl Semester {
    /// Build a semester, rejecting values outside `1..=MAX_SEMESTER`.
    pub fn new(value: u32) -> Result<Self, PpcError> {
        match u8::try_from(value) {
            Ok(v) if (1..=crate::rules::MAX_SEMESTER).contains(&v) => Ok(Self(v)),
            _ => Err(PpcError::InvalidField {
                field: "semestre",
                reason: format!(
                    "{} fora do intervalo 1..={}",
                    value,
                    crate::rules::MAX_SEMESTER
                ),
            }),
        }
    }

    /// The period number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Semester::new(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// COMPONENT KIND
// =============================================================================

/// The closed set of component types ("tipo").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "Disciplina")]
    Disciplina,
    #[serde(rename = "Módulo")]
    Modulo,
    #[serde(rename = "Bloco")]
    Bloco,
    #[serde(rename = "Estágio")]
    Estagio,
    #[serde(rename = "TCC")]
    Tcc,
    #[serde(rename = "Extensão")]
    Extensao,
    #[serde(rename = "Outro")]
    Outro,
}

impl ComponentKind {
    /// Every kind, in display order.
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Disciplina,
        ComponentKind::Modulo,
        ComponentKind::Bloco,
        ComponentKind::Estagio,
        ComponentKind::Tcc,
        ComponentKind::Extensao,
        ComponentKind::Outro,
    ];

    /// The wire label, e.g. `"Estágio"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ComponentKind::Disciplina => "Disciplina",
            ComponentKind::Modulo => "Módulo",
            ComponentKind::Bloco => "Bloco",
            ComponentKind::Estagio => "Estágio",
            ComponentKind::Tcc => "TCC",
            ComponentKind::Extensao => "Extensão",
            ComponentKind::Outro => "Outro",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentKind {
    type Err = PpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == trimmed)
            .ok_or_else(|| PpcError::InvalidField {
                field: "tipo",
                reason: format!("tipo desconhecido: {}", trimmed),
            })
    }
}

// =============================================================================
// NUCLEUS
// =============================================================================

/// One of the four mandated curriculum groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nucleus {
    I,
    II,
    III,
    IV,
}

impl Nucleus {
    /// Every nucleus, in regulatory order.
    pub const ALL: [Nucleus; 4] = [Nucleus::I, Nucleus::II, Nucleus::III, Nucleus::IV];

    /// The roman-numeral label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Nucleus::I => "I",
            Nucleus::II => "II",
            Nucleus::III => "III",
            Nucleus::IV => "IV",
        }
    }

    /// Position in `Nucleus::ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Nucleus::I => 0,
            Nucleus::II => 1,
            Nucleus::III => 2,
            Nucleus::IV => 3,
        }
    }

    /// The regulatory title of the nucleus.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Nucleus::I => "Formação Pedagógica",
            Nucleus::II => "Formação Específica da Área",
            Nucleus::III => "Atividades de Extensão",
            Nucleus::IV => "Estágios Supervisionados",
        }
    }
}

impl fmt::Display for Nucleus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Nucleus {
    type Err = PpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|n| n.label() == trimmed)
            .ok_or_else(|| PpcError::InvalidField {
                field: "nucleo",
                reason: format!("núcleo desconhecido: {}", trimmed),
            })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the PPC engine.
///
/// - No silent failures
/// - Use `Result<T, PpcError>` for fallible operations
/// - The engine never panics; aggregate non-conformity is a report, not an error
#[derive(Debug, Error)]
pub enum PpcError {
    /// The component failed validation and was not inserted.
    #[error("Componente rejeitado: {}", join_violations(.0))]
    Rejected(Vec<Violation>),

    /// A field could not be decoded into its typed form.
    #[error("Campo inválido '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// An hour or percentage value was negative or not a number.
    #[error("Carga horária inválida: {0}")]
    InvalidHours(String),

    /// The backup payload is malformed or incomplete.
    #[error("{0}")]
    InvalidBackup(String),

    /// The requested component is not in the working set.
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// TESTS
// =============================================================================
