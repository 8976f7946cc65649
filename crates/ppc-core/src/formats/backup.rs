//! # Backup Format
//!
//! JSON interchange of the working set:
//!
//! ```json
//! {
//!   "componentes": [ { "id": 1, "nome": "...", ... } ],
//!   "ultimo_id": 1,
//!   "data_backup": "2025-03-01 14:30:00",
//!   "versao": "1.0"
//! }
//! ```
//!
//! `data_backup` and `versao` are optional on import. A payload is accepted
//! whole or not at all: parsing never yields a partial working set.
//!
//! ## Limits
//!
//! The payload size is checked before any parsing (`MAX_BACKUP_SIZE`).

use crate::{Component, ComponentId, PpcError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Version tag written into new backups.
pub const BACKUP_VERSION: &str = "1.0";

/// Largest accepted backup payload (16 MB).
pub const MAX_BACKUP_SIZE: usize = 16 * 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const MISSING_KEYS: &str =
    "Formato de arquivo inválido. O arquivo deve conter 'componentes' e 'ultimo_id'.";
const COMPONENTS_NOT_A_LIST: &str = "Formato inválido: 'componentes' deve ser uma lista.";
const LAST_ID_NOT_A_NUMBER: &str = "Formato inválido: 'ultimo_id' deve ser um número.";

/// A full snapshot of the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backup {
    pub componentes: Vec<Component>,
    pub ultimo_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_backup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versao: Option<String>,
}

impl Backup {
    /// Build a backup stamped with the current format version.
    #[must_use]
    pub fn new(componentes: Vec<Component>, ultimo_id: u64, data_backup: String) -> Self {
        Self {
            componentes,
            ultimo_id,
            data_backup: Some(data_backup),
            versao: Some(BACKUP_VERSION.to_string()),
        }
    }

    /// Confirmation shown after a successful restore.
    #[must_use]
    pub fn restored_message(&self) -> String {
        format!(
            "Backup restaurado com sucesso! {} componente(s) carregado(s).",
            self.componentes.len()
        )
    }
}

fn invalid(message: impl Into<String>) -> PpcError {
    PpcError::InvalidBackup(message.into())
}

/// 2^64: the smallest float that no longer fits in a `u64` counter.
const LAST_ID_FLOAT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn parse_last_id(value: &Value) -> Result<u64, PpcError> {
    let Value::Number(number) = value else {
        return Err(invalid(LAST_ID_NOT_A_NUMBER));
    };
    if let Some(id) = number.as_u64() {
        return Ok(id);
    }
    match number.as_f64() {
        // Fractional counters are truncated.
        Some(raw) if raw.is_finite() && !raw.is_sign_negative() && raw < LAST_ID_FLOAT_LIMIT => {
            Ok(raw as u64)
        }
        Some(raw) if raw.is_finite() && !raw.is_sign_negative() => Err(invalid(
            "Formato inválido: 'ultimo_id' excede o maior id suportado.",
        )),
        _ => Err(invalid(
            "Formato inválido: 'ultimo_id' deve ser um número não negativo.",
        )),
    }
}

fn optional_text(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Parse and check a backup payload.
///
/// Rejects invalid JSON, missing keys, a non-list `componentes`, a negative or
/// non-numeric `ultimo_id`, any component that does not decode, and duplicate
/// ids. The returned counter is never lower than the highest restored id.
pub fn parse_backup(bytes: &[u8]) -> Result<Backup, PpcError> {
    if bytes.len() > MAX_BACKUP_SIZE {
        return Err(invalid(format!(
            "Arquivo de backup excede o tamanho máximo de {} bytes.",
            MAX_BACKUP_SIZE
        )));
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| invalid(format!("Erro ao ler arquivo JSON: {}", e)))?;
    let Value::Object(object) = root else {
        return Err(invalid(MISSING_KEYS));
    };

    let (Some(raw_components), Some(raw_last_id)) =
        (object.get("componentes"), object.get("ultimo_id"))
    else {
        return Err(invalid(MISSING_KEYS));
    };

    let Value::Array(items) = raw_components else {
        return Err(invalid(COMPONENTS_NOT_A_LIST));
    };
    let declared_last_id = parse_last_id(raw_last_id)?;

    let mut componentes = Vec::with_capacity(items.len());
    let mut seen: BTreeSet<ComponentId> = BTreeSet::new();
    for (i, item) in items.iter().enumerate() {
        let component = Component::deserialize(item).map_err(|e| {
            invalid(format!(
                "Erro ao importar backup: componente {}: {}",
                i.saturating_add(1),
                e
            ))
        })?;
        if !seen.insert(component.id) {
            return Err(invalid(format!(
                "Erro ao importar backup: id {} duplicado.",
                component.id
            )));
        }
        componentes.push(component);
    }

    let highest = seen.last().map_or(0, |id| id.0);

    Ok(Backup {
        componentes,
        ultimo_id: declared_last_id.max(highest),
        data_backup: optional_text(&object, "data_backup"),
        versao: optional_text(&object, "versao"),
    })
}

/// Pretty-print a backup. Non-ASCII text is written as-is.
pub fn backup_to_json(backup: &Backup) -> Result<String, PpcError> {
    serde_json::to_string_pretty(backup).map_err(|e| PpcError::SerializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
