//! # Working-Set File
//!
//! Loads and saves the `CurriculumStore` as a backup file between CLI
//! invocations and server runs. The file format is the core backup format.

use ppc_core::{CurriculumStore, PpcError, backup_to_json, formats::MAX_BACKUP_SIZE, parse_backup};
use std::path::{Path, PathBuf};

/// Timestamp written into `data_backup`.
#[must_use]
pub fn backup_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// =============================================================================
// PATH & SIZE CHECKS
// =============================================================================

/// Validate file size before reading.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), PpcError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PpcError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(PpcError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path: canonicalized, existing, and a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, PpcError> {
    let canonical = path.canonicalize().map_err(|e| {
        PpcError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(PpcError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: its parent directory must exist.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, PpcError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        PpcError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(PpcError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| PpcError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Read and parse a backup file into a store.
pub fn read_backup_file(path: &Path) -> Result<CurriculumStore, PpcError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_BACKUP_SIZE as u64)?;

    let data = std::fs::read(&validated)
        .map_err(|e| PpcError::IoError(format!("Read file: {}", e)))?;
    let backup = parse_backup(&data)?;
    Ok(CurriculumStore::from_backup(backup))
}

/// Load the working set, or start empty when the file does not exist yet.
pub fn load_or_create_store(path: &Path) -> Result<CurriculumStore, PpcError> {
    if path.exists() {
        let store = read_backup_file(path)?;
        tracing::debug!(
            path = %path.display(),
            components = store.len(),
            last_id = store.last_id(),
            "Loaded working set"
        );
        Ok(store)
    } else {
        Ok(CurriculumStore::new())
    }
}

/// Write the working set as a timestamped backup.
pub fn save_store(store: &CurriculumStore, path: &Path) -> Result<(), PpcError> {
    let json = backup_to_json(&store.to_backup(backup_timestamp()))?;
    std::fs::write(path, json.as_bytes())
        .map_err(|e| PpcError::IoError(format!("Write file: {}", e)))?;
    tracing::debug!(path = %path.display(), components = store.len(), "Saved working set");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ppc_core::{ComponentDraft, ComponentId, Hours};

    fn module() -> ComponentDraft {
        ComponentDraft {
            semestre: Some(2),
            nome: "Genética".to_string(),
            tipo: "Módulo".to_string(),
            nucleo: "II".to_string(),
            diretrizes_nucleo_ii: "DCN".to_string(),
            ch_total: Hours::from_whole(60),
            ..ComponentDraft::default()
        }
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = load_or_create_store(&dir.path().join("novo.json")).expect("load");
        assert!(store.is_empty());
        assert_eq!(store.last_id(), 0);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("curriculo.json");

        let mut store = CurriculumStore::new();
        store.insert(module()).expect("insert");
        store.insert(module()).expect("insert");
        store.remove(ComponentId(1));
        save_store(&store, &path).expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"data_backup\""));
        assert!(text.contains("Genética"));

        let loaded = load_or_create_store(&path).expect("load");
        assert_eq!(loaded, store);
        assert_eq!(loaded.last_id(), 2);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("curriculo.json");
        std::fs::write(&path, b"{\"componentes\": 1}").expect("write");
        assert!(load_or_create_store(&path).is_err());
    }

    #[test]
    fn output_path_requires_existing_parent() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(validate_output_path(&dir.path().join("out.csv")).is_ok());
        assert!(validate_output_path(&dir.path().join("missing").join("out.csv")).is_err());
    }

    #[test]
    fn timestamp_shape() {
        let stamp = backup_timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
    }
}
