//! # Curriculum Store
//!
//! The working set of one editing session: the component list plus the id
//! counter.
//!
//! The store is an explicit value owned by the host app. It gates insertion
//! with the component validator and hands out immutable snapshots to the
//! aggregation, validation and view functions.
//!
//! ## Identifier policy
//!
//! - Ids are assigned as `last_id + 1` on insertion
//! - Removal never lowers the counter, so ids are never reused
//! - A restore replaces components and counter together

use crate::aggregate::total_hours;
use crate::curriculum::{CurriculumReport, validate_curriculum};
use crate::formats::Backup;
use crate::validate::validate_component;
use crate::{Component, ComponentDraft, ComponentId, ComponentKind, PpcError};

/// The working set: components in insertion order and the last assigned id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurriculumStore {
    components: Vec<Component>,
    last_id: u64,
}

impl CurriculumStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the contents of a backup.
    #[must_use]
    pub fn from_backup(backup: Backup) -> Self {
        let mut store = Self::new();
        store.restore(backup);
        store
    }

    /// Validate and insert a draft, returning its new id.
    ///
    /// For `Disciplina` the total is derived from the weekly classes before
    /// validation. On any violation the store is left untouched and every
    /// violation is returned in `PpcError::Rejected`.
    pub fn insert(&mut self, mut draft: ComponentDraft) -> Result<ComponentId, PpcError> {
        if let Ok(kind @ ComponentKind::Disciplina) = draft.tipo.parse::<ComponentKind>() {
            let weekly = draft
                .aulas_semanais
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            draft.ch_total = total_hours(kind, weekly, draft.ch_total);
        }

        validate_component(&draft).into_result()?;

        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| PpcError::InvalidField {
                field: "id",
                reason: format!("contador de ids esgotado em {}", self.last_id),
            })?;
        let id = ComponentId(next);
        let component = Component::from_draft(id, &draft)?;
        self.components.push(component);
        self.last_id = id.0;
        Ok(id)
    }

    /// Remove a component by id. A missing id is a no-op returning `None`.
    pub fn remove(&mut self, id: ComponentId) -> Option<Component> {
        let position = self.components.iter().position(|c| c.id == id)?;
        Some(self.components.remove(position))
    }

    /// Immutable snapshot in insertion order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The last id handed out (0 before the first insertion).
    #[must_use]
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Snapshot the working set as a backup stamped with `timestamp`.
    #[must_use]
    pub fn to_backup(&self, timestamp: impl Into<String>) -> Backup {
        Backup::new(self.components.clone(), self.last_id, timestamp.into())
    }

    /// Replace the whole working set with a backup. Returns the number of
    /// components loaded.
    ///
    /// The counter is raised to the highest restored id when the backup
    /// declares a lower one.
    pub fn restore(&mut self, backup: Backup) -> usize {
        let highest = backup.componentes.iter().map(|c| c.id.0).max().unwrap_or(0);
        self.last_id = backup.ultimo_id.max(highest);
        self.components = backup.componentes;
        self.components.len()
    }

    /// Curriculum validation of the current snapshot.
    #[must_use]
    pub fn report(&self) -> CurriculumReport {
        validate_curriculum(&self.components)
    }
}

// =============================================================================
// TESTS
// =============================================================================
