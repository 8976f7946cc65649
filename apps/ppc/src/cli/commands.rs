//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::Outcome;
use crate::{
    api::{self, RulesResponse},
    config::AppConfig,
    datafile::{
        backup_timestamp, load_or_create_store, save_store, validate_file_path,
        validate_file_size, validate_output_path,
    },
    export::render_sigaa_csv,
};
use ppc_core::{
    ComponentDraft, ComponentId, ConformityDashboard, CurriculumStore, Nucleus, PpcError,
    backup_to_json,
    formats::MAX_BACKUP_SIZE,
    parse_backup, period_matrix, rules, semester_nucleus_summary,
    views::{MATRIX_COLUMNS, SUMMARY_COLUMNS},
};
use serde::Serialize;
use std::path::Path;

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print rows under left-aligned headers, columns padded to their widest cell.
fn print_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    print_row(headers.into_iter(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));
    for row in rows {
        print_row(row.iter().map(String::as_str), &widths);
    }
}

fn print_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    println!("{}", line.join("  ").trim_end());
}

fn write_output(path: &Path, contents: &str) -> Result<(), PpcError> {
    let validated = validate_output_path(path)?;
    std::fs::write(&validated, contents.as_bytes())
        .map_err(|e| PpcError::IoError(format!("Write file: {}", e)))
}

fn read_input(path: &Path) -> Result<Vec<u8>, PpcError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_BACKUP_SIZE as u64)?;
    std::fs::read(&validated).map_err(|e| PpcError::IoError(format!("Read file: {}", e)))
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write an empty working set.
pub fn cmd_init(data: &Path, force: bool) -> Result<(), PpcError> {
    if data.exists() && !force {
        return Err(PpcError::IoError(format!(
            "Data file '{}' already exists (use --force to overwrite)",
            data.display()
        )));
    }

    save_store(&CurriculumStore::new(), data)?;
    tracing::info!(path = %data.display(), "Initialized empty working set");
    println!("Initialized empty working set at {}", data.display());
    Ok(())
}

// =============================================================================
// COMPONENT COMMANDS
// =============================================================================

/// Validate a draft from a JSON file and insert it.
pub fn cmd_add(data: &Path, json_mode: bool, file: &Path) -> Result<(), PpcError> {
    let contents = read_input(file)?;
    let draft: ComponentDraft = serde_json::from_slice(&contents)
        .map_err(|e| PpcError::SerializationError(format!("Draft: {}", e)))?;
    let nome = draft.nome.clone();

    let mut store = load_or_create_store(data)?;
    match store.insert(draft) {
        Ok(id) => {
            save_store(&store, data)?;
            tracing::info!(id = id.0, nome = %nome, "Component inserted");
            if json_mode {
                print_json(&api::CreateComponentResponse::success(id));
            } else {
                println!("Componente adicionado com sucesso! (id {})", id);
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!(nome = %nome, "Component rejected");
            if let PpcError::Rejected(violations) = &e {
                let errors: Vec<String> = violations.iter().map(ToString::to_string).collect();
                if json_mode {
                    print_json(&api::CreateComponentResponse::rejected(errors));
                } else {
                    for error in &errors {
                        println!("✗ {}", error);
                    }
                }
            }
            Err(e)
        }
    }
}

/// Remove a component by id. A missing id only prints a notice.
pub fn cmd_remove(data: &Path, json_mode: bool, id: u64) -> Result<(), PpcError> {
    let mut store = load_or_create_store(data)?;
    let removed = store.remove(ComponentId(id));

    if let Some(component) = &removed {
        save_store(&store, data)?;
        tracing::info!(id, nome = %component.nome, "Component removed");
    }

    if json_mode {
        print_json(&api::RemoveComponentResponse {
            success: removed.is_some(),
            id,
            removed: removed.map(|c| c.nome),
        });
    } else {
        match removed {
            Some(component) => println!("Componente removido: {} ({})", id, component.nome),
            None => println!("Nenhum componente com id {}; nada foi removido", id),
        }
    }
    Ok(())
}

/// List the working set.
pub fn cmd_list(data: &Path, json_mode: bool) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;

    if json_mode {
        print_json(&api::ComponentListResponse {
            count: store.len(),
            ultimo_id: store.last_id(),
            componentes: store.components().to_vec(),
        });
        return Ok(());
    }

    if store.is_empty() {
        println!("Nenhum componente cadastrado.");
        return Ok(());
    }

    let rows: Vec<[String; 6]> = store
        .components()
        .iter()
        .map(|c| {
            [
                c.id.to_string(),
                ppc_core::views::period_label(c.semestre),
                c.nome.clone(),
                c.tipo.label().to_string(),
                c.ch_total.to_string(),
                c.nucleo().label().to_string(),
            ]
        })
        .collect();
    print_table(["ID", "Semestre", "Nome", "Tipo", "CH Total", "Núcleo"], &rows);
    println!();
    println!("{} componente(s), último id {}", store.len(), store.last_id());
    Ok(())
}

// =============================================================================
// CONFORMITY COMMANDS
// =============================================================================

/// Print the conformity dashboard.
pub fn cmd_summary(data: &Path, json_mode: bool) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;
    let dashboard = ConformityDashboard::from_components(store.components());

    if json_mode {
        print_json(&dashboard);
        return Ok(());
    }

    println!("Resumo de Conformidade");
    println!("======================");
    println!("Componentes: {}", dashboard.component_count);
    println!();
    println!("Carga horária total: {}", dashboard.ch_total_mensagem);
    for status in &dashboard.nucleos {
        println!(
            "Núcleo {} ({}): {}",
            status.nucleus.label(),
            status.title,
            status.mensagem
        );
    }
    println!();
    println!("CH Teórica:  {}", dashboard.ch_teorica);
    println!("CH Prática:  {} ({})", dashboard.ch_pratica, dashboard.percentual_pratica);
    println!(
        "CH Extensão: {} ({}, mínimo {}) {}",
        dashboard.ch_extensao,
        dashboard.percentual_extensao,
        dashboard.percentual_extensao_minimo,
        if dashboard.extensao_conforme { "✓" } else { "✗" }
    );
    println!();
    if dashboard.is_conformant() {
        println!("✓ Curso conforme à Res. CNE/CP nº 4/2024");
    } else {
        println!("✗ {} pendência(s) de conformidade", dashboard.issue_count);
    }
    Ok(())
}

/// Validate the whole curriculum.
pub fn cmd_validate(data: &Path, json_mode: bool) -> Result<Outcome, PpcError> {
    let store = load_or_create_store(data)?;
    let report = store.report();
    let summary = report.summary();

    if json_mode {
        print_json(&summary);
    } else if summary.valido {
        println!("✓ Curso conforme à Res. CNE/CP nº 4/2024");
    } else {
        println!("✗ Curso não conforme ({} erro(s)):", summary.erros.len());
        for erro in &summary.erros {
            println!("  - {}", erro);
        }
    }

    if report.is_valid() {
        Ok(Outcome::Done)
    } else {
        tracing::warn!(issues = report.issues.len(), "Curriculum is not conformant");
        Ok(Outcome::NonConformant)
    }
}

// =============================================================================
// REPORT COMMANDS
// =============================================================================

/// Print the period matrix.
pub fn cmd_matrix(data: &Path, json_mode: bool) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;
    let matrix = period_matrix(store.components());

    if json_mode {
        print_json(&matrix);
        return Ok(());
    }

    let rows: Vec<[String; 9]> = matrix.iter().map(|row| row.cells()).collect();
    print_table(MATRIX_COLUMNS, &rows);
    Ok(())
}

/// Print hours per semester and nucleus.
pub fn cmd_by_nucleus(data: &Path, json_mode: bool) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;
    let summary = semester_nucleus_summary(store.components());

    if json_mode {
        print_json(&summary);
        return Ok(());
    }

    let rows: Vec<[String; 6]> = summary
        .iter()
        .map(|row| {
            [
                row.semestre.clone(),
                row.hours(Nucleus::I).to_string(),
                row.hours(Nucleus::II).to_string(),
                row.hours(Nucleus::III).to_string(),
                row.hours(Nucleus::IV).to_string(),
                row.total.to_string(),
            ]
        })
        .collect();
    print_table(SUMMARY_COLUMNS, &rows);
    Ok(())
}

// =============================================================================
// EXPORT & BACKUP COMMANDS
// =============================================================================

/// Write the SIGAA CSV sheet.
pub fn cmd_export(data: &Path, output: &Path) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;
    write_output(output, &render_sigaa_csv(store.components()))?;
    tracing::info!(path = %output.display(), components = store.len(), "Exported SIGAA sheet");
    println!("Planilha SIGAA exportada para {}", output.display());
    Ok(())
}

/// Write a timestamped backup of the working set.
pub fn cmd_backup(data: &Path, output: &Path) -> Result<(), PpcError> {
    let store = load_or_create_store(data)?;
    let json = backup_to_json(&store.to_backup(backup_timestamp()))?;
    write_output(output, &json)?;
    tracing::info!(path = %output.display(), components = store.len(), "Backup written");
    println!("Backup salvo em {}", output.display());
    Ok(())
}

/// Replace the working set with a backup file.
///
/// The data file is only rewritten once the backup parsed cleanly.
pub fn cmd_restore(data: &Path, json_mode: bool, input: &Path) -> Result<(), PpcError> {
    let backup = parse_backup(&read_input(input)?)?;
    let message = backup.restored_message();
    let store = CurriculumStore::from_backup(backup);
    save_store(&store, data)?;
    tracing::info!(count = store.len(), last_id = store.last_id(), "Working set restored");

    if json_mode {
        print_json(&api::RestoreResponse {
            success: true,
            message,
            count: store.len(),
            ultimo_id: store.last_id(),
        });
    } else {
        println!("{}", message);
    }
    Ok(())
}

// =============================================================================
// RULES COMMAND
// =============================================================================

/// Print the regulatory rubric.
pub fn cmd_rules(json_mode: bool) -> Result<(), PpcError> {
    if json_mode {
        print_json(&RulesResponse::default());
        return Ok(());
    }

    println!("Res. CNE/CP nº 4/2024");
    println!("=====================");
    println!("Carga horária mínima do curso: {}", rules::COURSE_MINIMUM_HOURS);
    println!("Extensão mínima: {}", rules::EXTENSION_MINIMUM_PERCENT);
    println!("Estágio mínimo: {}", rules::INTERNSHIP_MINIMUM_HOURS);
    println!(
        "Disciplinas: {}h por aula semanal; semestres 1 a {}",
        rules::HOURS_PER_WEEKLY_CLASS,
        rules::MAX_SEMESTER
    );
    println!();
    for nucleus in Nucleus::ALL {
        println!(
            "Núcleo {} - {}: mínimo {}",
            nucleus.label(),
            nucleus.title(),
            rules::nucleus_minimum(nucleus)
        );
    }
    println!();
    println!("Temas do Art. 13 (Núcleo I):");
    for theme in rules::ART13_THEMES {
        println!("  {}", theme);
    }
    println!();
    println!("Etapas de estágio: {}", rules::INTERNSHIP_STAGES.join(", "));
    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server on the working set.
pub async fn cmd_serve(config: &AppConfig) -> Result<(), PpcError> {
    let store = load_or_create_store(&config.data_file)?;

    println!("PPC Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!("  Data file:  {}", config.data_file.display());
    println!("  Components: {}", store.len());
    println!();
    println!("Endpoints:");
    println!("  GET    /components      - List components");
    println!("  POST   /components      - Add a component");
    println!("  DELETE /components/{{id}} - Remove a component");
    println!("  GET    /summary         - Conformity dashboard");
    println!("  GET    /validation      - Curriculum report");
    println!("  GET    /export/csv      - SIGAA sheet");
    println!("  GET    /health          - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config, store).await
}

// =============================================================================
// TESTS
// =============================================================================
