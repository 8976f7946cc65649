//! # Conformity Tier Tests (T0-T4)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Component Records
//! - T1: Aggregation
//! - T2: Component Validator
//! - T3: Curriculum Validator
//! - T4: Store & Backup

use ppc_core::{
    Component, ComponentDraft, ComponentId, ComponentKind, CurriculumStore, Hours, Nucleus,
    Percentage, PpcError, Violation,
};

// =============================================================================
// FIXTURES
// =============================================================================

fn draft(nome: &str, tipo: &str, nucleo: &str, total: u64) -> ComponentDraft {
    ComponentDraft {
        semestre: Some(1),
        nome: nome.to_string(),
        tipo: tipo.to_string(),
        nucleo: nucleo.to_string(),
        ch_total: Hours::from_whole(total),
        ..ComponentDraft::default()
    }
}

fn nucleus_i(nome: &str, total: u64) -> ComponentDraft {
    ComponentDraft {
        temas_nucleo_i: vec![ppc_core::rules::ART13_THEMES[0].to_string()],
        ch_teorica: Hours::from_whole(total),
        ..draft(nome, "Módulo", "I", total)
    }
}

fn nucleus_ii(nome: &str, total: u64) -> ComponentDraft {
    ComponentDraft {
        diretrizes_nucleo_ii: "DCN de Ciências Biológicas".to_string(),
        ..draft(nome, "Módulo", "II", total)
    }
}

fn nucleus_iii(nome: &str, total: u64) -> ComponentDraft {
    ComponentDraft {
        semestre: None,
        descricao_extensao: "Projeto Ciência na Escola".to_string(),
        ch_extensao: Hours::from_whole(total),
        ..draft(nome, "Extensão", "III", total)
    }
}

fn nucleus_iv(nome: &str, total: u64) -> ComponentDraft {
    ComponentDraft {
        local_realizacao: "Escola X".to_string(),
        etapa_estagio: "Observação".to_string(),
        ch_pratica: Hours::from_whole(total),
        ..draft(nome, "Estágio", "IV", total)
    }
}

/// A curriculum that meets every minimum exactly.
fn conformant_store() -> CurriculumStore {
    let mut store = CurriculumStore::new();
    for d in [
        nucleus_i("Fundamentos da Educação", 880),
        nucleus_ii("Biologia Celular", 1600),
        nucleus_iii("Extensão Comunitária", 320),
        nucleus_iv("Estágio Supervisionado", 400),
    ] {
        store.insert(d).expect("insert");
    }
    store
}

// =============================================================================
// TIER T0: COMPONENT RECORDS
// =============================================================================

mod t0_records {
    use super::*;

    /// T0.1: Typed components carry only their own nucleus payload.
    #[test]
    fn typed_component_derives_nucleus_from_details() {
        let component =
            Component::from_draft(ComponentId(1), &nucleus_iv("Estágio", 400)).expect("typed");
        assert_eq!(component.nucleo(), Nucleus::IV);
        assert_eq!(component.tipo, ComponentKind::Estagio);
    }

    /// T0.2: The wire format decodes the records written by earlier versions.
    #[test]
    fn legacy_record_decodes() {
        let json = r#"{
            "id": 3,
            "semestre": 2,
            "nome": "Didática Geral",
            "tipo": "Disciplina",
            "aulas_semanais": 4,
            "ch_total": 72,
            "ch_teorica": 54,
            "ch_pratica": 18,
            "ch_extensao": 0,
            "nucleo": "I",
            "temas_nucleo_i": ["a) Princípios"],
            "diretrizes_nucleo_ii": "",
            "descricao_extensao": "",
            "local_realizacao": "",
            "etapa_estagio": "",
            "bloco": "",
            "observacoes": ""
        }"#;
        let component: Component = serde_json::from_str(json).expect("decode");
        assert_eq!(component.id, ComponentId(3));
        assert_eq!(component.aulas_semanais, Some(4));
        assert_eq!(component.ch_total, Hours::from_whole(72));
        assert_eq!(component.bloco, None);
    }

    /// T0.3: Negative hours never enter a record.
    #[test]
    fn negative_hours_rejected() {
        let json = r#"{"id": 1, "nome": "X", "tipo": "Outro", "nucleo": "II", "ch_pratica": -2}"#;
        assert!(serde_json::from_str::<Component>(json).is_err());
    }
}

// =============================================================================
// TIER T1: AGGREGATION
// =============================================================================

mod t1_aggregation {
    use super::*;
    use ppc_core::{
        check_minimum, extension_percentage, hours_by_nucleus, practice_percentage,
        total_course_hours, total_hours,
    };

    /// T1.1: Weekly classes times 18 for disciplines, manual otherwise.
    #[test]
    fn total_hours_by_kind() {
        assert_eq!(
            total_hours(ComponentKind::Disciplina, 4, Hours::ZERO),
            Hours::from_whole(72)
        );
        assert_eq!(
            total_hours(ComponentKind::Modulo, 0, Hours::from_whole(150)),
            Hours::from_whole(150)
        );
    }

    /// T1.2: Empty collections aggregate to zero.
    #[test]
    fn empty_is_zero() {
        assert_eq!(total_course_hours(&[]), Hours::ZERO);
        assert_eq!(extension_percentage(&[]), Percentage::ZERO);
        assert_eq!(practice_percentage(&[]), Percentage::ZERO);
    }

    /// T1.3: Nucleus sums partition the course total.
    #[test]
    fn nucleus_sums_partition_total() {
        let store = conformant_store();
        let sum: Hours = Nucleus::ALL
            .into_iter()
            .map(|n| hours_by_nucleus(store.components(), n))
            .sum();
        assert_eq!(sum, total_course_hours(store.components()));
        assert_eq!(sum, Hours::from_whole(3200));
    }

    /// T1.4: Minimum checks report the minimum and the shortfall.
    #[test]
    fn minimum_check_messages() {
        let pass = check_minimum(Hours::from_whole(880), Hours::from_whole(880));
        assert!(pass.passed());
        assert!(pass.message().contains("880"));

        let fail = check_minimum(Hours::from_whole(800), Hours::from_whole(880));
        assert!(!fail.passed());
        assert!(fail.message().contains("80"));
        assert_eq!(fail.shortfall(), Hours::from_whole(80));
    }
}

// =============================================================================
// TIER T2: COMPONENT VALIDATOR
// =============================================================================

mod t2_component_validator {
    use super::*;
    use ppc_core::validate_component;

    /// T2.1: A complete internship passes with zero violations.
    #[test]
    fn complete_internship_passes() {
        let result = validate_component(&nucleus_iv("Estágio Supervisionado I", 400));
        assert!(result.is_valid());
        assert!(result.violations().is_empty());
    }

    /// T2.2: An internship in nucleus I fails the kind rule and the themes rule.
    #[test]
    fn internship_in_nucleus_i() {
        let d = draft("Estágio", "Estágio", "I", 400);
        let result = validate_component(&d);
        assert!(!result.is_valid());
        assert!(
            result
                .violations()
                .contains(&Violation::InternshipOutsideNucleusIv)
        );
        assert!(result.violations().contains(&Violation::MissingArt13Themes));
    }

    /// T2.3: Every violation is reported, none short-circuits.
    #[test]
    fn all_checks_run() {
        let d = ComponentDraft {
            nome: String::new(),
            tipo: "Disciplina".to_string(),
            nucleo: "III".to_string(),
            ch_total: Hours::from_whole(60),
            ..ComponentDraft::default()
        };
        let result = validate_component(&d);
        assert_eq!(
            result.violations(),
            &[
                Violation::MissingName,
                Violation::DisciplineWithoutWeeklyClasses,
                Violation::NucleusIiiRequiresExtension,
                Violation::MissingExtensionProject,
                Violation::ExtensionHoursMismatch {
                    ch_extensao: Hours::ZERO,
                    ch_total: Hours::from_whole(60),
                },
            ]
        );
    }

    /// T2.4: Nucleus IV demands the internship minimum.
    #[test]
    fn short_internship_fails() {
        let result = validate_component(&nucleus_iv("Estágio curto", 200));
        assert_eq!(
            result.violations(),
            &[Violation::InternshipBelowMinimum {
                ch_total: Hours::from_whole(200),
                minimum: Hours::from_whole(400),
            }]
        );
    }
}

// =============================================================================
// TIER T3: CURRICULUM VALIDATOR
// =============================================================================

mod t3_curriculum_validator {
    use super::*;
    use ppc_core::{ConformityIssue, validate_curriculum};

    /// T3.1: A curriculum at every minimum is conformant.
    #[test]
    fn conformant_curriculum() {
        let store = conformant_store();
        let summary = validate_curriculum(store.components()).summary();
        assert!(summary.valido);
        assert!(summary.erros.is_empty());
        assert!(summary.avisos.is_empty());
    }

    /// T3.2: Missing nucleus hours are reported with their shortfall.
    #[test]
    fn short_nucleus_reported() {
        let mut store = CurriculumStore::new();
        store.insert(nucleus_i("Didática", 800)).expect("insert");
        let report = validate_curriculum(store.components());

        let nucleus_issue = report
            .issues
            .iter()
            .find(|i| {
                matches!(
                    i,
                    ConformityIssue::NucleusBelowMinimum {
                        nucleus: Nucleus::I,
                        ..
                    }
                )
            })
            .expect("nucleus I issue");
        assert_eq!(nucleus_issue.shortfall_hours(), Some(Hours::from_whole(80)));
        assert!(nucleus_issue.to_string().contains("faltam 80h"));
    }

    /// T3.3: Insufficient extension share is reported.
    #[test]
    fn low_extension_reported() {
        let mut store = CurriculumStore::new();
        store.insert(nucleus_i("Fundamentos", 880)).expect("insert");
        store.insert(nucleus_ii("Específica", 2000)).expect("insert");
        store.insert(nucleus_iii("Extensão", 320)).expect("insert");
        store.insert(nucleus_iv("Estágio", 400)).expect("insert");
        // 320 / 3600 = 8.88%
        let report = validate_curriculum(store.components());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0],
            ConformityIssue::ExtensionBelowMinimum {
                actual: Percentage::from_hundredths(888),
                minimum: Percentage::from_whole(10),
            }
        );
    }

    /// T3.4: Aggregate non-conformity never blocks insertion.
    #[test]
    fn nonconformity_does_not_block_insertion() {
        let mut store = CurriculumStore::new();
        assert!(store.insert(nucleus_i("Didática", 60)).is_ok());
        assert!(!store.report().is_valid());
    }
}

// =============================================================================
// TIER T4: STORE & BACKUP
// =============================================================================

mod t4_store_backup {
    use super::*;
    use ppc_core::{backup_to_json, parse_backup};

    /// T4.1: Removal keeps the other records and shrinks the set by one.
    #[test]
    fn remove_by_id() {
        let mut store = conformant_store();
        let before: Vec<ComponentId> = store.components().iter().map(|c| c.id).collect();

        store.remove(ComponentId(2)).expect("present");
        let after: Vec<ComponentId> = store.components().iter().map(|c| c.id).collect();
        assert_eq!(after.len(), before.len() - 1);
        assert_eq!(after, vec![ComponentId(1), ComponentId(3), ComponentId(4)]);

        assert!(store.remove(ComponentId(42)).is_none());
        assert_eq!(store.len(), 3);
    }

    /// T4.2: Restore replaces everything and the counter continues from `ultimo_id`.
    #[test]
    fn restore_then_insert() {
        let mut store = conformant_store();
        let payload = br#"{"componentes": [], "ultimo_id": 5, "versao": "1.0"}"#;
        let backup = parse_backup(payload).expect("parse");
        store.restore(backup);

        assert!(store.is_empty());
        let id = store.insert(nucleus_i("Didática", 60)).expect("insert");
        assert_eq!(id, ComponentId(6));
    }

    /// T4.3: A rejected backup leaves the store as it was.
    #[test]
    fn rejected_backup_keeps_store() {
        let store = conformant_store();
        let before = store.clone();
        let result = parse_backup(br#"{"componentes": "x", "ultimo_id": 1}"#);
        assert!(matches!(result, Err(PpcError::InvalidBackup(_))));
        assert_eq!(store, before);
    }

    /// T4.4: A written backup restores the same working set.
    #[test]
    fn backup_round_trip() {
        let store = conformant_store();
        let json = backup_to_json(&store.to_backup("2025-03-01 14:30:00")).expect("json");
        let restored = CurriculumStore::from_backup(parse_backup(json.as_bytes()).expect("parse"));
        assert_eq!(restored, store);
    }

    /// T4.5: Rejected drafts return every violation.
    #[test]
    fn rejected_draft_reports_all() {
        let mut store = CurriculumStore::new();
        let err = store
            .insert(ComponentDraft::default())
            .expect_err("empty draft");
        let PpcError::Rejected(violations) = err else {
            unreachable!("expected rejection");
        };
        assert_eq!(violations.len(), 3);
        assert!(store.is_empty());
    }
}
