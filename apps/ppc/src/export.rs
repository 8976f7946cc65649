//! # SIGAA CSV Export
//!
//! Renders the working set as the semicolon-separated sheet used to migrate a
//! curriculum into SIGAA. UTF-8 with BOM, one row per component, insertion
//! order.

use ppc_core::{Component, Hours, NucleusDetails};

/// Byte-order mark expected by spreadsheet imports.
pub const UTF8_BOM: &str = "\u{feff}";

const SEPARATOR: char = ';';

/// Column headers of the SIGAA sheet.
pub const SIGAA_COLUMNS: [&str; 16] = [
    "Semestre",
    "Nome",
    "Tipo",
    "Aulas Semanais",
    "CH Total",
    "CH Teórica",
    "CH Prática",
    "CH Extensão",
    "Núcleo",
    "Temas Núcleo I",
    "Diretrizes Núcleo II",
    "Descrição Extensão",
    "Local Realização",
    "Etapa Estágio",
    "Bloco",
    "Observações",
];

/// Plain number of hours: `72` or `72.50`.
fn hours_cell(hours: Hours) -> String {
    let raw = hours.hundredths();
    if raw % 100 == 0 {
        (raw / 100).to_string()
    } else {
        format!("{}.{:02}", raw / 100, raw % 100)
    }
}

/// Quote a field when it holds the separator, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<I, S>(out: &mut String, cells: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = cells.into_iter().map(|c| escape(c.as_ref())).collect();
    out.push_str(&row.join(&SEPARATOR.to_string()));
    out.push('\n');
}

fn component_cells(c: &Component) -> [String; 16] {
    let (temas, diretrizes, descricao, local, etapa) = match &c.details {
        NucleusDetails::I { temas_nucleo_i } => (
            temas_nucleo_i.join("; "),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ),
        NucleusDetails::II {
            diretrizes_nucleo_ii,
        } => (
            String::new(),
            diretrizes_nucleo_ii.clone(),
            String::new(),
            String::new(),
            String::new(),
        ),
        NucleusDetails::III { descricao_extensao } => (
            String::new(),
            String::new(),
            descricao_extensao.clone(),
            String::new(),
            String::new(),
        ),
        NucleusDetails::IV {
            local_realizacao,
            etapa_estagio,
        } => (
            String::new(),
            String::new(),
            String::new(),
            local_realizacao.clone(),
            etapa_estagio.clone(),
        ),
    };

    [
        c.semestre.map(|s| s.to_string()).unwrap_or_default(),
        c.nome.clone(),
        c.tipo.label().to_string(),
        c.aulas_semanais.map(|n| n.to_string()).unwrap_or_default(),
        hours_cell(c.ch_total),
        hours_cell(c.ch_teorica),
        hours_cell(c.ch_pratica),
        hours_cell(c.ch_extensao),
        c.nucleo().label().to_string(),
        temas,
        diretrizes,
        descricao,
        local,
        etapa,
        c.bloco.clone().unwrap_or_default(),
        c.observacoes.clone().unwrap_or_default(),
    ]
}

/// Render the SIGAA sheet, BOM included.
#[must_use]
pub fn render_sigaa_csv(components: &[Component]) -> String {
    let mut out = String::from(UTF8_BOM);
    push_row(&mut out, SIGAA_COLUMNS);
    for c in components {
        push_row(&mut out, component_cells(c));
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ppc_core::{ComponentDraft, ComponentId};

    fn didatica() -> Component {
        let draft = ComponentDraft {
            semestre: Some(3),
            nome: "Didática \"Geral\"".to_string(),
            tipo: "Disciplina".to_string(),
            aulas_semanais: Some(4),
            ch_total: Hours::from_whole(72),
            ch_teorica: Hours::from_hundredths(5450),
            nucleo: "I".to_string(),
            temas_nucleo_i: vec!["a) Princípios".to_string(), "c) Observação".to_string()],
            ..ComponentDraft::default()
        };
        Component::from_draft(ComponentId(1), &draft).expect("typed")
    }

    #[test]
    fn header_starts_with_bom() {
        let csv = render_sigaa_csv(&[]);
        assert!(csv.starts_with(UTF8_BOM));
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.contains("Semestre;Nome;Tipo;Aulas Semanais"));
    }

    #[test]
    fn component_row() {
        let csv = render_sigaa_csv(&[didatica()]);
        let row = csv.lines().nth(1).expect("row");
        assert!(row.starts_with("3;\"Didática \"\"Geral\"\"\";Disciplina;4;72;54.50;0;0;I;"));
        assert!(row.contains("\"a) Princípios; c) Observação\""));
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape("Escola X"), "Escola X");
        assert_eq!(escape("a;b"), "\"a;b\"");
    }
}
