use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use idef_core::{ImportPreview, PreviewRow, UnmappedField};
use idef_model::{DuplicateCandidate, FieldMapping, ImportDefinition, MatchType, NormalizerId};

use crate::commands::{PreviewOutcome, Suggestion};

pub fn print_definition(definition: &ImportDefinition) {
    println!(
        "Definition: {} (schema {})",
        definition.entity, definition.schema_version
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Normalizers"),
        header_cell("Validators"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in &definition.fields {
        let normalizers: Vec<&str> = field.normalizers.iter().map(NormalizerId::as_str).collect();
        let validators: Vec<&str> = field.validators.iter().map(|v| v.rule().as_str()).collect();
        table.add_row(vec![
            Cell::new(&field.key).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            Cell::new(field.field_type.as_str()),
            flag_cell(field.required),
            list_cell(&normalizers),
            list_cell(&validators),
        ]);
    }
    for computed in &definition.computed_fields {
        let normalizers: Vec<&str> = computed.normalizers.iter().map(NormalizerId::as_str).collect();
        table.add_row(vec![
            Cell::new(format!("  -> {}", computed.key)).fg(Color::DarkGrey),
            dim_cell(format!("from {}", computed.from)),
            dim_cell("computed"),
            dim_cell("-"),
            list_cell(&normalizers),
            dim_cell("-"),
        ]);
    }
    println!("{table}");
    if let Some(policy) = &definition.dedupe_policy {
        println!(
            "Dedupe: priority keys [{}], threshold {}",
            policy.priority_keys.join(", "),
            policy.threshold()
        );
    }
}

pub fn print_suggestion(suggestion: &Suggestion) {
    println!("Columns: {}", suggestion.columns.join(", "));
    println!("{}", mapping_table(&suggestion.definition, &suggestion.mapping));
    print_unmapped(&suggestion.unmapped);
}

pub fn print_preview(outcome: &PreviewOutcome) {
    let preview = &outcome.preview;
    print_unmapped(&outcome.unmapped);
    println!(
        "Entity: {}  rows: {}  error rows: {}  candidate threshold: {}",
        preview.entity, preview.summary.total_rows, preview.summary.error_rows, preview.threshold
    );
    print_field_summary(preview);
    print_error_rows(preview);
    print_candidates(preview);
}

fn mapping_table(definition: &ImportDefinition, mapping: &FieldMapping) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Required"),
        header_cell("Column"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in &definition.fields {
        let column = match mapping.source_column(&field.key) {
            Some(column) => Cell::new(column).fg(Color::Green),
            None if field.required => Cell::new("unmapped").fg(Color::Red),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&field.key),
            Cell::new(&field.label),
            flag_cell(field.required),
            column,
        ]);
    }
    table
}

fn print_unmapped(unmapped: &[UnmappedField]) {
    if unmapped.is_empty() {
        return;
    }
    eprintln!("Required fields without a column:");
    for field in unmapped {
        eprintln!("- {} ({})", field.label, field.key);
    }
}

fn print_field_summary(preview: &ImportPreview) {
    if preview.summary.by_field.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Errors")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (field, count) in &preview.summary.by_field {
        table.add_row(vec![Cell::new(field), count_cell(*count, Color::Red)]);
    }
    println!();
    println!("Errors by field:");
    println!("{table}");
}

fn print_error_rows(preview: &ImportPreview) {
    let rows: Vec<&PreviewRow> = preview.rows.iter().filter(|r| !r.is_clean()).collect();
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in rows {
        for error in &row.processed.errors {
            table.add_row(vec![
                Cell::new(row_number(row.row_index)),
                Cell::new(&error.field_label),
                Cell::new(error.code.as_str()).fg(Color::Red),
                Cell::new(&error.message),
            ]);
        }
    }
    println!();
    println!("Error rows:");
    println!("{table}");
}

fn print_candidates(preview: &ImportPreview) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Matches"),
        header_cell("Type"),
        header_cell("Score"),
        header_cell("Reason"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut any = false;
    for row in &preview.rows {
        let batch = row.candidates.iter().map(|c| (candidate_target(c, false), c));
        let existing = row
            .existing_candidates
            .iter()
            .map(|c| (candidate_target(c, true), c));
        for (target, candidate) in batch.chain(existing) {
            any = true;
            table.add_row(vec![
                Cell::new(row_number(row.row_index)),
                Cell::new(target),
                match_type_cell(candidate.match_type),
                score_cell(candidate.score),
                Cell::new(&candidate.reason),
            ]);
        }
    }
    if !any {
        return;
    }
    println!();
    println!("Duplicate candidates:");
    println!("{table}");
}

/// One-based row number as shown to users.
fn row_number(row_index: usize) -> usize {
    row_index + 1
}

fn candidate_target(candidate: &DuplicateCandidate, existing: bool) -> String {
    if existing {
        format!("existing #{}", candidate.candidate_index)
    } else {
        format!("row {}", row_number(candidate.candidate_index))
    }
}

fn match_type_cell(match_type: MatchType) -> Cell {
    match match_type {
        MatchType::Identifier | MatchType::NameAddress => Cell::new(match_type.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        MatchType::NameOnly => Cell::new(match_type.as_str()).fg(Color::Yellow),
        MatchType::AddressOnly => Cell::new(match_type.as_str()).fg(Color::DarkYellow),
    }
}

fn score_cell(score: u8) -> Cell {
    let color = if score >= 90 { Color::Red } else { Color::Yellow };
    Cell::new(score).fg(color)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn list_cell(items: &[&str]) -> Cell {
    if items.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(items.join(", "))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
