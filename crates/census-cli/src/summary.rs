//! Table rendering for validation reports and record listings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use census_model::{IssueKind, Person, ValidationReport};

/// Print the full issue list, one row per finding.
pub fn print_report(report: &ValidationReport) {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    for issue in &report.issues {
        table.add_row(vec![
            Cell::new(issue.field.as_str()),
            kind_cell(issue.kind),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");
    println!(
        "{} issue(s) found - the record was not accepted",
        report.issue_count()
    );
}

/// Print a one-line-per-record summary of the store.
pub fn print_person_list(people: &[Person]) {
    if people.is_empty() {
        println!("no records stored");
        return;
    }
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("National Id"),
        header_cell("Farm"),
        header_cell("Workers"),
        header_cell("Family"),
    ]);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for person in people {
        let id = person
            .id
            .map(|id| id.to_hex())
            .unwrap_or_else(|| "-".to_string());
        let farm = person
            .farm_name
            .as_deref()
            .unwrap_or(if person.has_farm { "yes" } else { "-" });
        let workers = person
            .total_workers
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(id),
            Cell::new(format!("{} {}", person.name, person.last_name)),
            Cell::new(&person.national_id),
            Cell::new(farm),
            Cell::new(workers),
            Cell::new(person.family.len()),
        ]);
    }
    println!("{table}");
    println!("{} record(s)", people.len());
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: IssueKind) -> Cell {
    let color = match kind {
        IssueKind::Consistency => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
