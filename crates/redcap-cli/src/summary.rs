use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use redcap_core::GroupOutline;

use crate::commands::{CheckResult, ExpandResult};

pub fn print_expand_summary(result: &ExpandResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    let stats = &result.stats;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records in"),
        header_cell("After pass 1"),
        header_cell("Records out"),
        header_cell("Groups"),
        header_cell("Nested groups"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.input_records),
        Cell::new(stats.transformed_records),
        Cell::new(stats.output_records).add_attribute(Attribute::Bold),
        count_cell(stats.groups),
        count_cell(stats.nested_groups),
    ]);
    println!("{table}");
}

pub fn print_group_tree(result: &CheckResult) {
    println!("Input: {} ({} records)", result.input.display(), result.records);
    if result.groups.is_empty() {
        println!("No repeat groups found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("First field"),
        header_cell("Count"),
        header_cell("Rows"),
        header_cell("Kind"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for row in group_rows(&result.groups) {
        table.add_row(row);
    }
    println!("{table}");
}

/// One table row per group, depth first, with names indented by depth.
pub fn group_rows(groups: &[GroupOutline]) -> Vec<[String; 5]> {
    groups
        .iter()
        .flat_map(GroupOutline::walk)
        .map(|group| {
            let kind = if group.single_row { "single row" } else { "block" };
            [
                format!("{}{}", "  ".repeat(group.depth - 1), group.name),
                group.first_field.clone(),
                group.count.to_string(),
                format!("{}-{}", group.start + 1, group.start + group.rows),
                kind.to_string(),
            ]
        })
        .collect()
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).add_attribute(Attribute::Dim)
    }
}
