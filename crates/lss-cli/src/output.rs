//! Terminal and JSON presentation of command results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use lss_model::{ColumnLayoutEntry, DEFAULT_TEMPLATE_ID, Options, Page, Template};
use lss_transform::format::format_number;
use lss_transform::{LabelStyle, label_text};

/// Marker printed for an empty slot.
pub const BLANK_SLOT: &str = "[blank]";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn templates_table(templates: &[Template]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Per sheet"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for template in templates {
        let id = if template.id == DEFAULT_TEMPLATE_ID {
            Cell::new(format!("{} (default)", template.id)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(template.id)
        };
        table.add_row(vec![id, Cell::new(template.name), Cell::new(template.per_page)]);
    }
    table
}

pub fn layout_table(layout: &[ColumnLayoutEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("X %"),
        header_cell("Y %"),
        header_cell("Size"),
        header_cell("Color"),
        header_cell("Align"),
        header_cell("Weight"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in layout {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(format_number(entry.position.x)),
            Cell::new(format_number(entry.position.y)),
            Cell::new(format_number(entry.formatting.font_size)),
            Cell::new(&entry.formatting.color),
            Cell::new(entry.formatting.align.as_str()),
            Cell::new(entry.formatting.font_weight.as_str()),
        ]);
    }
    table
}

/// One block per page, one numbered line per slot.
///
/// Multi-line label text continues on indented lines.
pub fn render_text(pages: &[Page], options: &Options) -> String {
    let template = options.template();
    let mut out = String::new();
    for (page_index, page) in pages.iter().enumerate() {
        if page_index > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "Page {} of {} ({})\n",
            page_index + 1,
            pages.len(),
            template.name
        ));
        for (slot_index, slot) in page.slots.iter().enumerate() {
            let text = match slot {
                Some(label) => label_text(Some(label), options),
                None => BLANK_SLOT.to_string(),
            };
            let mut lines = text.lines();
            let first = lines.next().unwrap_or_default();
            out.push_str(&format!("{:>3}. {first}\n", slot_index + 1));
            for line in lines {
                out.push_str(&format!("     {line}\n"));
            }
        }
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderDocument<'a> {
    status: &'a str,
    template: &'a Template,
    blanks: usize,
    label_style: String,
    pages: &'a [Page],
}

/// Pages, status and sheet settings as pretty JSON.
pub fn render_json(pages: &[Page], options: &Options, status: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RenderDocument {
        status,
        template: options.template(),
        blanks: options.blanks,
        label_style: LabelStyle::from_options(options).to_string(),
        pages,
    })
}
