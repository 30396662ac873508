use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::consts::TIMESTAMP_FORMAT;
use crate::pricing::PricingType;
use crate::utils::Timezone;

/// ANSI foreground colors used by the text diff
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Ansi {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Ansi {
    fn code(self) -> &'static str {
        match self {
            Ansi::Green => "\x1b[92m",
            Ansi::Red => "\x1b[91m",
            Ansi::Yellow => "\x1b[93m",
            Ansi::Blue => "\x1b[94m",
        }
    }
}

const RESET: &str = "\x1b[0m";

pub(super) fn paint(text: &str, color: Ansi, use_color: bool) -> String {
    if use_color {
        format!("{}{text}{RESET}", color.code())
    } else {
        text.to_string()
    }
}

/// `$0.00230 per 1M tokens`; prices are stored in cents.
/// An uncharged side prints without the dollar sign.
pub(super) fn format_price(kind: PricingType, cents: Option<f64>) -> String {
    match cents {
        Some(cents) => format!("${:.5} per {}", cents / 100.0, kind.unit()),
        None => format!("0.00000 per {}", kind.unit()),
    }
}

/// Cache rates are fractions of the input price
pub(super) fn format_multiplier(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "NaN".to_string(),
    }
}

/// Deprecation timestamps; 0 means not deprecated
pub(super) fn format_timestamp(secs: i64, timezone: Timezone) -> String {
    if secs == 0 {
        return "N/A".to_string();
    }
    timezone
        .format_unix(secs, TIMESTAMP_FORMAT)
        .unwrap_or_else(|| secs.to_string())
}

/// Unquantized models run at full precision
pub(super) fn format_quantization(value: Option<&str>) -> &str {
    value.unwrap_or("float32")
}

pub(super) fn format_optional(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

pub(super) fn right_cell(text: &str) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}
