use comfy_table::Cell;

use crate::consts::CAPTURED_FORMAT;
use crate::snapshot::SnapshotEntry;
use crate::utils::Timezone;

use super::format::{create_styled_table, header_cell, right_cell};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

/// Cached snapshots, oldest first
pub(crate) fn render_snapshot_table(entries: &[SnapshotEntry], opts: TableOptions) -> String {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Hash", opts.use_color),
        header_cell("Captured", opts.use_color),
        header_cell("Models", opts.use_color),
    ]);

    for entry in entries {
        let captured = opts
            .timezone
            .format_unix(entry.timestamp, CAPTURED_FORMAT)
            .unwrap_or_else(|| entry.timestamp.to_string());
        table.add_row(vec![
            Cell::new(&entry.hash),
            Cell::new(captured),
            right_cell(&entry.models.to_string()),
        ]);
    }

    table.to_string()
}
