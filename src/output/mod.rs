mod format;
mod json;
mod table;
mod text;

pub(crate) use json::{diff_json_lines, snapshot_list_json};
pub(crate) use table::{TableOptions, render_snapshot_table};
pub(crate) use text::{TextOptions, render_diff};
