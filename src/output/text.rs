use std::fmt::Display;

use crate::diff::{Change, DiffReport, ModelChange};
use crate::utils::Timezone;

use super::format::{
    Ansi, format_multiplier, format_optional, format_price, format_quantization,
    format_timestamp, paint,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextOptions {
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

fn push_change<T, F>(
    lines: &mut Vec<String>,
    label: &str,
    change: Option<&Change<T>>,
    fmt: F,
    opts: TextOptions,
) where
    F: Fn(&T) -> String,
{
    let Some(change) = change else {
        return;
    };
    lines.push(paint(
        &format!("  - {label}: {}", fmt(&change.old)),
        Ansi::Red,
        opts.use_color,
    ));
    lines.push(paint(
        &format!("  + {label}: {}", fmt(&change.new)),
        Ansi::Green,
        opts.use_color,
    ));
}

/// `-`/`+` lines for every changed field of a model
pub(crate) fn change_lines(change: &ModelChange, opts: TextOptions) -> Vec<String> {
    let mut lines = Vec::new();
    let fields = &change.fields;
    let (old_kind, new_kind) = (change.old.pricing.kind, change.new.pricing.kind);

    push_change(
        &mut lines,
        "Pricing Type",
        fields.pricing_type.as_ref(),
        |k| k.to_string(),
        opts,
    );
    if let Some(c) = &fields.input_price {
        lines.push(paint(
            &format!("  - Input Price: {}", format_price(old_kind, c.old)),
            Ansi::Red,
            opts.use_color,
        ));
        lines.push(paint(
            &format!("  + Input Price: {}", format_price(new_kind, c.new)),
            Ansi::Green,
            opts.use_color,
        ));
    }
    if let Some(c) = &fields.output_price {
        lines.push(paint(
            &format!("  - Output Price: {}", format_price(old_kind, c.old)),
            Ansi::Red,
            opts.use_color,
        ));
        lines.push(paint(
            &format!("  + Output Price: {}", format_price(new_kind, c.new)),
            Ansi::Green,
            opts.use_color,
        ));
    }
    push_change(
        &mut lines,
        "Cached Input Rate",
        fields.cached_input_rate.as_ref(),
        |r| format_multiplier(*r),
        opts,
    );
    push_change(
        &mut lines,
        "Cache Write Input Rate",
        fields.cache_write_rate.as_ref(),
        |r| format_multiplier(*r),
        opts,
    );
    push_change(
        &mut lines,
        "Quantization",
        fields.quantization.as_ref(),
        |q| format_quantization(q.as_deref()).to_string(),
        opts,
    );
    push_change(
        &mut lines,
        "Deprecated (timestamp)",
        fields.deprecated.as_ref(),
        |t| format_timestamp(*t, opts.timezone),
        opts,
    );
    push_change(
        &mut lines,
        "Replaced by",
        fields.replaced_by.as_ref(),
        |r| format_optional(r.as_deref()).to_string(),
        opts,
    );
    lines
}

fn heading(tag: &str, name: impl Display, opts: TextOptions) -> String {
    let color = if tag == "DEPRECATED" { Ansi::Yellow } else { Ansi::Blue };
    paint(&format!("[{tag}] Model: '{name}'"), color, opts.use_color)
}

/// Human-readable diff between two snapshot hashes
pub(crate) fn render_diff(
    report: &DiffReport,
    old_hash: &str,
    new_hash: &str,
    opts: TextOptions,
) -> String {
    let mut lines = vec![
        String::new(),
        format!(
            "Comparing states: {} -> {}",
            paint(old_hash, Ansi::Yellow, opts.use_color),
            paint(new_hash, Ansi::Yellow, opts.use_color)
        ),
        "---".to_string(),
    ];

    for model in &report.added {
        lines.push(heading("ADDED", &model.name, opts));
        lines.push(paint(&format!("  + {model}"), Ansi::Green, opts.use_color));
    }
    for model in &report.removed {
        lines.push(heading("REMOVED", &model.name, opts));
        lines.push(paint(&format!("  - {model}"), Ansi::Red, opts.use_color));
    }
    for change in &report.modified {
        let tag = if change.is_newly_deprecated() { "DEPRECATED" } else { "CHANGE" };
        lines.push(heading(tag, &change.name, opts));
        lines.extend(change_lines(change, opts));
    }

    if report.is_empty() {
        lines.push("No differences found between the two snapshots.".to_string());
    }
    lines.push("---".to_string());
    lines.join("\n")
}
