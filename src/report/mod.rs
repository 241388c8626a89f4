//! Human-readable tabular output.

pub mod jobs;
pub mod queues;
pub mod slots;
pub mod targets;

use tabled::builder::Builder;
use tabled::settings::Style;

/// Render `rows` as a borderless, column-aligned table, optionally preceded
/// by a header line. An empty result renders as an empty string.
pub fn render(headers: &[&str], rows: Vec<Vec<String>>, with_headers: bool) -> String {
    if rows.is_empty() && !with_headers {
        return String::new();
    }

    let mut builder = Builder::default();
    if with_headers {
        builder.push_record(headers.iter().map(|h| h.to_string()));
    }
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::blank());

    let mut out = table.to_string();
    out.push('\n');
    out
}

/// `None` renders as a dash.
pub(crate) fn cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
