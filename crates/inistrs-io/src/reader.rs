//! Reader for the casting tool's two-column element result exports.
//!
//! Each source holds one stress component: one `element_id value` pair per
//! line, columns separated by any run of whitespace. Everything from the
//! comment marker (`$` by default) to the end of a line is ignored, and lines
//! left blank are skipped.
//!
//! ```text
//! $ MAGMA stress export, component XX
//!        1   1.2345E+01
//!        2  -3.5000E-02
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::component::{Component, ComponentRow, ComponentTable};
use crate::error::{InistrsError, Result};

pub const DEFAULT_COMMENT_MARKER: &str = "$";

/// Read and parse the source file holding `component`.
pub fn read_component(
    path: impl AsRef<Path>,
    component: Component,
    comment_marker: &str,
) -> Result<ComponentTable> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| InistrsError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_component(&raw, &path.display().to_string(), component, comment_marker)?;
    debug!(
        component = %component,
        rows = table.len(),
        path = %path.display(),
        "read component table"
    );
    Ok(table)
}

/// Parse the text of one source. `origin` names the source in error messages.
pub fn parse_component(
    raw: &str,
    origin: &str,
    component: Component,
    comment_marker: &str,
) -> Result<ComponentTable> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut table = ComponentTable::new(component);

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let content = strip_comment(line, comment_marker).trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let [id_field, value_field] = fields.as_slice() else {
            return Err(parse_error(
                origin,
                line_no,
                format!(
                    "expected 2 whitespace-separated fields, found {}: '{content}'",
                    fields.len()
                ),
            ));
        };

        let element_id = parse_element_id(id_field)
            .ok_or_else(|| parse_error(origin, line_no, format!("invalid element id '{id_field}'")))?;
        let value = parse_value(value_field).ok_or_else(|| {
            parse_error(origin, line_no, format!("invalid {component} value '{value_field}'"))
        })?;

        table.rows.push(ComponentRow {
            element_id,
            value,
            line: line_no,
        });
    }

    Ok(table)
}

fn strip_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return line;
    }
    match line.find(marker) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_element_id(field: &str) -> Option<u64> {
    let field = field.strip_prefix('+').unwrap_or(field);
    match field.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

fn parse_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_error(origin: &str, line: usize, message: String) -> InistrsError {
    InistrsError::Parse {
        origin: origin.to_string(),
        line,
        message,
    }
}
