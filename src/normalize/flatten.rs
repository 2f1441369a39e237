//! Record flattening and identifier normalization

use crate::types::{JsonObject, JsonValue};

/// Separator between the names of a nested column path
pub const PATH_SEPARATOR: &str = "__";

/// Column holding a record that is not a JSON object
pub const VALUE_COLUMN: &str = "value";

/// Convert a JSON key into a snake_case column identifier
///
/// `customerId` becomes `customer_id`, `Order Total ($)` becomes
/// `order_total____`. A leading digit gets a `_` prefix.
pub fn normalize_identifier(name: &str) -> String {
    let name = name.trim();
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower_or_digit {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            out.push('_');
            prev_lower_or_digit = false;
        }
    }

    match out.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{out}"),
        Some(_) => out,
    }
}

/// Flatten one record into a single-level row
///
/// Objects nested deeper than `max_depth` levels are kept as JSON text, as
/// are all arrays. Records that are not objects land in [`VALUE_COLUMN`].
/// Keys that normalize to a column already in the row get a numeric suffix
/// (`customer_id_1`) instead of replacing it.
pub fn flatten_record(record: &JsonValue, max_depth: usize) -> JsonObject {
    let mut row = JsonObject::new();

    match record {
        JsonValue::Object(obj) => flatten_into(&mut row, None, obj, 1, max_depth),
        other => {
            let mut wrapped = JsonObject::new();
            wrapped.insert(VALUE_COLUMN.to_string(), other.clone());
            flatten_into(&mut row, None, &wrapped, 1, max_depth);
        }
    }

    row
}

fn flatten_into(
    row: &mut JsonObject,
    prefix: Option<&str>,
    obj: &JsonObject,
    depth: usize,
    max_depth: usize,
) {
    for (key, value) in obj {
        let column = match prefix {
            Some(p) => format!("{p}{PATH_SEPARATOR}{}", normalize_identifier(key)),
            None => normalize_identifier(key),
        };

        match value {
            JsonValue::Object(child) if depth < max_depth => {
                flatten_into(row, Some(&column), child, depth + 1, max_depth);
            }
            JsonValue::Object(_) | JsonValue::Array(_) => {
                let column = unique_column(row, column);
                row.insert(column, JsonValue::String(value.to_string()));
            }
            _ => {
                let column = unique_column(row, column);
                row.insert(column, value.clone());
            }
        }
    }
}

/// `column`, or the first `column_N` not yet present in `row`
pub(crate) fn unique_column(row: &JsonObject, column: String) -> String {
    if !row.contains_key(&column) {
        return column;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{column}_{n}");
        if !row.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
