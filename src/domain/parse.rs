use crate::domain::{FileGroup, FileName, LineRecord, Row};
use serde_json::{Map, Number, Value};

/// Accepts both listing shapes: a bare array of names, or `{ "files": [...] }`.
/// Anything else normalizes to an empty list.
pub fn normalize_file_list(value: &Value) -> Vec<FileName> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("files") {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    entries
        .iter()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect()
}

/// Decodes the data endpoint payload. A non-array payload has no groups, and a
/// group whose `lines` is not an array contributes no lines.
pub fn decode_file_groups(value: &Value) -> Vec<FileGroup> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let mut groups = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            continue;
        };
        let file = text_field(map, "file");
        let lines = match map.get("lines") {
            Some(Value::Array(lines)) => lines.iter().filter_map(decode_line).collect(),
            _ => Vec::new(),
        };
        groups.push(FileGroup { file, lines });
    }
    groups
}

/// Every object line yields a record; mistyped or missing fields fall back
/// to `""` and `0` so the row count always matches the line count.
fn decode_line(value: &Value) -> Option<LineRecord> {
    let Value::Object(map) = value else {
        return None;
    };
    Some(LineRecord {
        text: text_field(map, "text"),
        number: number_field(map, "number"),
        hex: text_field(map, "hex"),
    })
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn number_field(map: &Map<String, Value>, key: &str) -> Number {
    match map.get(key) {
        Some(Value::Number(number)) => number.clone(),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .map(Number::from)
                .ok()
                .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64))
                .unwrap_or_else(|| Number::from(0))
        }
        _ => Number::from(0),
    }
}

/// One row per line record, in group order then line order. Each row carries
/// its group's `file` verbatim, whatever name was requested.
pub fn flatten_groups(groups: Vec<FileGroup>) -> Vec<Row> {
    let total = groups.iter().map(|group| group.lines.len()).sum();
    let mut rows = Vec::with_capacity(total);
    for group in groups {
        let FileGroup { file, lines } = group;
        rows.extend(lines.into_iter().map(|line| Row::from_line(&file, line)));
    }
    rows
}
