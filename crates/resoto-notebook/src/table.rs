//! Row/column tables built from JSON records.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use resoto_notebook_core::JsObject;

/// Column holding records that are not JSON objects.
pub const VALUE_COLUMN: &str = "value";

/// Separator between nested keys in flattened column names.
pub const FLATTEN_SEPARATOR: &str = ".";

/// Cells wider than this are truncated when displayed.
const MAX_CELL_WIDTH: usize = 48;

/// A table of JSON cells.
///
/// Columns appear in first-seen order across all records. A record without
/// a column gets `null` in that cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// One row per record, one column per distinct top-level key.
    ///
    /// Nested objects stay whole in their cell. Non-object records go into
    /// the [`VALUE_COLUMN`].
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut column_of = |name: String| -> usize {
            if let Some(&i) = index.get(&name) {
                return i;
            }
            let i = columns.len();
            index.insert(name.clone(), i);
            columns.push(name);
            i
        };

        let sparse: Vec<Vec<(usize, Value)>> = records
            .into_iter()
            .map(|record| match record {
                Value::Object(object) => object
                    .into_iter()
                    .map(|(key, value)| (column_of(key), value))
                    .collect(),
                other => vec![(column_of(VALUE_COLUMN.to_string()), other)],
            })
            .collect();

        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row = vec![Value::Null; width];
                for (i, value) in cells {
                    row[i] = value;
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Like [`Table::from_records`], but nested objects are flattened first
    /// so `{"a": {"b": 1}}` becomes column `a.b`.
    pub fn normalized<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::from_records(records.into_iter().map(|record| match record {
            Value::Object(object) => Value::Object(flatten(object)),
            other => other,
        }))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let i = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[i])
    }

    /// All cells of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let i = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[i]).collect())
    }

    /// Rows as objects keyed by column name, every column present.
    pub fn to_records(&self) -> Vec<JsObject> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Flatten nested objects into dotted keys.
///
/// Arrays and empty objects are kept as leaf values.
pub fn flatten(object: JsObject) -> JsObject {
    let mut out = JsObject::new();
    flatten_into(&mut out, None, object);
    out
}

fn flatten_into(out: &mut JsObject, prefix: Option<&str>, object: JsObject) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{FLATTEN_SEPARATOR}{key}"),
            None => key,
        };
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(out, Some(&name), child),
            leaf => {
                out.insert(name, leaf);
            }
        }
    }
}

fn display_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    // Keep each row on one line.
    let text = text.replace('\n', "\\n");
    if text.chars().count() > MAX_CELL_WIDTH {
        let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('…');
        cut
    } else {
        text
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(no rows)");
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(display_cell).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_line(f, &self.columns, &widths)?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, values: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}
