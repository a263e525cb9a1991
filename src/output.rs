//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use tabled::builder::Builder;

use crate::Record;

/// Trait for human-readable key-value output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Record {
    fn pretty_print(&self) -> String {
        let width = self.keys().map(str::len).max().unwrap_or(0);

        self.iter()
            .map(|(name, value)| {
                let label = format!("{name}:");
                format!("{label:<pad$}  {value}", pad = width + 1)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render records as a table.
///
/// Columns are the union of all field names, in the order they were first
/// seen; missing fields render as blank cells.
pub fn records_table(records: &[Record]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for name in record.keys() {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for record in records {
        builder.push_record(
            columns
                .iter()
                .map(|c| record.get(c).map(ToString::to_string).unwrap_or_default()),
        );
    }

    builder.build().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldValue;

    fn record(fields: &[(&str, FieldValue)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_record_pretty_print_format() {
        let record = record(&[
            ("Name", FieldValue::Text("Sprint 1".to_string())),
            ("Project", FieldValue::Reference("77".to_string())),
            (
                "Stories",
                FieldValue::References(vec!["3".to_string(), "4".to_string()]),
            ),
            ("Notes", FieldValue::Empty),
        ]);

        let output = record.pretty_print();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name:"));
        assert!(lines[0].ends_with("Sprint 1"));
        assert!(lines[2].ends_with("3, 4"));
    }

    #[test]
    fn test_table_has_union_of_columns() {
        let a = record(&[("Name", FieldValue::Text("A".to_string()))]);
        let b = record(&[
            ("Name", FieldValue::Text("B".to_string())),
            ("State", FieldValue::Text("Accepted".to_string())),
        ]);

        let table = records_table(&[a, b]);
        let header = table.lines().nth(1).unwrap();
        assert!(header.contains("Name"));
        assert!(header.contains("State"));
        assert!(table.contains("Accepted"));
    }
}
