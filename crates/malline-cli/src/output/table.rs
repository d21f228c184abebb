//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};

/// The result of checking a single template file.
pub struct CheckOutcome {
    /// Path of the checked file.
    pub file: String,
    /// Number of top-level nodes, or the parse error.
    pub result: Result<usize, String>,
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Format check results as a table.
pub fn format_check_table(outcomes: &[CheckOutcome]) -> Table {
    let mut table = new_table(vec!["File", "Status", "Details"]);
    for outcome in outcomes {
        let (status, details) = match &outcome.result {
            Ok(nodes) => ("ok", format!("{nodes} nodes")),
            Err(message) => ("error", message.clone()),
        };
        table.add_row(vec![outcome.file.clone(), status.to_string(), details]);
    }
    table
}

/// Format the registered tag and filter names side by side.
pub fn format_registry_table(tags: &[String], filters: &[String]) -> Table {
    let mut table = new_table(vec!["Tags", "Filters"]);
    for row in 0..tags.len().max(filters.len()) {
        table.add_row(vec![
            tags.get(row).cloned().unwrap_or_default(),
            filters.get(row).cloned().unwrap_or_default(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_table_pads_shorter_column() {
        let table = format_registry_table(
            &["for".to_string(), "if".to_string()],
            &["join".to_string()],
        );
        let rendered = table.to_string();
        assert!(rendered.contains("for"));
        assert!(rendered.contains("join"));
        assert_eq!(rendered.lines().filter(|line| line.contains("if")).count(), 1);
    }

    #[test]
    fn check_table_lists_every_file() {
        let outcomes = vec![
            CheckOutcome {
                file: "a.html".to_string(),
                result: Ok(3),
            },
            CheckOutcome {
                file: "b.html".to_string(),
                result: Err("unknown tag `x`".to_string()),
            },
        ];
        let rendered = format_check_table(&outcomes).to_string();
        assert!(rendered.contains("3 nodes"));
        assert!(rendered.contains("unknown tag `x`"));
    }
}
