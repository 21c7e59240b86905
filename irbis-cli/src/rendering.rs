// irbis-cli/src/rendering.rs

//! Terminal result cards for tool calls: the generated query, a preview of
//! the returned rows, and how much of the result set the preview covers.
//! Pure string builders; printing is the caller's concern.

use colored::*;
use irbis_core::{RetrievalResponse, RetrievedData, ToolCallRecord, ToolExecutionStatus};
use serde_json::{Map, Value as JsonValue};

const PREVIEW_ROWS: usize = 5;
const MAX_CELL_WIDTH: usize = 32;

/// Renders one executed tool call as a multi-line card.
pub fn render_tool_card(record: &ToolCallRecord) -> String {
    let mut lines = Vec::new();
    lines.push(
        format!("Data Query Result ({})", record.tool_name)
            .cyan()
            .bold()
            .to_string(),
    );

    match record.status {
        ToolExecutionStatus::Failure => {
            let detail = record
                .result
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| record.result.to_string());
            lines.push(format!("{} {}", "failed:".red(), detail));
        }
        ToolExecutionStatus::Success => {
            match serde_json::from_value::<RetrievalResponse>(record.result.clone()) {
                Ok(response) => {
                    for data in &response.data {
                        lines.extend(render_result_set(data));
                    }
                    if response.data.is_empty() {
                        lines.push("(no result sets returned)".dimmed().to_string());
                    }
                }
                // Not the retrieval envelope; show the payload as-is.
                Err(_) => lines.push(record.result.to_string()),
            }
        }
    }
    lines.join("\n")
}

fn render_result_set(data: &RetrievedData) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &data.error {
        lines.push(format!("{} {}", "error:".red(), error));
        return lines;
    }

    lines.push(
        format!("{} rows returned", data.rows.len())
            .dimmed()
            .to_string(),
    );
    if !data.query.is_empty() {
        lines.push(format!("{} {}", "Query:".yellow(), data.query));
    }
    if let Some(summary) = &data.query_summary {
        lines.push(format!("{} {}", "Summary:".yellow(), summary));
    }
    if !data.rows.is_empty() {
        lines.extend(render_table(&data.rows, PREVIEW_ROWS));
        if data.rows.len() > PREVIEW_ROWS {
            lines.push(
                format!("({} more rows not shown)", data.rows.len() - PREVIEW_ROWS)
                    .dimmed()
                    .to_string(),
            );
        }
    }
    lines
}

/// Renders up to `limit` rows as an aligned two-space-gutter table, columns
/// taken from the first row's keys.
pub fn render_table(rows: &[Map<String, JsonValue>], limit: usize) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let columns: Vec<&String> = first.keys().collect();
    let preview = &rows[..rows.len().min(limit)];

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    let cells: Vec<Vec<String>> = preview
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| format_cell(row.get(c.as_str()).unwrap_or(&JsonValue::Null)))
                .collect()
        })
        .collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::new();
    lines.push(pad_row(
        &columns.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        &widths,
    ));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(pad_row(row, &widths));
    }
    lines
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn format_cell(value: &JsonValue) -> String {
    let text = match value {
        JsonValue::Null => "—".to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", truncated)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_from(value: JsonValue) -> Vec<Map<String, JsonValue>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn render_table_aligns_columns_and_marks_nulls() {
        let rows = rows_from(json!([
            {"name": "Côte de Blaye", "revenue": 141396.74},
            {"name": "Chai", "revenue": null}
        ]));
        let lines = render_table(&rows, 5);
        assert_eq!(lines.len(), 4); // header, separator, two rows
        assert!(lines[0].starts_with("name"));
        assert!(lines[2].contains("Côte de Blaye"));
        assert!(lines[3].contains("—"));
        // Data cells line up under their column headers.
        let revenue_col = lines[0].find("revenue").unwrap();
        assert_eq!(lines[2].find("141396.74").unwrap(), revenue_col);
    }

    #[test]
    fn render_table_caps_preview_rows() {
        let rows = rows_from(json!([
            {"n": 1}, {"n": 2}, {"n": 3}, {"n": 4}
        ]));
        let lines = render_table(&rows, 2);
        assert_eq!(lines.len(), 4); // header, separator, two previewed rows
    }

    #[test]
    fn format_cell_truncates_wide_values() {
        let long = "x".repeat(100);
        let formatted = format_cell(&json!(long));
        assert_eq!(formatted.chars().count(), MAX_CELL_WIDTH);
        assert!(formatted.ends_with('…'));
    }

    #[test]
    fn render_tool_card_shows_query_and_window_footer() {
        colored::control::set_override(false);
        let rows: Vec<JsonValue> = (0..8).map(|n| json!({"n": n})).collect();
        let record = ToolCallRecord {
            tool_call_id: "call_1".into(),
            tool_name: "get_data".into(),
            arguments: json!({"user_question": "counts"}),
            result: json!({
                "responseStatus": "SUCCESS",
                "data": [{"query": "SELECT n FROM t", "rows": rows}]
            }),
            status: ToolExecutionStatus::Success,
        };
        let card = render_tool_card(&record);
        assert!(card.contains("Data Query Result (get_data)"));
        assert!(card.contains("8 rows returned"));
        assert!(card.contains("SELECT n FROM t"));
        assert!(card.contains("(3 more rows not shown)"));
    }

    #[test]
    fn render_tool_card_reports_failures() {
        colored::control::set_override(false);
        let record = ToolCallRecord {
            tool_call_id: "call_1".into(),
            tool_name: "get_data".into(),
            arguments: JsonValue::Null,
            result: json!("Error executing tool 'get_data': unreachable"),
            status: ToolExecutionStatus::Failure,
        };
        let card = render_tool_card(&record);
        assert!(card.contains("failed:"));
        assert!(card.contains("unreachable"));
    }
}
