//! Table-cell formatting for scorecard values.

use serde_json::Value;

/// Columns whose values are ratios rendered as percentages.
const PERCENT_COLUMNS: &[&str] = &["diff", "diff_lik"];

/// Format a float with two decimals, the precision every numeric scorecard column uses.
pub fn fixed2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Format one JSON cell for display in the grid.
pub fn format_cell(column: &str, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(x) if PERCENT_COLUMNS.contains(&column) => fixed2(x * 100.0),
            Some(x) if n.is_f64() => fixed2(x),
            Some(x) if column_is_float(column) => fixed2(x),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Integer-valued floats arrive as JSON integers; keep known float columns consistent.
fn column_is_float(column: &str) -> bool {
    matches!(
        column,
        "mu" | "sigma" | "beta" | "tau" | "mean_pnl" | "llik_implied" | "llik_model"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_floats_use_two_decimals() {
        assert_eq!(format_cell("mean_pnl", &json!(1.23456)), "1.23");
        assert_eq!(format_cell("mu", &json!(25)), "25.00");
    }

    #[test]
    fn test_diff_is_scaled_to_percent() {
        assert_eq!(format_cell("diff", &json!(0.01234)), "1.23");
    }

    #[test]
    fn test_integers_and_text_pass_through() {
        assert_eq!(format_cell("count", &json!(12)), "12");
        assert_eq!(format_cell("id", &json!("51a0c")), "51a0c");
        assert_eq!(format_cell("note", &Value::Null), "");
    }
}
