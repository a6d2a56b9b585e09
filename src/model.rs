//! Records exchanged with the scorecard server and shown in the grid.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::format::format_cell;

/// Unique key of a displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(pub String);

/// Foreign key a row carries; detail is fetched by this, not by the row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentId(pub String);

/// Identifier of a toggleable entity (a paper-trading strategy).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_id!(RowKey);
impl_id!(ParentId);
impl_id!(EntityId);

/// One displayed record: key, parent id and ordered formatted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: RowKey,
    pub parent_id: ParentId,
    pub cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(key: RowKey, parent_id: ParentId, cells: Vec<(String, String)>) -> Self {
        Self {
            key,
            parent_id,
            cells,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Wire shape of a row. `values` keeps the server's column order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RowRecord {
    pub key: String,
    pub parent_id: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl From<RowRecord> for Row {
    fn from(record: RowRecord) -> Self {
        let cells = record
            .values
            .iter()
            .map(|(column, value)| (column.clone(), format_cell(column, value)))
            .collect();
        Row::new(RowKey(record.key), ParentId(record.parent_id), cells)
    }
}

/// One page of rows plus the total row count of the full result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub rows: Vec<RowRecord>,
    #[serde(default)]
    pub total_count: Option<usize>,
}

impl From<PageRecord> for Page {
    fn from(record: PageRecord) -> Self {
        let total_count = record.total_count.unwrap_or(record.rows.len());
        Page {
            rows: record.rows.into_iter().map(Row::from).collect(),
            total_count,
        }
    }
}

/// A nested child record of one parent row.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetailEntry {
    pub label: String,
    /// Observed value (e.g. market-implied log likelihood).
    #[serde(alias = "llik_implied")]
    pub observed: f64,
    /// Model-implied value.
    #[serde(alias = "llik_model")]
    pub model: f64,
    /// Any further fields, shown in the nested table after the fixed columns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetailEntry {
    pub fn new(label: impl Into<String>, observed: f64, model: f64) -> Self {
        Self {
            label: label.into(),
            observed,
            model,
            extra: Map::new(),
        }
    }
}

/// The children of exactly one parent row, in fetch order.
pub type DetailSet = Vec<DetailEntry>;

/// Market ids and selections arrive as strings or bare numbers depending on the writer.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

impl DetailEntry {
    /// Market this entry scores: an explicit `market_id` field, else the label.
    pub fn market_id(&self) -> String {
        match self.extra.get("market_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetSide {
    Back,
    Lay,
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::Back => f.write_str("Back"),
            BetSide::Lay => f.write_str("Lay"),
        }
    }
}

/// One placed bet, from a backtest scorecard or a paper-trading strategy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Bet {
    #[serde(default)]
    pub timestamp: String,
    #[serde(deserialize_with = "string_or_number")]
    pub market_id: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub scheduled_off: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub selection: String,
    /// Negative stakes are backs, everything else is a lay.
    pub amount: f64,
    pub odds: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bet {
    pub fn new(market_id: impl Into<String>, amount: f64, odds: f64) -> Self {
        Self {
            timestamp: String::new(),
            market_id: market_id.into(),
            event: String::new(),
            scheduled_off: String::new(),
            selection: String::new(),
            amount,
            odds,
            extra: Map::new(),
        }
    }

    pub fn side(&self) -> BetSide {
        if self.amount < 0.0 {
            BetSide::Back
        } else {
            BetSide::Lay
        }
    }
}

/// Which bets to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetsQuery {
    /// Bets a backtest scorecard placed, optionally narrowed to one market.
    Scorecard {
        parent_id: ParentId,
        market_id: Option<String>,
    },
    /// Bets a paper-trading strategy placed.
    Strategy(EntityId),
}

impl BetsQuery {
    pub fn title(&self) -> String {
        match self {
            BetsQuery::Scorecard {
                parent_id,
                market_id: Some(market),
            } => format!("Bets {} market {}", parent_id, market),
            BetsQuery::Scorecard {
                parent_id,
                market_id: None,
            } => format!("Bets {}", parent_id),
            BetsQuery::Strategy(id) => format!("Paper bets {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_record_keeps_column_order() {
        let record: RowRecord = serde_json::from_str(
            r#"{"key": "r1", "parent_id": "p1", "values": {"timestamp": "2013-05-01", "mu": 25.0, "sigma": 8.3333}}"#,
        )
        .unwrap();
        let row = Row::from(record);
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec!["timestamp", "mu", "sigma"]
        );
        assert_eq!(row.value("mu"), Some("25.00"));
        assert_eq!(row.value("sigma"), Some("8.33"));
        assert_eq!(row.parent_id, ParentId::new("p1"));
    }

    #[test]
    fn test_page_total_defaults_to_row_count() {
        let record: PageRecord =
            serde_json::from_str(r#"{"rows": [{"key": "a", "parent_id": "x"}]}"#).unwrap();
        let page = Page::from(record);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn test_detail_entry_accepts_server_field_names() {
        let entry: DetailEntry = serde_json::from_str(
            r#"{"label": "1.1093", "llik_implied": -1.5, "llik_model": -1.25, "n_runners": 9}"#,
        )
        .unwrap();
        assert_eq!(entry.observed, -1.5);
        assert_eq!(entry.model, -1.25);
        assert_eq!(entry.extra.get("n_runners"), Some(&Value::from(9)));
    }

    #[test]
    fn test_bet_side_follows_amount_sign() {
        assert_eq!(Bet::new("1", -2.0, 3.5).side(), BetSide::Back);
        assert_eq!(Bet::new("1", 2.0, 3.5).side(), BetSide::Lay);
        assert_eq!(Bet::new("1", 0.0, 3.5).side().to_string(), "Lay");
    }

    #[test]
    fn test_bet_accepts_numeric_market_and_selection() {
        let bet: Bet = serde_json::from_str(
            r#"{"timestamp": "2013-05-01T14:02:11", "market_id": 110934, "event": "Ascot 2m Hcap",
                "selection": 5417, "amount": -4.0, "odds": 6.2, "scorecard_id": "51a0"}"#,
        )
        .unwrap();
        assert_eq!(bet.market_id, "110934");
        assert_eq!(bet.selection, "5417");
        assert_eq!(bet.scheduled_off, "");
        assert_eq!(bet.extra.get("scorecard_id"), Some(&Value::from("51a0")));
    }

    #[test]
    fn test_detail_entry_market_id() {
        let mut entry = DetailEntry::new("1.1093", -1.0, -1.0);
        assert_eq!(entry.market_id(), "1.1093");
        entry.extra.insert("market_id".to_string(), Value::from(1093));
        assert_eq!(entry.market_id(), "1093");
    }

    #[test]
    fn test_bets_query_title() {
        let query = BetsQuery::Scorecard {
            parent_id: ParentId::new("51a0"),
            market_id: Some("1.1093".to_string()),
        };
        assert_eq!(query.title(), "Bets 51a0 market 1.1093");
        assert_eq!(BetsQuery::Strategy(EntityId::new("s1")).title(), "Paper bets s1");
    }
}
