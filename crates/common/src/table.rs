//! Tabular query results.

use crate::value::Scalar;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use wealthlens_error::{ErrorCode, WealthlensError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Integer,
    Float,
    Text,
    Date,
    Timestamp,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }
}

/// Rows and named columns returned by a statement.
///
/// Every row has exactly one cell per column. Row order is the order the
/// warehouse returned them in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Scalar>>,
}

impl ResultTable {
    pub fn empty(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn try_from_rows(
        columns: Vec<Column>,
        rows: Vec<Vec<Scalar>>,
    ) -> wealthlens_error::Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(WealthlensError::new(
                ErrorCode::ResultDecodeFailed,
                format!(
                    "Row {} has {} cells but the result declares {} columns",
                    idx,
                    row.len(),
                    columns.len()
                ),
            ));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column position by name. Exact matches win, then ASCII case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Scalar> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    pub fn first_i64(&self, column: &str) -> Option<i64> {
        self.value(0, column).and_then(Scalar::as_i64)
    }

    pub fn first_f64(&self, column: &str) -> Option<f64> {
        self.value(0, column).and_then(Scalar::as_f64)
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record { table: self, cells })
    }
}

/// Borrowed view of one row with lookups by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a ResultTable,
    cells: &'a [Scalar],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Scalar> {
        self.table
            .column_index(column)
            .and_then(|idx| self.cells.get(idx))
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column)
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
    }

    pub fn i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Scalar::as_i64)
    }

    pub fn f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Scalar::as_f64)
    }
}

struct RowRef<'a>(&'a [Column], &'a [Scalar]);

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (col, cell) in self.0.iter().zip(self.1) {
            map.serialize_entry(&col.name, cell)?;
        }
        map.end()
    }
}

/// Serialized as an array of `{column: value}` objects.
impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRef(&self.columns, row))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients() -> ResultTable {
        ResultTable::try_from_rows(
            vec![
                Column::new("CLIENT_ID", ColumnType::Text),
                Column::new("AUM", ColumnType::Float),
            ],
            vec![
                vec![Scalar::Text("CLI_001".into()), Scalar::Float(1250000.5)],
                vec![Scalar::Text("CLI_002".into()), Scalar::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = ResultTable::try_from_rows(
            vec![Column::new("X", ColumnType::Integer)],
            vec![vec![Scalar::Integer(1), Scalar::Integer(2)]],
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResultDecodeFailed);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = clients();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.first_f64("aum"), Some(1250000.5));
        assert_eq!(
            table.value(1, "client_id").and_then(Scalar::as_str),
            Some("CLI_002")
        );
        assert!(table.value(5, "AUM").is_none());
        assert!(table.value(0, "MISSING").is_none());
    }

    #[test]
    fn test_records_iterate_in_order() {
        let table = clients();
        let ids: Vec<String> = table.records().filter_map(|r| r.text("CLIENT_ID")).collect();
        assert_eq!(ids, vec!["CLI_001", "CLI_002"]);
        assert_eq!(table.records().nth(1).and_then(|r| r.f64("AUM")), None);
    }

    #[test]
    fn test_serializes_as_objects() {
        let json = serde_json::to_value(clients()).unwrap();
        assert_eq!(json[0]["CLIENT_ID"], "CLI_001");
        assert!(json[1]["AUM"].is_null());
    }
}
