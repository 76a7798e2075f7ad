use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One spreadsheet cell tagged with its sheet, row and column identity.
///
/// Cells arrive in storage order; multiple records sharing (sheet_name,
/// row_index) belong to the same logical row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CellRecord {
    pub sheet_name: String,
    pub row_index: i64,
    pub column_name: Option<String>,
    pub value: Option<String>,
}

impl CellRecord {
    pub fn new(
        sheet_name: impl Into<String>,
        row_index: i64,
        column_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row_index,
            column_name: Some(column_name.into()),
            value: Some(value.into()),
        }
    }
}

/// A rebuilt logical spreadsheet row: column name -> cell value.
///
/// Columns keep the order they were first inserted in; re-inserting an
/// existing column overwrites its value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructedRow {
    entries: Vec<(String, String)>,
}

impl ReconstructedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: String, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ReconstructedRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

// Serialized as a plain JSON object so the frontend receives row objects.
impl Serialize for ReconstructedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// All reconstructed rows of one sheet, ordered by ascending row index.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub rows: Vec<ReconstructedRow>,
}
