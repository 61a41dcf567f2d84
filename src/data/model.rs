// ---------------------------------------------------------------------------
// Table – a header plus row-major numeric cells, as read from disk
// ---------------------------------------------------------------------------

/// A numeric table with named columns. Missing cells are `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major values; every row has `columns.len()` cells.
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Table { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}

// ---------------------------------------------------------------------------
// FeatureTable – model inputs, one row per sample
// ---------------------------------------------------------------------------

/// Model inputs. Column names are trusted as given.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    table: Table,
}

impl FeatureTable {
    pub fn new(table: Table) -> Self {
        FeatureTable { table }
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.table.rows
    }

    /// Position of the named column, if the schema has it.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.table.columns.iter().position(|c| c == name)
    }

    /// Value of the named column in `row`, or `None` when the schema lacks it.
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let col = self.column_index(name)?;
        self.table.rows.get(row).map(|r| r[col])
    }

    pub fn shape(&self) -> (usize, usize) {
        self.table.shape()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TargetTable – ground-truth yield, aligned with the feature rows
// ---------------------------------------------------------------------------

/// Ground-truth yields. Only the first column of the source file is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTable {
    /// Name of the yield column in the source file.
    pub column: String,
    pub values: Vec<f64>,
}

impl TargetTable {
    /// Take the first column of `table`. Returns `None` for a table without columns.
    pub fn from_first_column(table: Table) -> Option<Self> {
        let column = table.columns.first()?.clone();
        let values = table.rows.iter().map(|r| r[0]).collect();
        Some(TargetTable { column, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
