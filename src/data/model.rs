use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// Raw cell contents treated as missing.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "TRUE", "true"];
const FALSE_VALUES: &[&str] = &["False", "FALSE", "false"];

/// A dynamically-typed cell value.
/// Histogram bins and distinct-value sets are keyed by `Value`, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so we can put Value in BTreeSet / BTreeMap --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Integral floats keep a trailing ".0" so 1 and 1.0 stay distinguishable.
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Null => write!(f, "NaN"),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Whether a raw cell should be read as missing.
pub fn is_na(raw: &str) -> bool {
    NA_VALUES.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&raw) {
        Some(true)
    } else if FALSE_VALUES.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Storage type inferred for a column from all of its raw cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    /// Free-form text, or a mix that no narrower kind can hold.
    Text,
}

impl ColumnKind {
    /// Infer the kind from raw cells (`None` = missing).
    fn infer(raw: &[Option<String>]) -> Self {
        let present: Vec<&str> = raw.iter().flatten().map(String::as_str).collect();
        let has_missing = present.len() < raw.len();

        if present.is_empty() {
            return ColumnKind::Float;
        }
        if present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
            return if has_missing {
                ColumnKind::Float
            } else {
                ColumnKind::Integer
            };
        }
        if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
            return ColumnKind::Float;
        }
        if !has_missing && present.iter().all(|s| parse_bool(s).is_some()) {
            return ColumnKind::Bool;
        }
        ColumnKind::Text
    }
}

/// One named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    /// Build a typed column from raw cells, inferring the kind first and then
    /// converting every cell to it.
    pub fn from_raw(name: impl Into<String>, raw: Vec<Option<String>>) -> Self {
        let kind = ColumnKind::infer(&raw);
        let values = raw
            .into_iter()
            .map(|cell| match cell {
                None => Value::Null,
                Some(s) => match kind {
                    ColumnKind::Integer => s
                        .trim()
                        .parse()
                        .map(Value::Integer)
                        .unwrap_or(Value::Text(s)),
                    ColumnKind::Float => s
                        .trim()
                        .parse()
                        .map(Value::Float)
                        .unwrap_or(Value::Text(s)),
                    ColumnKind::Bool => parse_bool(&s).map(Value::Bool).unwrap_or(Value::Text(s)),
                    ColumnKind::Text => Value::Text(s),
                },
            })
            .collect();
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the column holds free-form text rather than numbers or flags.
    pub fn is_textual(&self) -> bool {
        self.kind == ColumnKind::Text
    }

    /// Non-missing values in row order.
    pub fn present(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Sorted set of distinct non-missing values.
    pub fn unique_values(&self) -> BTreeSet<&Value> {
        self.present().collect()
    }

    /// Number of distinct non-missing values.
    pub fn n_unique(&self) -> usize {
        self.unique_values().len()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Assemble a table from raw rows. Rows shorter than `names` are padded
    /// with missing cells; callers reject longer rows before getting here.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let mut raw_columns: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            let mut cells = row.into_iter();
            for column in raw_columns.iter_mut() {
                column.push(cells.next().flatten());
            }
        }
        let columns = names
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column::from_raw(name, raw))
            .collect();
        Table { columns }
    }

    #[cfg(test)]
    pub fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "columns must have equal length"
        );
        Table { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Ordered list of column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.first().map_or(true, Column::is_empty)
    }

    /// Replace every column name, in order.
    pub fn rename_columns(&mut self, names: impl IntoIterator<Item = String>) {
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
    }

    /// Row `idx` as a vector of cells.
    pub fn row(&self, idx: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// A new table holding the given rows, in the given order. Column kinds are kept.
    pub fn take(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|s| if is_na(s) { None } else { Some(s.to_string()) })
            .collect()
    }

    #[test]
    fn infers_integer_column() {
        let col = Column::from_raw("a", raw(&["1", "2", "3"]));
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.values[1], Value::Integer(2));
    }

    #[test]
    fn missing_cells_widen_integers_to_floats() {
        let col = Column::from_raw("a", raw(&["1", "", "3"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.values, vec![Value::Float(1.0), Value::Null, Value::Float(3.0)]);
    }

    #[test]
    fn mixed_cells_are_text() {
        let col = Column::from_raw("a", raw(&["1", "tcp", "2.5"]));
        assert!(col.is_textual());
        assert_eq!(col.values[0], Value::Text("1".into()));
    }

    #[test]
    fn booleans_with_gaps_are_text() {
        assert_eq!(Column::from_raw("a", raw(&["True", "false"])).kind, ColumnKind::Bool);
        assert_eq!(Column::from_raw("a", raw(&["True", "NA"])).kind, ColumnKind::Text);
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let col = Column::from_raw("a", raw(&["", "NaN"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.n_unique(), 0);
    }

    #[test]
    fn n_unique_ignores_missing() {
        let col = Column::from_raw("a", raw(&["x", "y", "", "x"]));
        assert_eq!(col.n_unique(), 2);
    }

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Integer(2).to_string(), "2");
        assert_eq!(Value::Null.to_string(), "NaN");
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Some("1".into()), Some("x".into())],
                vec![Some("2".into())],
            ],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("b").unwrap().values[1], Value::Null);
    }

    #[test]
    fn take_selects_rows_in_order() {
        let table = Table::from_rows(
            vec!["a".into()],
            (0..5).map(|i| vec![Some(i.to_string())]).collect(),
        );
        let subset = table.take(&[3, 0]);
        assert_eq!(
            subset.column("a").unwrap().values,
            vec![Value::Integer(3), Value::Integer(0)]
        );
        assert_eq!(subset.columns()[0].kind, ColumnKind::Integer);
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.n_columns(), 0);
    }
}
