// ── Tabular input ──
//
// CSV and spreadsheet exports are both read into a header row plus string
// cells. Empty cells read as absent.

use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::CoreError;

/// Header row plus data rows, all cells as trimmed strings.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            headers: &self.headers,
            cells,
        })
    }

    /// Parse CSV with a header row. Ragged rows are tolerated.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_owned).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn read_csv(path: &Path) -> Result<Self, CoreError> {
        let file = std::fs::File::open(path).map_err(|e| input_error(path, &e))?;
        Self::from_csv_reader(file).map_err(|e| input_error(path, &e))
    }

    /// Read the first worksheet of an xlsx/xls workbook.
    pub fn read_workbook(path: &Path) -> Result<Self, CoreError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| input_error(path, &e))?;

        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CoreError::Input {
                path: path.to_path_buf(),
                message: "workbook has no sheets".into(),
            })?;

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| input_error(path, &e))?;

        let mut iter = range.rows();
        let headers = iter
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();

        let rows = iter
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .filter(|cells| !cells.iter().all(String::is_empty))
            .collect();

        Ok(Self { headers, rows })
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_owned(),
    }
}

fn input_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Input {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// One data row with header-based lookup.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Non-empty cell under the exact header `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == name)?;
        self.cell(idx)
    }

    /// First non-empty cell among `names`, tried in order.
    pub fn first(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|n| self.get(n))
    }

    /// First non-empty cell whose folded header matches one of `keys`.
    ///
    /// Headers fold to lowercase with spaces, underscores, and hyphens
    /// removed, so `Cidr Block`, `cidr_block`, and `CidrBlock` all match
    /// `cidrblock`. Returns the header used along with the value.
    pub fn sniff(&self, keys: &[&str]) -> Option<(&'a str, &'a str)> {
        keys.iter().find_map(|key| {
            self.headers
                .iter()
                .enumerate()
                .filter(|(_, h)| fold_header(h) == *key)
                .find_map(|(idx, h)| self.cell(idx).map(|v| (h.as_str(), v)))
        })
    }

    /// Every non-empty `(header, value)` pair in column order.
    pub fn pairs(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        let row = self;
        self.headers
            .iter()
            .enumerate()
            .filter_map(move |(idx, h)| row.cell(idx).map(|v| (h.as_str(), v)))
    }

    fn cell(&self, idx: usize) -> Option<&'a str> {
        self.cells
            .get(idx)
            .map(String::as_str)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("nan"))
    }
}

pub(crate) fn fold_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
