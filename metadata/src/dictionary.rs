//! Tabular variable dictionaries (`.csv`, `.xlsx`, `.sav`) and their categorical sets.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::DictionaryError;
use crate::normalize::normalize_text;
use crate::sav::read_sav;

/// Column holding variable names.
pub const VARIABLE_COLUMN: &str = "variablename";

/// Column holding pipe-joined category labels.
pub const CATEGORICAL_COLUMN: &str = "categorical";

/// Supported dictionary file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Excel workbook; only the first sheet is read.
    Xlsx,
    /// SPSS system file; one row per case.
    Sav,
}

impl DictionaryFormat {
    /// Infers the format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "sav" => Some(Self::Sav),
            _ => None,
        }
    }
}

/// A loaded dictionary: one header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDictionary {
    /// Source file.
    pub path: PathBuf,
    /// Header names as they appear in the file.
    pub headers: Vec<String>,
    /// Data rows; short rows are padded with empty cells.
    pub rows: Vec<Vec<String>>,
}

impl DataDictionary {
    /// Index of the column named `name`, ignoring case and surrounding space.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Cell at `row` in the column named `name`.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn from_table(path: &Path, mut table: Vec<Vec<String>>) -> Option<Self> {
        if table.len() < 2 {
            return None;
        }
        let rows = table.split_off(1);
        let headers = table.into_iter().next().unwrap_or_default();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                if r.len() < width {
                    r.resize(width, String::new());
                }
                r
            })
            .collect();
        Some(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }
}

/// Loads a dictionary file.
///
/// Returns `Ok(None)` when the file has a header but no data rows.
///
/// # Errors
///
/// Returns [`DictionaryError::UnsupportedFormat`] for any extension other
/// than `.csv`, `.xlsx` or `.sav`, or a read error from the underlying
/// reader.
pub fn load_dictionary(path: &Path) -> Result<Option<DataDictionary>, DictionaryError> {
    let table = match DictionaryFormat::from_path(path) {
        Some(DictionaryFormat::Csv) => read_csv(path)?,
        Some(DictionaryFormat::Xlsx) => read_xlsx(path)?,
        Some(DictionaryFormat::Sav) => read_sav_file(path)?,
        None => return Err(DictionaryError::UnsupportedFormat(path.to_path_buf())),
    };
    let dictionary = DataDictionary::from_table(path, table);
    match &dictionary {
        Some(d) => info!(path = %path.display(), rows = d.len(), "loaded dictionary"),
        None => info!(path = %path.display(), "dictionary has no rows"),
    }
    Ok(dictionary)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, DictionaryError> {
    let wrap = |source| DictionaryError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(wrap)?;
    let mut table = Vec::new();
    for record in reader.records() {
        let record = record.map_err(wrap)?;
        table.push(record.iter().map(str::to_owned).collect());
    }
    Ok(table)
}

fn read_xlsx(path: &Path) -> Result<Vec<Vec<String>>, DictionaryError> {
    let wrap = |source| DictionaryError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(wrap)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    let range = range.map_err(wrap)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect())
}

fn read_sav_file(path: &Path) -> Result<Vec<Vec<String>>, DictionaryError> {
    let data = std::fs::read(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_sav(&data).map_err(|source| DictionaryError::Sav {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds every `.csv`, `.xlsx` and `.sav` file under `dir`, sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked.
pub fn discover_dictionaries(dir: &Path) -> Result<Vec<PathBuf>, DictionaryError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| DictionaryError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && DictionaryFormat::from_path(entry.path()).is_some() {
            found.push(entry.into_path());
        }
    }
    found.sort();
    debug!(dir = %dir.display(), count = found.len(), "discovered dictionaries");
    Ok(found)
}

/// Normalized names of categorical variables, split by category count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoricalSets {
    /// Variables with exactly two categories.
    pub binary: BTreeSet<String>,
    /// Variables with any other number of categories.
    pub multi: BTreeSet<String>,
}

/// Splits the dictionary's categorical variables into binary and
/// multi-class sets.
///
/// A row counts when its `categorical` cell is non-blank; exactly two
/// `|`-separated parts make it binary. Rows whose name normalizes to
/// nothing are skipped, as are dictionaries lacking either column.
#[must_use]
pub fn categorical_sets(dictionary: &DataDictionary) -> CategoricalSets {
    let mut sets = CategoricalSets::default();
    let (Some(name_col), Some(cat_col)) = (
        dictionary.column(VARIABLE_COLUMN),
        dictionary.column(CATEGORICAL_COLUMN),
    ) else {
        return sets;
    };

    for row in &dictionary.rows {
        let (Some(name), Some(categories)) = (row.get(name_col), row.get(cat_col)) else {
            continue;
        };
        if categories.trim().is_empty() {
            continue;
        }
        let Some(name) = normalize_text(name) else {
            continue;
        };
        if categories.split('|').count() == 2 {
            sets.binary.insert(name);
        } else {
            sets.multi.insert(name);
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "VariableName,VariableLabel,Categorical\n\
Sex,Sex of patient,1=Male|2=Female\n\
NYHA,NYHA class,1=I|2=II|3=III|4=IV\n\
Age,Age at baseline,\n\
Smoking Status,Smoker,never|former|current\n";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_case_insensitive_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "dict.csv", CSV);
        let dict = load_dictionary(&path).unwrap().unwrap();
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.get(0, "variablename"), Some("Sex"));
        assert_eq!(dict.get(2, "CATEGORICAL"), Some(""));
    }

    #[test]
    fn header_only_csv_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty.csv", "variablename,categorical\n");
        assert!(load_dictionary(&path).unwrap().is_none());
    }

    #[test]
    fn unsupported_extensions() {
        for name in ["dict.zsav", "dict.txt", "dict"] {
            let err = load_dictionary(Path::new(name)).unwrap_err();
            assert!(matches!(err, DictionaryError::UnsupportedFormat(_)));
        }
    }

    #[test]
    fn loads_spss_dictionary() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/time_chf_dictionary.sav");
        let dict = load_dictionary(&path).unwrap().unwrap();
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.get(0, "variablename"), Some("sex"));
        assert_eq!(dict.get(3, "vartype"), Some("str"));
        assert_eq!(dict.get(0, "required"), Some("yes"));

        let sets = categorical_sets(&dict);
        assert_eq!(sets.binary.iter().collect::<Vec<_>>(), vec!["sex"]);
        assert_eq!(sets.multi.iter().collect::<Vec<_>>(), vec!["nyha"]);
    }

    #[test]
    fn corrupt_spss_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "broken.sav", "$FL2 but nothing else");
        let err = load_dictionary(&path).unwrap_err();
        assert!(matches!(err, DictionaryError::Sav { .. }));
        assert!(err.to_string().contains("broken.sav"));
    }

    #[test]
    fn categorical_split_by_part_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "dict.csv", CSV);
        let sets = categorical_sets(&load_dictionary(&path).unwrap().unwrap());
        assert_eq!(sets.binary.iter().collect::<Vec<_>>(), vec!["sex"]);
        assert_eq!(sets.multi.iter().collect::<Vec<_>>(), vec!["nyha", "smoking_status"]);
    }

    #[test]
    fn missing_columns_give_empty_sets() {
        let dict = DataDictionary {
            path: PathBuf::from("x.csv"),
            headers: vec!["name".into()],
            rows: vec![vec!["a".into()]],
        };
        assert_eq!(categorical_sets(&dict), CategoricalSets::default());
    }

    #[test]
    fn discovery_finds_supported_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write(dir.path(), "a.csv", CSV);
        write(&dir.path().join("nested"), "b.XLSX", "");
        write(dir.path(), "c.sav", "");
        write(dir.path(), "notes.txt", "");
        let found = discover_dictionaries(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "c.sav", "b.XLSX"]);
    }
}
