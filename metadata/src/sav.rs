//! SPSS system files (`.sav`).
//!
//! Decodes the dictionary records and the case data of an uncompressed or
//! bytecode-compressed system file into a header row followed by one row of
//! string cells per case. Headers use the long variable names when the file
//! records them. Numeric cells carrying a value label are replaced by the
//! label; system-missing values become empty cells. ZLIB-compressed files
//! (`$FL3`, usually `.zsav`) are rejected.

use std::collections::HashMap;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use thiserror::Error;
use tracing::{debug, warn};

const SYSMIS: f64 = -f64::MAX;

/// Bytes of a very long string segment that carry data.
const SEGMENT_DATA: usize = 252;

/// Failure to decode a system file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SavError {
    /// The file does not start with a system-file header.
    #[error("not an SPSS system file")]
    NotSystemFile,

    /// The file ended inside a record.
    #[error("truncated at {context} (need {need} bytes at offset {offset}, have {len})")]
    Truncated {
        /// Field being read.
        context: &'static str,
        /// Bytes required.
        need: usize,
        /// Offset of the read.
        offset: usize,
        /// Total file length.
        len: usize,
    },

    /// A count or length field is negative or out of range.
    #[error("invalid {context} value {value}")]
    InvalidLength {
        /// Field being read.
        context: &'static str,
        /// Raw value.
        value: i32,
    },

    /// The compression code is not 0 (none) or 1 (bytecode).
    #[error("unsupported compression code {0}")]
    UnsupportedCompression(i32),

    /// A dictionary record has an unknown type.
    #[error("unknown record type {rec_type} at offset {offset}")]
    UnknownRecord {
        /// Record type found.
        rec_type: i32,
        /// Offset of the record.
        offset: usize,
    },
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    big_endian: bool,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, need: usize, context: &'static str) -> Result<&'a [u8], SavError> {
        let end = self
            .pos
            .checked_add(need)
            .filter(|&end| end <= self.data.len())
            .ok_or(SavError::Truncated {
                context,
                need,
                offset: self.pos,
                len: self.data.len(),
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], SavError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, context)?);
        Ok(buf)
    }

    fn i32(&mut self, context: &'static str) -> Result<i32, SavError> {
        let raw = self.array::<4>(context)?;
        Ok(decode_i32(raw, self.big_endian))
    }

    fn f64(&mut self, context: &'static str) -> Result<f64, SavError> {
        let raw = self.array::<8>(context)?;
        Ok(decode_f64(raw, self.big_endian))
    }

    fn count(&mut self, context: &'static str) -> Result<usize, SavError> {
        let value = self.i32(context)?;
        usize::try_from(value).map_err(|_| SavError::InvalidLength { context, value })
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

fn decode_i32(raw: [u8; 4], big_endian: bool) -> i32 {
    if big_endian {
        i32::from_be_bytes(raw)
    } else {
        i32::from_le_bytes(raw)
    }
}

fn decode_f64(raw: [u8; 8], big_endian: bool) -> f64 {
    if big_endian {
        f64::from_be_bytes(raw)
    } else {
        f64::from_le_bytes(raw)
    }
}

fn round_up(n: usize, to: usize) -> usize {
    n.div_ceil(to) * to
}

/// One variable record, before long-name and very-long-string resolution.
struct VariableRecord {
    short_name: Vec<u8>,
    /// 0 for numeric, else the string width in bytes.
    width: usize,
    /// First 8-byte element of the variable within a case.
    element: usize,
}

/// Dictionary state collected before the case data.
struct Dictionary {
    variables: Vec<VariableRecord>,
    /// Element type per case slot; true for string elements.
    string_elements: Vec<bool>,
    /// Raw value labels keyed by 0-based element index.
    value_labels: HashMap<usize, Vec<([u8; 8], Vec<u8>)>>,
    long_names: Option<Vec<u8>>,
    very_long_strings: Option<Vec<u8>>,
    encoding_label: Option<Vec<u8>>,
    code_page: Option<i32>,
}

/// A resolved output column.
struct Column {
    name: String,
    numeric: bool,
    /// `(first element, data bytes)` per segment.
    pieces: Vec<(usize, usize)>,
    labels: Vec<(f64, String)>,
}

#[derive(Clone, Copy)]
enum Element {
    Number(Option<f64>),
    Text([u8; 8]),
}

/// Decodes a system file into a header row plus one row per case.
///
/// # Errors
///
/// Returns [`SavError`] when the header is not a system file, a record is
/// truncated or unknown, or the data uses ZLIB compression.
pub fn read_sav(data: &[u8]) -> Result<Vec<Vec<String>>, SavError> {
    let mut cur = Cursor {
        data,
        pos: 0,
        big_endian: false,
    };

    let magic = cur.take(4, "magic")?;
    if magic == b"$FL3" {
        return Err(SavError::UnsupportedCompression(2));
    }
    if magic != b"$FL2" {
        return Err(SavError::NotSystemFile);
    }
    cur.take(60, "product name")?;
    let layout = cur.array::<4>("layout code")?;
    cur.big_endian = match (i32::from_le_bytes(layout), i32::from_be_bytes(layout)) {
        (2 | 3, _) => false,
        (_, 2 | 3) => true,
        _ => return Err(SavError::NotSystemFile),
    };
    cur.i32("nominal case size")?;
    let compression = cur.i32("compression")?;
    if compression != 0 && compression != 1 {
        return Err(SavError::UnsupportedCompression(compression));
    }
    cur.i32("weight index")?;
    let case_count = usize::try_from(cur.i32("case count")?).ok();
    let bias = cur.f64("bias")?;
    cur.take(9 + 8 + 64 + 3, "creation date and file label")?;

    let dictionary = read_dictionary(&mut cur)?;
    let encoding = dictionary_encoding(&dictionary);
    let columns = resolve_columns(&dictionary, encoding, cur.big_endian);
    debug!(
        columns = columns.len(),
        elements = dictionary.string_elements.len(),
        compressed = compression == 1,
        encoding = encoding.name(),
        "decoded SPSS dictionary"
    );

    let cases = if compression == 1 {
        read_compressed_cases(&mut cur, &dictionary.string_elements, bias, case_count)?
    } else {
        read_plain_cases(&mut cur, &dictionary.string_elements, case_count)?
    };

    let mut table = Vec::with_capacity(cases.len() + 1);
    table.push(columns.iter().map(|c| c.name.clone()).collect());
    for case in &cases {
        table.push(columns.iter().map(|c| cell(c, case, encoding)).collect());
    }
    Ok(table)
}

fn read_dictionary(cur: &mut Cursor<'_>) -> Result<Dictionary, SavError> {
    let mut dict = Dictionary {
        variables: Vec::new(),
        string_elements: Vec::new(),
        value_labels: HashMap::new(),
        long_names: None,
        very_long_strings: None,
        encoding_label: None,
        code_page: None,
    };

    loop {
        let offset = cur.pos;
        match cur.i32("record type")? {
            2 => read_variable(cur, &mut dict)?,
            3 => read_value_labels(cur, &mut dict)?,
            6 => {
                let lines = cur.count("document line count")?;
                cur.take(lines.saturating_mul(80), "document lines")?;
            }
            7 => read_extension(cur, &mut dict)?,
            999 => {
                cur.i32("dictionary terminator")?;
                return Ok(dict);
            }
            rec_type => return Err(SavError::UnknownRecord { rec_type, offset }),
        }
    }
}

fn read_variable(cur: &mut Cursor<'_>, dict: &mut Dictionary) -> Result<(), SavError> {
    let kind = cur.i32("variable type")?;
    let has_label = cur.i32("variable label flag")?;
    let missing = cur.i32("missing value count")?;
    cur.take(8, "print and write formats")?;
    let name = cur.take(8, "variable name")?;
    if has_label == 1 {
        let len = cur.count("variable label length")?;
        cur.take(round_up(len, 4), "variable label")?;
    }
    let missing = usize::try_from(missing.unsigned_abs()).unwrap_or(0);
    cur.take(missing.saturating_mul(8), "missing values")?;

    let element = dict.string_elements.len();
    if kind == -1 {
        dict.string_elements.push(true);
        return Ok(());
    }
    let width = usize::try_from(kind).map_err(|_| SavError::InvalidLength {
        context: "variable type",
        value: kind,
    })?;
    dict.string_elements.push(width > 0);
    dict.variables.push(VariableRecord {
        short_name: name.to_vec(),
        width,
        element,
    });
    Ok(())
}

fn read_value_labels(cur: &mut Cursor<'_>, dict: &mut Dictionary) -> Result<(), SavError> {
    let count = cur.count("value label count")?;
    let mut labels = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let value = cur.array::<8>("value label value")?;
        let [len] = cur.array::<1>("value label length")?;
        let len = usize::from(len);
        let label = cur.take(len, "value label")?;
        cur.take(round_up(len + 1, 8) - (len + 1), "value label padding")?;
        labels.push((value, label.to_vec()));
    }

    let offset = cur.pos;
    let rec_type = cur.i32("value label variables record")?;
    if rec_type != 4 {
        return Err(SavError::UnknownRecord { rec_type, offset });
    }
    let vars = cur.count("value label variable count")?;
    for _ in 0..vars {
        let index = cur.count("value label variable index")?;
        if let Some(element) = index.checked_sub(1) {
            dict.value_labels
                .entry(element)
                .or_default()
                .extend(labels.iter().cloned());
        }
    }
    Ok(())
}

fn read_extension(cur: &mut Cursor<'_>, dict: &mut Dictionary) -> Result<(), SavError> {
    let subtype = cur.i32("extension subtype")?;
    let size = cur.count("extension element size")?;
    let count = cur.count("extension element count")?;
    let body = cur.take(size.saturating_mul(count), "extension body")?;
    match subtype {
        3 if size == 4 && count >= 8 => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&body[28..32]);
            dict.code_page = Some(decode_i32(raw, cur.big_endian));
        }
        13 => dict.long_names = Some(body.to_vec()),
        14 => dict.very_long_strings = Some(body.to_vec()),
        20 => dict.encoding_label = Some(body.to_vec()),
        _ => {}
    }
    Ok(())
}

fn dictionary_encoding(dict: &Dictionary) -> &'static Encoding {
    if let Some(encoding) = dict
        .encoding_label
        .as_deref()
        .and_then(|label| Encoding::for_label(trim_bytes(label)))
    {
        return encoding;
    }
    match dict.code_page {
        Some(65001) => UTF_8,
        Some(cp) => Encoding::for_label(format!("windows-{cp}").as_bytes()).unwrap_or(WINDOWS_1252),
        None => WINDOWS_1252,
    }
}

fn trim_bytes(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !matches!(b, b' ' | 0))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(trim_bytes(bytes));
    text.into_owned()
}

/// Parses `KEY=VALUE` pairs separated by tabs or NULs.
fn key_values(body: &[u8], encoding: &'static Encoding) -> HashMap<String, String> {
    decode_text(body, encoding)
        .split(['\t', '\0'])
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.trim().to_owned(), value.trim().to_owned()))
        })
        .collect()
}

fn resolve_columns(dict: &Dictionary, encoding: &'static Encoding, big_endian: bool) -> Vec<Column> {
    let long_names = dict
        .long_names
        .as_deref()
        .map(|body| key_values(body, encoding))
        .unwrap_or_default();
    let very_long: HashMap<String, usize> = dict
        .very_long_strings
        .as_deref()
        .map(|body| key_values(body, encoding))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, width)| Some((name, width.parse().ok()?)))
        .collect();

    let mut columns = Vec::new();
    let mut records = dict.variables.iter();
    while let Some(record) = records.next() {
        let short = decode_text(&record.short_name, encoding);
        let name = long_names.get(&short).cloned().unwrap_or_else(|| short.clone());

        let pieces = match very_long.get(&short) {
            Some(&width) if width > record.width => {
                let segments = width.div_ceil(SEGMENT_DATA);
                let mut pieces = vec![(record.element, SEGMENT_DATA.min(width))];
                for k in 1..segments {
                    let Some(next) = records.next() else { break };
                    let used = if k + 1 == segments {
                        width - SEGMENT_DATA * k
                    } else {
                        SEGMENT_DATA
                    };
                    pieces.push((next.element, used));
                }
                pieces
            }
            _ => vec![(record.element, record.width)],
        };

        let labels = if record.width == 0 {
            dict.value_labels
                .get(&record.element)
                .map(|labels| {
                    labels
                        .iter()
                        .map(|(raw, label)| (decode_f64(*raw, big_endian), decode_text(label, encoding)))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        columns.push(Column {
            name,
            numeric: record.width == 0,
            pieces,
            labels,
        });
    }
    columns
}

fn read_plain_cases(
    cur: &mut Cursor<'_>,
    layout: &[bool],
    case_count: Option<usize>,
) -> Result<Vec<Vec<Element>>, SavError> {
    let mut cases = Vec::new();
    while case_count.map_or(!cur.at_end(), |n| cases.len() < n) {
        let mut case = Vec::with_capacity(layout.len());
        for &is_string in layout {
            let raw = cur.array::<8>("case data")?;
            case.push(if is_string {
                Element::Text(raw)
            } else {
                number(decode_f64(raw, cur.big_endian))
            });
        }
        cases.push(case);
    }
    Ok(cases)
}

/// Command bytes of the current compression block.
struct Bytecode {
    codes: [u8; 8],
    next: usize,
}

impl Bytecode {
    /// Next command byte, or `None` once the data is exhausted.
    fn next_code(&mut self, cur: &mut Cursor<'_>) -> Result<Option<u8>, SavError> {
        if self.next == self.codes.len() {
            if cur.at_end() {
                return Ok(None);
            }
            self.codes = cur.array::<8>("compression block")?;
            self.next = 0;
        }
        let code = self.codes[self.next];
        self.next += 1;
        Ok(Some(code))
    }
}

fn read_compressed_cases(
    cur: &mut Cursor<'_>,
    layout: &[bool],
    bias: f64,
    case_count: Option<usize>,
) -> Result<Vec<Vec<Element>>, SavError> {
    let mut bytecode = Bytecode {
        codes: [0; 8],
        next: 8,
    };
    let mut cases = Vec::new();
    'cases: while case_count.map_or(true, |n| cases.len() < n) {
        let mut case = Vec::with_capacity(layout.len());
        for &is_string in layout {
            let element = loop {
                let code = match bytecode.next_code(cur)? {
                    None | Some(252) => break 'cases,
                    Some(0) => continue,
                    Some(code) => code,
                };
                break match (code, is_string) {
                    (253, true) => Element::Text(cur.array::<8>("case data")?),
                    (253, false) => number(decode_f64(cur.array::<8>("case data")?, cur.big_endian)),
                    (254, _) | (255, true) => Element::Text([b' '; 8]),
                    (255, false) => Element::Number(None),
                    (code, false) => Element::Number(Some(f64::from(code) - bias)),
                    (_, true) => Element::Text([b' '; 8]),
                };
            };
            case.push(element);
        }
        cases.push(case);
    }
    if let Some(expected) = case_count.filter(|&n| n != cases.len()) {
        warn!(expected, found = cases.len(), "SPSS case count mismatch");
    }
    Ok(cases)
}

fn number(value: f64) -> Element {
    if value == SYSMIS {
        Element::Number(None)
    } else {
        Element::Number(Some(value))
    }
}

fn cell(column: &Column, case: &[Element], encoding: &'static Encoding) -> String {
    if column.numeric {
        let Some(&(element, _)) = column.pieces.first() else {
            return String::new();
        };
        return match case.get(element) {
            Some(Element::Number(Some(value))) => column
                .labels
                .iter()
                .find(|(labelled, _)| labelled == value)
                .map_or_else(|| value.to_string(), |(_, label)| label.clone()),
            _ => String::new(),
        };
    }

    let mut bytes = Vec::new();
    for &(first, len) in &column.pieces {
        let mut piece = Vec::with_capacity(round_up(len, 8));
        for element in case.iter().skip(first).take(len.div_ceil(8)) {
            if let Element::Text(chunk) = element {
                piece.extend_from_slice(chunk);
            }
        }
        piece.truncate(len);
        bytes.extend_from_slice(&piece);
    }
    decode_text(&bytes, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<u8> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/time_chf_dictionary.sav");
        std::fs::read(path).unwrap()
    }

    #[test]
    fn decodes_compressed_file_with_long_names_and_labels() {
        let table = read_sav(&fixture()).unwrap();
        assert_eq!(
            table[0],
            vec!["VariableName", "VariableLabel", "Categorical", "VarType", "Required"]
        );
        assert_eq!(table.len(), 5);
        assert_eq!(table[1], vec!["sex", "Sex of patient", "1=Male|2=Female", "int", "yes"]);
        assert_eq!(table[3][2], "1=I|2=II|3=III|4=IV");
        assert_eq!(table[3][4], "no");
        assert_eq!(table[4], vec!["comments", "Free text", "", "str", ""]);
    }

    #[test]
    fn rejects_other_files() {
        assert_eq!(read_sav(b"PK\x03\x04 not spss"), Err(SavError::NotSystemFile));
        assert_eq!(read_sav(b"$FL3"), Err(SavError::UnsupportedCompression(2)));
    }

    #[test]
    fn truncated_dictionary_is_an_error() {
        let data = fixture();
        let err = read_sav(&data[..200]).unwrap_err();
        assert!(matches!(err, SavError::Truncated { .. }), "{err:?}");
    }

    #[test]
    fn very_long_strings_span_segments() {
        let column = Column {
            name: "Definition".into(),
            numeric: false,
            pieces: vec![(0, 252), (32, 8)],
            labels: Vec::new(),
        };
        let mut case = vec![Element::Text([b'a'; 8]); 32];
        case.push(Element::Text(*b"tail    "));
        let text = cell(&column, &case, UTF_8);
        assert_eq!(text.len(), 252 + 4);
        assert!(text.ends_with("aaatail"));
    }
}
