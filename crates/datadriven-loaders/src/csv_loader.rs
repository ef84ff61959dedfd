use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use datadriven_annotate::data;
use datadriven_core::{AttributeStore, DataDrivenError, DataLoader, LabeledData};
use serde_json::Value;

use crate::coerce_cell;

/// Loads labeled datasets from CSV. Each row becomes one entry.
///
/// When the first cell of the first row is the label header (`label` by
/// default) the file is headered: datasets are objects keyed by column name,
/// and the label column supplies the entry label. Otherwise the first cell of
/// every row is the label and the remaining cells form an array dataset.
/// Label cells are taken as-is; every other cell goes through [`coerce_cell`].
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    label_header: String,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            label_header: "label".to_string(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_label_header(mut self, header: impl Into<String>) -> Self {
        self.label_header = header.into();
        self
    }

    /// Load CSV text held in memory.
    pub fn load_str(
        &self,
        text: &str,
        target: &mut dyn AttributeStore,
    ) -> Result<usize, DataDrivenError> {
        self.load_reader(text.as_bytes(), target)
    }

    /// Load CSV from any reader. The input is read fully, then rows are
    /// registered one at a time, so a parse error leaves the rows before it
    /// registered.
    pub fn load_reader<R: Read>(
        &self,
        mut reader: R,
        target: &mut dyn AttributeStore,
    ) -> Result<usize, DataDrivenError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_reader(input.as_slice());

        let first = match self.next_record(&mut reader, &input)? {
            Some(record) => record,
            None => return Ok(0),
        };

        let mut count = 0;
        let headered = first.get(0) == Some(self.label_header.as_str());
        if !headered {
            let (label, dataset) = headerless_entry(&first);
            data(target, label, dataset);
            count += 1;
        }
        while let Some(record) = self.next_record(&mut reader, &input)? {
            let (label, dataset) = if headered {
                if record.iter().eq(first.iter()) {
                    tracing::trace!("skipping repeated header row");
                    continue;
                }
                self.headered_entry(&first, &record)
            } else {
                headerless_entry(&record)
            };
            data(target, label, dataset);
            count += 1;
        }
        tracing::debug!(
            layout = if headered { "headered" } else { "headerless" },
            entries = count,
            "parsed CSV rows"
        );
        Ok(count)
    }

    /// Read the next record and check its raw bytes for broken quoting, which
    /// the csv reader accepts silently.
    fn next_record(
        &self,
        reader: &mut csv::Reader<&[u8]>,
        input: &[u8],
    ) -> Result<Option<StringRecord>, DataDrivenError> {
        let mut record = StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Ok(None);
        }
        let (start, line) = record
            .position()
            .map_or((0, 0), |pos| (pos.byte() as usize, pos.line()));
        let end = reader.position().byte() as usize;
        let raw = input.get(start..end).unwrap_or_default();
        if let Some(message) = quoting_problem(raw, self.delimiter) {
            return Err(DataDrivenError::MalformedCsv {
                line,
                message: message.to_string(),
            });
        }
        Ok(Some(record))
    }

    fn headered_entry(&self, header: &StringRecord, record: &StringRecord) -> (String, Value) {
        let mut label = String::new();
        let mut dataset = LabeledData::new();
        for (key, cell) in header.iter().zip(record.iter()) {
            if key == self.label_header {
                label = cell.to_string();
            } else {
                dataset.insert(key.to_string(), coerce_cell(cell));
            }
        }
        (label, Value::Object(dataset))
    }
}

/// Scan one record's raw bytes. A quoted field must close and be followed by
/// a delimiter or line end; an unquoted field must not contain a quote.
fn quoting_problem(raw: &[u8], delimiter: u8) -> Option<&'static str> {
    let mut bytes = raw.iter().copied().peekable();
    let mut field_start = true;
    while let Some(byte) = bytes.next() {
        if field_start && byte == b'"' {
            loop {
                match bytes.next() {
                    None => return Some("unterminated quoted field"),
                    Some(b'"') if bytes.peek() == Some(&b'"') => {
                        bytes.next();
                    }
                    Some(b'"') => break,
                    Some(_) => {}
                }
            }
            match bytes.peek() {
                None | Some(b'\n') | Some(b'\r') => {}
                Some(&next) if next == delimiter => {}
                Some(_) => return Some("unexpected character after closing quote"),
            }
            field_start = false;
        } else if byte == delimiter || byte == b'\n' || byte == b'\r' {
            field_start = true;
        } else if byte == b'"' {
            return Some("quote inside unquoted field");
        } else {
            field_start = false;
        }
    }
    None
}

fn headerless_entry(record: &StringRecord) -> (String, Value) {
    let mut cells = record.iter();
    let label = cells.next().unwrap_or_default().to_string();
    let dataset = cells.map(coerce_cell).collect();
    (label, Value::Array(dataset))
}

impl DataLoader for CsvLoader {
    fn load(
        &self,
        path: &Path,
        target: &mut dyn AttributeStore,
    ) -> Result<usize, DataDrivenError> {
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "loading CSV data");
        self.load_reader(file, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_quoting() {
        assert_eq!(quoting_problem(b"a,\"b,c\",\"\"\n", b','), None);
        assert_eq!(quoting_problem(b"\"say \"\"hi\"\"\"\r\n", b','), None);
        assert_eq!(quoting_problem(b"\"multi\nline\",x\n\n", b','), None);
        assert_eq!(quoting_problem(b"a\t\"b\"\n", b'\t'), None);
    }

    #[test]
    fn broken_quoting() {
        assert_eq!(
            quoting_problem(b"one,\"oops\ntwo,2\n", b','),
            Some("unterminated quoted field")
        );
        assert_eq!(
            quoting_problem(b"one,ab\"c\n", b','),
            Some("quote inside unquoted field")
        );
        assert_eq!(
            quoting_problem(b"\"ab\"c,d\n", b','),
            Some("unexpected character after closing quote")
        );
    }
}
