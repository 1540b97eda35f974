use crate::comparator::{RecordComparator, RecordSource};
use crate::config::SortConfig;
use crate::error::{SortContext, SortError, SortResult};
use crate::value::{FieldValue, Record};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

/// Field holding the whole line
pub const WHOLE_LINE_FIELD: &str = "0";

/// One input line with its typed record
#[derive(Debug, Clone)]
pub struct Row {
    pub text: String,
    pub record: Record,
    /// Input the line came from, `-` for stdin
    pub source: String,
    /// 1-based line number within `source`
    pub line: usize,
}

/// Rows are their own records
struct RowRecords;

impl RecordSource<Row> for RowRecords {
    fn record_of<'a>(&'a self, item: &'a Row) -> Option<&'a Record> {
        Some(&item.record)
    }
}

/// Parsed input: optional header and typed rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Option<String>,
    columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Column names; numbered from 1 when there is no header
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append the lines of one input. The header, if configured, is taken
    /// from the first line of the first input and skipped in later ones.
    pub fn push_input(&mut self, config: &SortConfig, source: &str, text: &str) {
        let first_input = self.rows.is_empty() && self.header.is_none();
        for (i, line) in text.lines().enumerate() {
            if config.header && i == 0 {
                if first_input {
                    self.columns = line
                        .split(config.field_separator)
                        .map(str::to_string)
                        .collect();
                    self.header = Some(line.to_string());
                }
                continue;
            }
            let record = self.type_line(config, line);
            self.rows.push(Row {
                text: line.to_string(),
                record,
                source: source.to_string(),
                line: i + 1,
            });
        }
    }

    fn type_line(&self, config: &SortConfig, line: &str) -> Record {
        let mut record = Record::new();
        if !line.is_empty() {
            record.insert(WHOLE_LINE_FIELD, line);
        }

        for (i, cell) in line.split(config.field_separator).enumerate() {
            let value = if config.infer_types {
                FieldValue::infer(cell)
            } else if cell.is_empty() {
                None
            } else {
                Some(FieldValue::from(cell))
            };
            let Some(value) = value else {
                continue;
            };

            match self.columns.get(i) {
                Some(name) if config.header => record.insert(name, value),
                _ => record.insert(&(i + 1).to_string(), value),
            };
        }

        record
    }

    /// Every sort key must name a column
    pub fn check_keys(&self, config: &SortConfig) -> SortResult<()> {
        for key in &config.keys {
            if key.field == WHOLE_LINE_FIELD {
                continue;
            }
            let known = if config.header {
                self.columns.iter().any(|c| *c == key.field)
            } else {
                key.field.parse::<usize>().is_ok()
            };
            if !known {
                return Err(SortError::unknown_field(&key.field));
            }
        }
        Ok(())
    }
}

/// Sorts delimited text by typed record fields
pub struct TableSort {
    config: SortConfig,
}

impl TableSort {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> SortResult<()> {
        self.run_with_stdin(io::stdin().lock())
    }

    /// Like [`run`](Self::run), reading `-` inputs from `stdin`
    pub fn run_with_stdin<R: Read>(&self, stdin: R) -> SortResult<()> {
        let mut table = self.read_inputs(stdin)?;
        table.check_keys(&self.config)?;

        let mut comparator = RecordComparator::with_sort_fields(self.config.sort_spec());
        if self.config.debug {
            log::debug!("sort spec: {comparator}");
            log::debug!("columns: {:?}", table.columns());
        }

        if self.config.check {
            return match comparator.first_disorder(&RowRecords, &table.rows) {
                Some(i) => {
                    let row = &table.rows[i];
                    Err(SortError::not_sorted(&row.source, row.line, &row.text))
                }
                None => Ok(()),
            };
        }

        comparator.sort(&RowRecords, &mut table.rows);
        self.write_output(&table)
    }

    fn read_inputs<R: Read>(&self, mut stdin: R) -> SortResult<Table> {
        let mut table = Table::default();

        if self.config.reading_from_stdin() {
            let text = read_stdin(&mut stdin)?;
            table.push_input(&self.config, "-", &text);
            return Ok(table);
        }

        for file in &self.config.input_files {
            let text = if file == "-" {
                read_stdin(&mut stdin)?
            } else {
                read_file(file)?
            };
            table.push_input(&self.config, file, &text);
        }
        log::debug!(
            "read {} rows from {} inputs",
            table.rows.len(),
            self.config.input_files.len()
        );
        Ok(table)
    }

    /// Write sorted output
    fn write_output(&self, table: &Table) -> SortResult<()> {
        let mut output: Box<dyn Write> = if let Some(output_file) = &self.config.output_file {
            Box::new(BufWriter::new(
                File::create(output_file).with_file_context(output_file)?,
            ))
        } else {
            Box::new(BufWriter::new(io::stdout()))
        };

        if let Some(header) = &table.header {
            output.write_all(header.as_bytes())?;
            output.write_all(b"\n")?;
        }
        for row in &table.rows {
            output.write_all(row.text.as_bytes())?;
            output.write_all(b"\n")?;
        }

        output.flush()?;
        Ok(())
    }
}

fn read_stdin<R: Read>(stdin: &mut R) -> SortResult<String> {
    let mut bytes = Vec::new();
    stdin
        .read_to_end(&mut bytes)
        .with_context(|| "reading standard input".to_string())?;
    Ok(String::from_utf8(bytes)?)
}

fn read_file(path: &str) -> SortResult<String> {
    if std::path::Path::new(path).is_dir() {
        return Err(SortError::is_directory(path));
    }
    let bytes = std::fs::read(path).with_file_context(path)?;
    Ok(String::from_utf8(bytes)?)
}
