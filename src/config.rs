//! Configuration management for table sort operations

use crate::error::{SortError, SortResult};
use crate::sort_spec::{SortKey, SortSpec};
use crate::table_sort::WHOLE_LINE_FIELD;
use std::collections::HashSet;

/// Main configuration structure for table sort operations
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Sort keys in priority order
    pub keys: Vec<SortKey>,
    /// Flip the direction of every key
    pub reverse: bool,
    /// Check if input is already sorted
    pub check: bool,
    /// First line of the first input names the columns
    pub header: bool,
    /// Type cells as numbers and booleans where they parse
    pub infer_types: bool,
    /// Column separator
    pub field_separator: char,
    /// Output file path
    pub output_file: Option<String>,
    /// Files to read from (if not specified, use stdin)
    pub input_files: Vec<String>,
    /// Debug mode (for troubleshooting)
    pub debug: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            reverse: false,
            check: false,
            header: false,
            infer_types: true,
            field_separator: '\t',
            output_file: None,
            input_files: Vec::new(),
            debug: false,
        }
    }
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.field_separator = separator;
        self
    }

    pub fn add_key(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn with_output_file(mut self, output_file: Option<String>) -> Self {
        self.output_file = output_file;
        self
    }

    pub fn with_input_files(mut self, files: Vec<String>) -> Self {
        self.input_files = files;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> SortResult<()> {
        if self.check && self.output_file.is_some() {
            return Err(SortError::conflicting_options(
                "--check does not write output, cannot combine with --output",
            ));
        }

        if self.field_separator == '\n' || self.field_separator == '\r' {
            return Err(SortError::invalid_field_separator(
                "line terminators cannot separate fields",
            ));
        }

        if self.input_files.iter().filter(|f| *f == "-").count() > 1 {
            return Err(SortError::conflicting_options(
                "standard input ('-') given more than once",
            ));
        }

        let mut seen = HashSet::new();
        for key in &self.keys {
            if !seen.insert(key.field.as_str()) {
                return Err(SortError::invalid_key_spec(&format!(
                    "field {} given more than once",
                    key.field
                )));
            }
        }

        Ok(())
    }

    /// Effective sort spec: the whole line when no key is given, every
    /// direction flipped under `reverse`
    pub fn sort_spec(&self) -> SortSpec {
        let spec = if self.keys.is_empty() {
            SortSpec::new(vec![SortKey::ascending(WHOLE_LINE_FIELD)])
        } else {
            SortSpec::new(self.keys.clone())
        };

        if self.reverse {
            spec.reversed()
        } else {
            spec
        }
    }

    /// Check if reading from stdin
    pub fn reading_from_stdin(&self) -> bool {
        self.input_files.is_empty() || (self.input_files.len() == 1 && self.input_files[0] == "-")
    }

    /// Check if writing to stdout
    pub fn writing_to_stdout(&self) -> bool {
        self.output_file.is_none()
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    pub fn key(mut self, key: SortKey) -> Self {
        self.config.keys.push(key);
        self
    }

    pub fn reverse(mut self) -> Self {
        self.config.reverse = true;
        self
    }

    pub fn check(mut self) -> Self {
        self.config.check = true;
        self
    }

    pub fn header(mut self) -> Self {
        self.config.header = true;
        self
    }

    /// Keep every cell as text
    pub fn text_only(mut self) -> Self {
        self.config.infer_types = false;
        self
    }

    pub fn field_separator(mut self, separator: char) -> Self {
        self.config.field_separator = separator;
        self
    }

    pub fn output_file(mut self, file: String) -> Self {
        self.config.output_file = Some(file);
        self
    }

    pub fn input_files(mut self, files: Vec<String>) -> Self {
        self.config.input_files = files;
        self
    }

    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SortResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset configurations for common use cases
pub mod presets {
    use super::*;

    /// Comma separated values with a header line
    pub fn csv() -> SortConfig {
        SortConfig::new()
            .with_field_separator(',')
            .with_header(true)
    }

    /// Tab separated values with a header line
    pub fn tsv() -> SortConfig {
        SortConfig::new().with_header(true)
    }

    /// Largest first, then by name: the default order of a torrent list
    pub fn largest_first() -> SortConfig {
        tsv()
            .add_key(SortKey::descending("size"))
            .add_key(SortKey::ascending("name"))
    }

    pub fn check() -> SortConfig {
        SortConfig::new().with_check(true)
    }
}
