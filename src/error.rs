//! Error handling for record sorting

use std::io;
use thiserror::Error;

/// Custom error type for sort operations
#[derive(Error, Debug)]
pub enum SortError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("Invalid key specification: {spec}")]
    InvalidKeySpec { spec: String },

    #[error("Invalid field separator: {sep}")]
    InvalidFieldSeparator { sep: String },

    #[error("Conflicting sort options: {message}")]
    ConflictingOptions { message: String },

    #[error("Sort spec has {keys} field keys but {flags} direction flags")]
    MismatchedSortSpec { keys: usize, flags: usize },

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("{file}:{line}: disorder: {text}")]
    NotSorted {
        file: String,
        line: usize,
        text: String,
    },

    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl SortError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::PermissionDenied { .. }
            | SortError::FileNotFound { .. }
            | SortError::IsDirectory { .. }
            | SortError::Io(_) => crate::SORT_FAILURE,

            SortError::NotSorted { .. } => crate::EXIT_FAILURE,

            _ => crate::EXIT_FAILURE,
        }
    }

    pub fn permission_denied(file: &str) -> Self {
        SortError::PermissionDenied {
            file: file.to_string(),
        }
    }

    pub fn file_not_found(file: &str) -> Self {
        SortError::FileNotFound {
            file: file.to_string(),
        }
    }

    pub fn is_directory(file: &str) -> Self {
        SortError::IsDirectory {
            file: file.to_string(),
        }
    }

    pub fn invalid_key_spec(spec: &str) -> Self {
        SortError::InvalidKeySpec {
            spec: spec.to_string(),
        }
    }

    pub fn invalid_field_separator(sep: &str) -> Self {
        SortError::InvalidFieldSeparator {
            sep: sep.to_string(),
        }
    }

    pub fn conflicting_options(message: &str) -> Self {
        SortError::ConflictingOptions {
            message: message.to_string(),
        }
    }

    pub fn unknown_field(field: &str) -> Self {
        SortError::UnknownField {
            field: field.to_string(),
        }
    }

    /// Create a not sorted error pointing at a 1-based input line
    pub fn not_sorted(file: &str, line: usize, text: &str) -> Self {
        SortError::NotSorted {
            file: file.to_string(),
            line,
            text: text.to_string(),
        }
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Failure of a natural-ordering comparison between two field values.
///
/// These never leave the comparator: they are handed to its
/// [`ErrorPolicy`](crate::comparator::ErrorPolicy), which decides the
/// fallback ordering. `PartialEq` lets a policy recognise a repeat of the
/// failure it reported last.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("cannot compare {left} with {right}")]
    Incompatible { left: String, right: String },

    #[error("comparison failed: {message}")]
    Uncomparable { message: String },
}

impl CompareError {
    pub fn incompatible(left: &str, right: &str) -> Self {
        CompareError::Incompatible {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn uncomparable(message: &str) -> Self {
        CompareError::Uncomparable {
            message: message.to_string(),
        }
    }
}

/// Context trait for adding context to errors
pub trait SortContext<T> {
    fn with_context<F>(self, f: F) -> SortResult<T>
    where
        F: FnOnce() -> String;

    fn with_file_context(self, filename: &str) -> SortResult<T>;
}

fn io_with_file(io_err: io::Error, filename: &str) -> SortError {
    match io_err.kind() {
        io::ErrorKind::PermissionDenied => SortError::permission_denied(filename),
        io::ErrorKind::NotFound => SortError::file_not_found(filename),
        _ => SortError::Io(io::Error::new(
            io_err.kind(),
            format!("{}: {}", filename, io_err),
        )),
    }
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_context<F>(self, f: F) -> SortResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|io_err| {
            SortError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", f(), io_err),
            ))
        })
    }

    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|io_err| io_with_file(io_err, filename))
    }
}
