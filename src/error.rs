//! # Error Types
//!
//! This module defines all error types for the OMR to MEI converter.
//!
//! Every error carries enough context (offending hint token, file path or
//! staff-file line) to fix the input. No error is recovered internally: any
//! of them aborts the run before an output file is written.
//!
//! ## Error Types
//! - `InputNotFound` - An input file path does not exist
//! - `Grammar` - Malformed staff-group hint token
//! - `NoSystems` - The hint string described no systems at all
//! - `StaffData` - A staff bounding-box line could not be read
//! - `Config` - Invalid YAML configuration
//! - `Xml` - The serializer failed
//!
//! ## Usage
//! ```rust
//! use omrmei::{parse_hint, ConvertError};
//!
//! match parse_hint("(1 a)") {
//!     Ok(tokens) => println!("{} systems", tokens.len()),
//!     Err(ConvertError::Grammar { token, column, message }) => {
//!         eprintln!("bad token '{}' at {}: {}", token, column, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// An input file does not exist.
    ///
    /// # Example
    /// ```
    /// # use omrmei::ConvertError;
    /// let err = ConvertError::InputNotFound { path: "bars.txt".into() };
    /// assert_eq!(err.to_string(), "The input file does not exist: bars.txt");
    /// ```
    #[error("The input file does not exist: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Malformed staff-group hint token.
    ///
    /// `column` is the 1-based character position inside `token`.
    ///
    /// # Example
    /// ```
    /// # use omrmei::ConvertError;
    /// let err = ConvertError::Grammar {
    ///     token: "(1 a)".to_string(),
    ///     column: 4,
    ///     message: "Unexpected character 'a'".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Staff group hint error in '(1 a)' at column 4: Unexpected character 'a'"
    /// );
    /// ```
    #[error("Staff group hint error in '{token}' at column {column}: {message}")]
    Grammar {
        token: String,
        column: usize,
        message: String,
    },

    #[error("The staff group hint does not describe any systems")]
    NoSystems,

    /// A staff bounding-box line without four integer coordinates.
    ///
    /// # Example
    /// ```
    /// # use omrmei::ConvertError;
    /// let err = ConvertError::StaffData { line: 3, message: "expected 4 coordinates, found 2".to_string() };
    /// assert_eq!(err.to_string(), "Staff data error at line 3: expected 4 coordinates, found 2");
    /// ```
    #[error("Staff data error at line {line}: {message}")]
    StaffData { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("XML output error: {0}")]
    Xml(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
