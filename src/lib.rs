//! @ai:module:intent Codemark library for line-level review markings embedded in source files
//! @ai:module:layer infrastructure
//! @ai:module:public_api annotation, binary, config, document, encoding, error, lines, mapping, output, parser, project, terminator, writer
//! @ai:module:stateless true
//!
//! # Codemark
//!
//! Reviewers triage source files line by line as green, yellow or red. The
//! markings live inside the file itself as `>>>>>CM:` marker lines, while
//! editors and tools work on a clean buffer with every marker removed.
//! [`AnnotatedDocument`] keeps both views and translates line numbers and
//! offsets between them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use codemark::{AnnotatedDocument, Direction, Severity};
//! use std::path::Path;
//!
//! let mut doc = AnnotatedDocument::load(Path::new("src/lib.rs"))
//!     .unwrap()
//!     .expect("binary files are not documents");
//!
//! doc.set_severity(0..10, Severity::Green);
//! doc.save().unwrap();
//!
//! let file_line = doc.translate_line(Direction::BufferToFile, 3);
//! println!("buffer line 4 is file line {:?}", file_line.map(|l| l + 1));
//! ```

pub mod annotation;
pub mod binary;
pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod lines;
pub mod mapping;
pub mod output;
pub mod parser;
pub mod project;
pub mod terminator;
pub mod writer;

pub use annotation::Severity;
pub use config::CodemarkConfig;
pub use document::AnnotatedDocument;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use mapping::{Direction, OffsetEntry, OffsetTables};
pub use output::{format_document, format_project, to_json, OutputFormat};
pub use project::{scan_project, ProjectNode, ProjectReport};
pub use terminator::LineTerminator;
