//! `cs-project` -- Template file sync for the Canvas Studio editor core.
//!
//! The editor's element list maps one-to-one onto a bare JSON array, the same
//! text that `template.json` exports contain. This crate handles:
//!
//! - **Save**: pretty/compact serialization and atomic template writes
//! - **Load**: parsing with per-element validation and positioned errors
//! - **Auto-Save**: a poll-based interval timer for periodic snapshots
//!
//! # Usage
//!
//! ```rust,no_run
//! use cs_common::{Element, ElementType};
//! use cs_project::{export_template, load_template};
//! use std::path::Path;
//!
//! let elements = vec![Element::new(ElementType::Text)];
//! let path = export_template(&elements, Path::new("out")).unwrap();
//! let loaded = load_template(&path).unwrap();
//! assert_eq!(loaded, elements);
//! ```

pub mod autosave;
pub mod error;
pub mod load;
pub mod save;

pub use autosave::{AutoSaveTimer, DEFAULT_AUTOSAVE_INTERVAL_MS};
pub use error::{ProjectError, ProjectResult};
pub use load::{from_json_string, load_template};
pub use save::{
    export_template, save_template, to_json_string, to_json_string_compact, TEMPLATE_FILE_NAME,
};
