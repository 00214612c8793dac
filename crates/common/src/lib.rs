//! `cs-common` -- Shared element model, time types, configuration and errors
//! for the Canvas Studio editor core.
//!
//! - **Element**: `Element`, `ElementKind`, `ElementType` (tagged, flat JSON form)
//! - **Properties**: `PropertyKey`, `PropertyValue`, `PropertySet` (validated partial patches)
//! - **Keyframes**: `Keyframes`, `Keyframe` (numerically sorted time -> property set)
//! - **Types**: `ElementId`, `TimeCode`, ISO timestamps
//! - **Config**: `EditorConfig`
//! - **Errors**: `PropertyError`, `ConfigError` (thiserror-based)

pub mod config;
pub mod element;
pub mod error;
pub mod keyframes;
pub mod property;
pub mod types;

pub use config::{EditorConfig, DEFAULT_AUTOSAVE_INTERVAL_MS};
pub use element::{Element, ElementKind, ElementType};
pub use error::{ConfigError, PropertyError, PropertyResult};
pub use keyframes::{Keyframe, Keyframes};
pub use property::{PropertyKey, PropertySet, PropertyValue};
pub use types::{epoch_millis, iso_timestamp, ElementId, TimeCode};
