#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which objects and attributes of a COBie export are
//! written out. Objects are filtered by the IFC entity they were exported from
//! (optionally narrowed by the entity's `PredefinedType`), and attribute and
//! property-set names are filtered per COBie sheet. Callers query a
//! [`FilterSet`] for every candidate and receive a keep/drop verdict.
//!
//! # Design
//!
//! - [`ObjectFilter`] maps upper-cased IFC entity names to an include flag and
//!   optionally to the predefined types that gate an exclusion.
//! - [`PropertyFilter`] holds the equal/prefix/substring name lists of one
//!   sheet and the property-set names to drop.
//! - [`FilterSet`] owns the product, type object and assembly tables plus the
//!   property filters of the Zone, Type, Space, Floor, Facility, Spare and
//!   Component sheets and a common filter. Queries dispatch on
//!   [`ObjectKind`], a closed set of sheet categories.
//! - [`FilterConfig`] parses the sectioned `key = value` files filter sets are
//!   loaded from; a default configuration is compiled into the crate and
//!   selected through [`FilterSource::Bundled`].
//!
//! # Invariants
//!
//! - Entity names absent from a table are never excluded.
//! - Merging filter sets only widens what is included: includes from the
//!   incoming set overwrite excludes, excludes from the incoming set are
//!   ignored, and predefined types are unioned.
//! - [`FilterSet::merge`] leaves the sheet property filters untouched.
//! - The set of excluded entity names is rebuilt by every mutating call, so
//!   evaluation through `&self` never observes stale state.
//! - An empty attribute name or an object without an external entity is never
//!   filtered.
//!
//! # Errors
//!
//! Loading reports [`ConfigError`] for unreadable files and malformed lines
//! (with line numbers), and [`SerializeError`] for JSON persistence failures.
//! [`LoadError`] wraps both for the combined entry points. JSON whose entity
//! names could not be written back to a configuration file is refused with
//! [`InvalidEntryError`] inside [`SerializeError::Json`].
//!
//! # Examples
//!
//! ```
//! use filters::{FilterSet, ObjectKind, ObjectRef};
//!
//! let filters = FilterSet::bundled().expect("bundled configuration parses");
//!
//! assert!(filters.filter_object(ObjectRef::asset("IfcWall"), None));
//! assert!(!filters.filter_object(ObjectRef::asset("IfcDoor"), None));
//! assert!(!filters.filter_object(ObjectRef::asset("IfcUnlistedThing"), None));
//! assert!(filters.filter_name_on_parent("GlobalId", Some(ObjectKind::Floor)));
//! ```
//!
//! # See also
//!
//! - `cli` exposes the filter set through the `cobie-filter` binary.
//! - [`debug_filter`] for the tracing hooks behind the `tracing` feature.

mod config;
pub mod debug_filter;
mod error;
mod kind;
mod object;
mod property;
mod set;

pub use config::{
    ASSEMBLY_SECTION, ASSEMBLY_TYPES_SECTION, BUNDLED_CONFIG, BUNDLED_LABEL, COMMON_SECTION,
    COMPONENT_SECTION, FACILITY_SECTION, FLOOR_SECTION, FilterConfig, FilterSource,
    PRODUCT_SECTION, PRODUCT_TYPES_SECTION, SPACE_SECTION, SPARE_SECTION, Section,
    TYPE_OBJECT_SECTION, TYPE_OBJECT_TYPES_SECTION, TYPE_SECTION, ZONE_SECTION,
};
pub use error::{ConfigError, InvalidEntryError, LoadError, SerializeError};
pub use kind::{ObjectKind, ObjectRef, ParseObjectKindError};
pub use object::{INCLUDE_VALUE, ObjectFilter};
pub use property::{LIST_SEPARATOR, PropertyFilter, PropertyKey};
pub use set::FilterSet;
