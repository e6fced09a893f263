use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::InvalidEntryError;
use crate::property::{normalise_entry, split_list};

/// Value (compared case-insensitively) that marks an entity as included.
pub const INCLUDE_VALUE: &str = "YES";

/// Include/exclude table for IFC entity names, refined by predefined types.
///
/// An `ObjectFilter` records, per upper-cased entity name, whether matching
/// objects are included (`true`) or candidates for exclusion (`false`). An
/// optional predefined-type table narrows an exclusion to objects whose
/// `PredefinedType` enumerant is listed for that entity.
///
/// Names absent from the table are never excluded. Names are trimmed and
/// upper-cased on every entry point; names a configuration file could not
/// carry (blank, containing `=` or a line break, or starting with `#`, `;`
/// or `[`) are never stored.
///
/// # Examples
///
/// ```
/// use filters::ObjectFilter;
///
/// let filter = ObjectFilter::from_section([("IfcWall", "NO"), ("IfcDoor", "yes")]);
///
/// assert!(filter.is_excluded("IfcWall", None));
/// assert!(!filter.is_excluded("IfcDoor", None));
/// assert!(!filter.is_excluded("IfcBeam", None));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ObjectFilterRepr", into = "ObjectFilterRepr")]
pub struct ObjectFilter {
    items: BTreeMap<String, bool>,
    predefined_types: BTreeMap<String, BTreeSet<String>>,
    excluded: BTreeSet<String>,
}

impl ObjectFilter {
    /// Creates an empty filter that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from `name = value` pairs of a configuration section.
    ///
    /// A value equal to `YES` (ignoring case) includes the entity; any other
    /// value excludes it. Entries whose name is rejected by
    /// [`ObjectFilter::insert`] are skipped.
    pub fn from_section<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (key, value) in entries {
            if let Some(key) = normalise_key(key.as_ref()) {
                let include = value.as_ref().trim().eq_ignore_ascii_case(INCLUDE_VALUE);
                filter.items.insert(key, include);
            }
        }
        filter.refresh_excluded();
        filter
    }

    /// Sets the include flag for `name`, overwriting any previous value.
    ///
    /// Returns `false` and leaves the filter unchanged when `name` is blank
    /// or cannot be written as a configuration key.
    pub fn insert(&mut self, name: &str, include: bool) -> bool {
        let Some(key) = normalise_key(name) else {
            return false;
        };
        self.items.insert(key, include);
        self.refresh_excluded();
        true
    }

    /// Registers the predefined types that gate exclusion of `name`.
    ///
    /// Each value may hold several `;`-separated types. Returns `false`
    /// without touching the filter when `name` is rejected as by
    /// [`ObjectFilter::insert`] or already has predefined types; existing
    /// entries are never overwritten.
    pub fn add_predefined_type<I, S>(&mut self, name: &str, types: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(key) = normalise_key(name) else {
            return false;
        };
        if self.predefined_types.contains_key(&key) {
            return false;
        }
        let mut values = BTreeSet::new();
        extend_types(&mut values, types);
        self.predefined_types.insert(key, values);
        true
    }

    /// Returns `true` when an object of entity `name` should be filtered out.
    ///
    /// The name must be flagged as excluded. When `predefined_type` is given
    /// and the name has registered predefined types, the value must also be
    /// one of them; otherwise the predefined type does not constrain the
    /// result. Comparison ignores case.
    #[must_use]
    pub fn is_excluded(&self, name: &str, predefined_type: Option<&str>) -> bool {
        let Some(name) = normalise_key(name) else {
            return false;
        };
        let type_matches = match (predefined_type, self.predefined_types.get(&name)) {
            (Some(value), Some(allowed)) => {
                normalise_entry(value).is_some_and(|value| allowed.contains(&value))
            }
            _ => true,
        };
        type_matches && self.excluded.contains(&name)
    }

    /// Folds `other` into this filter.
    ///
    /// Includes from `other` overwrite matching entries here, so a merge can
    /// only widen what is included: excludes in `other` are ignored and
    /// entries unique to `self` are kept. Predefined types become the
    /// per-entity union of both sides.
    pub fn merge(&mut self, other: &Self) {
        for (name, _) in other.items.iter().filter(|(_, include)| **include) {
            self.items.insert(name.clone(), true);
        }
        for (name, types) in &other.predefined_types {
            self.predefined_types
                .entry(name.clone())
                .or_default()
                .extend(types.iter().cloned());
        }
        self.refresh_excluded();
    }

    /// Returns the include flag recorded for `name`, if any.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.items.get(&normalise_key(name)?).copied()
    }

    /// Returns the entity table keyed by upper-cased name.
    #[must_use]
    pub const fn items(&self) -> &BTreeMap<String, bool> {
        &self.items
    }

    /// Returns the predefined-type table keyed by upper-cased name.
    #[must_use]
    pub const fn predefined_types(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.predefined_types
    }

    /// Returns the names currently flagged for exclusion.
    #[must_use]
    pub const fn excluded_names(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Returns `true` when neither entities nor predefined types are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.predefined_types.is_empty()
    }

    fn refresh_excluded(&mut self) {
        self.excluded = self
            .items
            .iter()
            .filter(|(_, include)| !**include)
            .map(|(name, _)| name.clone())
            .collect();
    }
}

/// Persisted shape of an [`ObjectFilter`]; the exclusion set is derived.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ObjectFilterRepr {
    items: BTreeMap<String, bool>,
    #[serde(rename = "PreDefinedType")]
    predefined_types: BTreeMap<String, BTreeSet<String>>,
}

impl TryFrom<ObjectFilterRepr> for ObjectFilter {
    type Error = InvalidEntryError;

    fn try_from(repr: ObjectFilterRepr) -> Result<Self, Self::Error> {
        let mut filter = Self::new();
        for (name, include) in repr.items {
            let key = normalise_key(&name).ok_or(InvalidEntryError(name))?;
            filter.items.insert(key, include);
        }
        for (name, types) in repr.predefined_types {
            let key = normalise_key(&name).ok_or(InvalidEntryError(name))?;
            if let Some(value) = types.iter().find(|value| value.contains(['\n', '\r'])) {
                return Err(InvalidEntryError(value.clone()));
            }
            extend_types(filter.predefined_types.entry(key).or_default(), types);
        }
        filter.refresh_excluded();
        Ok(filter)
    }
}

impl From<ObjectFilter> for ObjectFilterRepr {
    fn from(filter: ObjectFilter) -> Self {
        Self {
            items: filter.items,
            predefined_types: filter.predefined_types,
        }
    }
}

/// Trims and upper-cases an entity name.
///
/// Returns `None` for names that would not survive a configuration file
/// round trip: blank names, names containing `=` or a line break, and names
/// that would read back as a comment, a section header or a byte-order mark.
pub(crate) fn normalise_key(name: &str) -> Option<String> {
    let key = name.trim().to_uppercase();
    let representable = !key.is_empty()
        && !key.starts_with(['#', ';', '[', '\u{feff}'])
        && !key.contains(['=', '\n', '\r']);
    representable.then_some(key)
}

fn extend_types<I, S>(set: &mut BTreeSet<String>, types: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in types {
        set.extend(split_list(value.as_ref()).filter_map(normalise_entry));
    }
}
