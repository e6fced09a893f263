use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Separator used between list entries in configuration values.
pub const LIST_SEPARATOR: char = ';';

/// Attribute and property-set name filter for one COBie sheet.
///
/// Names are compared upper-cased. An attribute name is filtered when it
/// equals an `EqualTo` entry, starts with a `StartWith` entry, or contains a
/// `Contain` entry. Property-set names are matched exactly against
/// `PropertySetsEqualTo`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PropertyFilter {
    #[serde(deserialize_with = "normalised_list")]
    equal_to: Vec<String>,
    #[serde(deserialize_with = "normalised_list")]
    start_with: Vec<String>,
    #[serde(deserialize_with = "normalised_list")]
    contain: Vec<String>,
    #[serde(deserialize_with = "normalised_list")]
    property_sets_equal_to: Vec<String>,
}

/// Key naming one of the [`PropertyFilter`] lists in a configuration section.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyKey {
    /// Exact name matches.
    EqualTo,
    /// Name prefixes.
    StartWith,
    /// Name substrings.
    Contain,
    /// Exact property-set name matches.
    PropertySetsEqualTo,
}

impl PropertyKey {
    /// Every key, in rendering order.
    pub const ALL: [Self; 4] = [
        Self::EqualTo,
        Self::StartWith,
        Self::Contain,
        Self::PropertySetsEqualTo,
    ];

    /// Parses a configuration key, ignoring case.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(key.trim()))
    }

    /// Returns the key as written in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EqualTo => "EqualTo",
            Self::StartWith => "StartWith",
            Self::Contain => "Contain",
            Self::PropertySetsEqualTo => "PropertySetsEqualTo",
        }
    }
}

impl PropertyFilter {
    /// Creates a filter that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from the `key = a;b;c` pairs of a configuration section.
    ///
    /// Unknown keys are ignored.
    pub fn from_section<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (key, value) in entries {
            if let Some(key) = PropertyKey::parse(key.as_ref()) {
                filter.extend(key, split_list(value.as_ref()));
            }
        }
        filter
    }

    /// Appends upper-cased `values` to the list selected by `key`.
    ///
    /// Values are split on [`LIST_SEPARATOR`] exactly as configuration values
    /// are. Blank entries, entries spanning several lines and duplicates are
    /// skipped.
    pub fn extend<I, S>(&mut self, key: PropertyKey, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        normalise_into(self.list_mut(key), values);
    }

    /// Returns `true` when the attribute `name` should be filtered out.
    #[must_use]
    pub fn name_filter(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let name = name.to_uppercase();
        self.equal_to.iter().any(|entry| *entry == name)
            || self.start_with.iter().any(|entry| name.starts_with(entry.as_str()))
            || self.contain.iter().any(|entry| name.contains(entry.as_str()))
    }

    /// Returns `true` when the property set `name` should be filtered out.
    #[must_use]
    pub fn property_set_filter(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let name = name.to_uppercase();
        self.property_sets_equal_to.iter().any(|entry| *entry == name)
    }

    /// Returns the list selected by `key`.
    #[must_use]
    pub fn list(&self, key: PropertyKey) -> &[String] {
        match key {
            PropertyKey::EqualTo => &self.equal_to,
            PropertyKey::StartWith => &self.start_with,
            PropertyKey::Contain => &self.contain,
            PropertyKey::PropertySetsEqualTo => &self.property_sets_equal_to,
        }
    }

    /// Returns `true` when every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        PropertyKey::ALL.iter().all(|key| self.list(*key).is_empty())
    }

    fn list_mut(&mut self, key: PropertyKey) -> &mut Vec<String> {
        match key {
            PropertyKey::EqualTo => &mut self.equal_to,
            PropertyKey::StartWith => &mut self.start_with,
            PropertyKey::Contain => &mut self.contain,
            PropertyKey::PropertySetsEqualTo => &mut self.property_sets_equal_to,
        }
    }
}

/// Deserializes a list with the same normalisation as [`PropertyFilter::extend`].
///
/// Entries spanning several lines cannot be written back to a configuration
/// file and are rejected.
fn normalised_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    if let Some(entry) = values.iter().find(|entry| spans_lines(entry)) {
        return Err(D::Error::custom(format!(
            "list entry {entry:?} spans several lines"
        )));
    }
    let mut list = Vec::new();
    normalise_into(&mut list, &values);
    Ok(list)
}

fn spans_lines(entry: &str) -> bool {
    entry.contains(['\n', '\r'])
}

/// Upper-cases one list entry.
///
/// Returns `None` for entries a `;`-separated configuration value cannot
/// carry: blank entries, entries containing the separator, and entries
/// spanning several lines.
pub(crate) fn normalise_entry(entry: &str) -> Option<String> {
    let entry = entry.trim();
    let representable = !entry.is_empty() && !entry.contains(LIST_SEPARATOR) && !spans_lines(entry);
    representable.then(|| entry.to_uppercase())
}

/// Appends the normalised entries of every value to `list`.
///
/// Each value is split on [`LIST_SEPARATOR`]; duplicates are skipped.
pub(crate) fn normalise_into<I, S>(list: &mut Vec<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in values {
        for entry in split_list(value.as_ref()).filter_map(normalise_entry) {
            if !list.contains(&entry) {
                list.push(entry);
            }
        }
    }
}

/// Splits a `;`-separated configuration value, dropping blank entries.
pub(crate) fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}
