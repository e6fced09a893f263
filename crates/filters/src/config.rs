//! Sectioned `key = value` configuration sources for [`FilterSet`].
//!
//! Filter definitions are stored in an INI-like text file. Each section holds
//! either an object inclusion table, a predefined-type table, or the name lists
//! of one property filter:
//!
//! ```ini
//! # IFC product entities: YES keeps them, anything else drops them
//! [IfcElementInclusion]
//! IfcWall = NO
//! IfcDoor = YES
//!
//! [IfcElementPredefinedTypes]
//! IfcWall = STANDARD;SHEAR
//!
//! [CommonFilter]
//! EqualTo = Name;Description
//! StartWith = Pset_
//! ```
//!
//! Blank lines and lines starting with `#` or `;` are ignored. Keys are
//! matched case-insensitively by the filters; section names are matched
//! case-insensitively by [`FilterConfig::section`]. Repeating a section header
//! continues the earlier section and a repeated key replaces its value.
//!
//! [`FilterSet`]: crate::FilterSet

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;
use crate::debug_filter::trace_section_loaded;

/// Default configuration compiled into the crate.
pub const BUNDLED_CONFIG: &str = include_str!("../data/default_filters.conf");

/// Label used in diagnostics for the bundled configuration.
pub const BUNDLED_LABEL: &str = "<bundled:default_filters.conf>";

/// Section holding the IFC product (component) inclusion table.
pub const PRODUCT_SECTION: &str = "IfcElementInclusion";
/// Section holding the IFC type object inclusion table.
pub const TYPE_OBJECT_SECTION: &str = "IfcTypeInclusion";
/// Section holding the IFC assembly inclusion table.
pub const ASSEMBLY_SECTION: &str = "IfcAssemblyInclusion";
/// Section holding predefined types for the product table.
pub const PRODUCT_TYPES_SECTION: &str = "IfcElementPredefinedTypes";
/// Section holding predefined types for the type object table.
pub const TYPE_OBJECT_TYPES_SECTION: &str = "IfcTypePredefinedTypes";
/// Section holding predefined types for the assembly table.
pub const ASSEMBLY_TYPES_SECTION: &str = "IfcAssemblyPredefinedTypes";

/// Section holding attribute names filtered on every sheet.
pub const COMMON_SECTION: &str = "CommonFilter";
/// Section holding Zone sheet attribute filters.
pub const ZONE_SECTION: &str = "ZoneFilter";
/// Section holding Type sheet attribute filters.
pub const TYPE_SECTION: &str = "TypeFilter";
/// Section holding Space sheet attribute filters.
pub const SPACE_SECTION: &str = "SpaceFilter";
/// Section holding Floor sheet attribute filters.
pub const FLOOR_SECTION: &str = "FloorFilter";
/// Section holding Facility sheet attribute filters.
pub const FACILITY_SECTION: &str = "FacilityFilter";
/// Section holding Spare sheet attribute filters.
pub const SPARE_SECTION: &str = "SpareFilter";
/// Section holding Component sheet attribute filters.
pub const COMPONENT_SECTION: &str = "ComponentFilter";

/// Where a filter configuration comes from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterSource {
    /// The configuration compiled into the crate.
    #[default]
    Bundled,
    /// A configuration file on disk.
    File(PathBuf),
    /// Configuration text supplied by the caller, labelled for diagnostics.
    Inline {
        /// Name reported in errors.
        label: String,
        /// Configuration text.
        text: String,
    },
}

impl FilterSource {
    /// Reads and parses the source.
    pub fn read(&self) -> Result<FilterConfig, ConfigError> {
        match self {
            Self::Bundled => FilterConfig::parse(BUNDLED_CONFIG, Path::new(BUNDLED_LABEL)),
            Self::File(path) => FilterConfig::from_file(path),
            Self::Inline { label, text } => {
                FilterConfig::parse(text, Path::new(&format!("<inline:{label}>")))
            }
        }
    }
}

/// One `[Name]` block and its entries in file order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the section name as written in the header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Returns the value stored for `key`, ignoring case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Sets `key` to `value`, replacing an existing entry with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Iterates over `(key, value)` pairs as string slices.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Parsed filter configuration: an ordered list of sections.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterConfig {
    sections: Vec<Section>,
}

impl FilterConfig {
    /// Parses a configuration file from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&contents, path)
    }

    /// Parses configuration text. `path` is only used in diagnostics.
    pub fn parse(input: &str, path: &Path) -> Result<Self, ConfigError> {
        Parser::new(input, path).parse()
    }

    /// Returns the configuration compiled into the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        FilterSource::Bundled.read()
    }

    /// Returns every section in file order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Finds a section by name, ignoring case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// Returns the section called `name`, creating it when missing.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let index = match self
            .sections
            .iter()
            .position(|section| section.name.eq_ignore_ascii_case(name))
        {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Renders the configuration in the format accepted by [`parse`](Self::parse).
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section.name);
            for (key, value) in section.pairs() {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        out
    }
}

struct Parser<'a> {
    input: &'a str,
    path: &'a Path,
    line_number: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, path: &'a Path) -> Self {
        Self {
            input,
            path,
            line_number: 0,
        }
    }

    fn parse(&mut self) -> Result<FilterConfig, ConfigError> {
        let mut config = FilterConfig::default();
        let mut current: Option<String> = None;

        for line in self.input.lines() {
            self.line_number += 1;
            let trimmed = line.trim().trim_start_matches('\u{feff}');

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let end = header.find(']').ok_or_else(|| self.error("unterminated section header"))?;
                let name = header[..end].trim();
                if name.is_empty() {
                    return Err(self.error("section name must be non-empty"));
                }
                let trailing = header[end + 1..].trim();
                if !trailing.is_empty() && !trailing.starts_with('#') && !trailing.starts_with(';')
                {
                    return Err(self.error("unexpected content after section header"));
                }
                config.section_mut(name);
                current = Some(name.to_owned());
                continue;
            }

            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| self.error("expected 'key = value' format"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(self.error("key must be non-empty"));
            }
            let section = current
                .as_deref()
                .ok_or_else(|| self.error("entry appears before any section header"))?;
            config.section_mut(section).set(key, value.trim());
        }

        for section in &config.sections {
            trace_section_loaded(&self.path.display().to_string(), &section.name, section.entries.len());
        }
        Ok(config)
    }

    fn error(&self, message: &str) -> ConfigError {
        ConfigError::parse(self.path, self.line_number, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<FilterConfig, ConfigError> {
        FilterConfig::parse(input, Path::new("test.conf"))
    }

    #[test]
    fn parses_sections_and_entries() {
        let config = parse(
            "# leading comment\n\
             [IfcElementInclusion]\n\
             IfcWall = NO\n\
             ; another comment\n\
             IfcDoor=YES\n\
             \n\
             [CommonFilter] # trailing comment\n\
             EqualTo = Name;Description\n",
        )
        .unwrap();

        assert_eq!(config.sections().len(), 2);
        let elements = config.section("ifcelementinclusion").unwrap();
        assert_eq!(elements.name(), "IfcElementInclusion");
        assert_eq!(elements.get("IFCWALL"), Some("NO"));
        assert_eq!(elements.get("IfcDoor"), Some("YES"));
        assert_eq!(
            config.section(COMMON_SECTION).unwrap().get("EqualTo"),
            Some("Name;Description")
        );
    }

    #[test]
    fn repeated_sections_and_keys_merge() {
        let config = parse("[A]\nx = 1\n[B]\ny = 2\n[a]\nX = 3\nz = 4\n").unwrap();
        assert_eq!(config.sections().len(), 2);
        let a = config.section("A").unwrap();
        assert_eq!(a.entries().len(), 2);
        assert_eq!(a.get("x"), Some("3"));
        assert_eq!(a.get("z"), Some("4"));
    }

    #[test]
    fn values_may_be_empty_or_contain_equals() {
        let config = parse("[S]\nempty =\nexpr = a=b\n").unwrap();
        let section = config.section("S").unwrap();
        assert_eq!(section.get("empty"), Some(""));
        assert_eq!(section.get("expr"), Some("a=b"));
    }

    #[test]
    fn entry_before_section_is_rejected() {
        let error = parse("IfcWall = NO\n").unwrap_err();
        assert_eq!(error.line(), Some(1));
        assert!(error.to_string().contains("before any section header"));
    }

    #[test]
    fn malformed_lines_report_line_numbers() {
        let error = parse("[S]\nok = 1\nnot a pair\n").unwrap_err();
        assert_eq!(error.line(), Some(3));

        let error = parse("[S\n").unwrap_err();
        assert!(error.to_string().contains("unterminated section header"));

        let error = parse("[ ]\n").unwrap_err();
        assert!(error.to_string().contains("non-empty"));

        let error = parse("[S] junk\n").unwrap_err();
        assert!(error.to_string().contains("unexpected content"));

        let error = parse("[S]\n = value\n").unwrap_err();
        assert!(error.to_string().contains("key must be non-empty"));
    }

    #[test]
    fn render_round_trips() {
        let mut config = FilterConfig::default();
        config.section_mut(PRODUCT_SECTION).set("IFCWALL", "NO");
        config.section_mut(PRODUCT_SECTION).set("IFCDOOR", "YES");
        config.section_mut(COMMON_SECTION).set("EqualTo", "NAME;DESCRIPTION");

        let text = config.render();
        assert_eq!(
            text,
            "[IfcElementInclusion]\nIFCWALL = NO\nIFCDOOR = YES\n\n[CommonFilter]\nEqualTo = NAME;DESCRIPTION\n"
        );
        assert_eq!(parse(&text).unwrap(), config);
    }

    #[test]
    fn bundled_configuration_parses() {
        let config = FilterConfig::bundled().unwrap();
        for name in [
            PRODUCT_SECTION,
            TYPE_OBJECT_SECTION,
            ASSEMBLY_SECTION,
            COMMON_SECTION,
            ZONE_SECTION,
            TYPE_SECTION,
            SPACE_SECTION,
            FLOOR_SECTION,
            FACILITY_SECTION,
            SPARE_SECTION,
            COMPONENT_SECTION,
        ] {
            assert!(config.section(name).is_some(), "missing section {name}");
        }
    }

    #[test]
    fn inline_source_errors_name_the_label() {
        let source = FilterSource::Inline {
            label: "cli".to_owned(),
            text: "oops\n".to_owned(),
        };
        let error = source.read().unwrap_err();
        assert_eq!(error.path(), Path::new("<inline:cli>"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.conf");
        let error = FilterSource::File(path.clone()).read().unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert_eq!(error.path(), path);
    }
}
