use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{
    ASSEMBLY_SECTION, ASSEMBLY_TYPES_SECTION, COMMON_SECTION, COMPONENT_SECTION,
    FACILITY_SECTION, FLOOR_SECTION, FilterConfig, FilterSource, PRODUCT_SECTION,
    PRODUCT_TYPES_SECTION, SPACE_SECTION, SPARE_SECTION, TYPE_OBJECT_SECTION,
    TYPE_OBJECT_TYPES_SECTION, TYPE_SECTION, ZONE_SECTION,
};
use crate::debug_filter::{trace_filter_merge, trace_name_decision, trace_object_decision};
use crate::object::INCLUDE_VALUE;
use crate::property::{LIST_SEPARATOR, PropertyKey, split_list};
use crate::{
    ConfigError, LoadError, ObjectFilter, ObjectKind, ObjectRef, PropertyFilter, SerializeError,
};

/// Complete set of output filters for a COBie export.
///
/// A `FilterSet` owns three [`ObjectFilter`] tables (IFC products, IFC type
/// objects and IFC assemblies) and one optional [`PropertyFilter`] per sheet
/// plus a common filter consulted for every sheet.
///
/// # Examples
///
/// ```
/// use filters::{FilterSet, FilterSource, ObjectKind, ObjectRef};
///
/// let set = FilterSet::load(&FilterSource::Inline {
///     label: "doc".into(),
///     text: "[IfcElementInclusion]\nIfcWall = NO\n[CommonFilter]\nEqualTo = GlobalId\n".into(),
/// })
/// .unwrap();
///
/// assert!(set.filter_object(ObjectRef::asset("IfcWall"), None));
/// assert!(!set.filter_object(ObjectRef::asset("IfcDoor"), None));
/// assert!(set.filter_name_on_parent("GlobalId", Some(ObjectKind::Space)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    #[serde(rename = "IfcProductFilter")]
    product: ObjectFilter,
    #[serde(rename = "IfcTypeObjectFilter")]
    type_object: ObjectFilter,
    #[serde(rename = "IfcAssemblyFilter")]
    assembly: ObjectFilter,
    #[serde(rename = "ZoneFilter")]
    zone: Option<PropertyFilter>,
    #[serde(rename = "TypeFilter")]
    asset_type: Option<PropertyFilter>,
    #[serde(rename = "SpaceFilter")]
    space: Option<PropertyFilter>,
    #[serde(rename = "FloorFilter")]
    floor: Option<PropertyFilter>,
    #[serde(rename = "FacilityFilter")]
    facility: Option<PropertyFilter>,
    #[serde(rename = "SpareFilter")]
    spare: Option<PropertyFilter>,
    #[serde(rename = "ComponentFilter")]
    component: Option<PropertyFilter>,
    #[serde(rename = "CommonFilter")]
    common: Option<PropertyFilter>,
}

impl FilterSet {
    /// Creates a filter set that filters nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a filter set from a single configuration source.
    pub fn load(source: &FilterSource) -> Result<Self, LoadError> {
        Ok(Self::from_config(&source.read()?))
    }

    /// Loads the configuration compiled into the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        FilterConfig::bundled().map(|config| Self::from_config(&config))
    }

    /// Loads every source in order, merging later sources into the first.
    ///
    /// An empty iterator yields the bundled defaults.
    pub fn load_merged<'a, I>(sources: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = &'a FilterSource>,
    {
        let mut sources = sources.into_iter();
        let mut set = match sources.next() {
            Some(first) => Self::load(first)?,
            None => return Ok(Self::bundled()?),
        };
        for source in sources {
            set.merge(&Self::load(source)?);
        }
        Ok(set)
    }

    /// Builds a filter set from parsed configuration sections.
    ///
    /// Missing inclusion sections produce empty tables; missing property
    /// sections leave the corresponding sheet without a filter.
    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        let object_filter = |items: &str, types: &str| {
            let mut filter = config
                .section(items)
                .map(|section| ObjectFilter::from_section(section.pairs()))
                .unwrap_or_default();
            if let Some(section) = config.section(types) {
                for (name, values) in section.pairs() {
                    filter.add_predefined_type(name, split_list(values));
                }
            }
            filter
        };
        let property_filter = |name: &str| {
            config
                .section(name)
                .map(|section| PropertyFilter::from_section(section.pairs()))
        };

        Self {
            product: object_filter(PRODUCT_SECTION, PRODUCT_TYPES_SECTION),
            type_object: object_filter(TYPE_OBJECT_SECTION, TYPE_OBJECT_TYPES_SECTION),
            assembly: object_filter(ASSEMBLY_SECTION, ASSEMBLY_TYPES_SECTION),
            zone: property_filter(ZONE_SECTION),
            asset_type: property_filter(TYPE_SECTION),
            space: property_filter(SPACE_SECTION),
            floor: property_filter(FLOOR_SECTION),
            facility: property_filter(FACILITY_SECTION),
            spare: property_filter(SPARE_SECTION),
            component: property_filter(COMPONENT_SECTION),
            common: property_filter(COMMON_SECTION),
        }
    }

    /// Converts the filter set back into configuration sections.
    ///
    /// Parsing [`FilterConfig::render`] of the result with
    /// [`from_config`](Self::from_config) reproduces an equal set.
    #[must_use]
    pub fn to_config(&self) -> FilterConfig {
        let mut config = FilterConfig::default();
        let tables = [
            (PRODUCT_SECTION, PRODUCT_TYPES_SECTION, &self.product),
            (TYPE_OBJECT_SECTION, TYPE_OBJECT_TYPES_SECTION, &self.type_object),
            (ASSEMBLY_SECTION, ASSEMBLY_TYPES_SECTION, &self.assembly),
        ];
        for (items_section, types_section, filter) in tables {
            if !filter.items().is_empty() {
                let section = config.section_mut(items_section);
                for (name, include) in filter.items() {
                    section.set(name.as_str(), if *include { INCLUDE_VALUE } else { "NO" });
                }
            }
            if !filter.predefined_types().is_empty() {
                let section = config.section_mut(types_section);
                for (name, types) in filter.predefined_types() {
                    section.set(name.as_str(), join_list(types.iter()));
                }
            }
        }
        let present = self
            .property_filters()
            .into_iter()
            .filter_map(|(name, filter)| filter.map(|filter| (name, filter)));
        for (name, filter) in present {
            let section = config.section_mut(name);
            for key in PropertyKey::ALL {
                section.set(key.as_str(), join_list(filter.list(key).iter()));
            }
        }
        config
    }

    /// Returns `true` when the attribute `name` should be dropped from the
    /// sheet of `parent`.
    ///
    /// The common filter is consulted first and wins outright. Otherwise the
    /// filter of the parent's sheet decides; no parent, a parent without a
    /// dedicated sheet, or a sheet without a filter keeps the name.
    #[must_use]
    pub fn filter_name_on_parent(&self, name: &str, parent: Option<ObjectKind>) -> bool {
        let excluded = self.dispatch(name, parent, PropertyFilter::name_filter);
        trace_name_decision(name, parent.map(ObjectKind::as_str), false, excluded);
        excluded
    }

    /// Returns `true` when the property set `name` should be dropped from the
    /// sheet of `parent`.
    ///
    /// Dispatch follows [`filter_name_on_parent`](Self::filter_name_on_parent)
    /// but tests property-set names.
    #[must_use]
    pub fn filter_property_set_name_on_sheet(&self, name: &str, parent: Option<ObjectKind>) -> bool {
        let excluded = self.dispatch(name, parent, PropertyFilter::property_set_filter);
        trace_name_decision(name, parent.map(ObjectKind::as_str), true, excluded);
        excluded
    }

    /// Returns `true` when `object` should be left out of the export.
    ///
    /// Assets are tested against the product table together with
    /// `predefined_type`. Asset types are tested against the type object table
    /// by entity name only; `predefined_type` is not consulted for them. Other
    /// categories, and objects without an external entity, are always kept.
    #[must_use]
    pub fn filter_object(&self, object: ObjectRef<'_>, predefined_type: Option<&str>) -> bool {
        let entity = object.external_entity();
        if entity.is_empty() {
            return false;
        }
        let excluded = match object.kind() {
            ObjectKind::Asset => self.product.is_excluded(entity, predefined_type),
            ObjectKind::AssetType => self.type_object.is_excluded(entity, None),
            ObjectKind::Zone
            | ObjectKind::Space
            | ObjectKind::Floor
            | ObjectKind::Facility
            | ObjectKind::Spare
            | ObjectKind::Other => false,
        };
        trace_object_decision(object.kind().as_str(), entity, predefined_type, excluded);
        excluded
    }

    /// Folds the entity tables of `other` into this set.
    ///
    /// Only the product, type object and assembly tables are merged (see
    /// [`ObjectFilter::merge`]); the sheet property filters keep their
    /// current contents.
    pub fn merge(&mut self, other: &Self) {
        let tables = [
            ("product", &mut self.product, &other.product),
            ("type", &mut self.type_object, &other.type_object),
            ("assembly", &mut self.assembly, &other.assembly),
        ];
        for (label, table, incoming) in tables {
            table.merge(incoming);
            trace_filter_merge(label, table.items().len(), table.excluded_names().len());
        }
    }

    /// Serializes the set as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a set from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, SerializeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the set as JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), SerializeError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| SerializeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a set previously written with [`write_json`](Self::write_json).
    pub fn read_json(path: &Path) -> Result<Self, SerializeError> {
        let json = fs::read_to_string(path).map_err(|source| SerializeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the IFC product (component) table.
    #[must_use]
    pub const fn product_filter(&self) -> &ObjectFilter {
        &self.product
    }

    /// Returns the IFC type object table.
    #[must_use]
    pub const fn type_object_filter(&self) -> &ObjectFilter {
        &self.type_object
    }

    /// Returns the IFC assembly table.
    #[must_use]
    pub const fn assembly_filter(&self) -> &ObjectFilter {
        &self.assembly
    }

    /// Returns mutable access to the IFC product table.
    pub fn product_filter_mut(&mut self) -> &mut ObjectFilter {
        &mut self.product
    }

    /// Returns mutable access to the IFC type object table.
    pub fn type_object_filter_mut(&mut self) -> &mut ObjectFilter {
        &mut self.type_object
    }

    /// Returns mutable access to the IFC assembly table.
    pub fn assembly_filter_mut(&mut self) -> &mut ObjectFilter {
        &mut self.assembly
    }

    /// Returns the filter applied to every sheet.
    #[must_use]
    pub const fn common_filter(&self) -> Option<&PropertyFilter> {
        self.common.as_ref()
    }

    /// Returns the dedicated filter for `kind`'s sheet, if any.
    ///
    /// [`ObjectKind::Other`] never has a dedicated filter.
    #[must_use]
    pub fn sheet_filter(&self, kind: ObjectKind) -> Option<&PropertyFilter> {
        match kind {
            ObjectKind::Zone => self.zone.as_ref(),
            ObjectKind::AssetType => self.asset_type.as_ref(),
            ObjectKind::Space => self.space.as_ref(),
            ObjectKind::Floor => self.floor.as_ref(),
            ObjectKind::Facility => self.facility.as_ref(),
            ObjectKind::Spare => self.spare.as_ref(),
            ObjectKind::Asset => self.component.as_ref(),
            ObjectKind::Other => None,
        }
    }

    /// Installs or removes the common filter.
    pub fn set_common_filter(&mut self, filter: Option<PropertyFilter>) {
        self.common = filter;
    }

    /// Installs or removes the dedicated filter for `kind`'s sheet.
    ///
    /// Returns the filter back when `kind` has no sheet of its own.
    pub fn set_sheet_filter(
        &mut self,
        kind: ObjectKind,
        filter: Option<PropertyFilter>,
    ) -> Result<(), Option<PropertyFilter>> {
        let slot = match kind {
            ObjectKind::Zone => &mut self.zone,
            ObjectKind::AssetType => &mut self.asset_type,
            ObjectKind::Space => &mut self.space,
            ObjectKind::Floor => &mut self.floor,
            ObjectKind::Facility => &mut self.facility,
            ObjectKind::Spare => &mut self.spare,
            ObjectKind::Asset => &mut self.component,
            ObjectKind::Other => return Err(filter),
        };
        *slot = filter;
        Ok(())
    }

    fn dispatch(
        &self,
        name: &str,
        parent: Option<ObjectKind>,
        test: fn(&PropertyFilter, &str) -> bool,
    ) -> bool {
        if name.is_empty() {
            return false;
        }
        if self.common.as_ref().is_some_and(|common| test(common, name)) {
            return true;
        }
        parent
            .and_then(|kind| self.sheet_filter(kind))
            .is_some_and(|filter| test(filter, name))
    }

    fn property_filters(&self) -> [(&'static str, Option<&PropertyFilter>); 8] {
        [
            (COMMON_SECTION, self.common.as_ref()),
            (ZONE_SECTION, self.zone.as_ref()),
            (TYPE_SECTION, self.asset_type.as_ref()),
            (SPACE_SECTION, self.space.as_ref()),
            (FLOOR_SECTION, self.floor.as_ref()),
            (FACILITY_SECTION, self.facility.as_ref()),
            (SPARE_SECTION, self.spare.as_ref()),
            (COMPONENT_SECTION, self.component.as_ref()),
        ]
    }
}

fn join_list<'a, I>(values: I) -> String
where
    I: Iterator<Item = &'a String>,
{
    let mut joined = String::new();
    for (index, value) in values.enumerate() {
        if index > 0 {
            joined.push(LIST_SEPARATOR);
        }
        joined.push_str(value);
    }
    joined
}
