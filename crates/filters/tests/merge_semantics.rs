//! Integration tests for combining several filter configurations.
//!
//! Merging only ever widens what is included: includes from the incoming
//! configuration win, its excludes are ignored, and predefined types are
//! unioned. Sheet property filters are not part of a merge.

use filters::{FilterSet, FilterSource, ObjectFilter, ObjectKind, ObjectRef, PropertyFilter};

fn inline(label: &str, text: &str) -> FilterSource {
    FilterSource::Inline {
        label: label.to_owned(),
        text: text.to_owned(),
    }
}

// ============================================================================
// Entity Tables
// ============================================================================

/// Verifies an include in the incoming table reinstates an excluded entity.
#[test]
fn include_overrides_exclude() {
    let mut filter = ObjectFilter::from_section([("IfcSlab", "NO")]);
    filter.merge(&ObjectFilter::from_section([("IfcSlab", "YES")]));

    assert_eq!(filter.flag("IfcSlab"), Some(true));
    assert!(!filter.is_excluded("IfcSlab", None));
}

/// Verifies an exclude in the incoming table never removes an include.
#[test]
fn exclude_never_overrides_include() {
    let mut filter = ObjectFilter::from_section([("IfcDoor", "YES")]);
    filter.merge(&ObjectFilter::from_section([("IfcDoor", "NO"), ("IfcBeam", "NO")]));

    assert_eq!(filter.flag("IfcDoor"), Some(true));
    assert_eq!(filter.flag("IfcBeam"), None);
    assert!(!filter.is_excluded("IfcBeam", None));
}

/// Verifies the exclusion set is current right after a merge.
#[test]
fn exclusion_set_is_rebuilt() {
    let mut filter = ObjectFilter::from_section([("A", "NO"), ("B", "NO")]);
    assert_eq!(filter.excluded_names().len(), 2);

    filter.merge(&ObjectFilter::from_section([("A", "YES"), ("C", "YES")]));

    assert_eq!(filter.excluded_names().iter().collect::<Vec<_>>(), ["B"]);
    assert_eq!(filter.items().len(), 3);
}

/// Verifies predefined types are unioned per entity without duplicates.
#[test]
fn predefined_types_are_unioned() {
    let mut filter = ObjectFilter::new();
    filter.add_predefined_type("WALL", ["A"]);
    let mut other = ObjectFilter::new();
    other.add_predefined_type("WALL", ["B", "A"]);
    other.add_predefined_type("SLAB", ["FLOOR"]);

    filter.merge(&other);

    let types = filter.predefined_types();
    assert_eq!(types["WALL"].iter().collect::<Vec<_>>(), ["A", "B"]);
    assert_eq!(types["SLAB"].iter().collect::<Vec<_>>(), ["FLOOR"]);
}

// ============================================================================
// Filter Sets
// ============================================================================

/// Verifies all three entity tables take part in a merge.
#[test]
fn filter_set_merges_all_entity_tables() {
    let sources = [
        inline(
            "base",
            "[IfcElementInclusion]\nIfcWall = NO\n[IfcTypeInclusion]\nIfcWallType = NO\n[IfcAssemblyInclusion]\nIfcRoof = NO\n",
        ),
        inline(
            "project",
            "[IfcElementInclusion]\nIfcWall = YES\n[IfcTypeInclusion]\nIfcWallType = YES\n[IfcAssemblyInclusion]\nIfcRoof = YES\n",
        ),
    ];
    let set = FilterSet::load_merged(&sources).unwrap();

    assert!(!set.filter_object(ObjectRef::asset("IfcWall"), None));
    assert!(!set.filter_object(ObjectRef::asset_type("IfcWallType"), None));
    assert_eq!(set.assembly_filter().flag("IfcRoof"), Some(true));
}

/// Verifies that merging keeps the first set's sheet filters as they are.
///
/// The incoming set's property filters are dropped, including sheets the
/// first set has no filter for. This asymmetry is intentional behaviour of
/// [`FilterSet::merge`].
#[test]
fn filter_set_merge_leaves_property_filters_alone() {
    let sources = [
        inline("base", "[CommonFilter]\nEqualTo = GlobalId\n"),
        inline(
            "project",
            "[CommonFilter]\nEqualTo = Name\n[ZoneFilter]\nEqualTo = ZoneType\n",
        ),
    ];
    let set = FilterSet::load_merged(&sources).unwrap();

    assert!(set.filter_name_on_parent("GlobalId", None));
    assert!(!set.filter_name_on_parent("Name", None));
    assert!(set.sheet_filter(ObjectKind::Zone).is_none());
    assert!(!set.filter_name_on_parent("ZoneType", Some(ObjectKind::Zone)));
    assert_eq!(
        set.common_filter(),
        Some(&PropertyFilter::from_section([("EqualTo", "GlobalId")]))
    );
}

/// Verifies the bundled defaults can be widened by a project configuration.
#[test]
fn project_configuration_widens_bundled_defaults() {
    let sources = [
        FilterSource::Bundled,
        inline("project", "[IfcElementInclusion]\nIfcSlab = YES\nIfcDoor = NO\n"),
    ];
    let set = FilterSet::load_merged(&sources).unwrap();

    assert!(!set.filter_object(ObjectRef::asset("IfcSlab"), None));
    assert!(!set.filter_object(ObjectRef::asset("IfcDoor"), None));
    assert!(set.filter_object(ObjectRef::asset("IfcWall"), None));
}

/// Verifies a load failure in any source aborts the merge.
#[test]
fn failing_source_aborts_merge() {
    let sources = [FilterSource::Bundled, inline("broken", "IfcWall = NO\n")];
    let error = FilterSet::load_merged(&sources).unwrap_err();

    assert!(error.to_string().contains("<inline:broken>"));
}
