//! Integration tests for entity-name evaluation in [`ObjectFilter`].
//!
//! These tests cover the include/exclude table, the predefined-type gate and
//! the default-permit behaviour for entities that are not listed.

use filters::{FilterConfig, FilterSet, ObjectFilter, ObjectRef};
use std::path::Path;

// ============================================================================
// Name Evaluation
// ============================================================================

/// Verifies the canonical wall/door/beam example.
#[test]
fn listed_exclude_listed_include_and_unlisted() {
    let filter = ObjectFilter::from_section([("IFCWALL", "NO"), ("IFCDOOR", "YES")]);

    assert!(filter.is_excluded("IfcWall", None));
    assert!(!filter.is_excluded("IfcDoor", None));
    assert!(!filter.is_excluded("IfcBeam", None));
}

/// Verifies comparisons ignore case on both the name and the table.
#[test]
fn evaluation_ignores_case() {
    let filter = ObjectFilter::from_section([("ifcWall", "no")]);

    assert!(filter.is_excluded("IFCWALL", None));
    assert!(filter.is_excluded("ifcwall", None));
    assert!(filter.is_excluded("IfcWall", None));
}

/// Verifies an empty table keeps everything.
#[test]
fn empty_filter_keeps_everything() {
    let filter = ObjectFilter::new();

    assert!(filter.is_empty());
    assert!(!filter.is_excluded("IfcWall", None));
    assert!(!filter.is_excluded("IfcWall", Some("STANDARD")));
}

// ============================================================================
// Predefined Types
// ============================================================================

/// Verifies a predefined type narrows the exclusion to the listed types.
#[test]
fn predefined_type_gates_exclusion() {
    let mut filter = ObjectFilter::from_section([("WALL", "NO")]);
    assert!(filter.add_predefined_type("WALL", ["STANDARD"]));

    assert!(filter.is_excluded("WALL", Some("STANDARD")));
    assert!(!filter.is_excluded("WALL", Some("CURTAIN")));
}

/// Verifies that without a predefined type the name alone decides.
#[test]
fn missing_predefined_type_falls_back_to_name() {
    let mut filter = ObjectFilter::from_section([("WALL", "NO")]);
    filter.add_predefined_type("WALL", ["STANDARD"]);

    assert!(filter.is_excluded("WALL", None));
}

/// Verifies a second registration for the same entity is refused.
#[test]
fn add_predefined_type_is_first_wins() {
    let mut filter = ObjectFilter::from_section([("WALL", "NO")]);
    assert!(filter.add_predefined_type("WALL", ["STANDARD"]));
    let before = filter.clone();

    assert!(!filter.add_predefined_type("wall", ["CURTAIN"]));

    assert_eq!(filter, before);
    assert!(!filter.is_excluded("WALL", Some("CURTAIN")));
}

/// Verifies predefined types are read from the dedicated configuration section.
#[test]
fn predefined_types_load_from_configuration() {
    let config = FilterConfig::parse(
        "[IfcElementInclusion]\nIfcWall = NO\n\n[IfcElementPredefinedTypes]\nIfcWall = standard; shear\n",
        Path::new("walls.conf"),
    )
    .unwrap();
    let set = FilterSet::from_config(&config);

    let types = &set.product_filter().predefined_types()["IFCWALL"];
    assert_eq!(types.iter().collect::<Vec<_>>(), ["SHEAR", "STANDARD"]);
    assert!(set.filter_object(ObjectRef::asset("IfcWall"), Some("Shear")));
    assert!(!set.filter_object(ObjectRef::asset("IfcWall"), Some("ELEMENTEDWALL")));
}
