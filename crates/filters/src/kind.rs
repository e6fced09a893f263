use std::fmt;
use std::str::FromStr;

/// COBie object category used to route filter queries.
///
/// The variants mirror the sheets whose attributes carry their own filters;
/// [`ObjectKind::Other`] covers every object without a dedicated filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ObjectKind {
    /// Zone sheet.
    Zone,
    /// Type sheet (asset types built from IFC type objects).
    AssetType,
    /// Space sheet.
    Space,
    /// Floor sheet.
    Floor,
    /// Facility sheet.
    Facility,
    /// Spare sheet.
    Spare,
    /// Component sheet (asset instances built from IFC products).
    Asset,
    /// Any object without a dedicated filter.
    Other,
}

impl ObjectKind {
    /// Every category, in dispatch order.
    pub const ALL: [Self; 8] = [
        Self::Zone,
        Self::AssetType,
        Self::Space,
        Self::Floor,
        Self::Facility,
        Self::Spare,
        Self::Asset,
        Self::Other,
    ];

    /// Returns the lower-case token used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::AssetType => "type",
            Self::Space => "space",
            Self::Floor => "floor",
            Self::Facility => "facility",
            Self::Spare => "spare",
            Self::Asset => "component",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ObjectKind`] token.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown object kind '{0}'")]
pub struct ParseObjectKindError(String);

impl FromStr for ObjectKind {
    type Err = ParseObjectKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "asset" => Ok(Self::Asset),
            "assettype" | "asset-type" => Ok(Self::AssetType),
            _ => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == token)
                .ok_or_else(|| ParseObjectKindError(s.to_owned())),
        }
    }
}

/// Borrowed view of a COBie object submitted to [`FilterSet::filter_object`].
///
/// [`FilterSet::filter_object`]: crate::FilterSet::filter_object
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ObjectRef<'a> {
    kind: ObjectKind,
    external_entity: &'a str,
}

impl<'a> ObjectRef<'a> {
    /// Creates a view of an object of `kind` whose source IFC entity is
    /// `external_entity` (for example `IfcWall`).
    #[must_use]
    pub const fn new(kind: ObjectKind, external_entity: &'a str) -> Self {
        Self {
            kind,
            external_entity,
        }
    }

    /// Shorthand for a component-sheet asset.
    #[must_use]
    pub const fn asset(external_entity: &'a str) -> Self {
        Self::new(ObjectKind::Asset, external_entity)
    }

    /// Shorthand for a type-sheet asset type.
    #[must_use]
    pub const fn asset_type(external_entity: &'a str) -> Self {
        Self::new(ObjectKind::AssetType, external_entity)
    }

    /// Returns the object's category.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Returns the IFC entity name the object was exported from.
    #[must_use]
    pub const fn external_entity(&self) -> &'a str {
        self.external_entity
    }
}
