//! In-memory representation of a parsed EDM (Entity Data Model) schema.
//!
//! Both CSDL readers (V1-3 and V4) populate this shared object model, so the
//! schema graph builder is written once against it regardless of the metadata
//! generation the service exposes.

/// The EDM primitive type kinds this tool understands.
///
/// Kinds without a relational mapping (Stream, the spatial types, ...) are
/// still represented so the type mapper can decide what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdmPrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Geography,
    Geometry,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
}

impl EdmPrimitiveKind {
    /// Resolve a qualified type name like `Edm.Int32` to a primitive kind.
    /// Returns `None` for non-primitive names (enums, complex types).
    pub fn parse(qualified_name: &str) -> Option<Self> {
        let local = qualified_name.strip_prefix("Edm.")?;
        // The spatial kinds have subtype names (GeographyPoint etc.) which all
        // share the base kind's (lack of a) relational mapping.
        if local.starts_with("Geography") {
            return Some(EdmPrimitiveKind::Geography);
        }
        if local.starts_with("Geometry") {
            return Some(EdmPrimitiveKind::Geometry);
        }
        match local {
            "Binary" => Some(EdmPrimitiveKind::Binary),
            "Boolean" => Some(EdmPrimitiveKind::Boolean),
            "Byte" => Some(EdmPrimitiveKind::Byte),
            "Date" => Some(EdmPrimitiveKind::Date),
            "DateTime" | "DateTimeOffset" => Some(EdmPrimitiveKind::DateTimeOffset),
            "Decimal" => Some(EdmPrimitiveKind::Decimal),
            "Double" => Some(EdmPrimitiveKind::Double),
            "Duration" | "Time" => Some(EdmPrimitiveKind::Duration),
            "Guid" => Some(EdmPrimitiveKind::Guid),
            "Int16" => Some(EdmPrimitiveKind::Int16),
            "Int32" => Some(EdmPrimitiveKind::Int32),
            "Int64" => Some(EdmPrimitiveKind::Int64),
            "SByte" => Some(EdmPrimitiveKind::SByte),
            "Single" => Some(EdmPrimitiveKind::Single),
            "Stream" => Some(EdmPrimitiveKind::Stream),
            "String" => Some(EdmPrimitiveKind::String),
            "TimeOfDay" => Some(EdmPrimitiveKind::TimeOfDay),
            _ => None,
        }
    }
}

/// A reference to an EDM type as it appears on a property, with facets.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmTypeRef {
    /// Qualified type name, e.g. `Edm.String` or `Sample.NS.Color`.
    pub name: String,
    /// Whether this is a `Collection(...)` reference.
    pub is_collection: bool,
    /// EDM `Nullable` facet; defaults to true when not declared.
    pub nullable: bool,
    /// `MaxLength` facet for string/binary types; `Max` is treated as unbounded.
    pub max_length: Option<u32>,
    /// `Precision` facet for decimal types.
    pub precision: Option<u16>,
    /// `Scale` facet for decimal types.
    pub scale: Option<u16>,
}

impl EdmTypeRef {
    /// The primitive kind of the referenced type, if it is an `Edm.*` primitive.
    pub fn primitive_kind(&self) -> Option<EdmPrimitiveKind> {
        EdmPrimitiveKind::parse(&self.name)
    }
}

/// A structural (value-holding) property of an entity or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmProperty {
    pub name: String,
    pub type_ref: EdmTypeRef,
}

/// A navigation property expressing a relationship to another entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmNavigationProperty {
    pub name: String,
    /// Qualified name of the targeted entity type.
    pub target_type: String,
    /// Whether the navigation targets a collection of the entity type.
    pub is_collection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredTypeKind {
    Entity,
    Complex,
}

/// An EDM entity or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmStructuredType {
    pub namespace: String,
    pub name: String,
    pub kind: StructuredTypeKind,
    /// Qualified name of the base type, when the type inherits one.
    pub base_type: Option<String>,
    pub is_abstract: bool,
    /// Names of the key properties declared on this type (entity types only;
    /// usually declared on the root of an inheritance chain).
    pub key: Vec<String>,
    pub properties: Vec<EdmProperty>,
    pub navigation_properties: Vec<EdmNavigationProperty>,
}

impl EdmStructuredType {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// One member of an EDM enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmEnumMember {
    pub name: String,
    pub value: i64,
}

/// An EDM enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmEnumType {
    pub namespace: String,
    pub name: String,
    pub members: Vec<EdmEnumMember>,
}

impl EdmEnumType {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// A navigation property binding declared on an entity set (V4 only).
#[derive(Debug, Clone, PartialEq)]
pub struct EdmNavigationBinding {
    /// Name of the bound navigation property (last segment of the `Path`).
    pub navigation_property: String,
    /// Name of the targeted entity set or singleton.
    pub target: String,
    /// Whether the binding target is a collection (an entity set rather than
    /// a singleton).
    pub targets_collection: bool,
}

/// A named, queryable collection of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmEntitySet {
    pub name: String,
    /// Namespace of the entity container declaring the set.
    pub container_namespace: String,
    /// Qualified name of the set's entity type.
    pub entity_type: String,
    pub bindings: Vec<EdmNavigationBinding>,
}

/// A structured error reported by a CSDL reader.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmParseError {
    pub code: &'static str,
    pub message: String,
    /// Source location, formatted as `line:column`.
    pub location: String,
}

impl std::fmt::Display for EdmParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} @{}", self.code, self.message, self.location)
    }
}

/// A fully parsed EDM model, independent of the CSDL dialect it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdmModel {
    pub enum_types: Vec<EdmEnumType>,
    pub structured_types: Vec<EdmStructuredType>,
    pub entity_sets: Vec<EdmEntitySet>,
}

impl EdmModel {
    pub fn find_structured_type(&self, qualified_name: &str) -> Option<&EdmStructuredType> {
        self.structured_types
            .iter()
            .find(|t| t.full_name() == qualified_name)
    }

    pub fn find_enum_type(&self, qualified_name: &str) -> Option<&EdmEnumType> {
        self.enum_types
            .iter()
            .find(|t| t.full_name() == qualified_name)
    }
}

/// Split a qualified type name into (namespace, local name) at the last dot.
pub fn split_qualified_name(qualified_name: &str) -> (&str, &str) {
    match qualified_name.rsplit_once('.') {
        Some((namespace, local)) => (namespace, local),
        None => ("", qualified_name),
    }
}
