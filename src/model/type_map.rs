//! EDM primitive type to relational column type mapping.

use crate::edm::{EdmPrimitiveKind, EdmTypeRef};

/// The relational side of a primitive type mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    pub data_type: &'static str,
    pub length: Option<u32>,
    pub precision: Option<u16>,
    pub scale: Option<u16>,
}

impl MappedType {
    fn plain(data_type: &'static str) -> Self {
        Self {
            data_type,
            length: None,
            precision: None,
            scale: None,
        }
    }
}

/// Map an EDM primitive kind (with the facets of its type reference) to a
/// relational column type.
///
/// The table is fixed and deterministic. Kinds outside it (Stream, Duration,
/// Single, the spatial types) have no relational mapping and return `None`;
/// the caller decides how loudly to skip them.
pub fn map_primitive(kind: EdmPrimitiveKind, type_ref: &EdmTypeRef) -> Option<MappedType> {
    // V4 has no fixed-length facet on binary/string types, so the
    // variable-length relational types are used throughout.
    match kind {
        EdmPrimitiveKind::Binary => Some(MappedType {
            length: type_ref.max_length,
            ..MappedType::plain("varbinary")
        }),
        EdmPrimitiveKind::Boolean => Some(MappedType::plain("bit")),
        EdmPrimitiveKind::Byte | EdmPrimitiveKind::SByte => Some(MappedType::plain("tinyint")),
        EdmPrimitiveKind::Date => Some(MappedType::plain("date")),
        EdmPrimitiveKind::DateTimeOffset => Some(MappedType::plain("datetimeoffset")),
        EdmPrimitiveKind::Decimal => Some(MappedType {
            precision: type_ref.precision,
            scale: type_ref.scale,
            ..MappedType::plain("decimal")
        }),
        EdmPrimitiveKind::Double => Some(MappedType::plain("float")),
        EdmPrimitiveKind::Guid => Some(MappedType::plain("uniqueidentifier")),
        EdmPrimitiveKind::Int16 => Some(MappedType::plain("smallint")),
        EdmPrimitiveKind::Int32 => Some(MappedType::plain("int")),
        EdmPrimitiveKind::Int64 => Some(MappedType::plain("bigint")),
        EdmPrimitiveKind::String => Some(MappedType {
            length: type_ref.max_length,
            ..MappedType::plain("nvarchar")
        }),
        EdmPrimitiveKind::TimeOfDay => Some(MappedType::plain("time")),
        EdmPrimitiveKind::Duration
        | EdmPrimitiveKind::Geography
        | EdmPrimitiveKind::Geometry
        | EdmPrimitiveKind::Single
        | EdmPrimitiveKind::Stream => None,
    }
}
