//! Relational model element types

/// Index of a [`SchemaNamespace`] within its owning `DataModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub usize);

/// Index of an [`EnumDomain`] within its owning `DataModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainId(pub usize);

/// Index of a [`Table`] within its owning `DataModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub usize);

/// Index of an [`EntitySetProjection`] within its owning `DataModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub usize);

/// A namespace-scoped container for tables and views, created lazily on
/// first reference and looked up by exact name.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNamespace {
    pub name: String,
}

/// A reusable named data-type definition representing an EDM enumeration.
///
/// The member list is stored as a single delimited text blob: one
/// `value '\t' label` pair per line, lines separated by `'\n'`, in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDomain {
    /// Fully-qualified enum type name.
    pub name: String,
    /// Underlying storage type; enums are integer-valued.
    pub data_type: String,
    pub list_of_values: String,
}

impl EnumDomain {
    /// Build a domain from ordered (value, label) pairs.
    pub fn from_members(name: &str, members: &[(i64, String)]) -> Self {
        let mut list_of_values = String::new();
        for (value, label) in members {
            list_of_values.push_str(&format!("{}\t{}\n", value, label));
        }
        Self {
            name: name.to_string(),
            data_type: "int".to_string(),
            list_of_values,
        }
    }

    /// Decode the list-of-values blob back into ordered (value, label) pairs.
    pub fn values(&self) -> Vec<(i64, String)> {
        self.list_of_values
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let (value, label) = line.split_once('\t')?;
                Some((value.parse().ok()?, label.to_string()))
            })
            .collect()
    }
}

/// Kind tag carried on a table translated from an EDM structured type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Entity,
    Complex,
}

/// A table translated from one EDM entity or complex type.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub namespace: NamespaceId,
    pub name: String,
    pub kind: TableKind,
    /// Inherited columns come first, in base-to-derived order, followed by
    /// the type's own declared columns.
    pub columns: Vec<Column>,
}

/// A column translated from one structural EDM property.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Relational data type tag; `None` when the source type has no mapping.
    /// Mutually exclusive with `domain`.
    pub data_type: Option<String>,
    /// NOT the EDM `Nullable` facet: `mandatory == !nullable`.
    pub mandatory: bool,
    /// True iff the source property participates in the entity key.
    pub primary: bool,
    pub length: Option<u32>,
    pub precision: Option<u16>,
    pub scale: Option<u16>,
    /// Set instead of `data_type` for enum-typed properties.
    pub domain: Option<DomainId>,
}

/// A join column pair on a reference.
///
/// References generated from navigation properties deliberately carry no join
/// pairs: the EDM navigation tells us role and target but the physical FK
/// column mapping is left unresolved. The field exists so a later pass (or
/// the host) can complete it.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPair {
    pub child_column: String,
    pub parent_column: String,
}

/// A directed table-to-table reference generated from a navigation property.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Deterministic name: `"{child} > {parent} : {role}"`.
    pub name: String,
    pub child: TableId,
    pub parent: TableId,
    /// The navigation property's name.
    pub parent_role: String,
    pub joins: Vec<JoinPair>,
}

/// How an entity set is represented in the relational model.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionBody {
    /// A SQL view selecting all columns of the underlying table.
    View { sql_query: String },
    /// A structural copy of the underlying table, independently named and
    /// owned; traceability to the source table is kept on the projection.
    Replica { columns: Vec<Column> },
}

/// The relational representation of one entity set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySetProjection {
    pub namespace: NamespaceId,
    /// The entity set's name.
    pub name: String,
    /// The table of the set's underlying entity type.
    pub source_table: TableId,
    pub body: ProjectionBody,
}

/// A directed view-to-view reference mirroring a navigation property binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewReference {
    pub name: String,
    pub child: ViewId,
    pub parent: ViewId,
    pub parent_role: String,
    pub joins: Vec<JoinPair>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_domain_round_trip_empty() {
        let domain = EnumDomain::from_members("NS.Empty", &[]);
        assert_eq!(domain.list_of_values, "");
        assert_eq!(domain.values(), vec![]);
    }

    #[test]
    fn test_enum_domain_round_trip_single() {
        let members = vec![(1, "Red".to_string())];
        let domain = EnumDomain::from_members("NS.Color", &members);
        assert_eq!(domain.list_of_values, "1\tRed\n");
        assert_eq!(domain.values(), members);
    }

    #[test]
    fn test_enum_domain_round_trip_many_preserves_order() {
        let members = vec![
            (4, "Four".to_string()),
            (-1, "MinusOne".to_string()),
            (0, "Zero".to_string()),
        ];
        let domain = EnumDomain::from_members("NS.Numbers", &members);
        assert_eq!(domain.values(), members);
    }
}
