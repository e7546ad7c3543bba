//! Merge a freshly translated scratch graph into a persistent target model.
//!
//! The fresh graph is authoritative for additions and changes; elements that
//! exist in the target but not in the fresh graph are left untouched, so a
//! metadata update never deletes anything from the target model.

use log::{debug, error, info};

use crate::model::{
    Column, DataModel, DomainId, EntitySetProjection, ModelSink, NamespaceId, ProjectionBody,
    Reference, TableId, ViewId, ViewReference,
};

/// Outcome of one merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
    pub success: bool,
}

/// Apply the fresh graph's additions and modifications to the target model.
///
/// A fresh graph without any tables is refused: translating metadata that
/// yields no tables means something went wrong upstream, and merging it
/// would accomplish nothing.
pub fn merge_into(target: &mut DataModel, fresh: &DataModel) -> MergeReport {
    if fresh.tables.is_empty() {
        error!("No tables were created based on the OData metadata, refusing to merge");
        return MergeReport {
            added: 0,
            updated: 0,
            success: false,
        };
    }

    debug!("Merging the OData metadata changes into the model");
    let mut added = 0;
    let mut updated = 0;

    // Id-bearing elements are remapped from the fresh graph's indices to the
    // target's as each element kind is merged; the later kinds depend on the
    // maps built by the earlier ones.
    let mut namespace_map: Vec<NamespaceId> = Vec::with_capacity(fresh.namespaces.len());
    for namespace in &fresh.namespaces {
        if target.find_namespace(&namespace.name).is_none() {
            added += 1;
        }
        namespace_map.push(target.ensure_namespace(&namespace.name));
    }

    let mut domain_map: Vec<DomainId> = Vec::with_capacity(fresh.domains.len());
    for domain in &fresh.domains {
        match target.find_domain(&domain.name) {
            Some(id) => {
                if target.domains[id.0] != *domain {
                    target.domains[id.0] = domain.clone();
                    updated += 1;
                }
                domain_map.push(id);
            }
            None => {
                domain_map.push(target.add_domain(domain.clone()));
                added += 1;
            }
        }
    }

    let mut table_map: Vec<TableId> = Vec::with_capacity(fresh.tables.len());
    for table in &fresh.tables {
        let mut remapped = table.clone();
        remapped.namespace = namespace_map[table.namespace.0];
        for column in &mut remapped.columns {
            remap_column(column, &domain_map);
        }
        match target.find_table(remapped.namespace, &remapped.name) {
            Some(id) => {
                if target.tables[id.0] != remapped {
                    target.tables[id.0] = remapped;
                    updated += 1;
                }
                table_map.push(id);
            }
            None => {
                table_map.push(target.add_table(remapped));
                added += 1;
            }
        }
    }

    let mut view_map: Vec<ViewId> = Vec::with_capacity(fresh.views.len());
    for view in &fresh.views {
        let mut remapped = EntitySetProjection {
            namespace: namespace_map[view.namespace.0],
            name: view.name.clone(),
            source_table: table_map[view.source_table.0],
            body: view.body.clone(),
        };
        if let ProjectionBody::Replica { columns } = &mut remapped.body {
            for column in columns {
                remap_column(column, &domain_map);
            }
        }
        match target.find_view(remapped.namespace, &remapped.name) {
            Some(id) => {
                if target.views[id.0] != remapped {
                    target.views[id.0] = remapped;
                    updated += 1;
                }
                view_map.push(id);
            }
            None => {
                view_map.push(target.add_view(remapped));
                added += 1;
            }
        }
    }

    for reference in &fresh.references {
        let remapped = Reference {
            name: reference.name.clone(),
            child: table_map[reference.child.0],
            parent: table_map[reference.parent.0],
            parent_role: reference.parent_role.clone(),
            joins: reference.joins.clone(),
        };
        // Reference names are built from bare table names, so two namespaces
        // can legitimately produce the same name; the endpoints disambiguate.
        match target.references.iter().position(|r| {
            r.name == remapped.name && r.child == remapped.child && r.parent == remapped.parent
        }) {
            Some(index) => {
                if target.references[index] != remapped {
                    target.references[index] = remapped;
                    updated += 1;
                }
            }
            None => {
                target.add_reference(remapped);
                added += 1;
            }
        }
    }

    for view_reference in &fresh.view_references {
        let remapped = ViewReference {
            name: view_reference.name.clone(),
            child: view_map[view_reference.child.0],
            parent: view_map[view_reference.parent.0],
            parent_role: view_reference.parent_role.clone(),
            joins: view_reference.joins.clone(),
        };
        match target.view_references.iter().position(|r| {
            r.name == remapped.name && r.child == remapped.child && r.parent == remapped.parent
        }) {
            Some(index) => {
                if target.view_references[index] != remapped {
                    target.view_references[index] = remapped;
                    updated += 1;
                }
            }
            None => {
                target.add_view_reference(remapped);
                added += 1;
            }
        }
    }

    info!(
        "Merged the OData metadata changes into model '{}': {} added, {} updated",
        target.name, added, updated
    );
    MergeReport {
        added,
        updated,
        success: true,
    }
}

fn remap_column(column: &mut Column, domain_map: &[DomainId]) {
    if let Some(domain) = column.domain {
        column.domain = Some(domain_map[domain.0]);
    }
}
