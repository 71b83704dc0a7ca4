//! Catalog and services listings.

use himsols_core::catalog::{ALL_CATEGORIES, SERVICES, Service, ServiceInfo};
use himsols_core::{ServiceType, Tree, TreeCatalog};
use serde::Serialize;
use tracing::debug;

use crate::output::Output;
use crate::render;

#[derive(Serialize)]
struct ServiceTypeView {
    slug: &'static str,
    #[serde(flatten)]
    info: ServiceInfo,
}

#[derive(Serialize)]
struct ServicesView {
    services: &'static [Service],
    service_types: Vec<ServiceTypeView>,
}

/// List trees, optionally restricted to one category.
///
/// # Errors
///
/// Returns an error if the category does not exist or output fails.
pub fn trees(category: Option<&str>, output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = TreeCatalog::standard();
    let category = category.unwrap_or(ALL_CATEGORIES);

    let categories = catalog.categories();
    if !categories.contains(&category) {
        return Err(format!(
            "unknown category: {category} (expected one of: {})",
            categories.join(", ")
        )
        .into());
    }

    let trees: Vec<&Tree> = catalog.filter(category).collect();
    debug!(category, count = trees.len(), "listing trees");

    let lines: Vec<String> = trees.iter().flat_map(|tree| render::tree(tree)).collect();
    output.emit(&lines, &trees)?;
    Ok(())
}

/// List services, service-request types, and urgency levels.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn services(output: Output) -> Result<(), Box<dyn std::error::Error>> {
    let view = ServicesView {
        services: SERVICES,
        service_types: ServiceType::ALL
            .into_iter()
            .map(|service| ServiceTypeView {
                slug: service.slug(),
                info: service.info(),
            })
            .collect(),
    };
    output.emit(&render::services(), &view)?;
    Ok(())
}
