// doc-fuzzing/src/mutators/organization.rs
use doc_types::Organization;

use crate::catalog::MutatorCatalog;

pub fn register(catalog: &mut MutatorCatalog) {
    catalog
        .register_resource::<Organization>()
        .register::<Organization, _>("identifier", |ctx, organization: &mut Organization| {
            ctx.fuzz_child_types_or_default("Organization", "identifier", &mut organization.identifier)
        })
        .register::<Organization, _>("active", |ctx, organization: &mut Organization| {
            ctx.fuzz_child("Organization", "active", &mut organization.active)
        })
        .register::<Organization, _>("name", |ctx, organization: &mut Organization| {
            ctx.fuzz_child("Organization", "name", &mut organization.name)
        })
        .register::<Organization, _>("alias", |ctx, organization: &mut Organization| {
            ctx.fuzz_child_types_or_default("Organization", "alias", &mut organization.alias)
        })
        .register::<Organization, _>("description", |ctx, organization: &mut Organization| {
            ctx.fuzz_child("Organization", "description", &mut organization.description)
        })
        .register::<Organization, _>("partOf", |ctx, organization: &mut Organization| {
            ctx.fuzz_child("Organization", "partOf", &mut organization.part_of)
        })
        .register_default::<Organization>();
}
