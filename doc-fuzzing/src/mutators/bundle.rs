// doc-fuzzing/src/mutators/bundle.rs
//! Bundles are not domain resources: they get only what is registered here.

use doc_types::{Bundle, BundleEntry};

use crate::catalog::MutatorCatalog;
use crate::provenance::LogEntry;

pub fn register(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Bundle, _>("id", |ctx, bundle: &mut Bundle| {
            Ok(ctx.fuzz_id_element("Bundle", &mut bundle.id))
        })
        .register::<Bundle, _>("meta", |ctx, bundle: &mut Bundle| {
            ctx.fuzz_child("Bundle", "meta", &mut bundle.meta)
        })
        .register::<Bundle, _>("type", |ctx, bundle: &mut Bundle| {
            Ok(ctx.fuzz_enum("Bundle", "type", &mut bundle.type_))
        })
        .register::<Bundle, _>("total", |ctx, bundle: &mut Bundle| {
            let before = bundle.total;
            let entries = bundle.entry.len() as u32;
            let candidates = [0, entries.wrapping_add(1), u32::MAX, before.unwrap_or(0).wrapping_add(1)];
            let after = ctx
                .choose_one(&candidates)
                .copied()
                .filter(|total| Some(*total) != before)
                .unwrap_or_else(|| before.unwrap_or(0).wrapping_add(1));
            bundle.total = Some(after);
            Ok(LogEntry::operation(format!(
                "Bundle.total: {} -> {} ({} entries)",
                before.map(|total| total.to_string()).unwrap_or_else(|| "absent".to_string()),
                after,
                entries
            )))
        })
        .register::<Bundle, _>("entry", |ctx, bundle: &mut Bundle| {
            ctx.fuzz_child_types_or_default("Bundle", "entry", &mut bundle.entry)
        })
        .register_default::<Bundle>();

    catalog
        .register::<BundleEntry, _>("fullUrl", |ctx, entry: &mut BundleEntry| {
            ctx.fuzz_child("BundleEntry", "fullUrl", &mut entry.full_url)
        })
        .register::<BundleEntry, _>("resource", |ctx, entry: &mut BundleEntry| {
            ctx.fuzz_child("BundleEntry", "resource", &mut entry.resource)
        })
        .register_default::<BundleEntry>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MutationEngine;
    use crate::mutators::standard_catalog;
    use crate::random::RandomSource;

    #[test]
    fn test_bundle_has_no_base_set() {
        let catalog = standard_catalog();
        assert_eq!(
            catalog.mutator_names::<Bundle>(),
            vec!["id", "meta", "type", "total", "entry"]
        );
    }

    #[test]
    fn test_total_always_changes() {
        let engine = MutationEngine::new(standard_catalog());
        let mut ctx = engine.context(RandomSource::seeded(2));
        let entries = engine.catalog().entries_for::<Bundle>().unwrap();
        let total = entries.iter().find(|entry| entry.name() == "total").unwrap();

        let mut bundle = Bundle::default();
        for _ in 0..50 {
            let before = bundle.total;
            total.apply(&mut ctx, &mut bundle).unwrap();
            assert_ne!(bundle.total, before);
        }
    }

    #[test]
    fn test_empty_entry_is_populated() {
        let engine = MutationEngine::new(standard_catalog());
        let mut ctx = engine.context(RandomSource::seeded(19));
        let mut bundle = Bundle::default();

        for _ in 0..50 {
            ctx.fuzz_child_types_or_default("Bundle", "entry", &mut bundle.entry).unwrap();
        }
        assert_eq!(bundle.entry.len(), 1);
        assert!(bundle.entry[0].resource.is_some() || bundle.entry[0].full_url.is_some());
    }
}
