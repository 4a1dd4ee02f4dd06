// doc-fuzzing/src/mutators/datatypes.rs
//! Mutators for the complex data types shared by all resources

use doc_types::{
    CodeableConcept, Coding, HumanName, Identifier, Meta, Narrative, Period, Quantity, Reference,
};

use crate::catalog::MutatorCatalog;
use crate::primitive::PrimitiveHint;
use crate::provenance::LogEntry;
use crate::random::RandomSource;

/// Values that tend to trip decimal handling
const DECIMAL_EDGES: &[f64] = &[
    0.0,
    -0.0,
    -1.0,
    f64::EPSILON,
    1e-300,
    9_007_199_254_740_993.0,
    f64::MAX,
    f64::MIN,
];

pub fn register(catalog: &mut MutatorCatalog) {
    register_coding(catalog);
    register_identifier(catalog);
    register_quantity(catalog);
    register_period(catalog);
    register_meta(catalog);

    catalog
        .register::<CodeableConcept, _>("coding", |ctx, concept: &mut CodeableConcept| {
            ctx.fuzz_child_types_or_default("CodeableConcept", "coding", &mut concept.coding)
        })
        .register::<CodeableConcept, _>("text", |ctx, concept: &mut CodeableConcept| {
            ctx.fuzz_child("CodeableConcept", "text", &mut concept.text)
        })
        .register_default::<CodeableConcept>();

    catalog
        .register::<HumanName, _>("text", |ctx, name: &mut HumanName| {
            ctx.fuzz_child("HumanName", "text", &mut name.text)
        })
        .register::<HumanName, _>("family", |ctx, name: &mut HumanName| {
            ctx.fuzz_child("HumanName", "family", &mut name.family)
        })
        .register::<HumanName, _>("given", |ctx, name: &mut HumanName| {
            ctx.fuzz_child_types_or_default("HumanName", "given", &mut name.given)
        })
        .register_default::<HumanName>();

    catalog
        .register::<Reference, _>("reference", |ctx, reference: &mut Reference| {
            ctx.fuzz_child("Reference", "reference", &mut reference.reference)
        })
        .register::<Reference, _>("display", |ctx, reference: &mut Reference| {
            ctx.fuzz_child("Reference", "display", &mut reference.display)
        })
        .register_default::<Reference>();

    catalog
        .register::<Narrative, _>("status", |ctx, narrative: &mut Narrative| {
            Ok(ctx.fuzz_enum("Narrative", "status", &mut narrative.status))
        })
        .register::<Narrative, _>("div", |ctx, narrative: &mut Narrative| {
            let fuzzed = ctx.fuzz_primitive_type("Narrative.div", PrimitiveHint::Text, narrative.div.as_deref());
            narrative.div = Some(fuzzed.value);
            Ok(fuzzed.log)
        })
        .register_default::<Narrative>();
}

fn register_coding(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Coding, _>("system", |ctx, coding: &mut Coding| {
            ctx.fuzz_child("Coding", "system", &mut coding.system)
        })
        .register::<Coding, _>("version", |ctx, coding: &mut Coding| {
            ctx.fuzz_child("Coding", "version", &mut coding.version)
        })
        .register::<Coding, _>("code", |ctx, coding: &mut Coding| {
            ctx.fuzz_child("Coding", "code", &mut coding.code)
        })
        .register::<Coding, _>("display", |ctx, coding: &mut Coding| {
            ctx.fuzz_child("Coding", "display", &mut coding.display)
        })
        .register_default::<Coding>();
}

fn register_identifier(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Identifier, _>("use", |ctx, identifier: &mut Identifier| {
            Ok(ctx.fuzz_enum("Identifier", "use", &mut identifier.use_))
        })
        .register::<Identifier, _>("system", |ctx, identifier: &mut Identifier| {
            ctx.fuzz_child("Identifier", "system", &mut identifier.system)
        })
        .register::<Identifier, _>("value", |ctx, identifier: &mut Identifier| {
            ctx.fuzz_child("Identifier", "value", &mut identifier.value)
        })
        .register_default::<Identifier>();
}

fn register_quantity(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Quantity, _>("value", |ctx, quantity: &mut Quantity| {
            let before = quantity.value;
            let after = corrupt_decimal(ctx.random(), before);
            quantity.value = Some(after);
            Ok(LogEntry::operation(format!(
                "Quantity.value: {} -> {}",
                before.map(|value| value.to_string()).unwrap_or_else(|| "absent".to_string()),
                after
            )))
        })
        .register::<Quantity, _>("unit", |ctx, quantity: &mut Quantity| {
            ctx.fuzz_child("Quantity", "unit", &mut quantity.unit)
        })
        .register::<Quantity, _>("system", |ctx, quantity: &mut Quantity| {
            ctx.fuzz_child("Quantity", "system", &mut quantity.system)
        })
        .register::<Quantity, _>("code", |ctx, quantity: &mut Quantity| {
            ctx.fuzz_child("Quantity", "code", &mut quantity.code)
        })
        .register_default::<Quantity>();
}

fn register_period(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Period, _>("start", |ctx, period: &mut Period| {
            ctx.fuzz_child("Period", "start", &mut period.start)
        })
        .register::<Period, _>("end", |ctx, period: &mut Period| {
            ctx.fuzz_child("Period", "end", &mut period.end)
        })
        .register::<Period, _>("swap", |_, period: &mut Period| {
            if period.start == period.end {
                return Ok(LogEntry::no_op("Period.start and Period.end are identical"));
            }
            std::mem::swap(&mut period.start, &mut period.end);
            Ok(LogEntry::operation("Period: start and end swapped"))
        })
        .register_default::<Period>();
}

fn register_meta(catalog: &mut MutatorCatalog) {
    catalog
        .register::<Meta, _>("versionId", |ctx, meta: &mut Meta| {
            ctx.fuzz_child("Meta", "versionId", &mut meta.version_id)
        })
        .register::<Meta, _>("lastUpdated", |ctx, meta: &mut Meta| {
            ctx.fuzz_child("Meta", "lastUpdated", &mut meta.last_updated)
        })
        .register::<Meta, _>("profile", |ctx, meta: &mut Meta| {
            ctx.fuzz_child_types_or_default("Meta", "profile", &mut meta.profile)
        })
        .register::<Meta, _>("tag", |ctx, meta: &mut Meta| {
            ctx.fuzz_child_types_or_default("Meta", "tag", &mut meta.tag)
        })
        .register_default::<Meta>();
}

/// Replace a decimal with an edge value or a rescaled copy of itself.
fn corrupt_decimal(random: &mut RandomSource, current: Option<f64>) -> f64 {
    let candidate = match current {
        Some(value) if random.next_bool() => value * 10f64.powi(random.next_int(-6, 7) as i32),
        _ => random.pick_one(DECIMAL_EDGES).copied().unwrap_or(0.0),
    };
    match current {
        Some(value) if value == 0.0 && candidate == value => -1.0,
        Some(value) if candidate == value || !candidate.is_finite() => -value,
        _ => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MutationEngine;
    use crate::mutators::primitives;
    use doc_types::{DateTime, FhirString};

    fn catalog() -> MutatorCatalog {
        let mut catalog = MutatorCatalog::new();
        primitives::register(&mut catalog);
        register(&mut catalog);
        catalog
    }

    #[test]
    fn test_decimal_always_changes() {
        let mut random = RandomSource::seeded(3);
        let mut value = Some(72.5);
        for _ in 0..500 {
            let next = corrupt_decimal(&mut random, value);
            assert!(next.is_finite());
            assert_ne!(Some(next), value);
            value = Some(next);
        }
        assert!(corrupt_decimal(&mut random, None).is_finite());
    }

    #[test]
    fn test_swap_needs_distinct_bounds() {
        let engine = MutationEngine::new(catalog());
        let mut ctx = engine.context(RandomSource::seeded(3));
        let entries = engine.catalog().entries_for::<Period>().unwrap();
        let swap = entries.iter().find(|entry| entry.name() == "swap").unwrap();

        let mut period = Period::default();
        assert!(swap.apply(&mut ctx, &mut period).unwrap().is_no_op());

        period.start = Some(DateTime::new("2024-01-01"));
        let entry = swap.apply(&mut ctx, &mut period).unwrap();
        assert_eq!(entry, LogEntry::operation("Period: start and end swapped"));
        assert!(period.start.is_none());
        assert_eq!(period.end, Some(DateTime::new("2024-01-01")));
    }

    #[test]
    fn test_empty_repeats_grow_one_element() {
        let engine = MutationEngine::new(catalog());
        let mut ctx = engine.context(RandomSource::seeded(8));
        let mut name = HumanName::default();

        let entry = ctx.fuzz_child_types_or_default("HumanName", "given", &mut name.given).unwrap();
        assert_eq!(name.given.len(), 1);
        assert_ne!(name.given[0], FhirString::default());
        assert!(entry.changed());
    }

    #[test]
    fn test_nested_types_reach_a_leaf() {
        let engine = MutationEngine::new(catalog());
        let mut ctx = engine.context(RandomSource::seeded(12));
        for _ in 0..100 {
            let mut meta = Meta::default();
            let entry = ctx.fuzz_once(&mut meta).unwrap();
            assert!(entry.changed(), "{}", entry);
            assert_ne!(meta, Meta::default());
        }
    }
}
