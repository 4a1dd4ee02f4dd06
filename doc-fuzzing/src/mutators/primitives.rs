// doc-fuzzing/src/mutators/primitives.rs
//! Mutators for primitive elements: the scalar value and the element id.

use doc_types::{Code, DateTime, FhirBoolean, FhirString, Id, Markdown, Uri};

use crate::catalog::MutatorCatalog;
use crate::primitive::PrimitiveHint;
use crate::provenance::LogEntry;

macro_rules! register_string_primitives {
    ($catalog:expr, $($ty:ident => $hint:expr),* $(,)?) => {
        $(
            $catalog
                .register::<$ty, _>("value", |ctx, element: &mut $ty| {
                    let description = concat!(stringify!($ty), ".value");
                    let fuzzed = ctx.fuzz_primitive_type(description, $hint, element.value.as_deref());
                    element.value = Some(fuzzed.value);
                    Ok(fuzzed.log)
                })
                .register::<$ty, _>("id", |ctx, element: &mut $ty| {
                    Ok(ctx.fuzz_id_element(stringify!($ty), &mut element.id))
                })
                .register_default::<$ty>();
        )*
    };
}

pub fn register(catalog: &mut MutatorCatalog) {
    register_string_primitives!(
        catalog,
        FhirString => PrimitiveHint::Text,
        Markdown => PrimitiveHint::Text,
        DateTime => PrimitiveHint::Text,
        Uri => PrimitiveHint::Uri,
        Code => PrimitiveHint::Code,
        Id => PrimitiveHint::Identifier,
    );

    catalog
        .register::<FhirBoolean, _>("value", |_, element: &mut FhirBoolean| {
            let before = element.value;
            let after = !before.unwrap_or(false);
            element.value = Some(after);
            Ok(LogEntry::operation(format!(
                "FhirBoolean.value: {} -> {}",
                before.map(|value| value.to_string()).unwrap_or_else(|| "absent".to_string()),
                after
            )))
        })
        .register::<FhirBoolean, _>("id", |ctx, element: &mut FhirBoolean| {
            Ok(ctx.fuzz_id_element("FhirBoolean", &mut element.id))
        })
        .register_default::<FhirBoolean>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MutationEngine;
    use crate::random::RandomSource;

    fn catalog() -> MutatorCatalog {
        let mut catalog = MutatorCatalog::new();
        register(&mut catalog);
        catalog
    }

    #[test]
    fn test_every_primitive_is_registered() {
        let catalog = catalog();
        assert_eq!(catalog.mutator_names::<FhirString>(), vec!["value", "id"]);
        assert_eq!(catalog.mutator_names::<FhirBoolean>(), vec!["value", "id"]);
        assert_eq!(catalog.type_count(), 7);
        assert!(catalog.has_factory::<Markdown>());
        assert!(catalog.has_factory::<Id>());
    }

    #[test]
    fn test_string_value_is_written_back() {
        let engine = MutationEngine::new(catalog());
        let mut ctx = engine.context(RandomSource::seeded(11));
        let mut code = Code::new("final");

        for _ in 0..20 {
            let before = code.clone();
            let entry = ctx.fuzz_once(&mut code).unwrap();
            assert!(entry.changed());
            assert_ne!(code, before);
        }
    }

    #[test]
    fn test_boolean_flips() {
        let engine = MutationEngine::new(catalog());
        let mut ctx = engine.context(RandomSource::seeded(11));
        let mut flag = FhirBoolean::default();

        let mut flips = 0;
        for _ in 0..40 {
            let before = flag.value;
            ctx.fuzz_once(&mut flag).unwrap();
            if flag.value != before {
                flips += 1;
            }
        }
        assert!(flips > 0);
        assert!(flag.value.is_some());
    }
}
