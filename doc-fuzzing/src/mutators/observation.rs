// doc-fuzzing/src/mutators/observation.rs
use doc_types::Observation;

use crate::catalog::MutatorCatalog;

pub fn register(catalog: &mut MutatorCatalog) {
    catalog
        .register_resource::<Observation>()
        .register::<Observation, _>("identifier", |ctx, observation: &mut Observation| {
            ctx.fuzz_child_types_or_default("Observation", "identifier", &mut observation.identifier)
        })
        .register::<Observation, _>("status", |ctx, observation: &mut Observation| {
            Ok(ctx.fuzz_enum("Observation", "status", &mut observation.status))
        })
        .register::<Observation, _>("code", |ctx, observation: &mut Observation| {
            ctx.fuzz_child("Observation", "code", &mut observation.code)
        })
        .register::<Observation, _>("subject", |ctx, observation: &mut Observation| {
            ctx.fuzz_child("Observation", "subject", &mut observation.subject)
        })
        .register::<Observation, _>("effective", |ctx, observation: &mut Observation| {
            ctx.fuzz_choice("Observation", "effective", &mut observation.effective)
        })
        .register::<Observation, _>("value", |ctx, observation: &mut Observation| {
            ctx.fuzz_choice("Observation", "value", &mut observation.value)
        })
        .register::<Observation, _>("interpretation", |ctx, observation: &mut Observation| {
            ctx.fuzz_child_types("Observation", "interpretation", &mut observation.interpretation)
        })
        .register_default::<Observation>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MutationEngine;
    use crate::mutators::standard_catalog;
    use crate::provenance::LogEntry;
    use crate::random::RandomSource;
    use doc_types::{Choice, ObservationStatus};

    #[test]
    fn test_status_moves_to_another_code() {
        let engine = MutationEngine::new(standard_catalog());
        let mut ctx = engine.context(RandomSource::seeded(4));
        let mut observation = Observation {
            status: Some(ObservationStatus::Final),
            ..Default::default()
        };

        let entry = ctx.fuzz_enum("Observation", "status", &mut observation.status);
        assert!(matches!(entry, LogEntry::Operation { text } if text.starts_with("Observation.status: final -> ")));
        assert_ne!(observation.status, Some(ObservationStatus::Final));
    }

    #[test]
    fn test_absent_effective_picks_an_alternative() {
        let engine = MutationEngine::new(standard_catalog());
        let mut seen = std::collections::HashSet::new();
        for seed in 0..40 {
            let mut ctx = engine.context(RandomSource::seeded(seed));
            let mut observation = Observation::default();
            let entry = ctx.fuzz_choice("Observation", "effective", &mut observation.effective).unwrap();
            assert!(matches!(&entry, LogEntry::Parent { text, .. } if text.ends_with("(synthesized)")));
            seen.insert(observation.effective.as_ref().map(|effective| effective.active()));
        }
        assert_eq!(seen.len(), 2);
        assert!(!seen.contains(&None));
    }

    #[test]
    fn test_empty_interpretation_is_left_alone() {
        let engine = MutationEngine::new(standard_catalog());
        let mut ctx = engine.context(RandomSource::seeded(4));
        let mut observation = Observation::default();

        let entry = ctx
            .fuzz_child_types("Observation", "interpretation", &mut observation.interpretation)
            .unwrap();
        assert!(entry.is_no_op());
        assert!(observation.interpretation.is_empty());
    }
}
