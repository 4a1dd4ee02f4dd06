// doc-fuzzing/src/mutators/patient.rs
use doc_types::Patient;

use crate::catalog::MutatorCatalog;

pub fn register(catalog: &mut MutatorCatalog) {
    catalog
        .register_resource::<Patient>()
        .register::<Patient, _>("identifier", |ctx, patient: &mut Patient| {
            ctx.fuzz_child_types_or_default("Patient", "identifier", &mut patient.identifier)
        })
        .register::<Patient, _>("active", |ctx, patient: &mut Patient| {
            ctx.fuzz_child("Patient", "active", &mut patient.active)
        })
        .register::<Patient, _>("name", |ctx, patient: &mut Patient| {
            ctx.fuzz_child_types_or_default("Patient", "name", &mut patient.name)
        })
        .register::<Patient, _>("gender", |ctx, patient: &mut Patient| {
            Ok(ctx.fuzz_enum("Patient", "gender", &mut patient.gender))
        })
        .register::<Patient, _>("birthDate", |ctx, patient: &mut Patient| {
            ctx.fuzz_child("Patient", "birthDate", &mut patient.birth_date)
        })
        .register::<Patient, _>("deceased", |ctx, patient: &mut Patient| {
            ctx.fuzz_choice("Patient", "deceased", &mut patient.deceased)
        })
        .register::<Patient, _>("managingOrganization", |ctx, patient: &mut Patient| {
            ctx.fuzz_child("Patient", "managingOrganization", &mut patient.managing_organization)
        })
        .register_default::<Patient>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MutationEngine;
    use crate::mutators::standard_catalog;
    use crate::random::RandomSource;
    use doc_types::{Choice, PatientDeceased};

    #[test]
    fn test_base_set_comes_first() {
        let mut catalog = MutatorCatalog::new();
        register(&mut catalog);
        let names = catalog.mutator_names::<Patient>();
        assert_eq!(&names[..6], &["id", "id", "meta", "text", "contained", "embed"]);
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn test_deceased_keeps_one_alternative() {
        let engine = MutationEngine::new(standard_catalog());
        let mut ctx = engine.context(RandomSource::seeded(30));
        let mut patient = Patient {
            deceased: Some(PatientDeceased::Boolean(Default::default())),
            ..Default::default()
        };

        for _ in 0..100 {
            ctx.fuzz_choice("Patient", "deceased", &mut patient.deceased).unwrap();
            ctx.fuzz_pass(&mut patient).unwrap();
        }
        assert_eq!(patient.deceased.as_ref().map(|deceased| deceased.active()), Some("deceasedBoolean"));
    }
}
