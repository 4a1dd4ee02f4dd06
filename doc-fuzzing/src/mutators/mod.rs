// doc-fuzzing/src/mutators/mod.rs
//! Registrations for the document model.
//!
//! Each submodule registers the mutators and default factories for one area
//! of the model. [`standard_catalog`] wires all of them together.

pub mod bundle;
pub mod datatypes;
pub mod observation;
pub mod organization;
pub mod patient;
pub mod primitives;

use doc_types::Resource;
use tracing::debug;

use crate::catalog::MutatorCatalog;

/// A catalog covering every type of the document model
pub fn standard_catalog() -> MutatorCatalog {
    let mut catalog = MutatorCatalog::new();
    primitives::register(&mut catalog);
    datatypes::register(&mut catalog);
    patient::register(&mut catalog);
    observation::register(&mut catalog);
    organization::register(&mut catalog);
    bundle::register(&mut catalog);
    catalog.register_embedded_family::<Resource>();

    debug!(
        "standard catalog: {} mutators across {} types",
        catalog.len(),
        catalog.type_count()
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_types::{
        Bundle, BundleEntry, Code, CodeableConcept, Coding, DateTime, FhirBoolean, FhirString,
        HumanName, Id, Identifier, Markdown, Meta, Narrative, Observation, Organization, Patient,
        Period, Quantity, Reference, Uri,
    };

    macro_rules! assert_covered {
        ($catalog:expr, $($ty:ty),* $(,)?) => {
            $(
                assert!(
                    !$catalog.mutator_names::<$ty>().is_empty(),
                    "no mutators for {}",
                    stringify!($ty)
                );
                assert!($catalog.has_factory::<$ty>(), "no factory for {}", stringify!($ty));
            )*
        };
    }

    #[test]
    fn test_every_model_type_is_covered() {
        let catalog = standard_catalog();
        assert_covered!(
            catalog,
            FhirString, Uri, Code, Id, Markdown, DateTime, FhirBoolean,
            Coding, CodeableConcept, Identifier, HumanName, Quantity, Period, Reference, Meta, Narrative,
            Patient, Observation, Organization, Bundle, BundleEntry,
        );
        assert!(catalog.has_factory::<Resource>());
        assert!(catalog.entries_for::<Resource>().is_none());
        assert_eq!(catalog.type_count(), 21);
    }

    #[test]
    fn test_domain_resources_share_the_base_set() {
        let catalog = standard_catalog();
        let base = ["id", "id", "meta", "text", "contained", "embed"];
        assert_eq!(&catalog.mutator_names::<Patient>()[..6], &base);
        assert_eq!(&catalog.mutator_names::<Observation>()[..6], &base);
        assert_eq!(&catalog.mutator_names::<Organization>()[..6], &base);
        assert_ne!(catalog.mutator_names::<Bundle>().first(), Some(&"contained"));
    }
}
