//! Resources: the whole sub-documents of the model

mod bundle;
mod observation;
mod organization;
mod patient;

pub use bundle::*;
pub use observation::*;
pub use organization::*;
pub use patient::*;

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::node::{Embedded, Node};

/// Any resource, tagged by `resourceType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Box<Patient>),
    Observation(Box<Observation>),
    Organization(Box<Organization>),
    Bundle(Box<Bundle>),
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        self.type_name()
    }
}

impl Node for Resource {
    fn type_name(&self) -> &'static str {
        match self {
            Resource::Patient(patient) => patient.type_name(),
            Resource::Observation(observation) => observation.type_name(),
            Resource::Organization(organization) => organization.type_name(),
            Resource::Bundle(bundle) => bundle.type_name(),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        match self {
            Resource::Patient(patient) => patient.as_any_mut(),
            Resource::Observation(observation) => observation.as_any_mut(),
            Resource::Organization(organization) => organization.as_any_mut(),
            Resource::Bundle(bundle) => bundle.as_any_mut(),
        }
    }
}

impl Embedded for Resource {
    fn kinds() -> &'static [&'static str] {
        &["Patient", "Observation", "Organization", "Bundle"]
    }

    fn default_of(kind: &str) -> Option<Self> {
        match kind {
            "Patient" => Some(Resource::Patient(Box::default())),
            "Observation" => Some(Resource::Observation(Box::default())),
            "Organization" => Some(Resource::Organization(Box::default())),
            "Bundle" => Some(Resource::Bundle(Box::default())),
            _ => None,
        }
    }
}

/// Implements [`DomainResource`](crate::DomainResource) for structs with the
/// standard `id`, `meta`, `text` and `contained` fields.
macro_rules! impl_domain_resource {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $crate::DomainResource for $ty {
                fn id_mut(&mut self) -> &mut Option<String> {
                    &mut self.id
                }

                fn meta_mut(&mut self) -> &mut Option<$crate::Meta> {
                    &mut self.meta
                }

                fn text_mut(&mut self) -> &mut Option<$crate::Narrative> {
                    &mut self.text
                }

                fn contained_mut(&mut self) -> &mut Vec<$crate::Resource> {
                    &mut self.contained
                }
            }
        )*
    };
}

impl_domain_resource!(Patient, Observation, Organization);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_default() {
        for kind in Resource::kinds() {
            let resource = Resource::default_of(kind).unwrap();
            assert_eq!(resource.resource_type(), *kind);
        }
        assert!(Resource::default_of("Encounter").is_none());
    }

    #[test]
    fn test_runtime_type_is_the_variant_payload() {
        let mut resource = Resource::Observation(Box::default());
        assert!(resource.as_any_mut().downcast_mut::<Observation>().is_some());
        assert!(resource.as_any_mut().downcast_mut::<Resource>().is_none());
    }

    #[test]
    fn test_resource_type_tag() {
        let resource = Resource::Patient(Box::default());
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["resourceType"], "Patient");

        let parsed: Resource = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, resource);
    }
}
