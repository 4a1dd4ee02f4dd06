use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::codes::AdministrativeGender;
use crate::datatypes::{DateTime, FhirBoolean, HumanName, Identifier, Meta, Narrative, Reference};
use crate::resources::Resource;
use crate::{impl_choice, impl_node};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contained: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<FhirBoolean>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime>,
    #[serde(flatten)]
    pub deceased: Option<PatientDeceased>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
}

/// `deceased[x]`
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum PatientDeceased {
    #[serde(rename = "deceasedBoolean")]
    Boolean(FhirBoolean),
    #[serde(rename = "deceasedDateTime")]
    DateTime(DateTime),
}

impl_node!(Patient);

impl_choice!(PatientDeceased {
    Boolean(FhirBoolean) => "deceasedBoolean",
    DateTime(DateTime) => "deceasedDateTime",
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, Node};

    #[test]
    fn test_deceased_is_flattened() {
        let patient = Patient {
            deceased: Some(PatientDeceased::from(FhirBoolean::new(true))),
            ..Default::default()
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json, serde_json::json!({ "deceasedBoolean": { "value": true } }));

        let parsed: Patient = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, patient);
    }

    #[test]
    fn test_choice_alternatives() {
        assert_eq!(PatientDeceased::alternatives().len(), 2);
        let mut choice = PatientDeceased::alternative(1).unwrap();
        assert_eq!(choice.active(), "deceasedDateTime");
        assert_eq!(choice.type_name(), "DateTime");
        assert!(choice.as_any_mut().downcast_mut::<DateTime>().is_some());
        assert!(PatientDeceased::alternative(2).is_none());
    }
}
