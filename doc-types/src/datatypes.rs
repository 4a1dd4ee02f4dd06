//! Primitive and complex data types shared by all resources

use serde::{Deserialize, Serialize};

use crate::codes::{IdentifierUse, NarrativeStatus};
use crate::impl_node;

macro_rules! primitive_type {
    ($($(#[$doc:meta])* $name:ident($value:ty)),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
            pub struct $name {
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub id: Option<String>,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub value: Option<$value>,
            }

            impl $name {
                pub fn new(value: impl Into<$value>) -> Self {
                    Self { id: None, value: Some(value.into()) }
                }
            }

            impl_node!($name);
        )*
    };
}

primitive_type! {
    /// Free text
    FhirString(String),
    Uri(String),
    /// Token from a code system
    Code(String),
    /// Logical identity, `[A-Za-z0-9\-\.]{1,64}`
    Id(String),
    Markdown(String),
    /// Date, date-time or partial date, kept as written
    DateTime(String),
    FhirBoolean(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<FhirString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<FhirString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<IdentifierUse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FhirString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<FhirString>,
}

/// A measured amount; `value` is a decimal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Uri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<FhirString>,
}

/// Metadata block carried by every resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<Uri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<Coding>,
}

/// Human-readable summary of a resource. `div` holds an XHTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NarrativeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,
}

impl_node!(
    Coding,
    CodeableConcept,
    Identifier,
    HumanName,
    Quantity,
    Period,
    Reference,
    Meta,
    Narrative,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let coding = Coding {
            code: Some(Code::new("8867-4")),
            ..Default::default()
        };
        let json = serde_json::to_value(&coding).unwrap();
        assert_eq!(json, serde_json::json!({ "code": { "value": "8867-4" } }));
    }

    #[test]
    fn test_identifier_use_is_renamed() {
        let identifier = Identifier {
            use_: Some(IdentifierUse::Official),
            ..Default::default()
        };
        let json = serde_json::to_string(&identifier).unwrap();
        assert_eq!(json, r#"{"use":"official"}"#);
    }

    #[test]
    fn test_node_type_names() {
        let mut meta = Meta::default();
        assert_eq!(meta.type_name(), "Meta");
        assert!(meta.as_any_mut().downcast_mut::<Meta>().is_some());
        assert_eq!(FhirBoolean::new(true).type_name(), "FhirBoolean");
    }
}
