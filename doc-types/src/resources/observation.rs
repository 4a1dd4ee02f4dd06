use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::codes::ObservationStatus;
use crate::datatypes::{
    CodeableConcept, DateTime, FhirBoolean, FhirString, Identifier, Meta, Narrative, Period,
    Quantity, Reference,
};
use crate::resources::Resource;
use crate::{impl_choice, impl_node};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
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
    pub status: Option<ObservationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(flatten)]
    pub effective: Option<ObservationEffective>,
    #[serde(flatten)]
    pub value: Option<ObservationValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpretation: Vec<CodeableConcept>,
}

/// `effective[x]`
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum ObservationEffective {
    #[serde(rename = "effectiveDateTime")]
    DateTime(DateTime),
    #[serde(rename = "effectivePeriod")]
    Period(Period),
}

/// `value[x]`
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum ObservationValue {
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[serde(rename = "valueString")]
    String(FhirString),
    #[serde(rename = "valueBoolean")]
    Boolean(FhirBoolean),
    #[serde(rename = "valuePeriod")]
    Period(Period),
}

impl_node!(Observation);

impl_choice!(ObservationEffective {
    DateTime(DateTime) => "effectiveDateTime",
    Period(Period) => "effectivePeriod",
});

impl_choice!(ObservationValue {
    Quantity(Quantity) => "valueQuantity",
    CodeableConcept(CodeableConcept) => "valueCodeableConcept",
    String(FhirString) => "valueString",
    Boolean(FhirBoolean) => "valueBoolean",
    Period(Period) => "valuePeriod",
});
