use serde::{Deserialize, Serialize};

use crate::datatypes::{FhirBoolean, FhirString, Identifier, Markdown, Meta, Narrative, Reference};
use crate::impl_node;
use crate::resources::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FhirString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<FhirString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Markdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,
}

impl_node!(Organization);
