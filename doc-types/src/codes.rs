//! Closed code sets used by the document model

use serde::{Deserialize, Serialize};

use crate::impl_enumerable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl_enumerable!(AdministrativeGender {
    Male => "male",
    Female => "female",
    Other => "other",
    Unknown => "unknown",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
}

impl_enumerable!(ObservationStatus {
    Registered => "registered",
    Preliminary => "preliminary",
    Final => "final",
    Amended => "amended",
    Corrected => "corrected",
    Cancelled => "cancelled",
    EnteredInError => "entered-in-error",
    Unknown => "unknown",
});

/// Status of a human-readable narrative block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStatus {
    Generated,
    Extensions,
    Additional,
    Empty,
}

impl_enumerable!(NarrativeStatus {
    Generated => "generated",
    Extensions => "extensions",
    Additional => "additional",
    Empty => "empty",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
}

impl_enumerable!(BundleType {
    Document => "document",
    Message => "message",
    Transaction => "transaction",
    TransactionResponse => "transaction-response",
    Batch => "batch",
    BatchResponse => "batch-response",
    History => "history",
    Searchset => "searchset",
    Collection => "collection",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierUse {
    Usual,
    Official,
    Temp,
    Secondary,
    Old,
}

impl_enumerable!(IdentifierUse {
    Usual => "usual",
    Official => "official",
    Temp => "temp",
    Secondary => "secondary",
    Old => "old",
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Enumerable;

    #[test]
    fn test_codes_match_serialized_form() {
        for status in ObservationStatus::members() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.code()));
        }
        for kind in BundleType::members() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }
}
