use serde::{Deserialize, Serialize};

/// A medical book record as returned by the external registry.
///
/// Every field is required by the upstream contract: a 2xx payload missing
/// any of them is treated as a malformed response, never as a partial
/// result. The field names are fixed by the registry API and relayed to
/// clients unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Human-readable status of the medical book
    pub elmk_status_name: String,
    /// 12-digit medical book number
    pub elmk_number: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    /// 11-digit national insurance number
    pub snils: String,
    /// Work categories the holder is authorized for
    pub work_type: Vec<String>,
    pub decision_dt: String,
    pub med_opinions_dt: String,
    pub certification_dt: String,
    pub recertification_dt: String,
    /// Issuing authority short name
    pub fbuz_short_name: String,
    /// Full name of the record creator
    pub created_fullname: String,
}
