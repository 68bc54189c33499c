use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One version of a document family. A version is effective from its
/// effective date until the next version of the same family takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub family_id: String,
    pub version_id: String,
    pub effective_date: NaiveDate,
    pub superseded_by: Option<String>,
}
