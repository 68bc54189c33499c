pub mod chunk_ops;
pub mod degradation_ops;
pub mod manifest_ops;
pub mod vector_ops;
pub mod version_ops;

use chrono::NaiveDate;

use citespine_core::errors::CiteResult;

use crate::to_storage_err;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(s: &str) -> CiteResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| to_storage_err(format!("bad stored date {s:?}: {e}")))
}
