//! Rally response models.

mod envelope;
mod record;
mod report;

pub use envelope::QueryResult;
pub use record::{reference_id, FieldValue, Record, MAX_VALUE_CHARS, REF_FIELD};
pub use report::{get_report, get_report_page, get_report_total_count};
