//! Picks the current registration among the historical rows GCIS returns
//! for branch offices and businesses.

use crate::errors::GcisError;
use crate::models::RawRecord;
use serde_json::Value;

/// Status code of an active registration.
pub const STATUS_ACTIVE: &str = "01";
/// Status code of a revoked registration.
pub const STATUS_REVOKED: &str = "05";

/// What to do when no row carries the active status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Row with the highest integer value in `date_field`; first one on ties.
    LatestChange { date_field: &'static str },
    /// First row whose status is not revoked.
    FirstNotRevoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub status_field: &'static str,
    pub fallback: Fallback,
}

pub const BRANCH_POLICY: SelectionPolicy = SelectionPolicy {
    status_field: "Branch_Office_Status",
    fallback: Fallback::LatestChange {
        date_field: "CHG_APP_DATE",
    },
};

pub const BUSINESS_POLICY: SelectionPolicy = SelectionPolicy {
    status_field: "Business_Current_Status",
    fallback: Fallback::FirstNotRevoked,
};

/// Returns the single current row.
///
/// Rows are scanned in upstream order, so the result is deterministic for a
/// given response. Fails with `EmptyResult` when there is nothing to choose
/// from, including the case where every business row is revoked.
pub fn select_current<'a>(
    records: &'a [RawRecord],
    policy: &SelectionPolicy,
) -> Result<&'a RawRecord, GcisError> {
    if records.is_empty() {
        return Err(GcisError::EmptyResult(format!(
            "no records to select from ({})",
            policy.status_field
        )));
    }

    let statuses = records
        .iter()
        .map(|record| status_of(record, policy.status_field))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(index) = statuses.iter().position(|s| *s == Some(STATUS_ACTIVE)) {
        return Ok(&records[index]);
    }

    match policy.fallback {
        Fallback::FirstNotRevoked => {
            tracing::warn!(
                "No active record among {} row(s), taking first non-revoked",
                records.len()
            );
            statuses
                .iter()
                .position(|s| *s != Some(STATUS_REVOKED))
                .map(|index| &records[index])
                .ok_or_else(|| {
                    GcisError::EmptyResult(format!(
                        "all {} record(s) have {} = {}",
                        records.len(),
                        policy.status_field,
                        STATUS_REVOKED
                    ))
                })
        }
        Fallback::LatestChange { date_field } => {
            tracing::warn!(
                "No active record among {} row(s), taking latest {}",
                records.len(),
                date_field
            );
            let mut latest: Option<(i64, &RawRecord)> = None;
            for record in records {
                let date = change_date(record, date_field)?;
                // Strict comparison keeps the first row among equal dates.
                if latest.map_or(true, |(best, _)| date > best) {
                    latest = Some((date, record));
                }
            }
            latest.map(|(_, record)| record).ok_or_else(|| {
                GcisError::EmptyResult(format!("no records to select from ({})", date_field))
            })
        }
    }
}

/// A missing key is an error; a null (or non-text) status is kept as `None`,
/// which is neither active nor revoked.
fn status_of<'a>(record: &'a RawRecord, field: &str) -> Result<Option<&'a str>, GcisError> {
    record
        .get(field)
        .map(Value::as_str)
        .ok_or_else(|| GcisError::MissingField(field.to_string()))
}

fn change_date(record: &RawRecord, field: &str) -> Result<i64, GcisError> {
    match record.get(field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| GcisError::InvalidField(format!("{} = {}", field, n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| GcisError::InvalidField(format!("{} = {:?}", field, s))),
        Some(other) => Err(GcisError::InvalidField(format!("{} = {}", field, other))),
        None => Err(GcisError::MissingField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn branch(status: &str, date: &str, name: &str) -> RawRecord {
        json!({
            "Branch_Office_Status": status,
            "CHG_APP_DATE": date,
            "Branch_Office_Name": name,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn business(status: &str, agency: &str) -> RawRecord {
        json!({ "Business_Current_Status": status, "Agency": agency })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_active_branch_beats_later_change() {
        let rows = vec![
            branch("02", "1120101", "old"),
            branch("01", "1000101", "current"),
        ];
        let selected = select_current(&rows, &BRANCH_POLICY).unwrap();
        assert_eq!(selected["Branch_Office_Name"], "current");
    }

    #[test]
    fn test_branch_ties_keep_first() {
        let rows = vec![
            branch("02", "1100101", "first"),
            branch("03", "1100101", "second"),
        ];
        let selected = select_current(&rows, &BRANCH_POLICY).unwrap();
        assert_eq!(selected["Branch_Office_Name"], "first");
    }

    #[test]
    fn test_branch_bad_date() {
        let rows = vec![branch("02", "not-a-date", "x")];
        let err = select_current(&rows, &BRANCH_POLICY).unwrap_err();
        assert!(matches!(err, GcisError::InvalidField(_)));
    }

    #[test]
    fn test_business_all_revoked_is_empty_result() {
        let rows = vec![business("05", "A"), business("05", "B")];
        let err = select_current(&rows, &BUSINESS_POLICY).unwrap_err();
        assert!(matches!(err, GcisError::EmptyResult(_)));
    }

    #[test]
    fn test_missing_status_field() {
        let rows = vec![json!({ "Agency": "A" }).as_object().cloned().unwrap()];
        let err = select_current(&rows, &BUSINESS_POLICY).unwrap_err();
        assert_eq!(err, GcisError::MissingField("Business_Current_Status".into()));
    }

    #[test]
    fn test_null_status_does_not_block_active_row() {
        let rows = vec![
            json!({ "Business_Current_Status": null, "Branch_Office_Status": null, "id": 0 }),
            json!({ "Business_Current_Status": "01", "Branch_Office_Status": "01", "id": 1 }),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect::<Vec<_>>();

        assert_eq!(select_current(&rows, &BUSINESS_POLICY).unwrap()["id"], 1);
        assert_eq!(select_current(&rows, &BRANCH_POLICY).unwrap()["id"], 1);
    }

    #[test]
    fn test_null_status_counts_as_not_revoked() {
        let rows = vec![
            business("05", "A"),
            json!({ "Business_Current_Status": null, "Agency": "B" })
                .as_object()
                .cloned()
                .unwrap(),
        ];
        let selected = select_current(&rows, &BUSINESS_POLICY).unwrap();
        assert_eq!(selected["Agency"], "B");
    }

    #[test]
    fn test_empty_input() {
        let err = select_current(&[], &BRANCH_POLICY).unwrap_err();
        assert!(matches!(err, GcisError::EmptyResult(_)));
    }
}
