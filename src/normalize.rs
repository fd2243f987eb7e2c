//! Merging of partial GCIS rows and projection into [`GcisRecord`].

use crate::errors::GcisError;
use crate::models::{BusinessItem, BusinessItems, Category, GcisRecord, RawRecord};
use serde_json::Value;

/// Field holding a company's business items.
pub const COMPANY_ITEMS_FIELD: &str = "Cmp_Business";
/// Field holding a business's business items.
pub const BUSINESS_ITEMS_FIELD: &str = "Business_Item_Old";

/// Right-biased union: every key of `second` overwrites or extends `first`.
pub fn merge_records(first: &RawRecord, second: &RawRecord) -> RawRecord {
    let mut merged = first.clone();
    for (key, value) in second {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Reads a business-item field in either of its upstream encodings.
pub fn parse_business_items(record: &RawRecord, field: &str) -> Result<BusinessItems, GcisError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(BusinessItems::Absent),
        Some(Value::String(text)) => Ok(BusinessItems::Legacy(text.clone())),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                serde_json::from_value::<BusinessItem>(entry.clone())
                    .map_err(|e| GcisError::MissingField(format!("{}[]: {}", field, e)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(BusinessItems::Itemized),
        Some(other) => Err(GcisError::InvalidField(format!("{} = {}", field, other))),
    }
}

type ItemLists = (Option<Vec<String>>, Option<Vec<String>>);

fn split_items(items: &[BusinessItem]) -> ItemLists {
    let codes = items.iter().map(|item| item.code.clone()).collect();
    let names = items.iter().map(|item| item.description.clone()).collect();
    (Some(codes), Some(names))
}

/// Company projection. A legacy free-text item gets an empty-string code so
/// both lists keep the same length.
pub fn project_company_items(items: &BusinessItems) -> ItemLists {
    match items {
        BusinessItems::Absent => (None, None),
        BusinessItems::Legacy(text) => (Some(vec![String::new()]), Some(vec![text.clone()])),
        BusinessItems::Itemized(list) => split_items(list),
    }
}

/// Business projection. Unlike companies, a legacy free-text item leaves the
/// code list empty (`None`).
pub fn project_business_items(items: &BusinessItems) -> ItemLists {
    match items {
        BusinessItems::Absent => (None, None),
        BusinessItems::Legacy(text) => (None, Some(vec![text.clone()])),
        BusinessItems::Itemized(list) => split_items(list),
    }
}

/// Required text field. Numbers are rendered as text.
pub fn text_field(record: &RawRecord, field: &str) -> Result<String, GcisError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(GcisError::MissingField(field.to_string())),
    }
}

/// Registered capital. The key must exist; a null or blank value means unknown.
pub fn funds_field(record: &RawRecord, field: &str) -> Result<Option<i64>, GcisError> {
    let invalid = |raw: &dyn std::fmt::Display| {
        GcisError::InvalidField(format!("{} = {}", field, raw))
    };

    match record.get(field) {
        None => Err(GcisError::MissingField(field.to_string())),
        Some(Value::Null) => Ok(None),
        // Fractional or out-of-range amounts are rejected, as for strings.
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(n)),
        Some(Value::String(s)) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned.parse::<i64>().map(Some).map_err(|_| invalid(s))
        }
        Some(other) => Err(invalid(other)),
    }
}

/// Projects a merged company row (primary + secondary).
pub fn normalize_company(uni: &str, data: &RawRecord) -> Result<GcisRecord, GcisError> {
    let items = parse_business_items(data, COMPANY_ITEMS_FIELD)?;
    let (business_item_code, business_item_name) = project_company_items(&items);

    Ok(GcisRecord {
        category: Category::Company,
        uni: uni.to_string(),
        name: text_field(data, "Company_Name")?,
        address: text_field(data, "Company_Location")?,
        register_funds: funds_field(data, "Capital_Stock_Amount")?,
        responsible_name: text_field(data, "Responsible_Name")?,
        status_code: text_field(data, "Company_Status")?,
        status_name: text_field(data, "Company_Status_Desc")?,
        business_item_code,
        business_item_name,
        case_status_code: Some(text_field(data, "Case_Status")?),
        case_status_name: Some(text_field(data, "Case_Status_Desc")?),
        company_uni: None,
        branch_name: None,
    })
}

/// Projects the selected branch row. `name` is provisional (the branch's own
/// name) until [`compose_branch_name`] prefixes the parent company.
pub fn normalize_branch(uni: &str, data: &RawRecord) -> Result<GcisRecord, GcisError> {
    let branch_name = text_field(data, "Branch_Office_Name")?;

    Ok(GcisRecord {
        category: Category::Branch,
        uni: uni.to_string(),
        name: branch_name.clone(),
        address: text_field(data, "Branch_Office_Location")?,
        register_funds: None,
        responsible_name: text_field(data, "Branch_Office_Manager_Name")?,
        status_code: text_field(data, "Branch_Office_Status")?,
        status_name: text_field(data, "Branch_Office_Status_Desc")?,
        business_item_code: None,
        business_item_name: None,
        case_status_code: None,
        case_status_name: None,
        company_uni: Some(text_field(data, "Business_Accounting_NO")?),
        branch_name: Some(branch_name),
    })
}

/// `<parent company name>-<branch name>`.
pub fn compose_branch_name(company_name: &str, branch_name: &str) -> String {
    format!("{}-{}", company_name, branch_name)
}

/// Projects a merged business row (primary + selected secondary).
pub fn normalize_business(uni: &str, data: &RawRecord) -> Result<GcisRecord, GcisError> {
    let items = parse_business_items(data, BUSINESS_ITEMS_FIELD)?;
    let (business_item_code, business_item_name) = project_business_items(&items);

    Ok(GcisRecord {
        category: Category::Business,
        uni: uni.to_string(),
        name: text_field(data, "Business_Name")?,
        address: text_field(data, "Business_Address")?,
        register_funds: funds_field(data, "Business_Register_Funds")?,
        responsible_name: text_field(data, "Responsible_Name")?,
        status_code: text_field(data, "Business_Current_Status")?,
        status_name: text_field(data, "Business_Current_Status_Desc")?,
        business_item_code,
        business_item_name,
        case_status_code: None,
        case_status_name: None,
        company_uni: None,
        branch_name: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_is_right_biased() {
        let first = record(json!({ "a": 1, "b": "first" }));
        let second = record(json!({ "b": "second", "c": true }));
        let merged = merge_records(&first, &second);
        assert_eq!(merged, record(json!({ "a": 1, "b": "second", "c": true })));
    }

    #[test]
    fn test_legacy_items_asymmetry() {
        let items = BusinessItems::Legacy("百貨零售".into());
        assert_eq!(
            project_company_items(&items),
            (Some(vec![String::new()]), Some(vec!["百貨零售".to_string()]))
        );
        assert_eq!(
            project_business_items(&items),
            (None, Some(vec!["百貨零售".to_string()]))
        );
    }

    #[test]
    fn test_null_items_are_absent() {
        let data = record(json!({ "Cmp_Business": null }));
        assert_eq!(
            parse_business_items(&data, COMPANY_ITEMS_FIELD).unwrap(),
            BusinessItems::Absent
        );
    }

    #[test]
    fn test_item_without_description() {
        let data = record(json!({ "Cmp_Business": [{ "Business_Item": "A1" }] }));
        let err = parse_business_items(&data, COMPANY_ITEMS_FIELD).unwrap_err();
        assert!(matches!(err, GcisError::MissingField(_)));
    }

    #[test]
    fn test_funds_variants() {
        let data = record(json!({
            "n": 5000000,
            "s": "1,200,000",
            "blank": "",
            "null": null,
            "word": "unknown",
        }));
        assert_eq!(funds_field(&data, "n").unwrap(), Some(5_000_000));
        assert_eq!(funds_field(&data, "s").unwrap(), Some(1_200_000));
        assert_eq!(funds_field(&data, "blank").unwrap(), None);
        assert_eq!(funds_field(&data, "null").unwrap(), None);
        assert!(matches!(
            funds_field(&data, "word"),
            Err(GcisError::InvalidField(_))
        ));
        assert!(matches!(
            funds_field(&data, "missing"),
            Err(GcisError::MissingField(_))
        ));
    }

    #[test]
    fn test_funds_reject_lossy_numbers() {
        let data = record(json!({
            "fraction": 1234.9,
            "fraction_text": "1234.9",
            "huge": 1e30,
            "beyond_i64": 18446744073709551615u64,
        }));
        for field in ["fraction", "fraction_text", "huge", "beyond_i64"] {
            assert!(
                matches!(funds_field(&data, field), Err(GcisError::InvalidField(_))),
                "{} should be rejected",
                field
            );
        }
    }

    #[test]
    fn test_text_field_accepts_numbers() {
        let data = record(json!({ "Business_Accounting_NO": 22099131 }));
        assert_eq!(
            text_field(&data, "Business_Accounting_NO").unwrap(),
            "22099131"
        );
    }

    #[test]
    fn test_branch_name_is_provisional() {
        let data = record(json!({
            "Business_Accounting_NO": "22099131",
            "Branch_Office_Name": "North Store",
            "Branch_Office_Location": "Taichung",
            "Branch_Office_Manager_Name": "Chen",
            "Branch_Office_Status": "01",
            "Branch_Office_Status_Desc": "核准設立",
            "CHG_APP_DATE": "1100101",
        }));
        let branch = normalize_branch("12345678", &data).unwrap();
        assert_eq!(branch.name, "North Store");
        assert_eq!(branch.company_uni.as_deref(), Some("22099131"));
        assert_eq!(branch.register_funds, None);
        assert_eq!(
            compose_branch_name("Acme Co", branch.branch_name.as_deref().unwrap()),
            "Acme Co-North Store"
        );
    }
}
