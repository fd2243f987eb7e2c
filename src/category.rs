use crate::endpoints::Endpoint;
use crate::errors::GcisError;
use crate::gcis_client::GcisClient;
use crate::models::{Category, RawRecord};

/// Asks the category-search endpoint which kind of entity `uni` is.
///
/// Returns `Ok(None)` when the number is registered in none of the three
/// domains.
pub async fn resolve_category(
    client: &GcisClient,
    uni: &str,
) -> Result<Option<Category>, GcisError> {
    let flags = client.query(Endpoint::CategorySearch, &[uni]).await?;
    let category = category_from_flags(&flags)?;

    match category {
        Some(category) => tracing::info!("GCIS: {} is a {}", uni, category),
        None => tracing::warn!("GCIS: {} is not registered in any category", uni),
    }

    Ok(category)
}

/// Picks the first category whose `exist` flag is `"Y"`, in
/// (Company, Branch, Business) order.
pub fn category_from_flags(flags: &[RawRecord]) -> Result<Option<Category>, GcisError> {
    if flags.len() < Category::PROBE_ORDER.len() {
        return Err(GcisError::TransportError(format!(
            "{} returned {} existence flag(s), expected {}",
            Endpoint::CategorySearch,
            flags.len(),
            Category::PROBE_ORDER.len()
        )));
    }

    for (category, row) in Category::PROBE_ORDER.iter().zip(flags) {
        let exist = row.get("exist").and_then(|v| v.as_str()).ok_or_else(|| {
            GcisError::TransportError(format!(
                "{} row for {} has no 'exist' flag",
                Endpoint::CategorySearch,
                category
            ))
        })?;

        if exist == "Y" {
            return Ok(Some(*category));
        }
    }

    Ok(None)
}
