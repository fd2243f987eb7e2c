use crate::config::Config;
use crate::endpoints::Endpoint;
use crate::errors::GcisError;
use crate::models::RawRecord;
use std::time::Duration;
use url::Url;

/// Client for the GCIS open-data API.
///
/// Every query is a plain `GET` with `$format=json` and an OData `$filter`.
/// This is the only type in the crate that touches the network.
#[derive(Clone)]
pub struct GcisClient {
    client: reqwest::Client,
    base_url: String,
}

impl GcisClient {
    /// Creates a new `GcisClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and per-request timeout.
    pub fn new(config: &Config) -> Result<Self, GcisError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GcisError::TransportError(format!("Failed to create GCIS client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.gcis_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the query URL for an endpoint.
    ///
    /// The `$`-prefixed OData keys are kept literal; `Url::set_query`
    /// percent-encodes the spaces in the filter expression.
    pub fn query_url(&self, endpoint: Endpoint, values: &[&str]) -> Result<Url, GcisError> {
        let filter = endpoint.filter_expression(values).ok_or_else(|| {
            GcisError::TransportError(format!(
                "{} expects {} filter value(s), got {}",
                endpoint,
                endpoint.filter_fields().len(),
                values.len()
            ))
        })?;

        let mut url = Url::parse(&format!("{}/{}", self.base_url, endpoint.resource_id()))
            .map_err(|e| GcisError::TransportError(format!("Failed to build URL: {}", e)))?;
        url.set_query(Some(&format!("$format=json&$filter={}", filter)));

        Ok(url)
    }

    /// Runs one query and returns its rows.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The logical query to run.
    /// * `values` - Filter values, one per field of `endpoint.filter_fields()`.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<RawRecord>, GcisError>` - Rows in upstream order. An empty
    ///   body is read as zero rows.
    pub async fn query(
        &self,
        endpoint: Endpoint,
        values: &[&str],
    ) -> Result<Vec<RawRecord>, GcisError> {
        let url = self.query_url(endpoint, values)?;
        tracing::info!("GCIS: querying {} for {}", endpoint, values.join(" / "));
        tracing::debug!("GCIS URL: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            GcisError::TransportError(format!("{} request failed: {}", endpoint, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("GCIS {} returned {}: {}", endpoint, status, error_text);
            return Err(GcisError::TransportError(format!(
                "{} returned status {}: {}",
                endpoint, status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            GcisError::TransportError(format!("Failed to read {} response: {}", endpoint, e))
        })?;

        let rows = parse_rows(endpoint, &body)?;
        tracing::debug!("GCIS: {} returned {} row(s)", endpoint, rows.len());
        Ok(rows)
    }

    /// Runs a query that must yield at least one row and returns the first.
    pub async fn query_first(
        &self,
        endpoint: Endpoint,
        values: &[&str],
    ) -> Result<RawRecord, GcisError> {
        self.query(endpoint, values)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                GcisError::EmptyResult(format!(
                    "{} returned no records for {}",
                    endpoint,
                    values.join(" / ")
                ))
            })
    }
}

fn parse_rows(endpoint: Endpoint, body: &str) -> Result<Vec<RawRecord>, GcisError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Unlicensed callers of the branch endpoint get an HTML page instead of JSON.
    serde_json::from_str(body).map_err(|e| {
        GcisError::TransportError(format!("Failed to parse {} response: {}", endpoint, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GcisClient {
        let config = Config::with_base_url("https://data.gcis.nat.gov.tw/od/data/api/");
        GcisClient::new(&config).unwrap()
    }

    #[test]
    fn test_query_url_encodes_filter() {
        let url = client()
            .query_url(Endpoint::CategorySearch, &["12345678"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.gcis.nat.gov.tw/od/data/api/673F0FC0-B3A7-429F-9041-E9866836B66D?$format=json&$filter=No%20eq%2012345678"
        );
    }

    #[test]
    fn test_query_url_rejects_wrong_arity() {
        let err = client()
            .query_url(Endpoint::BusinessPrimary, &["12345678"])
            .unwrap_err();
        assert!(matches!(err, GcisError::TransportError(_)));
    }

    #[test]
    fn test_parse_rows_empty_body() {
        assert!(parse_rows(Endpoint::Branch, "  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_html() {
        let err = parse_rows(Endpoint::Branch, "<html>IP not licensed</html>").unwrap_err();
        assert!(matches!(err, GcisError::TransportError(_)));
    }

    #[test]
    fn test_parse_rows_keeps_order() {
        let rows = parse_rows(
            Endpoint::BusinessSecondary,
            r#"[{"Business_Current_Status":"05"},{"Business_Current_Status":"01"}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Business_Current_Status"], "01");
    }
}
