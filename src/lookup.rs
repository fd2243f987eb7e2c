/// Lookup workflow shared by the library entry point and the CLI
///
/// A lookup runs as a fixed chain of stages:
/// 1. Resolve the category of the business number
/// 2. Fetch the category's rows from GCIS
/// 3. Select the current row (branches and businesses)
/// 4. Merge partial rows and project them into a `GcisRecord`
use crate::category::resolve_category;
use crate::config::Config;
use crate::endpoints::Endpoint;
use crate::errors::{GcisError, ResultExt};
use crate::gcis_client::GcisClient;
use crate::models::{Category, GcisRecord};
use crate::normalize::{
    compose_branch_name, merge_records, normalize_branch, normalize_business, normalize_company,
    text_field,
};
use crate::selection::{select_current, BRANCH_POLICY, BUSINESS_POLICY};

/// Facade over the GCIS registry. Cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct GcisLookup {
    client: GcisClient,
}

impl GcisLookup {
    pub fn new(config: &Config) -> Result<Self, GcisError> {
        Ok(Self {
            client: GcisClient::new(config)?,
        })
    }

    /// Looks up `uni` and returns its normalized record.
    ///
    /// Fails with `GcisError::CategoryNotFound` when the number is registered
    /// as neither company, branch nor business.
    pub async fn lookup(&self, uni: &str) -> Result<GcisRecord, GcisError> {
        tracing::info!("GCIS lookup started for {}", uni);

        let category = resolve_category(&self.client, uni)
            .await
            .with_context(|| format!("resolving category of {}", uni))?
            .ok_or_else(|| GcisError::CategoryNotFound(uni.to_string()))?;

        let record = match category {
            Category::Company => self.company(uni).await,
            Category::Branch => self.branch(uni).await,
            Category::Business => self.business(uni).await,
        }
        .with_context(|| format!("{} pipeline for {}", category, uni))?;

        tracing::info!("✓ GCIS lookup finished for {}: {}", uni, record.name);
        Ok(record)
    }

    /// Company pipeline: primary + secondary rows, merged right-biased.
    pub async fn company(&self, uni: &str) -> Result<GcisRecord, GcisError> {
        let primary = self
            .client
            .query_first(Endpoint::CompanyPrimary, &[uni])
            .await?;
        let secondary = self
            .client
            .query_first(Endpoint::CompanySecondary, &[uni])
            .await?;

        normalize_company(uni, &merge_records(&primary, &secondary))
    }

    /// Branch pipeline. The display name is prefixed with the parent
    /// company's name, fetched through the company pipeline. A branch's parent
    /// is always a company, so this never recurses further.
    pub async fn branch(&self, uni: &str) -> Result<GcisRecord, GcisError> {
        let rows = self.client.query(Endpoint::Branch, &[uni]).await?;
        let current = select_current(&rows, &BRANCH_POLICY).with_context(|| {
            format!(
                "{} returned {} row(s) for {}",
                Endpoint::Branch,
                rows.len(),
                uni
            )
        })?;

        let mut record = normalize_branch(uni, current)?;
        let company_uni = text_field(current, "Business_Accounting_NO")?;

        let parent = self.company(&company_uni).await.with_context(|| {
            format!(
                "resolving parent company {} of branch {}",
                company_uni, uni
            )
        })?;

        record.name = compose_branch_name(&parent.name, &record.name);
        Ok(record)
    }

    /// Business pipeline: the selected secondary row supplies the agency
    /// that the primary query is filtered by, then overrides the primary
    /// row's fields on merge.
    pub async fn business(&self, uni: &str) -> Result<GcisRecord, GcisError> {
        let rows = self
            .client
            .query(Endpoint::BusinessSecondary, &[uni])
            .await?;
        let current = select_current(&rows, &BUSINESS_POLICY).with_context(|| {
            format!(
                "{} returned {} row(s) for {}",
                Endpoint::BusinessSecondary,
                rows.len(),
                uni
            )
        })?;

        let agency = text_field(current, "Agency")?;
        let primary = self
            .client
            .query_first(Endpoint::BusinessPrimary, &[uni, agency.as_str()])
            .await?;

        normalize_business(uni, &merge_records(&primary, current))
    }
}

/// Looks up a business number against the public GCIS registry, using
/// configuration from the environment (`GCIS_BASE_URL`, `GCIS_TIMEOUT_SECS`).
pub async fn get_gcis_information(uni: &str) -> Result<GcisRecord, GcisError> {
    let config = Config::from_env()
        .map_err(|e| GcisError::Config(format!("{:#}", e)))?;
    GcisLookup::new(&config)?.lookup(uni).await
}
