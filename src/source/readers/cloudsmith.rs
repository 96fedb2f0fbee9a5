//! Cloudsmith package groups API implementation

use std::collections::BTreeMap;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{CloudsmithConfig, USER_AGENT};
use crate::freshness::timestamp::Timestamp;
use crate::freshness::types::{PackageFormat, PackageIdentifier};
use crate::source::error::SourceError;
use crate::source::filter::{ExcludeTags, PackageGroup, latest_push};
use crate::source::traits::CloudsmithSource;

/// Sort order of group listings (most recent push first)
const SORT_BY_LAST_PUSH_DESC: &str = "-last_push";

/// Response from the package groups endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    #[serde(default)]
    pub(crate) results: Vec<RawGroup>,
}

/// Tags are either a flat list or bucketed by kind (`{"info": [...], "version": [...]}`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTags {
    List(Vec<String>),
    Buckets(BTreeMap<String, Vec<String>>),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::List(Vec::new())
    }
}

impl RawTags {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawTags::List(tags) => tags,
            RawTags::Buckets(buckets) => buckets.into_values().flatten().collect(),
        }
    }
}

/// Package group as serialized by Cloudsmith
#[derive(Debug, Deserialize)]
pub(crate) struct RawGroup {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) identifier: Option<String>,
    #[serde(alias = "last_push_at", alias = "uploaded_at")]
    pub(crate) last_push: Option<String>,
    #[serde(default)]
    pub(crate) tags: RawTags,
}

impl RawGroup {
    /// Converts to a [`PackageGroup`], dropping a push date that cannot be parsed
    pub(crate) fn into_group(self) -> PackageGroup {
        let name = self.identifier.unwrap_or(self.name);
        let last_push = self.last_push.and_then(|raw| {
            Timestamp::from_iso8601(&raw)
                .inspect_err(|e| warn!("Ignoring Cloudsmith push date for {}: {}", name, e))
                .ok()
        });

        PackageGroup {
            name,
            last_push,
            tags: self.tags.into_vec(),
        }
    }
}

/// Registry implementation for the Cloudsmith API
pub struct CloudsmithRegistry {
    client: reqwest::Client,
    config: CloudsmithConfig,
}

impl CloudsmithRegistry {
    pub fn new(config: CloudsmithConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    fn groups_url(&self) -> String {
        format!(
            "{}/v1/packages/{}/{}/groups/",
            self.config.base_url.trim_end_matches('/'),
            self.config.org,
            self.config.repo
        )
    }

    fn page_size(&self) -> u32 {
        self.config.page_size.max(1)
    }

    fn max_pages(&self) -> u32 {
        self.config.max_pages.max(1)
    }

    /// Builds the search query for a format, an optional single group and excluded tags
    pub fn build_query(
        format: PackageFormat,
        identifier: Option<&PackageIdentifier>,
        exclude_tags: &ExcludeTags,
    ) -> String {
        let mut clauses = vec![format!("format:{}", format.as_str())];
        if let Some(identifier) = identifier {
            clauses.push(identifier.cloudsmith_query());
        }
        clauses.extend(exclude_tags.iter().map(|tag| format!("NOT tag:{}", tag)));
        clauses.join(" AND ")
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<PackageGroup>, SourceError> {
        let page_param = page.to_string();
        let page_size_param = self.page_size().to_string();
        let url = reqwest::Url::parse_with_params(
            &self.groups_url(),
            &[
                ("query", query),
                ("sort", SORT_BY_LAST_PUSH_DESC),
                ("page", page_param.as_str()),
                ("page_size", page_size_param.as_str()),
            ],
        )
        .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

        debug!("Querying Cloudsmith: {}", url);

        let mut request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!(
                "{}/{}",
                self.config.org, self.config.repo
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(SourceError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("Cloudsmith API returned status {}: {}", status, url);
            return Err(SourceError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body: GroupsResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Cloudsmith groups response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        Ok(body.results.into_iter().map(RawGroup::into_group).collect())
    }
}

#[async_trait::async_trait]
impl CloudsmithSource for CloudsmithRegistry {
    async fn list_package_groups(
        &self,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Vec<PackageGroup>, SourceError> {
        let query = Self::build_query(format, None, exclude_tags);
        let page_size = self.page_size() as usize;
        let mut groups = Vec::new();

        for page in 1..=self.max_pages() {
            let batch = self.fetch_page(&query, page).await?;
            let batch_len = batch.len();
            groups.extend(
                batch
                    .into_iter()
                    .filter(|group| !group.is_excluded(exclude_tags)),
            );
            if batch_len < page_size {
                break;
            }
            if page == self.max_pages() {
                warn!(
                    "Stopped listing {} groups after {} pages; results may be incomplete",
                    format, page
                );
            }
        }

        debug!("Found {} {} package groups in Cloudsmith", groups.len(), format);
        Ok(groups)
    }

    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Option<Timestamp>, SourceError> {
        let query = Self::build_query(format, Some(identifier), exclude_tags);
        let page_size = self.page_size() as usize;

        // Pages are sorted by push date, so the first page with a kept entry holds the latest one.
        for page in 1..=self.max_pages() {
            let batch = self.fetch_page(&query, page).await?;
            if let Some(latest) = latest_push(&batch, exclude_tags) {
                return Ok(Some(latest));
            }
            if batch.len() < page_size {
                break;
            }
            if page == self.max_pages() {
                warn!("No dated entry for {} within {} pages", identifier, page);
            }
        }

        Ok(None)
    }
}
