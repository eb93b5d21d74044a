use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::{OntologyServiceConfig, RetryConfig};
use crate::http::RetryingClient;
use crate::ontology::{TermInfo, TermSource};
use crate::types::TermId;

#[derive(Debug, Deserialize)]
struct OlsAnnotation {
    #[serde(default)]
    id: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OlsTerm {
    obo_id: Option<String>,
    label: Option<String>,
    #[serde(default)]
    description: Option<Vec<String>>,
    #[serde(default)]
    is_obsolete: bool,
    annotation: Option<OlsAnnotation>,
}

#[derive(Debug, Deserialize)]
struct OlsEmbedded {
    #[serde(default)]
    terms: Vec<OlsTerm>,
}

#[derive(Debug, Deserialize)]
struct OlsLink {
    href: String,
}

#[derive(Debug, Deserialize)]
struct OlsLinks {
    next: Option<OlsLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OlsPageInfo {
    number: usize,
    total_pages: usize,
}

#[derive(Debug, Deserialize)]
struct OlsTermsPage {
    // missing when there are no results
    #[serde(rename = "_embedded")]
    embedded: Option<OlsEmbedded>,
    #[serde(rename = "_links")]
    links: Option<OlsLinks>,
    page: Option<OlsPageInfo>,
}

/// One page of an OLS term listing.  `number` and `total_pages` are None
/// for responses without paging information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlsPage {
    pub terms: Vec<TermInfo>,
    pub next_url: Option<String>,
    pub number: Option<usize>,
    pub total_pages: Option<usize>,
}

pub fn parse_terms_page(json: &str) -> Result<OlsPage> {
    let page: OlsTermsPage = serde_json::from_str(json)?;

    let terms = page.embedded
        .map(|embedded| embedded.terms)
        .unwrap_or_default()
        .into_iter()
        .filter_map(OlsTerm::into_term_info)
        .collect();

    let next_url = page.links
        .and_then(|links| links.next)
        .map(|next| next.href);

    Ok(OlsPage {
        terms,
        next_url,
        number: page.page.as_ref().map(|info| info.number),
        total_pages: page.page.as_ref().map(|info| info.total_pages),
    })
}

/// Collects the terms of consecutive pages of one listing.  A listing that
/// ends before its announced last page, skips a page or goes past the last
/// page is an error, a partial closure would silently keep or merge the
/// wrong rows.
#[derive(Debug, Default)]
pub struct OlsPager {
    terms: Vec<TermInfo>,
    pages_read: usize,
}

impl OlsPager {
    pub fn new() -> OlsPager {
        OlsPager::default()
    }

    /// Add the next page and return the URL of the page after it, if any
    pub fn add_page(&mut self, page: OlsPage) -> Result<Option<String>> {
        if let Some(number) = page.number {
            if number != self.pages_read {
                bail!("expected page {} of the OLS listing, got page {}",
                      self.pages_read, number);
            }
        }

        self.pages_read += 1;
        self.terms.extend(page.terms);

        match (page.next_url, page.total_pages) {
            (Some(next_url), Some(total_pages)) if self.pages_read >= total_pages => {
                bail!("OLS listing links to {} after its last page ({} of {})",
                      next_url, self.pages_read, total_pages)
            },
            (None, Some(total_pages)) if self.pages_read < total_pages => {
                bail!("OLS listing stopped after page {} of {}", self.pages_read, total_pages)
            },
            (next_url, _) => Ok(next_url),
        }
    }

    pub fn pages_read(&self) -> usize {
        self.pages_read
    }

    pub fn into_terms(self) -> Vec<TermInfo> {
        self.terms
    }
}

impl OlsTerm {
    fn termid(&self) -> Option<TermId> {
        if let Some(ref obo_id) = self.obo_id {
            return Some(obo_id.as_str().into());
        }

        self.annotation.as_ref()
            .and_then(|annotation| annotation.id.first())
            .map(|id| id.as_str().into())
    }

    fn into_term_info(self) -> Option<TermInfo> {
        let termid = self.termid()?;
        let has_description = self.description.as_ref()
            .map(|description| description.iter().any(|line| !line.trim().is_empty()))
            .unwrap_or(false);

        Some(TermInfo {
            termid,
            name: self.label.map(|label| label.into()),
            has_description,
            is_obsolete: self.is_obsolete,
        })
    }
}

/// Queries the Ontology Lookup Service REST API for PSI-MI terms
pub struct OlsClient {
    client: RetryingClient,
    base_url: String,
    page_size: String,
}

impl OlsClient {
    pub fn new(config: &OntologyServiceConfig, retry: &RetryConfig) -> OlsClient {
        OlsClient {
            client: RetryingClient::new(retry),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            page_size: config.page_size.to_string(),
        }
    }

    async fn get_page(&self, url: &str, params: &[(&str, &str)]) -> Result<OlsPage> {
        debug!("OLS request: {} {:?}", url, params);

        let body = self.client.get(url, params).await?
            .text().await
            .with_context(|| format!("failed to read the response from {}", url))?;

        parse_terms_page(&body)
            .with_context(|| format!("failed to parse the response from {}", url))
    }

    // follows the "next" links until the last page
    async fn get_terms(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<TermInfo>> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut pager = OlsPager::new();
        let mut next_url = pager.add_page(self.get_page(&url, params).await?)?;

        while let Some(page_url) = next_url {
            next_url = pager.add_page(self.get_page(&page_url, &[]).await?)?;
        }

        let pages_read = pager.pages_read();
        let terms = pager.into_terms();
        debug!("{}: {} terms in {} pages", url, terms.len(), pages_read);

        Ok(terms)
    }
}

impl TermSource for OlsClient {
    async fn fetch_term(&self, termid: &TermId) -> Result<Option<TermInfo>> {
        let terms = self.get_terms("terms", &[("obo_id", termid.as_str())]).await?;

        Ok(terms.into_iter().find(|term| &term.termid == termid))
    }

    async fn fetch_ancestors(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        let params = [("id", termid.as_str()), ("size", self.page_size.as_str())];
        self.get_terms("ancestors", &params).await
    }

    async fn fetch_descendants(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        let params = [("id", termid.as_str()), ("size", self.page_size.as_str())];
        self.get_terms("descendants", &params).await
    }
}
