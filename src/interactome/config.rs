use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use crate::constants::*;
use crate::data_types::RecordFormat;
use crate::types::TermId;

#[derive(Deserialize, Clone, Debug)]
pub struct OntologyServiceConfig {
    // eg. "https://www.ebi.ac.uk/ols4/api/ontologies/mi"
    #[serde(default = "default_ols_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for OntologyServiceConfig {
    fn default() -> Self {
        OntologyServiceConfig {
            base_url: default_ols_base_url(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct UniProtConfig {
    #[serde(default = "default_uniprot_search_url")]
    pub search_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for UniProtConfig {
    fn default() -> Self {
        UniProtConfig {
            search_url: default_uniprot_search_url(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    // the delay before retry n is backoff_factor_ms * 2^n
    #[serde(default = "default_backoff_factor_ms")]
    pub backoff_factor_ms: u64,
    // HTTP status codes that are worth another try
    #[serde(default = "default_status_forcelist")]
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor_ms: DEFAULT_BACKOFF_FACTOR_MS,
            status_forcelist: default_status_forcelist(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub format: RecordFormat,
    // drop extended rows where either interactor isn't a protein (MI:0326)
    #[serde(default)]
    pub protein_only: bool,
    // these terms and all their descendants are removed from the table
    #[serde(default)]
    pub mi_fetch_descendants: Vec<TermId>,
    // removed as is, descendants are kept
    #[serde(default)]
    pub mi_to_exclude: Vec<TermId>,
    #[serde(default)]
    pub ontology: OntologyServiceConfig,
    #[serde(default)]
    pub uniprot: UniProtConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: RecordFormat::default(),
            protein_only: false,
            mi_fetch_descendants: vec![],
            mi_to_exclude: vec![],
            ontology: OntologyServiceConfig::default(),
            uniprot: UniProtConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    pub fn read(config_file_name: &str) -> Result<Config> {
        let file = File::open(config_file_name)
            .with_context(|| format!("failed to read {}", config_file_name))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", config_file_name))
    }
}

fn default_ols_base_url() -> String {
    DEFAULT_OLS_BASE_URL.to_owned()
}

fn default_uniprot_search_url() -> String {
    DEFAULT_UNIPROT_SEARCH_URL.to_owned()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_factor_ms() -> u64 {
    DEFAULT_BACKOFF_FACTOR_MS
}

fn default_status_forcelist() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}
