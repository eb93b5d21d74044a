use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::HeaderMap;
use tracing::info;

use crate::config::UniProtConfig;
use crate::constants::SENTINEL;
use crate::data_types::{GeneIdentifierMapping, GeneMap};
use crate::http::RetryingClient;
use crate::types::{GeneId, GeneName, OrganismTaxonId};

lazy_static! {
    static ref NEXT_LINK_RE: Regex = Regex::new(r#"<(.+)>; rel="next""#).unwrap();
}

// the fields requested are: accession, gene_primary, xref_geneid, gene_oln
#[derive(Debug, Deserialize)]
struct UniProtSearchPage {
    #[serde(default)]
    results: Vec<UniProtEntry>,
}

#[derive(Debug, Deserialize)]
struct UniProtValue {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniProtGene {
    gene_name: Option<UniProtValue>,
    #[serde(default)]
    ordered_locus_names: Vec<UniProtValue>,
}

#[derive(Debug, Deserialize)]
struct UniProtCrossReference {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniProtEntry {
    primary_accession: String,
    #[serde(default)]
    genes: Vec<UniProtGene>,
    #[serde(default, rename = "uniProtKBCrossReferences")]
    cross_references: Vec<UniProtCrossReference>,
}

/// The URL of the next page from a `Link: <...>; rel="next"` header
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get("Link")?.to_str().ok()?;
    NEXT_LINK_RE.captures(link)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_owned())
}

// entries without gene information or without a GeneID can't be used for
// mapping
fn entry_mapping(entry: UniProtEntry) -> Option<(GeneId, GeneIdentifierMapping)> {
    let gene = entry.genes.into_iter().next()?;

    if gene.gene_name.is_none() && gene.ordered_locus_names.is_empty() {
        return None;
    }

    let gene_id = entry.cross_references.into_iter().next()?.id;

    let gene_name: GeneName = gene.gene_name
        .map(|name| name.value.into())
        .unwrap_or_else(|| SENTINEL.into());
    let ordered_locus_name: GeneName = gene.ordered_locus_names.into_iter().next()
        .map(|name| name.value.into())
        .unwrap_or_else(|| SENTINEL.into());

    Some((gene_id.into(),
          GeneIdentifierMapping {
              uniprotkb_id: entry.primary_accession.into(),
              gene_name,
              ordered_locus_name,
          }))
}

/// The mappings of one page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPage {
    pub entry_count: usize,
    pub mappings: GeneMap,
}

pub fn parse_search_page(json: &str) -> Result<MappingPage> {
    let page: UniProtSearchPage = serde_json::from_str(json)
        .context("failed to parse UniProt search results")?;

    Ok(MappingPage {
        entry_count: page.results.len(),
        mappings: page.results.into_iter().filter_map(entry_mapping).collect(),
    })
}

/// Download the GeneID to UniProtKB mapping for one organism, or for all
/// organisms if `taxonid` is None.  Proteins of uncertain existence (PE5)
/// are skipped since they have no gene name and no GeneID.
pub async fn fetch_gene_map(config: &UniProtConfig, client: &RetryingClient,
                            taxonid: Option<OrganismTaxonId>)
    -> Result<GeneMap>
{
    let query =
        if let Some(taxonid) = taxonid {
            format!("organism_id:{} NOT existence:5", taxonid)
        } else {
            "NOT existence:5".to_owned()
        };
    let page_size = config.page_size.to_string();

    let mut gene_map = GeneMap::new();
    let mut progress = 0;

    let mut response = client.get(&config.search_url,
                                  &[("query", query.as_str()),
                                    ("fields", "accession,gene_primary,xref_geneid,gene_oln"),
                                    ("size", page_size.as_str()),
                                    ("format", "json")]).await?;

    loop {
        let next_url = next_link(response.headers());
        let total = response.headers().get("x-total-results")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("?")
            .to_owned();

        let body = response.text().await
            .context("failed to read UniProt search results")?;
        let page = parse_search_page(&body)?;

        progress += page.entry_count;

        gene_map.extend(page.mappings);

        info!("UniProt mapping: {} / {}", progress, total);

        if let Some(next_url) = next_url {
            response = client.get(&next_url, &[]).await?;
        } else {
            break;
        }
    }

    info!("UniProt mapping data downloaded: {} gene IDs", gene_map.len());

    Ok(gene_map)
}

/// Read a JSON map of gene ID to [GeneIdentifierMapping]
pub fn read_gene_map(file_name: &str) -> Result<GeneMap> {
    let file = File::open(file_name)
        .with_context(|| format!("failed to read {}", file_name))?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse {}", file_name))
}

/// Merge per organism maps, later maps win for gene IDs present twice
pub fn merge_gene_maps(maps: impl IntoIterator<Item = GeneMap>) -> GeneMap {
    let mut merged = GeneMap::new();

    for map in maps {
        merged.extend(map);
    }

    merged
}
