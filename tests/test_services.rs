extern crate interactome;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;

use interactome::config::RetryConfig;
use interactome::data_types::*;
use interactome::http::RetryingClient;
use interactome::ols::*;
use interactome::types::TermId;
use interactome::uniprot_mapping::*;

fn termids(page: &OlsPage) -> Vec<&str> {
    page.terms.iter().map(|term| term.termid.as_str()).collect()
}

fn descendants_page(number: usize, total_pages: usize, termid: &str, next: Option<&str>)
    -> String
{
    let links =
        match next {
            Some(href) => format!(r#""next": {{ "href": "{}" }}"#, href),
            None => String::new(),
        };

    format!(r#"{{
      "_embedded": {{
        "terms": [
          {{ "obo_id": "{}", "label": "term", "description": ["a term"],
             "is_obsolete": false }}
        ]
      }},
      "_links": {{ {} }},
      "page": {{ "size": 1, "totalElements": {}, "totalPages": {}, "number": {} }}
    }}"#, termid, links, total_pages, total_pages, number)
}

#[test]
fn test_ols_terms() {
    let json = r#"{
      "_embedded": {
        "terms": [
          { "obo_id": "MI:0018", "label": "two hybrid",
            "description": ["The classical two-hybrid system"], "is_obsolete": false },
          { "obo_id": "MI:0020", "label": "transcription complementation",
            "description": [" "], "is_obsolete": false },
          { "obo_id": null, "label": "no obo id",
            "annotation": { "id": ["MI:0021"] }, "is_obsolete": true },
          { "label": "no id at all" }
        ]
      }
    }"#;

    let page = parse_terms_page(json).unwrap();

    assert_eq!(termids(&page), vec!["MI:0018", "MI:0020", "MI:0021"]);
    assert_eq!(page.next_url, None);
    assert_eq!(page.total_pages, None);

    let two_hybrid = &page.terms[0];
    assert_eq!(two_hybrid.name.as_ref().map(|name| name.as_str()), Some("two hybrid"));
    assert!(two_hybrid.has_description);
    assert!(!two_hybrid.is_obsolete);

    // a blank description counts as no description
    assert!(!page.terms[1].has_description);

    assert!(!page.terms[2].has_description);
    assert!(page.terms[2].is_obsolete);

    let empty = parse_terms_page(r#"{ "page": { "size": 500, "totalElements": 0,
                                                "totalPages": 0, "number": 0 } }"#).unwrap();
    assert!(empty.terms.is_empty());

    assert!(parse_terms_page("<html>").is_err());
}

#[test]
fn test_ols_paging() {
    let first = parse_terms_page(&descendants_page(0, 2, "MI:0064",
                                                   Some("http://ols/descendants?page=1")))
        .unwrap();
    let second = parse_terms_page(&descendants_page(1, 2, "MI:0085", None)).unwrap();

    assert_eq!(first.number, Some(0));
    assert_eq!(first.total_pages, Some(2));

    let mut pager = OlsPager::new();
    assert_eq!(pager.add_page(first).unwrap().as_deref(), Some("http://ols/descendants?page=1"));
    assert_eq!(pager.add_page(second).unwrap(), None);
    assert_eq!(pager.pages_read(), 2);

    let termids = pager.into_terms().into_iter()
        .map(|term| term.termid)
        .collect::<Vec<_>>();
    assert_eq!(termids, vec![TermId::from("MI:0064"), TermId::from("MI:0085")]);
}

#[test]
fn test_ols_incomplete_listing_is_an_error() {
    // a next link is missing
    let mut pager = OlsPager::new();
    let truncated = parse_terms_page(&descendants_page(0, 2, "MI:0064", None)).unwrap();
    let message = format!("{}", pager.add_page(truncated).unwrap_err());
    assert!(message.contains("page 1 of 2"));

    // a page is skipped
    let mut pager = OlsPager::new();
    let skipped = parse_terms_page(&descendants_page(1, 2, "MI:0085", None)).unwrap();
    assert!(pager.add_page(skipped).is_err());

    // a link past the last page
    let mut pager = OlsPager::new();
    let too_many = parse_terms_page(&descendants_page(0, 1, "MI:0064",
                                                      Some("http://ols/descendants?page=1")))
        .unwrap();
    assert!(pager.add_page(too_many).is_err());
}

#[test]
fn test_uniprot_search_page() {
    let json = r#"{
      "results": [
        { "primaryAccession": "P04551",
          "genes": [ { "geneName": { "value": "cdc2" },
                       "orderedLocusNames": [ { "value": "SPBC11B10.09" } ] } ],
          "uniProtKBCrossReferences": [ { "database": "GeneID", "id": "2539869" } ] },
        { "primaryAccession": "P00546",
          "genes": [ { "orderedLocusNames": [ { "value": "YBR160W" } ] } ],
          "uniProtKBCrossReferences": [ { "database": "GeneID", "id": "852457" } ] },
        { "primaryAccession": "Q00001",
          "uniProtKBCrossReferences": [ { "database": "GeneID", "id": "1" } ] },
        { "primaryAccession": "Q00002",
          "genes": [ { "geneName": { "value": "abc1" } } ] },
        { "primaryAccession": "Q00003",
          "genes": [ { "synonyms": [ { "value": "xyz" } ] } ],
          "uniProtKBCrossReferences": [ { "database": "GeneID", "id": "3" } ] }
      ]
    }"#;

    let page = parse_search_page(json).unwrap();

    assert_eq!(page.entry_count, 5);
    assert_eq!(page.mappings.len(), 2);

    let cdc2 = &page.mappings["2539869"];
    assert_eq!(cdc2.uniprotkb_id, "P04551");
    assert_eq!(cdc2.gene_name, "cdc2");
    assert_eq!(cdc2.ordered_locus_name, "SPBC11B10.09");

    // no gene name, only a locus name
    let cdc28 = &page.mappings["852457"];
    assert_eq!(cdc28.uniprotkb_id, "P00546");
    assert_eq!(cdc28.gene_name, "-");
    assert_eq!(cdc28.ordered_locus_name, "YBR160W");

    assert!(parse_search_page(r#"{ "results": [] }"#).unwrap().mappings.is_empty());
}

#[test]
fn test_next_link() {
    let mut headers = HeaderMap::new();
    assert_eq!(next_link(&headers), None);

    headers.insert("Link", HeaderValue::from_static(
        r#"<https://rest.uniprot.org/uniprotkb/search?cursor=abc&size=500>; rel="next""#));
    assert_eq!(next_link(&headers).as_deref(),
               Some("https://rest.uniprot.org/uniprotkb/search?cursor=abc&size=500"));

    headers.insert("Link", HeaderValue::from_static(r#"<https://example.org/prev>; rel="prev""#));
    assert_eq!(next_link(&headers), None);
}

#[test]
fn test_gene_map_files() {
    let file_name = std::env::temp_dir()
        .join(format!("interactome-gene-map-{}.json", std::process::id()));
    std::fs::write(&file_name, r#"{
      "2539869": { "uniprotkb_id": "P04551", "gene_name": "cdc2",
                   "ordered_locus_name": "SPBC11B10.09" },
      "852457": { "uniprotkb_id": "P00546", "gene_name": "CDC28",
                  "ordered_locus_name": "YBR160W" }
    }"#).unwrap();

    let file_name_str = file_name.to_str().unwrap();
    let from_file = read_gene_map(file_name_str).unwrap();
    std::fs::remove_file(&file_name).unwrap();

    assert_eq!(from_file.len(), 2);
    assert_eq!(from_file["852457"].gene_name, "CDC28");

    let mut other = GeneMap::new();
    other.insert("852457".into(), GeneIdentifierMapping {
        uniprotkb_id: "P00546".into(),
        gene_name: "-".into(),
        ordered_locus_name: "YBR160W".into(),
    });
    other.insert("1".into(), GeneIdentifierMapping {
        uniprotkb_id: "Q00001".into(),
        gene_name: "abc1".into(),
        ordered_locus_name: "-".into(),
    });

    let merged = merge_gene_maps(vec![from_file, other]);
    assert_eq!(merged.len(), 3);
    // the later map wins
    assert_eq!(merged["852457"].gene_name, "-");

    assert!(read_gene_map("/nonexistent/gene_map.json").is_err());
}

#[test]
fn test_retry_backoff() {
    let client = RetryingClient::new(&RetryConfig {
        max_retries: 3,
        backoff_factor_ms: 100,
        status_forcelist: vec![500, 503],
    });

    assert_eq!(client.backoff(0), Duration::from_millis(100));
    assert_eq!(client.backoff(1), Duration::from_millis(200));
    assert_eq!(client.backoff(3), Duration::from_millis(800));
    assert!(client.backoff(200) > Duration::from_secs(1));

    assert!(client.is_retryable(StatusCode::SERVICE_UNAVAILABLE));
    assert!(!client.is_retryable(StatusCode::NOT_FOUND));
    assert!(!client.is_retryable(StatusCode::BAD_GATEWAY));
}
