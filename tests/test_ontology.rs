extern crate interactome;

mod util;

use std::collections::BTreeSet;

use interactome::config::Config;
use interactome::data_types::RecordFormat;
use interactome::ontology::{OntologyResolver, TermSource};
use interactome::ontology_graph::OntologyGraph;
use interactome::types::TermId;

use self::util::*;

fn termids(ids: &[&str]) -> Vec<TermId> {
    ids.iter().map(|id| TermId::from(*id)).collect()
}

fn termid_set(ids: &[&str]) -> BTreeSet<TermId> {
    ids.iter().map(|id| TermId::from(*id)).collect()
}

#[tokio::test]
async fn test_ancestors_and_obsolete_terms() {
    let mut resolver = OntologyResolver::new(test_ontology());

    let ids = termids(&["MI:0018", "MI:0777", "MI:0998", "MI:0999", "MI:0000"]);
    let ancestry = resolver.ancestors(&ids).await.unwrap();

    assert_eq!(ancestry.ancestors.len(), 2);
    assert_eq!(ancestry.ancestors_of("MI:0018").unwrap(),
               &termid_set(&["MI:0000", "MI:0001", "MI:0045", "MI:0232"]));
    assert!(ancestry.ancestors_of("MI:0000").unwrap().is_empty());

    assert!(ancestry.is_usable("MI:0018"));
    assert!(!ancestry.is_usable("MI:0777"));
    assert!(ancestry.is_ancestor("MI:0232", "MI:0018"));
    assert!(!ancestry.is_ancestor("MI:0018", "MI:0232"));

    assert_eq!(ancestry.obsolete, termid_set(&["MI:0777", "MI:0998", "MI:0999"]));
}

#[tokio::test]
async fn test_unknown_term_is_an_error() {
    let mut resolver = OntologyResolver::new(test_ontology());

    let ids = termids(&["MI:0018", "MI:1234"]);
    let result = resolver.ancestors(&ids).await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("MI:1234"));
}

#[tokio::test]
async fn test_descendants_and_exclusions() {
    let mut resolver = OntologyResolver::new(test_ontology());

    let closure = resolver.descendants(&termids(&["MI:0063"])).await.unwrap();
    assert_eq!(closure, termid_set(&["MI:0063", "MI:0064", "MI:0085"]));

    let exclusions = resolver.exclusion_set(&termids(&["MI:0063", "MI:0018"]),
                                            &termids(&["MI:0001"])).await.unwrap();

    assert_eq!(exclusions, termid_set(&["MI:0001", "MI:0018", "MI:0063", "MI:0064",
                                        "MI:0085", "MI:0397"]));
    assert!(!exclusions.contains("MI:0045"));
}

#[tokio::test]
async fn test_lookups_are_cached() {
    let mut resolver = OntologyResolver::new(CountingSource::new(test_ontology()));

    let ids = termids(&["MI:0018", "MI:0232", "MI:0018"]);
    resolver.ancestors(&ids).await.unwrap();
    assert_eq!(resolver.source().term_calls.get(), 2);

    resolver.ancestors(&ids).await.unwrap();
    assert_eq!(resolver.source().term_calls.get(), 2);

    resolver.descendants(&termids(&["MI:0063"])).await.unwrap();
    resolver.exclusion_set(&termids(&["MI:0063"]), &[]).await.unwrap();
    assert_eq!(resolver.source().descendant_calls.get(), 1);
}

#[tokio::test]
async fn test_graph_from_json() {
    let json = r#"{
      "MI:0001": { "name": "interaction detection method", "description": "method",
                   "parents": [] },
      "MI:0045": { "name": "experimental interaction detection", "description": "exp",
                   "parents": ["MI:0001"] },
      "MI:0018": { "name": "two hybrid", "description": "y2h", "parents": ["MI:0045"] },
      "MI:0020": { "name": "old", "is_obsolete": true }
    }"#;

    let graph: OntologyGraph = serde_json::from_str(json).unwrap();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.ancestor_ids("MI:0018"), termid_set(&["MI:0001", "MI:0045"]));
    assert_eq!(graph.descendant_ids("MI:0001"), termid_set(&["MI:0018", "MI:0045"]));

    let info = graph.fetch_term(&TermId::from("MI:0020")).await.unwrap().unwrap();
    assert!(info.is_obsolete);
    assert!(!info.has_description);

    assert!(graph.fetch_term(&TermId::from("MI:9999")).await.unwrap().is_none());
}

#[test]
fn test_config_defaults() {
    let config: Config = serde_json::from_str(r#"{
      "mi_fetch_descendants": ["MI:0063"],
      "mi_to_exclude": ["MI:0001"],
      "retry": { "max_retries": 2 }
    }"#).unwrap();

    assert_eq!(config.format, RecordFormat::Tab27);
    assert!(!config.protein_only);
    assert_eq!(config.mi_fetch_descendants, termids(&["MI:0063"]));
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.retry.backoff_factor_ms, 250);
    assert_eq!(config.retry.status_forcelist, vec![500, 502, 503, 504]);
    assert_eq!(config.ontology.page_size, 500);

    let config: Config = serde_json::from_str(r#"{ "format": "tab25" }"#).unwrap();
    assert_eq!(config.format, RecordFormat::Tab25);
    assert!(config.mi_to_exclude.is_empty());
}
