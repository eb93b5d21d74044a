//! Removal of explicit and implicit redundancies.
//!
//! Explicit duplicates share the proteins, the detection method term and
//! the publication.  Implicit duplicates share the proteins and the
//! publication, and the term of one is an ancestor of the term of the
//! other, eg. "two hybrid" (MI:0018) and its ancestor "transcriptional
//! complementation assay" (MI:0232).  Implicit duplicates are clustered with a
//! union-find so that chains like A ancestor of B ancestor of C end in one
//! row whatever order the pairs are visited in.

use std::collections::BTreeMap;

use flexstr::SharedStr as FlexStr;
use tracing::{debug, info};

use crate::constants::{ET_AL, SENTINEL};
use crate::data_types::*;
use crate::ontology::AncestorMap;
use crate::types::{PublicationId, TermId};
use crate::union_find::UnionFind;
use crate::utils::{first_term_id, is_sentinel, split_field, union_without_repetition};

type ExplicitKey = (FlexStr, FlexStr, TermId, PublicationId);
type ImplicitKey = (FlexStr, FlexStr, PublicationId);

/// The final table and the total number of rows merged away at each stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub rows: Vec<DeduplicatedEvidence>,
    pub explicit_count: usize,
    pub implicit_count: usize,
}

fn merge_values<'r, T>(items: &[&'r T], get: impl Fn(&'r T) -> &'r FlexStr) -> FlexStr {
    union_without_repetition(items.iter().map(|item| get(*item).as_str()))
}

fn merge_pairs<'r, T>(items: &[&'r T], get: impl Fn(&'r T) -> &'r Paired<FlexStr>)
    -> Paired<FlexStr>
{
    Paired::new(union_without_repetition(items.iter().map(|item| get(*item).first.as_str())),
                union_without_repetition(items.iter().map(|item| get(*item).second.as_str())))
}

fn merge_extended(items: &[&ExtendedDetails]) -> ExtendedDetails {
    ExtendedDetails {
        participants: ParticipantDetails {
            biological_roles: merge_pairs(items, |ext| &ext.participants.biological_roles),
            experimental_roles: merge_pairs(items, |ext| &ext.participants.experimental_roles),
            interactor_types: merge_pairs(items, |ext| &ext.participants.interactor_types),
            participant_id_methods:
                merge_pairs(items, |ext| &ext.participants.participant_id_methods),
        },
        taxid_host: merge_values(items, |ext| &ext.taxid_host),
        biogrid_experimental_system: merge_values(items, |ext| &ext.biogrid_experimental_system),
        biogrid_description: merge_values(items, |ext| &ext.biogrid_description),
        biogrid_type: merge_values(items, |ext| &ext.biogrid_type),
        throughput: merge_values(items, |ext| &ext.throughput),
    }
}

/// Merge rows into one, field by field, keeping every distinct value once
pub fn merge_rows(rows: &[&InteractionEvidence]) -> InteractionEvidence {
    let extended_details = rows.iter()
        .filter_map(|row| row.extended.as_ref())
        .collect::<Vec<_>>();

    let extended =
        if extended_details.is_empty() {
            None
        } else {
            Some(merge_extended(&extended_details))
        };

    InteractionEvidence {
        proteins: merge_pairs(rows, |row| &row.proteins),
        genes: merge_pairs(rows, |row| &row.genes),
        idm: merge_values(rows, |row| &row.idm),
        authors: merge_values(rows, |row| &row.authors),
        pub_id: merge_values(rows, |row| &row.pub_id),
        species: merge_pairs(rows, |row| &row.species),
        interaction_type: merge_values(rows, |row| &row.interaction_type),
        source_databases: merge_values(rows, |row| &row.source_databases),
        interaction_identifiers: merge_values(rows, |row| &row.interaction_identifiers),
        confidence_score: merge_values(rows, |row| &row.confidence_score),
        service_name: merge_values(rows, |row| &row.service_name),
        extended,
    }
}

/// Choose one author value from a merged authors field: prefer one with
/// "et al.", then one with a space (a full name), then anything that isn't
/// the sentinel
pub fn clean_authors(authors: &str) -> FlexStr {
    let values = split_field(authors)
        .filter(|value| !is_sentinel(value))
        .collect::<Vec<_>>();

    values.iter().find(|value| value.contains(ET_AL))
        .or_else(|| values.iter().find(|value| value.contains(' ')))
        .or_else(|| values.first())
        .map(|value| FlexStr::from(*value))
        .unwrap_or_else(|| FlexStr::from(SENTINEL))
}

/// Collapse rows with the same proteins, term and publication
pub fn merge_explicit_duplicates(rows: Vec<InteractionEvidence>) -> Vec<DeduplicatedEvidence> {
    let mut groups: BTreeMap<ExplicitKey, Vec<InteractionEvidence>> = BTreeMap::new();

    for row in rows {
        let key = (row.proteins.first.clone(), row.proteins.second.clone(),
                   row.idm.clone(), row.pub_id.clone());
        groups.entry(key).or_default().push(row);
    }

    groups.into_values()
        .map(|mut group| {
            let explicit_count = group.len() - 1;
            let evidence =
                if group.len() == 1 {
                    group.swap_remove(0)
                } else {
                    merge_rows(&group.iter().collect::<Vec<_>>())
                };

            DeduplicatedEvidence {
                evidence,
                explicit_count,
                implicit_count: 0,
            }
        })
        .collect()
}

// true if the term of `general` is an ancestor of the term of `specific`
// and their publications overlap
fn is_implicit_duplicate(general: &InteractionEvidence, general_term: Option<&TermId>,
                         specific: &InteractionEvidence, specific_term: Option<&TermId>,
                         ancestors: &AncestorMap)
    -> bool
{
    let (Some(general_term), Some(specific_term)) = (general_term, specific_term) else {
        return false;
    };

    let general_pub = general.pub_id.as_str();
    let specific_pub = specific.pub_id.as_str();

    if !general_pub.contains(specific_pub) && !specific_pub.contains(general_pub) {
        return false;
    }

    ancestors.get(specific_term)
        .map(|specific_ancestors| specific_ancestors.contains(general_term))
        .unwrap_or(false)
}

fn cluster_group(group: Vec<DeduplicatedEvidence>, ancestors: &AncestorMap)
    -> Vec<DeduplicatedEvidence>
{
    let terms = group.iter()
        .map(|row| first_term_id(&row.evidence.idm))
        .collect::<Vec<_>>();

    let mut clusters = UnionFind::new(group.len());

    for i in 0..group.len() {
        for j in 0..group.len() {
            if i == j {
                continue;
            }

            if is_implicit_duplicate(&group[i].evidence, terms[i].as_ref(),
                                     &group[j].evidence, terms[j].as_ref(),
                                     ancestors) {
                if !clusters.is_singleton(i) && !clusters.is_singleton(j) &&
                    clusters.find(i) != clusters.find(j) {
                    debug!("joining the clusters of {} and {}",
                           group[i].evidence.interaction_identifiers,
                           group[j].evidence.interaction_identifiers);
                }
                clusters.union(i, j);
            }
        }
    }

    clusters.sets().into_iter()
        .map(|members| {
            let member_rows = members.iter()
                .map(|&index| &group[index])
                .collect::<Vec<_>>();

            let mut evidence =
                if let [row] = member_rows.as_slice() {
                    row.evidence.clone()
                } else {
                    merge_rows(&member_rows.iter().map(|row| &row.evidence).collect::<Vec<_>>())
                };
            evidence.authors = clean_authors(&evidence.authors);

            DeduplicatedEvidence {
                evidence,
                explicit_count: member_rows.iter().map(|row| row.explicit_count).sum(),
                implicit_count: member_rows.len() - 1,
            }
        })
        .collect()
}

/// Collapse explicitly merged rows with the same proteins and publication
/// whose terms are related by ancestry
pub fn merge_implicit_duplicates(rows: Vec<DeduplicatedEvidence>, ancestors: &AncestorMap)
    -> Vec<DeduplicatedEvidence>
{
    let mut groups: BTreeMap<ImplicitKey, Vec<DeduplicatedEvidence>> = BTreeMap::new();

    for row in rows {
        let evidence = &row.evidence;
        let key = (evidence.proteins.first.clone(), evidence.proteins.second.clone(),
                   evidence.pub_id.clone());
        groups.entry(key).or_default().push(row);
    }

    groups.into_values()
        .flat_map(|group| cluster_group(group, ancestors))
        .collect()
}

/// Remove explicit then implicit redundancies from a normalized table
pub fn deduplicate(rows: Vec<InteractionEvidence>, ancestors: &AncestorMap) -> DedupReport {
    info!("initial number of experimental evidences: {}", rows.len());

    let explicitly_merged = merge_explicit_duplicates(rows);
    let explicit_count: usize = explicitly_merged.iter().map(|row| row.explicit_count).sum();

    info!("number of explicit redundancies: {}", explicit_count);

    let rows = merge_implicit_duplicates(explicitly_merged, ancestors);
    let implicit_count: usize = rows.iter().map(|row| row.implicit_count).sum();

    info!("number of implicit redundancies: {}", implicit_count);
    info!("final number of experimental evidences, without any redundancies: {}", rows.len());

    DedupReport {
        rows,
        explicit_count,
        implicit_count,
    }
}
