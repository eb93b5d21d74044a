//! Validation, identifier resolution and canonicalization of evidence rows.
//!
//! [Normalizer::normalize()] runs the filtering steps in a fixed order.
//! Every step records the rows it removes in a [DroppedSection], even when
//! it removes nothing, so the dropped rows table always has one section per
//! step.  Obsolete terms can only be pruned once the ancestry of the
//! remaining terms is known, which is done separately by
//! [prune_obsolete_terms()].

use std::collections::BTreeSet;

use flexstr::SharedStr as FlexStr;
use tracing::{info, warn};

use crate::constants::SENTINEL;
use crate::data_types::*;
use crate::ontology::TermAncestry;
use crate::types::TermId;
use crate::utils::{is_sentinel, term_fields, term_ids};

pub mod canonical;
pub mod identifiers;

use self::canonical::*;
use self::identifiers::{has_supported_namespace, IdentifierResolver};

/// The result of normalizing a table
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub rows: Vec<InteractionEvidence>,
    // in the order the filtering steps were applied
    pub dropped: Vec<DroppedSection>,
    // rows kept without a gene symbol for at least one participant
    pub unresolved_genes: Vec<InteractionEvidence>,
    pub reordered_count: usize,
}

impl NormalizeReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.iter().map(|section| section.rows.len()).sum()
    }
}

fn apply_filter(rows: Vec<InteractionEvidence>, reason: DropReason,
                dropped: &mut Vec<DroppedSection>,
                mut keep: impl FnMut(&InteractionEvidence) -> bool)
    -> Vec<InteractionEvidence>
{
    let (kept, removed): (Vec<_>, Vec<_>) = rows.into_iter().partition(|row| keep(row));

    let section = DroppedSection {
        reason,
        rows: removed,
    };
    info!("{}", section.header());
    dropped.push(section);

    kept
}

pub struct Normalizer<'a> {
    identifiers: IdentifierResolver<'a>,
    exclusions: &'a BTreeSet<TermId>,
    protein_only: bool,
}

impl<'a> Normalizer<'a> {
    /// `exclusions` is the closure expanded set of terms to remove, see
    /// [crate::ontology::OntologyResolver::exclusion_set()]
    pub fn new(gene_map: &'a GeneMap, exclusions: &'a BTreeSet<TermId>) -> Normalizer<'a> {
        Normalizer {
            identifiers: IdentifierResolver::new(gene_map),
            exclusions,
            protein_only: false,
        }
    }

    /// Drop extended rows unless both interactors are proteins
    pub fn protein_only(mut self, protein_only: bool) -> Normalizer<'a> {
        self.protein_only = protein_only;
        self
    }

    fn filter_pub_ids(&self, rows: Vec<InteractionEvidence>,
                      dropped: &mut Vec<DroppedSection>)
        -> Vec<InteractionEvidence>
    {
        let mut kept = vec![];
        let mut removed = vec![];

        for mut row in rows {
            match clean_pub_id(&row.pub_id) {
                Some(pub_id) => {
                    row.pub_id = pub_id;
                    kept.push(row);
                },
                None => removed.push(row),
            }
        }

        let section = DroppedSection {
            reason: DropReason::NoPubmedId,
            rows: removed,
        };
        info!("{}", section.header());
        dropped.push(section);

        kept
    }

    fn resolve_proteins(&self, rows: Vec<InteractionEvidence>,
                        dropped: &mut Vec<DroppedSection>)
        -> Vec<InteractionEvidence>
    {
        let mut kept = vec![];
        let mut no_equivalent = vec![];
        let mut no_clear_id = vec![];

        // a row is only removed once both participants have been looked at
        for mut row in rows {
            let first = self.identifiers.resolve_protein(&row.proteins.first);
            let second = self.identifiers.resolve_protein(&row.proteins.second);

            match (first, second) {
                (Ok(first), Ok(second)) => {
                    row.proteins = Paired::new(first, second);
                    kept.push(row);
                },
                (first, second) => {
                    let reason = [first.err(), second.err()].into_iter()
                        .flatten()
                        .min()
                        .unwrap_or(DropReason::NoClearUniProtId);
                    if reason == DropReason::NoUniProtEquivalent {
                        no_equivalent.push(row);
                    } else {
                        no_clear_id.push(row);
                    }
                },
            }
        }

        for (reason, removed) in [(DropReason::NoUniProtEquivalent, no_equivalent),
                                  (DropReason::NoClearUniProtId, no_clear_id)] {
            let section = DroppedSection {
                reason,
                rows: removed,
            };
            info!("{}", section.header());
            dropped.push(section);
        }

        kept
    }

    // returns false if a participant is left without a gene symbol
    fn resolve_genes(&self, row: &mut InteractionEvidence) -> bool {
        let mut all_resolved = true;

        let resolved =
            [self.identifiers.resolve_gene(&row.genes.first, &row.proteins.first),
             self.identifiers.resolve_gene(&row.genes.second, &row.proteins.second)];

        for (gene, resolved_gene) in row.genes.both_mut().into_iter().zip(resolved) {
            match resolved_gene {
                Some(gene_name) => *gene = gene_name,
                None => {
                    *gene = FlexStr::from(SENTINEL);
                    all_resolved = false;
                },
            }
        }

        all_resolved
    }

    pub fn normalize(&self, rows: Vec<InteractionEvidence>) -> NormalizeReport {
        info!("initial number of experimental evidences: {}", rows.len());

        let mut dropped = vec![];

        let rows = self.filter_pub_ids(rows, &mut dropped);

        let rows =
            if self.protein_only {
                apply_filter(rows, DropReason::NotProtein, &mut dropped, |row| {
                    match row.extended {
                        Some(ref extended) => {
                            let types = &extended.participants.interactor_types;
                            is_protein_interactor(&types.first) &&
                                is_protein_interactor(&types.second)
                        },
                        None => true,
                    }
                })
            } else {
                rows
            };

        let rows = apply_filter(rows, DropReason::NoProteinId, &mut dropped, |row| {
            has_supported_namespace(&row.proteins.first) &&
                has_supported_namespace(&row.proteins.second)
        });

        let rows = apply_filter(rows, DropReason::NoIdm, &mut dropped, |row| {
            !term_ids(&row.idm).is_empty()
        });

        let rows = apply_filter(rows, DropReason::NoInteractionId, &mut dropped, |row| {
            !is_sentinel(&row.interaction_identifiers)
        });

        let mut rows = apply_filter(rows, DropReason::ExcludedIdm, &mut dropped, |row| {
            !term_ids(&row.idm).iter().any(|termid| self.exclusions.contains(termid))
        });

        for row in rows.iter_mut() {
            canonicalize_columns(row);
        }

        let mut rows = self.resolve_proteins(rows, &mut dropped);

        let mut unresolved_genes = vec![];
        let mut reordered_count = 0;

        for row in rows.iter_mut() {
            let all_resolved = self.resolve_genes(row);

            if canonical_order(row) {
                reordered_count += 1;
            }

            if !all_resolved && !row.is_from_biogrid() {
                unresolved_genes.push(row.clone());
            }
        }

        if !unresolved_genes.is_empty() {
            warn!("number of experimental evidences that do not contain a clear gene name: {} \
                   (kept in the main table)", unresolved_genes.len());
        }

        info!("{} experimental evidences reordered so that prot1 <= prot2", reordered_count);
        info!("number of experimental evidences after normalization: {}", rows.len());

        NormalizeReport {
            rows,
            dropped,
            unresolved_genes,
            reordered_count,
        }
    }
}

/// Normalize `rows` with the given gene map and expanded exclusion set
pub fn normalize(rows: Vec<InteractionEvidence>, gene_map: &GeneMap,
                 exclusions: &BTreeSet<TermId>)
    -> NormalizeReport
{
    Normalizer::new(gene_map, exclusions).normalize(rows)
}

/// All term IDs used in the `idm` column of the rows
pub fn table_term_ids(rows: &[InteractionEvidence]) -> BTreeSet<TermId> {
    rows.iter()
        .flat_map(|row| term_ids(&row.idm))
        .collect()
}

// the first field of `idm` with a usable term
fn usable_idm(idm: &str, ancestry: &TermAncestry) -> Option<FlexStr> {
    term_fields(idm).into_iter()
        .find(|(_, termid)| ancestry.is_usable(termid))
        .map(|(field, _)| FlexStr::from(field))
}

/// Keep only the first usable term of each `idm` field.  Rows that only
/// have obsolete terms are removed.
pub fn prune_obsolete_terms(rows: Vec<InteractionEvidence>, ancestry: &TermAncestry)
    -> (Vec<InteractionEvidence>, DroppedSection)
{
    let mut kept = vec![];
    let mut removed = vec![];

    for mut row in rows {
        match usable_idm(&row.idm, ancestry) {
            Some(field) => {
                row.idm = field;
                kept.push(row);
            },
            None => removed.push(row),
        }
    }

    let section = DroppedSection {
        reason: DropReason::OnlyObsoleteIdms,
        rows: removed,
    };
    info!("{}", section.header());

    (kept, section)
}

/// The rows that [prune_obsolete_terms()] keeps, pruned the same way
pub fn retain_usable_terms(rows: Vec<InteractionEvidence>, ancestry: &TermAncestry)
    -> Vec<InteractionEvidence>
{
    rows.into_iter()
        .filter_map(|mut row| {
            row.idm = usable_idm(&row.idm, ancestry)?;
            Some(row)
        })
        .collect()
}
