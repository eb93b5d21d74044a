use flexstr::SharedStr as FlexStr;
use regex::Regex;

use crate::constants::*;
use crate::data_types::InteractionEvidence;
use crate::types::PublicationId;
use crate::utils::{is_sentinel, split_field};

lazy_static! {
    // DOI-like values such as "pubmed:10.1073/pnas.0400" don't match
    static ref PUBMED_ID_RE: Regex = Regex::new(r"^pubmed:\d+$").unwrap();
}

/// Return the first well formed PubMed ID of a publication field
pub fn clean_pub_id(pub_id: &str) -> Option<PublicationId> {
    split_field(pub_id)
        .find(|field| PUBMED_ID_RE.is_match(field))
        .map(PublicationId::from)
}

fn sentinel_if_empty(value: &str) -> FlexStr {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        FlexStr::from(SENTINEL)
    } else {
        FlexStr::from(trimmed)
    }
}

// "taxid:4932(yeast)|taxid:4932(Saccharomyces cerevisiae)" -> "taxid:4932"
// but "taxid:-1(in vitro)|taxid:-1(in vitro)" -> "taxid:-1(in vitro)"
pub fn clean_taxon(value: &str) -> FlexStr {
    let first_part =
        if NEGATIVE_TAXON_CODES.iter().any(|code| value.contains(code)) {
            value.split(FIELD_DELIMITER).next()
        } else {
            value.split('(').next()
        };

    sentinel_if_empty(first_part.unwrap_or(SENTINEL))
}

pub fn remap_unspecified_role(value: &FlexStr) -> FlexStr {
    if value.as_str() == UNSPECIFIED_ROLE_FROM {
        FlexStr::from(UNSPECIFIED_ROLE_TO)
    } else {
        value.clone()
    }
}

// 'psi-mi:"MI:0463"(BioGRID)' -> 'psi-mi:"MI:0463"(biogrid)'
pub fn clean_source_database(value: &str) -> FlexStr {
    if is_sentinel(value) {
        return FlexStr::from(SENTINEL);
    }

    let parts = split_field(value)
        .map(|part| {
            match part.split_once('(') {
                Some((prefix, qualifier)) => format!("{}({}", prefix, qualifier.to_lowercase()),
                None => part.to_owned(),
            }
        })
        .collect::<Vec<_>>();

    parts.join("|").into()
}

pub fn is_protein_interactor(interactor_type: &str) -> bool {
    interactor_type.contains(MI_PROTEIN_TERMID)
}

/// Clean the organism, role and source database columns in place
pub fn canonicalize_columns(row: &mut InteractionEvidence) {
    for species in row.species.both_mut() {
        *species = clean_taxon(species.as_str());
    }

    row.source_databases = clean_source_database(&row.source_databases);

    if let Some(ref mut extended) = row.extended {
        extended.taxid_host = clean_taxon(&extended.taxid_host);

        let participants = &mut extended.participants;
        for roles in [&mut participants.biological_roles, &mut participants.experimental_roles] {
            for role in roles.both_mut() {
                *role = remap_unspecified_role(role);
            }
        }
    }
}

/// Put the row in canonical order so that prot1 <= prot2.  Returns true if
/// the participants were swapped.
pub fn canonical_order(row: &mut InteractionEvidence) -> bool {
    if row.prot1() > row.prot2() {
        row.swap_participants();
        true
    } else {
        false
    }
}
