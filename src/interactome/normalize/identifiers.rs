use std::collections::HashMap;

use regex::Regex;

use crate::constants::*;
use crate::data_types::{DropReason, GeneIdentifierMapping, GeneMap};
use crate::types::{GeneName, ProteinId};
use crate::utils::{is_sentinel, split_field};

lazy_static! {
    // a whole UniProtKB accession, with an optional isoform suffix: "P04637-2"
    static ref UNIPROTKB_ACCESSION_RE: Regex =
        Regex::new(r"^(?:[OPQ][0-9][A-Z0-9]|[A-NR-Z][0-9][A-Z])[A-Z0-9]{2}[0-9](?:[A-Z][A-Z0-9]{2}[0-9])?(?:-[0-9]+)?$").unwrap();
}

pub fn is_uniprotkb_accession(value: &str) -> bool {
    UNIPROTKB_ACCESSION_RE.is_match(value)
}

/// True if `raw` is a protein ID we know how to resolve: a "uniprotkb:" or
/// "entrez gene/locuslink:" value, or an accession that is already bare
pub fn has_supported_namespace(raw: &str) -> bool {
    if is_sentinel(raw) {
        return false;
    }

    raw.contains(UNIPROTKB_PREFIX) || raw.contains(ENTREZ_GENE_PREFIX) ||
        (!raw.contains(':') && is_uniprotkb_accession(raw.trim()))
}

// the value of the first field containing `tag`, after the first ':' and
// before any qualifier in brackets:
//   "uniprotkb:cdc2(gene name)|uniprotkb:SPBC11B10.09(locus name)" -> "cdc2"
fn tagged_value<'r>(raw: &'r str, tag: &str) -> Option<&'r str> {
    let field = split_field(raw).find(|field| field.contains(tag))?;
    let after_namespace = field.split_once(':').map(|(_, rest)| rest).unwrap_or(field);
    let value = after_namespace.split('(').next()?.trim();

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// like tagged_value() but the value follows the prefix itself
fn prefixed_value<'r>(raw: &'r str, prefix: &str) -> Option<&'r str> {
    let field = split_field(raw).find(|field| field.contains(prefix))?;
    let (_, after_prefix) = field.split_once(prefix)?;
    let value = after_prefix.split('(').next()?.trim();

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Maps raw protein and gene tokens to UniProtKB accessions and gene
/// symbols using a [GeneMap]
pub struct IdentifierResolver<'a> {
    gene_map: &'a GeneMap,
    by_protein: HashMap<&'a str, &'a GeneIdentifierMapping>,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(gene_map: &'a GeneMap) -> IdentifierResolver<'a> {
        let mut by_protein = HashMap::new();

        for mapping in gene_map.values() {
            by_protein.entry(mapping.uniprotkb_id.as_str()).or_insert(mapping);
        }

        IdentifierResolver {
            gene_map,
            by_protein,
        }
    }

    /// Return the UniProtKB accession for a raw protein column value, or
    /// the reason the row can't be kept
    pub fn resolve_protein(&self, raw: &str) -> Result<ProteinId, DropReason> {
        if raw.contains(ENTREZ_GENE_PREFIX) {
            let gene_id = prefixed_value(raw, ENTREZ_GENE_PREFIX)
                .ok_or(DropReason::NoUniProtEquivalent)?;

            return self.gene_map.get(gene_id)
                .map(|mapping| mapping.uniprotkb_id.clone())
                .ok_or(DropReason::NoUniProtEquivalent);
        }

        let accession =
            if raw.contains(UNIPROTKB_PREFIX) {
                prefixed_value(raw, UNIPROTKB_PREFIX)
            } else if !raw.contains(':') {
                Some(raw.trim())
            } else {
                None
            };

        match accession {
            Some(accession) if is_uniprotkb_accession(accession) => Ok(accession.into()),
            _ => Err(DropReason::NoClearUniProtId),
        }
    }

    /// Find a gene symbol for a raw gene column value.  `protein` is the
    /// resolved accession of the same participant.  Returns None if there
    /// is no symbol.
    pub fn resolve_gene(&self, raw: &str, protein: &str) -> Option<GeneName> {
        if let Some(gene_name) = tagged_value(raw, GENE_NAME_TAG) {
            return Some(gene_name.into());
        }

        // a plain symbol, as given by BioGRID or by an earlier run
        if !is_sentinel(raw) && !raw.contains(':') {
            return Some(raw.trim().into());
        }

        if let Some(mapping) = self.by_protein.get(protein) {
            if !is_sentinel(&mapping.gene_name) {
                return Some(mapping.gene_name.clone());
            }
            if !is_sentinel(&mapping.ordered_locus_name) {
                return Some(mapping.ordered_locus_name.clone());
            }
        }

        prefixed_value(raw, HGNC_PREFIX).map(GeneName::from)
    }
}
