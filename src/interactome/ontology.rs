//! Ancestor and descendant closures of ontology terms.
//!
//! The [OntologyResolver] asks a [TermSource] (an ontology service or an
//! in-memory ontology) about each distinct term once and keeps the answers
//! for its lifetime.  The normalizing and deduplicating code only sees the
//! resulting flat sets, never the ontology graph.

use std::collections::{BTreeSet, HashMap};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::constants::MI_ROOT_TERMID;
use crate::data_types::OntologyTerm;
use crate::types::{TermId, TermName};

/// A term as reported by an ontology service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermInfo {
    pub termid: TermId,
    pub name: Option<TermName>,
    pub has_description: bool,
    pub is_obsolete: bool,
}

#[allow(async_fn_in_trait)]
pub trait TermSource {
    /// Return None if the ontology doesn't contain `termid`
    async fn fetch_term(&self, termid: &TermId) -> Result<Option<TermInfo>>;

    /// All ancestors of `termid`, not including the term
    async fn fetch_ancestors(&self, termid: &TermId) -> Result<Vec<TermInfo>>;

    /// All descendants of `termid`, not including the term
    async fn fetch_descendants(&self, termid: &TermId) -> Result<Vec<TermInfo>>;
}

pub type AncestorMap = HashMap<TermId, BTreeSet<TermId>>;

/// The ancestors of every non-obsolete term of a table.  Obsolete terms are
/// absent from `ancestors`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermAncestry {
    pub ancestors: AncestorMap,
    pub obsolete: BTreeSet<TermId>,
}

impl TermAncestry {
    pub fn is_usable(&self, termid: &str) -> bool {
        self.ancestors.contains_key(termid)
    }

    pub fn ancestors_of(&self, termid: &str) -> Option<&BTreeSet<TermId>> {
        self.ancestors.get(termid)
    }

    // true if `ancestor` is a strict ancestor of `termid`
    pub fn is_ancestor(&self, ancestor: &str, termid: &str) -> bool {
        self.ancestors.get(termid)
            .map(|ancestors| ancestors.contains(ancestor))
            .unwrap_or(false)
    }
}

pub struct OntologyResolver<S: TermSource> {
    source: S,
    terms: HashMap<TermId, OntologyTerm>,
    descendants: HashMap<TermId, BTreeSet<TermId>>,
}

impl<S: TermSource> OntologyResolver<S> {
    pub fn new(source: S) -> OntologyResolver<S> {
        OntologyResolver {
            source,
            terms: HashMap::new(),
            descendants: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn term(&mut self, termid: &TermId) -> Result<OntologyTerm> {
        if let Some(term) = self.terms.get(termid) {
            return Ok(term.clone());
        }

        let info = self.source.fetch_term(termid).await
            .with_context(|| format!("failed to look up {}", termid))?
            .ok_or_else(|| anyhow!("{} isn't in the ontology", termid))?;

        let ancestor_infos = self.source.fetch_ancestors(termid).await
            .with_context(|| format!("failed to fetch the ancestors of {}", termid))?;

        let has_obsolete_ancestor =
            ancestor_infos.iter().any(|ancestor| ancestor.is_obsolete);

        // obsolete terms lose their description
        let is_obsolete = info.is_obsolete || has_obsolete_ancestor ||
            (!info.has_description && termid.as_str() != MI_ROOT_TERMID);

        let ancestors = ancestor_infos.into_iter()
            .map(|ancestor| ancestor.termid)
            .filter(|ancestor_termid| ancestor_termid != termid)
            .collect::<BTreeSet<_>>();

        debug!("{} ({}): {} ancestors, obsolete: {}", termid,
               info.name.as_ref().map(|name| name.as_str()).unwrap_or("no name"),
               ancestors.len(), is_obsolete);

        let term = OntologyTerm {
            termid: termid.clone(),
            is_obsolete,
            ancestors,
        };

        self.terms.insert(termid.clone(), term.clone());

        Ok(term)
    }

    /// Fetch the ancestors of each distinct term.  Any failure to look up a
    /// term is an error since a partial ancestry would silently skip
    /// merges.
    pub async fn ancestors<'a>(&mut self, termids: impl IntoIterator<Item = &'a TermId>)
        -> Result<TermAncestry>
    {
        let distinct_termids: BTreeSet<&TermId> = termids.into_iter().collect();

        info!("fetching the ancestors of {} distinct terms", distinct_termids.len());

        let mut ancestry = TermAncestry::default();

        for termid in distinct_termids {
            let term = self.term(termid).await?;

            if term.is_obsolete {
                ancestry.obsolete.insert(term.termid);
            } else {
                ancestry.ancestors.insert(term.termid, term.ancestors);
            }
        }

        if !ancestry.obsolete.is_empty() {
            info!("obsolete terms: {}", itertools::join(&ancestry.obsolete, ", "));
        }

        Ok(ancestry)
    }

    /// Return the seed terms and all their descendants
    pub async fn descendants<'a>(&mut self, termids: impl IntoIterator<Item = &'a TermId>)
        -> Result<BTreeSet<TermId>>
    {
        let mut closure = BTreeSet::new();

        for termid in termids {
            if !self.descendants.contains_key(termid) {
                let descendant_infos = self.source.fetch_descendants(termid).await
                    .with_context(|| format!("failed to fetch the descendants of {}", termid))?;

                let descendants = descendant_infos.into_iter()
                    .map(|descendant| descendant.termid)
                    .collect::<BTreeSet<_>>();

                debug!("{}: {} descendants", termid, descendants.len());

                self.descendants.insert(termid.clone(), descendants);
            }

            closure.insert(termid.clone());

            if let Some(descendants) = self.descendants.get(termid) {
                closure.extend(descendants.iter().cloned());
            }
        }

        Ok(closure)
    }

    /// The verbatim exclusions plus the descendant closure of
    /// `exclude_with_descendants`
    pub async fn exclusion_set(&mut self, exclude_with_descendants: &[TermId],
                               exclude: &[TermId])
        -> Result<BTreeSet<TermId>>
    {
        let mut exclusions = self.descendants(exclude_with_descendants).await?;
        exclusions.extend(exclude.iter().cloned());

        info!("{} terms to exclude", exclusions.len());

        Ok(exclusions)
    }
}
