use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use crate::ontology::{TermInfo, TermSource};
use crate::types::{TermId, TermName};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GraphTerm {
    #[serde(default)]
    pub name: Option<TermName>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_obsolete: bool,
    // is_a and part_of parents
    #[serde(default)]
    pub parents: Vec<TermId>,
}

/// An ontology held in memory, read from a JSON map of term ID to
/// [GraphTerm].  Used instead of the ontology service for offline runs.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct OntologyGraph {
    terms: BTreeMap<TermId, GraphTerm>,
}

impl OntologyGraph {
    pub fn new() -> OntologyGraph {
        OntologyGraph::default()
    }

    pub fn read(file_name: &str) -> Result<OntologyGraph> {
        let file = File::open(file_name)
            .with_context(|| format!("failed to read {}", file_name))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", file_name))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn insert(&mut self, termid: &str, term: GraphTerm) {
        self.terms.insert(termid.into(), term);
    }

    pub fn add_term(&mut self, termid: &str, name: &str, parents: &[&str]) {
        self.insert(termid, GraphTerm {
            name: Some(name.into()),
            description: Some(format!("{} ({})", name, termid)),
            is_obsolete: false,
            parents: parents.iter().map(|parent| TermId::from(*parent)).collect(),
        });
    }

    pub fn add_obsolete_term(&mut self, termid: &str, name: &str) {
        self.insert(termid, GraphTerm {
            name: Some(name.into()),
            description: None,
            is_obsolete: true,
            parents: vec![],
        });
    }

    fn info(&self, termid: &str) -> Option<TermInfo> {
        let (termid, term) = self.terms.get_key_value(termid)?;

        Some(TermInfo {
            termid: termid.clone(),
            name: term.name.clone(),
            has_description: term.description.as_ref()
                .map(|description| !description.trim().is_empty())
                .unwrap_or(false),
            is_obsolete: term.is_obsolete,
        })
    }

    pub fn ancestor_ids(&self, termid: &str) -> BTreeSet<TermId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&TermId> = vec![];

        if let Some(term) = self.terms.get(termid) {
            stack.extend(term.parents.iter());
        }

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(term) = self.terms.get(current) {
                stack.extend(term.parents.iter());
            }
        }

        seen
    }

    pub fn descendant_ids(&self, termid: &str) -> BTreeSet<TermId> {
        let mut children: HashMap<&TermId, Vec<&TermId>> = HashMap::new();

        for (child_termid, term) in &self.terms {
            for parent in &term.parents {
                children.entry(parent).or_default().push(child_termid);
            }
        }

        let mut seen = BTreeSet::new();
        let mut stack: Vec<&TermId> = vec![];

        if let Some(direct_children) = children.get(&TermId::from(termid)) {
            stack.extend(direct_children.iter().copied());
        }

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(direct_children) = children.get(current) {
                stack.extend(direct_children.iter().copied());
            }
        }

        seen
    }
}

impl TermSource for OntologyGraph {
    async fn fetch_term(&self, termid: &TermId) -> Result<Option<TermInfo>> {
        Ok(self.info(termid))
    }

    async fn fetch_ancestors(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        Ok(self.ancestor_ids(termid).iter()
           .filter_map(|ancestor_termid| self.info(ancestor_termid))
           .collect())
    }

    async fn fetch_descendants(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        Ok(self.descendant_ids(termid).iter()
           .filter_map(|descendant_termid| self.info(descendant_termid))
           .collect())
    }
}
