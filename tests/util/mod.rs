use std::cell::Cell;

use anyhow::Result;
use flexstr::SharedStr as FlexStr;

use interactome::data_types::*;
use interactome::ontology::{TermInfo, TermSource};
use interactome::ontology_graph::{GraphTerm, OntologyGraph};
use interactome::types::TermId;

fn flex(value: &str) -> FlexStr {
    FlexStr::from(value)
}

// a raw tab25 row between two UniProtKB proteins, as it comes from PSICQUIC
#[allow(dead_code)]
pub fn raw_row(prot1: &str, prot2: &str, idm: &str, pub_id: &str) -> InteractionEvidence {
    InteractionEvidence {
        proteins: Paired::new(flex(&format!("uniprotkb:{}", prot1)),
                              flex(&format!("uniprotkb:{}", prot2))),
        genes: Paired::new(flex(&format!("uniprotkb:gene_{}(gene name)", prot1.to_lowercase())),
                           flex(&format!("uniprotkb:gene_{}(gene name)", prot2.to_lowercase()))),
        idm: flex(&format!(r#"psi-mi:"{}"(method)"#, idm)),
        authors: flex("Smith et al. (2001)"),
        pub_id: flex(pub_id),
        species: Paired::new(flex("taxid:4896(schpo)|taxid:4896(Schizosaccharomyces pombe)"),
                             flex("taxid:4932(yeast)")),
        interaction_type: flex(r#"psi-mi:"MI:0915"(physical association)"#),
        source_databases: flex(r#"psi-mi:"MI:0469"(IntAct)"#),
        interaction_identifiers: flex(&format!("intact:EBI-{}-{}", prot1, prot2)),
        confidence_score: flex("intact-miscore:0.56"),
        service_name: flex("IntAct"),
        extended: None,
    }
}

// a raw tab27 row, like raw_row() with the participant details filled
#[allow(dead_code)]
pub fn raw_extended_row(prot1: &str, prot2: &str, idm: &str, pub_id: &str)
    -> InteractionEvidence
{
    let mut row = raw_row(prot1, prot2, idm, pub_id);

    row.extended = Some(ExtendedDetails {
        participants: ParticipantDetails {
            biological_roles: Paired::new(flex(r#"psi-mi:"MI:0000"(unspecified)"#),
                                          flex(r#"psi-mi:"MI:0501"(enzyme)"#)),
            experimental_roles: Paired::new(flex(r#"psi-mi:"MI:0496"(bait)"#),
                                            flex(r#"psi-mi:"MI:0498"(prey)"#)),
            interactor_types: Paired::new(flex(r#"psi-mi:"MI:0326"(protein)"#),
                                          flex(r#"psi-mi:"MI:0326"(protein)"#)),
            participant_id_methods: Paired::new(flex(r#"psi-mi:"MI:0102"(sequence tag)"#),
                                                flex(r#"psi-mi:"MI:0078"(nucleotide)"#)),
        },
        taxid_host: flex("taxid:4932(yeast)"),
        biogrid_experimental_system: flex("-"),
        biogrid_description: flex("-"),
        biogrid_type: flex("-"),
        throughput: flex("-"),
    });

    row
}

// a row as the normalizer returns it, ready for deduplication
#[allow(dead_code)]
pub fn clean_row(prot1: &str, prot2: &str, idm: &str, pub_id: &str) -> InteractionEvidence {
    let mut row = raw_row(prot1, prot2, idm, pub_id);
    row.proteins = Paired::new(flex(prot1), flex(prot2));
    row.genes = Paired::new(flex(&format!("gene_{}", prot1.to_lowercase())),
                            flex(&format!("gene_{}", prot2.to_lowercase())));
    row.idm = flex(idm);
    row.species = Paired::new(flex("taxid:4896"), flex("taxid:4932"));
    row.source_databases = flex(r#"psi-mi:"MI:0469"(intact)"#);
    row
}

#[allow(dead_code)]
pub fn gene_mapping(uniprotkb_id: &str, gene_name: &str, ordered_locus_name: &str)
    -> GeneIdentifierMapping
{
    GeneIdentifierMapping {
        uniprotkb_id: flex(uniprotkb_id),
        gene_name: flex(gene_name),
        ordered_locus_name: flex(ordered_locus_name),
    }
}

#[allow(dead_code)]
pub fn test_gene_map() -> GeneMap {
    let mut gene_map = GeneMap::new();
    gene_map.insert(flex("2539869"), gene_mapping("P04551", "cdc2", "SPBC11B10.09"));
    gene_map.insert(flex("853212"), gene_mapping("P00546", "-", "YBR160W"));
    gene_map
}

//   MI:0000 molecular interaction
//     MI:0001 interaction detection method
//       MI:0045 experimental interaction detection
//         MI:0232 transcriptional complementation assay
//           MI:0018 two hybrid
//             MI:0397 two hybrid array
//         MI:0004 affinity chromatography technology
//         MI:0777 no description, so obsolete
//       MI:0063 interaction prediction
//         MI:0064 interologs mapping
//           MI:0085 phylogenetic profile
//   MI:0999 obsolete
//     MI:0998 under an obsolete term
#[allow(dead_code)]
pub fn test_ontology() -> OntologyGraph {
    let mut graph = OntologyGraph::new();

    graph.add_term("MI:0000", "molecular interaction", &[]);
    graph.add_term("MI:0001", "interaction detection method", &["MI:0000"]);
    graph.add_term("MI:0045", "experimental interaction detection", &["MI:0001"]);
    graph.add_term("MI:0232", "transcriptional complementation assay", &["MI:0045"]);
    graph.add_term("MI:0018", "two hybrid", &["MI:0232"]);
    graph.add_term("MI:0397", "two hybrid array", &["MI:0018"]);
    graph.add_term("MI:0004", "affinity chromatography technology", &["MI:0045"]);
    graph.add_term("MI:0063", "interaction prediction", &["MI:0001"]);
    graph.add_term("MI:0064", "interologs mapping", &["MI:0063"]);
    graph.add_term("MI:0085", "phylogenetic profile", &["MI:0064"]);
    graph.insert("MI:0777", GraphTerm {
        name: Some(flex("undescribed method")),
        description: None,
        is_obsolete: false,
        parents: vec![flex("MI:0045")],
    });
    graph.add_obsolete_term("MI:0999", "obsolete method");
    graph.add_term("MI:0998", "method under an obsolete term", &["MI:0999"]);

    graph
}

/// Counts the calls made to the wrapped source
#[allow(dead_code)]
pub struct CountingSource<S: TermSource> {
    pub source: S,
    pub term_calls: Cell<usize>,
    pub descendant_calls: Cell<usize>,
}

#[allow(dead_code)]
impl<S: TermSource> CountingSource<S> {
    pub fn new(source: S) -> CountingSource<S> {
        CountingSource {
            source,
            term_calls: Cell::new(0),
            descendant_calls: Cell::new(0),
        }
    }
}

impl<S: TermSource> TermSource for CountingSource<S> {
    async fn fetch_term(&self, termid: &TermId) -> Result<Option<TermInfo>> {
        self.term_calls.set(self.term_calls.get() + 1);
        self.source.fetch_term(termid).await
    }

    async fn fetch_ancestors(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        self.source.fetch_ancestors(termid).await
    }

    async fn fetch_descendants(&self, termid: &TermId) -> Result<Vec<TermInfo>> {
        self.descendant_calls.set(self.descendant_calls.get() + 1);
        self.source.fetch_descendants(termid).await
    }
}
