use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use anyhow::bail;
use flexstr::SharedStr as FlexStr;

use crate::constants::*;
use crate::types::*;

pub const TAB25_HEADERS: [&str; 14] =
    ["prot1", "prot2", "gene1", "gene2", "idm", "authors", "pub_id", "species1",
     "species2", "interaction_type", "source_databases", "interaction_identifiers",
     "confidence_score", "service_name"];

pub const TAB27_HEADERS: [&str; 27] =
    ["prot1", "prot2", "gene1", "gene2", "idm", "authors", "pub_id", "species1",
     "species2", "interaction_type", "source_databases", "interaction_identifiers",
     "confidence_score", "biological_role1", "biological_role2", "exp_role1",
     "exp_role2", "interactor_type1", "interactor_type2", "taxid_host",
     "participant_id_method1", "participant_id_method2", "service_name",
     "biogrid_experimental_system", "biogrid_description", "biogrid_type",
     "throughput"];

/// The column layout of an evidence table
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RecordFormat {
    #[serde(rename = "tab25")]
    Tab25,
    #[serde(rename = "tab27")]
    #[default]
    Tab27,
}

impl RecordFormat {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            RecordFormat::Tab25 => &TAB25_HEADERS,
            RecordFormat::Tab27 => &TAB27_HEADERS,
        }
    }
}

impl FromStr for RecordFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "tab25" => Ok(RecordFormat::Tab25),
            "tab27" => Ok(RecordFormat::Tab27),
            _ => bail!(r#"unknown table format "{}", use "tab25" or "tab27""#, s),
        }
    }
}

impl Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Tab25 => write!(f, "tab25"),
            RecordFormat::Tab27 => write!(f, "tab27"),
        }
    }
}

/// Two values describing the first and second participant of an
/// interaction.  They are always swapped together with the proteins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Paired<T> {
    pub first: T,
    pub second: T,
}

impl<T> Paired<T> {
    pub fn new(first: T, second: T) -> Paired<T> {
        Paired {
            first,
            second,
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
    }

    pub fn both_mut(&mut self) -> [&mut T; 2] {
        [&mut self.first, &mut self.second]
    }
}

// the paired columns of the extended (tab27) layout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantDetails {
    pub biological_roles: Paired<FlexStr>,
    pub experimental_roles: Paired<FlexStr>,
    pub interactor_types: Paired<FlexStr>,
    pub participant_id_methods: Paired<FlexStr>,
}

impl ParticipantDetails {
    pub fn swap(&mut self) {
        self.biological_roles.swap();
        self.experimental_roles.swap();
        self.interactor_types.swap();
        self.participant_id_methods.swap();
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedDetails {
    pub participants: ParticipantDetails,
    pub taxid_host: FlexStr,
    // these four are only filled for rows from BioGRID
    pub biogrid_experimental_system: FlexStr,
    pub biogrid_description: FlexStr,
    pub biogrid_type: FlexStr,
    pub throughput: FlexStr,
}

/// One reported interaction between two proteins, from one publication
/// and one detection method.  Rows in the extended layout carry the
/// `extended` details.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InteractionEvidence {
    pub proteins: Paired<FlexStr>,
    pub genes: Paired<FlexStr>,
    pub idm: FlexStr,
    pub authors: FlexStr,
    pub pub_id: PublicationId,
    pub species: Paired<FlexStr>,
    pub interaction_type: FlexStr,
    pub source_databases: FlexStr,
    pub interaction_identifiers: InteractionIdentifier,
    pub confidence_score: FlexStr,
    pub service_name: FlexStr,
    pub extended: Option<ExtendedDetails>,
}

impl InteractionEvidence {
    pub fn format(&self) -> RecordFormat {
        if self.extended.is_some() {
            RecordFormat::Tab27
        } else {
            RecordFormat::Tab25
        }
    }

    pub fn prot1(&self) -> &str {
        self.proteins.first.as_str()
    }

    pub fn prot2(&self) -> &str {
        self.proteins.second.as_str()
    }

    pub fn is_canonically_ordered(&self) -> bool {
        self.prot1() <= self.prot2()
    }

    pub fn is_from_biogrid(&self) -> bool {
        self.service_name.as_str() == BIOGRID_SERVICE_NAME
    }

    /// Swap every participant specific column so that the first protein
    /// becomes the second.
    pub fn swap_participants(&mut self) {
        self.proteins.swap();
        self.genes.swap();
        self.species.swap();
        if let Some(ref mut extended) = self.extended {
            extended.participants.swap();
        }
    }

    /// The values in the column order of `self.format().headers()`
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.proteins.first.as_str(), self.proteins.second.as_str(),
            self.genes.first.as_str(), self.genes.second.as_str(),
            self.idm.as_str(), self.authors.as_str(), self.pub_id.as_str(),
            self.species.first.as_str(), self.species.second.as_str(),
            self.interaction_type.as_str(), self.source_databases.as_str(),
            self.interaction_identifiers.as_str(), self.confidence_score.as_str(),
        ];

        if let Some(ref extended) = self.extended {
            let participants = &extended.participants;
            fields.extend([
                participants.biological_roles.first.as_str(),
                participants.biological_roles.second.as_str(),
                participants.experimental_roles.first.as_str(),
                participants.experimental_roles.second.as_str(),
                participants.interactor_types.first.as_str(),
                participants.interactor_types.second.as_str(),
                extended.taxid_host.as_str(),
                participants.participant_id_methods.first.as_str(),
                participants.participant_id_methods.second.as_str(),
                self.service_name.as_str(),
                extended.biogrid_experimental_system.as_str(),
                extended.biogrid_description.as_str(),
                extended.biogrid_type.as_str(),
                extended.throughput.as_str(),
            ]);
        } else {
            fields.push(self.service_name.as_str());
        }

        fields
    }
}

/// A row of the final table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeduplicatedEvidence {
    pub evidence: InteractionEvidence,
    // rows with the same proteins, term and publication merged into this one
    pub explicit_count: usize,
    // rows with an ancestor or descendant term merged into this one
    pub implicit_count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneIdentifierMapping {
    pub uniprotkb_id: ProteinId,
    pub gene_name: GeneName,
    pub ordered_locus_name: GeneName,
}

// merged across all organisms of a run
pub type GeneMap = BTreeMap<GeneId, GeneIdentifierMapping>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OntologyTerm {
    pub termid: TermId,
    pub is_obsolete: bool,
    pub ancestors: BTreeSet<TermId>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    NoPubmedId,
    NotProtein,
    NoProteinId,
    NoIdm,
    NoInteractionId,
    ExcludedIdm,
    NoUniProtEquivalent,
    NoClearUniProtId,
    OnlyObsoleteIdms,
}

impl DropReason {
    pub fn description(&self) -> &'static str {
        match self {
            DropReason::NoPubmedId => "that do not have a pubmed id",
            DropReason::NotProtein => "fetched from psicquic that are not a protein",
            DropReason::NoProteinId =>
                "that do not have a uniprotkb or entrez gene protein id",
            DropReason::NoIdm => "that do not have an idm",
            DropReason::NoInteractionId => "that do not have an interaction id",
            DropReason::ExcludedIdm => "that have an idm to exclude",
            DropReason::NoUniProtEquivalent =>
                "that do not contain a uniprotkb equivalency to their entrez gene protein id",
            DropReason::NoClearUniProtId => "that do not contain a clear uniprotkb id",
            DropReason::OnlyObsoleteIdms => "that have only obsolete idms",
        }
    }

    pub fn header(&self, count: usize) -> String {
        format!("{} {}: {}", DROPPED_HEADER_PREFIX, self.description(), count)
    }
}

impl Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// The rows removed by one filtering step
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DroppedSection {
    pub reason: DropReason,
    pub rows: Vec<InteractionEvidence>,
}

impl DroppedSection {
    pub fn header(&self) -> String {
        self.reason.header(self.rows.len())
    }
}
