use flexstr::SharedStr as FlexStr;

pub type TermId = FlexStr;
pub type TermName = FlexStr;

// a UniProtKB accession after resolution, eg. "P30771"
pub type ProteinId = FlexStr;
// a source specific gene identifier, eg. the NCBI GeneID "855395"
pub type GeneId = FlexStr;
pub type GeneName = FlexStr;

pub type PublicationId = FlexStr;
pub type InteractionIdentifier = FlexStr;

pub type OrganismTaxonId = u32;

// the index of a row in the table given to a stage
pub type RowIndex = usize;
