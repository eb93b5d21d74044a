// the "absent" value used in every column of the tables
pub const SENTINEL: &str = "-";

pub const FIELD_DELIMITER: char = '|';

pub const MI_ROOT_TERMID: &str = "MI:0000";
pub const MI_PROTEIN_TERMID: &str = "MI:0326";

pub const UNSPECIFIED_ROLE_FROM: &str = r#"psi-mi:"MI:0000"(unspecified)"#;
pub const UNSPECIFIED_ROLE_TO: &str = r#"psi-mi:"MI:0499"(unspecified role)"#;

pub const UNIPROTKB_PREFIX: &str = "uniprotkb:";
pub const ENTREZ_GENE_PREFIX: &str = "entrez gene/locuslink:";
pub const HGNC_PREFIX: &str = "hgnc:";
pub const GENE_NAME_TAG: &str = "(gene name)";
pub const ET_AL: &str = "et al.";

pub const BIOGRID_SERVICE_NAME: &str = "BioGrid";

// controlled taxon codes like "-1(in vitro)" that are split on the list
// delimiter rather than at the description
pub const NEGATIVE_TAXON_CODES: [&str; 3] = ["-1", "-2", "-3"];

pub const DROPPED_HEADER_PREFIX: &str = "Number of dropped experimental evidences";

pub const EXPLICIT_COUNT_HEADER: &str = "count_expl";
pub const IMPLICIT_COUNT_HEADER: &str = "count_impl";

pub const DEFAULT_OLS_BASE_URL: &str = "https://www.ebi.ac.uk/ols4/api/ontologies/mi";
pub const DEFAULT_UNIPROT_SEARCH_URL: &str = "https://rest.uniprot.org/uniprotkb/search";
pub const DEFAULT_PAGE_SIZE: usize = 500;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 250;
pub const DEFAULT_RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];
