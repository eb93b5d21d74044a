use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use flexstr::SharedStr as FlexStr;

use crate::constants::*;
use crate::data_types::*;

// columns names are those written by the fetching stage
#[derive(Debug, Deserialize)]
struct Tab25Record {
    prot1: FlexStr,
    prot2: FlexStr,
    gene1: FlexStr,
    gene2: FlexStr,
    idm: FlexStr,
    authors: FlexStr,
    pub_id: FlexStr,
    species1: FlexStr,
    species2: FlexStr,
    interaction_type: FlexStr,
    source_databases: FlexStr,
    interaction_identifiers: FlexStr,
    confidence_score: FlexStr,
    service_name: FlexStr,
}

#[derive(Debug, Deserialize)]
struct Tab27Record {
    prot1: FlexStr,
    prot2: FlexStr,
    gene1: FlexStr,
    gene2: FlexStr,
    idm: FlexStr,
    authors: FlexStr,
    pub_id: FlexStr,
    species1: FlexStr,
    species2: FlexStr,
    interaction_type: FlexStr,
    source_databases: FlexStr,
    interaction_identifiers: FlexStr,
    confidence_score: FlexStr,
    biological_role1: FlexStr,
    biological_role2: FlexStr,
    exp_role1: FlexStr,
    exp_role2: FlexStr,
    interactor_type1: FlexStr,
    interactor_type2: FlexStr,
    taxid_host: FlexStr,
    participant_id_method1: FlexStr,
    participant_id_method2: FlexStr,
    service_name: FlexStr,
    #[serde(default)]
    biogrid_experimental_system: Option<FlexStr>,
    #[serde(default)]
    biogrid_description: Option<FlexStr>,
    #[serde(default)]
    biogrid_type: Option<FlexStr>,
    #[serde(default)]
    throughput: Option<FlexStr>,
}

// empty cells are read as the sentinel
fn cell(value: FlexStr) -> FlexStr {
    if value.trim().is_empty() {
        FlexStr::from(SENTINEL)
    } else {
        value
    }
}

fn optional_cell(value: Option<FlexStr>) -> FlexStr {
    cell(value.unwrap_or_else(|| FlexStr::from(SENTINEL)))
}

fn paired(first: FlexStr, second: FlexStr) -> Paired<FlexStr> {
    Paired::new(cell(first), cell(second))
}

impl From<Tab25Record> for InteractionEvidence {
    fn from(record: Tab25Record) -> Self {
        InteractionEvidence {
            proteins: paired(record.prot1, record.prot2),
            genes: paired(record.gene1, record.gene2),
            idm: cell(record.idm),
            authors: cell(record.authors),
            pub_id: cell(record.pub_id),
            species: paired(record.species1, record.species2),
            interaction_type: cell(record.interaction_type),
            source_databases: cell(record.source_databases),
            interaction_identifiers: cell(record.interaction_identifiers),
            confidence_score: cell(record.confidence_score),
            service_name: cell(record.service_name),
            extended: None,
        }
    }
}

impl From<Tab27Record> for InteractionEvidence {
    fn from(record: Tab27Record) -> Self {
        let participants = ParticipantDetails {
            biological_roles: paired(record.biological_role1, record.biological_role2),
            experimental_roles: paired(record.exp_role1, record.exp_role2),
            interactor_types: paired(record.interactor_type1, record.interactor_type2),
            participant_id_methods:
                paired(record.participant_id_method1, record.participant_id_method2),
        };

        InteractionEvidence {
            proteins: paired(record.prot1, record.prot2),
            genes: paired(record.gene1, record.gene2),
            idm: cell(record.idm),
            authors: cell(record.authors),
            pub_id: cell(record.pub_id),
            species: paired(record.species1, record.species2),
            interaction_type: cell(record.interaction_type),
            source_databases: cell(record.source_databases),
            interaction_identifiers: cell(record.interaction_identifiers),
            confidence_score: cell(record.confidence_score),
            service_name: cell(record.service_name),
            extended: Some(ExtendedDetails {
                participants,
                taxid_host: cell(record.taxid_host),
                biogrid_experimental_system: optional_cell(record.biogrid_experimental_system),
                biogrid_description: optional_cell(record.biogrid_description),
                biogrid_type: optional_cell(record.biogrid_type),
                throughput: optional_cell(record.throughput),
            }),
        }
    }
}

/// Open a table for reading, decompressing it if the name ends in ".gz"
pub fn open_table(file_name: &str) -> Result<Box<dyn Read>> {
    let file = File::open(file_name)
        .with_context(|| format!("failed to open {}", file_name))?;
    let reader = BufReader::new(file);

    if file_name.ends_with(".gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

fn read_records<R, T>(reader: R, format: RecordFormat) -> Result<Vec<InteractionEvidence>>
    where R: Read,
          T: serde::de::DeserializeOwned + Into<InteractionEvidence>
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut rows = vec![];

    for (idx, result) in csv_reader.deserialize::<T>().enumerate() {
        let record = result
            .with_context(|| format!("failed to read {} line {}", format, idx + 2))?;
        rows.push(record.into());
    }

    Ok(rows)
}

pub fn read_evidence<R: Read>(reader: R, format: RecordFormat)
    -> Result<Vec<InteractionEvidence>>
{
    match format {
        RecordFormat::Tab25 => read_records::<R, Tab25Record>(reader, format),
        RecordFormat::Tab27 => read_records::<R, Tab27Record>(reader, format),
    }
}

pub fn read_evidence_file(file_name: &str, format: RecordFormat)
    -> Result<Vec<InteractionEvidence>>
{
    let reader = open_table(file_name)?;
    read_evidence(reader, format)
        .with_context(|| format!("failed to parse {}", file_name))
}

// a row can only be written in the layout it was read in, the extended
// columns would be lost or missing otherwise
fn check_format(row: &InteractionEvidence, format: RecordFormat) -> Result<()> {
    if row.format() != format {
        bail!("can't write a {} row ({}) to a {} table",
              row.format(), row.interaction_identifiers, format);
    }
    Ok(())
}

pub fn write_evidence<W: Write>(writer: W, format: RecordFormat,
                                rows: &[InteractionEvidence])
    -> Result<()>
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(format.headers())?;

    for row in rows {
        check_format(row, format)?;
        csv_writer.write_record(row.fields())?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Write the dropped rows, each section preceded by a one cell line giving
/// the reason and the number of rows
pub fn write_dropped<W: Write>(writer: W, format: RecordFormat,
                               sections: &[DroppedSection])
    -> Result<()>
{
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(format.headers())?;

    for section in sections {
        csv_writer.write_record([section.header()])?;

        for row in &section.rows {
            check_format(row, format)?;
            csv_writer.write_record(row.fields())?;
        }
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn write_deduplicated<W: Write>(writer: W, format: RecordFormat,
                                    rows: &[DeduplicatedEvidence])
    -> Result<()>
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut headers = format.headers().to_vec();
    headers.push(EXPLICIT_COUNT_HEADER);
    headers.push(IMPLICIT_COUNT_HEADER);
    csv_writer.write_record(&headers)?;

    for row in rows {
        check_format(&row.evidence, format)?;
        let explicit_count = row.explicit_count.to_string();
        let implicit_count = row.implicit_count.to_string();
        let mut fields = row.evidence.fields();
        fields.push(&explicit_count);
        fields.push(&implicit_count);
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn create_output(file_name: &str) -> Result<BufWriter<File>> {
    let file = File::create(file_name)
        .with_context(|| format!("failed to create {}", file_name))?;
    Ok(BufWriter::new(file))
}
