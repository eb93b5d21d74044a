extern crate interactome;

use std::env;
use std::error::Error;
use std::process;
use std::str::FromStr;

use chrono::prelude::{DateTime, Local};
use getopts::Options;
use tracing::info;
use tracing_subscriber::EnvFilter;

use interactome::config::Config;
use interactome::data_types::*;
use interactome::http::RetryingClient;
use interactome::ols::OlsClient;
use interactome::ontology::{OntologyResolver, TermSource};
use interactome::ontology_graph::OntologyGraph;
use interactome::pipeline::{run, PipelineSink, RunSummary};
use interactome::table::*;
use interactome::types::OrganismTaxonId;
use interactome::uniprot_mapping::{fetch_gene_map, merge_gene_maps, read_gene_map};

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] -i INPUT_FILE -o OUTPUT_FILE

Removes malformed evidences from an interaction table, normalizes the
identifiers then merges explicitly and implicitly redundant evidences.",
                        program);
    print!("{}", opts.usage(&brief));
}

// writes each table to its file as soon as it's available
struct FileSink {
    format: RecordFormat,
    normalized_file_name: Option<String>,
    dropped_file_name: Option<String>,
    unresolved_file_name: Option<String>,
    output_file_name: String,
}

impl PipelineSink for FileSink {
    fn unresolved_genes(&mut self, rows: &[InteractionEvidence]) -> anyhow::Result<()> {
        if let Some(ref file_name) = self.unresolved_file_name {
            write_evidence(create_output(file_name)?, self.format, rows)?;
            info!("wrote {} rows to {}", rows.len(), file_name);
        }
        Ok(())
    }

    fn normalized(&mut self, rows: &[InteractionEvidence], dropped: &[DroppedSection])
        -> anyhow::Result<()>
    {
        if let Some(ref file_name) = self.normalized_file_name {
            write_evidence(create_output(file_name)?, self.format, rows)?;
            info!("wrote {} rows to {}", rows.len(), file_name);
        }
        if let Some(ref file_name) = self.dropped_file_name {
            write_dropped(create_output(file_name)?, self.format, dropped)?;
            info!("wrote {} sections of dropped rows to {}", dropped.len(), file_name);
        }
        Ok(())
    }

    fn deduplicated(&mut self, rows: &[DeduplicatedEvidence]) -> anyhow::Result<()> {
        write_deduplicated(create_output(&self.output_file_name)?, self.format, rows)?;
        info!("wrote {} rows to {}", rows.len(), self.output_file_name);
        Ok(())
    }
}

async fn run_with_source<S: TermSource>(source: S, config: &Config,
                                        rows: Vec<InteractionEvidence>,
                                        gene_map: &GeneMap, sink: &mut FileSink)
    -> anyhow::Result<RunSummary>
{
    let mut resolver = OntologyResolver::new(source);
    run(config, rows, gene_map, &mut resolver, sink).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("{} v{}", PKG_NAME, VERSION);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("interactome=info,interactome_clean=info"))
                .unwrap(),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();

    opts.optflag("h", "help", "print this help message");
    opts.optopt("c", "config-file", "Configuration file name", "CONFIG");
    opts.optopt("i", "input", "The interaction table to clean, optionally gzipped", "FILE");
    opts.optopt("f", "format",
                r#"Input layout, "tab25" or "tab27" (overrides the configuration)"#, "FORMAT");
    opts.optmulti("g", "gene-map", "A JSON file mapping gene IDs to UniProtKB accessions",
                  "FILE");
    opts.optmulti("t", "taxonid", "Fetch the gene mapping for this taxon from UniProt",
                  "TAXONID");
    opts.optopt("", "ontology-file",
                "Read the PSI-MI ontology from a JSON file instead of the ontology service",
                "FILE");
    opts.optflag("", "protein-only", "Remove evidences where an interactor isn't a protein");
    opts.optopt("o", "output", "The deduplicated table", "FILE");
    opts.optopt("n", "normalized-output", "Write the table after normalization", "FILE");
    opts.optopt("d", "dropped-output", "Write the removed evidences, grouped by reason",
                "FILE");
    opts.optopt("u", "unresolved-output",
                "Write the evidences that have no gene symbol for an interactor", "FILE");

    let program = args[0].clone();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            print_usage(&program, &opts);
            println!("\nerror: {}", e);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, &opts);
        process::exit(0);
    }

    let Some(input_file_name) = matches.opt_str("input") else {
        println!("no -i|--input option");
        print_usage(&program, &opts);
        process::exit(1);
    };

    let Some(output_file_name) = matches.opt_str("output") else {
        println!("no -o|--output option");
        print_usage(&program, &opts);
        process::exit(1);
    };

    let mut config =
        match matches.opt_str("config-file") {
            Some(config_file_name) => Config::read(&config_file_name)?,
            None => Config::default(),
        };

    if let Some(format) = matches.opt_str("format") {
        config.format = RecordFormat::from_str(&format)?;
    }

    if matches.opt_present("protein-only") {
        config.protein_only = true;
    }

    let local: DateTime<Local> = Local::now();
    info!("starting at {}", local.format("%Y-%m-%d %H:%M:%S"));

    let mut gene_maps = vec![];

    for file_name in matches.opt_strs("gene-map") {
        gene_maps.push(read_gene_map(&file_name)?);
    }

    let taxonids = matches.opt_strs("taxonid");

    if !taxonids.is_empty() {
        let client = RetryingClient::new(&config.retry);

        for taxonid in taxonids {
            let taxonid = OrganismTaxonId::from_str(&taxonid)?;
            gene_maps.push(fetch_gene_map(&config.uniprot, &client, Some(taxonid)).await?);
        }
    }

    let gene_map = merge_gene_maps(gene_maps);

    info!("{} gene ID mappings", gene_map.len());

    let rows = read_evidence_file(&input_file_name, config.format)?;

    let mut sink = FileSink {
        format: config.format,
        normalized_file_name: matches.opt_str("normalized-output"),
        dropped_file_name: matches.opt_str("dropped-output"),
        unresolved_file_name: matches.opt_str("unresolved-output"),
        output_file_name,
    };

    let summary =
        match matches.opt_str("ontology-file") {
            Some(ontology_file_name) => {
                let graph = OntologyGraph::read(&ontology_file_name)?;
                run_with_source(graph, &config, rows, &gene_map, &mut sink).await?
            },
            None => {
                let ols = OlsClient::new(&config.ontology, &config.retry);
                run_with_source(ols, &config, rows, &gene_map, &mut sink).await?
            },
        };

    println!("{} evidences read, {} dropped, {} explicit and {} implicit redundancies, \
              {} evidences written",
             summary.input_count, summary.dropped_count, summary.explicit_count,
             summary.implicit_count, summary.final_count);

    Ok(())
}
