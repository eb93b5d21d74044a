//! Runs the stages in order: exclusion closure, normalization, ancestry,
//! obsolete term pruning and deduplication.  Each table is handed to a
//! [PipelineSink] as soon as its stage is finished, so that a failure of a
//! later stage doesn't lose earlier results.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::data_types::*;
use crate::dedup::deduplicate;
use crate::normalize::{prune_obsolete_terms, retain_usable_terms, table_term_ids,
                       Normalizer};
use crate::ontology::{OntologyResolver, TermSource};

pub trait PipelineSink {
    /// Rows kept without a gene symbol for one of the participants, after
    /// obsolete term pruning
    fn unresolved_genes(&mut self, rows: &[InteractionEvidence]) -> Result<()>;

    /// The normalized table and every dropped row, grouped by reason
    fn normalized(&mut self, rows: &[InteractionEvidence], dropped: &[DroppedSection])
        -> Result<()>;

    fn deduplicated(&mut self, rows: &[DeduplicatedEvidence]) -> Result<()>;
}

/// Keeps every table in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub unresolved_genes: Vec<InteractionEvidence>,
    pub normalized: Vec<InteractionEvidence>,
    pub dropped: Vec<DroppedSection>,
    pub deduplicated: Vec<DeduplicatedEvidence>,
}

impl PipelineSink for MemorySink {
    fn unresolved_genes(&mut self, rows: &[InteractionEvidence]) -> Result<()> {
        self.unresolved_genes = rows.to_vec();
        Ok(())
    }

    fn normalized(&mut self, rows: &[InteractionEvidence], dropped: &[DroppedSection])
        -> Result<()>
    {
        self.normalized = rows.to_vec();
        self.dropped = dropped.to_vec();
        Ok(())
    }

    fn deduplicated(&mut self, rows: &[DeduplicatedEvidence]) -> Result<()> {
        self.deduplicated = rows.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub input_count: usize,
    pub dropped_count: usize,
    pub reordered_count: usize,
    pub normalized_count: usize,
    pub explicit_count: usize,
    pub implicit_count: usize,
    pub final_count: usize,
}

pub async fn run<S: TermSource>(config: &Config, rows: Vec<InteractionEvidence>,
                                gene_map: &GeneMap, resolver: &mut OntologyResolver<S>,
                                sink: &mut impl PipelineSink)
    -> Result<RunSummary>
{
    let input_count = rows.len();

    let exclusions =
        resolver.exclusion_set(&config.mi_fetch_descendants, &config.mi_to_exclude).await?;

    let report = Normalizer::new(gene_map, &exclusions)
        .protein_only(config.protein_only)
        .normalize(rows);

    let termids = table_term_ids(&report.rows);
    let ancestry = resolver.ancestors(&termids).await?;

    let (rows, obsolete_section) = prune_obsolete_terms(report.rows, &ancestry);

    let unresolved_genes = retain_usable_terms(report.unresolved_genes, &ancestry);
    sink.unresolved_genes(&unresolved_genes)?;

    let mut dropped = report.dropped;
    dropped.push(obsolete_section);

    let dropped_count: usize = dropped.iter().map(|section| section.rows.len()).sum();
    let normalized_count = rows.len();

    sink.normalized(&rows, &dropped)?;

    let dedup_report = deduplicate(rows, &ancestry.ancestors);

    sink.deduplicated(&dedup_report.rows)?;

    let summary = RunSummary {
        input_count,
        dropped_count,
        reordered_count: report.reordered_count,
        normalized_count,
        explicit_count: dedup_report.explicit_count,
        implicit_count: dedup_report.implicit_count,
        final_count: dedup_report.rows.len(),
    };

    info!("{} rows in, {} dropped, {} after deduplication",
          summary.input_count, summary.dropped_count, summary.final_count);

    Ok(summary)
}
