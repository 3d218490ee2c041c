use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tsp_ranking::feature_selection::tsp::RankingOutcome;
use tsp_ranking::Dataset;

use tsp_ranking::io::delimiter_for_path;

/// Write the ranking to `output_path` (CSV or TSV by extension), or as TSV
/// to stdout when no path is given.
pub fn write_ranking(
    outcome: &RankingOutcome,
    dataset: &Dataset,
    output_path: Option<&Path>,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let delimiter = delimiter_for_path(path).unwrap_or(b',');
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_records(outcome, dataset, BufWriter::new(file), delimiter)
        }
        None => write_records(outcome, dataset, io::stdout().lock(), b'\t'),
    }
}

fn write_records<W: Write>(
    outcome: &RankingOutcome,
    dataset: &Dataset,
    out: W,
    delimiter: u8,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    writer.write_record(["rank", "attribute_index", "attribute_name", "score"])?;
    for (position, rank) in outcome.ranking.iter().enumerate() {
        writer.write_record(&[
            (position + 1).to_string(),
            rank.attribute.to_string(),
            dataset.attribute_name(rank.attribute).to_string(),
            format!("{:.6}", rank.rank),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
