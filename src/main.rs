//! FastGenome2Vec CLI entry point
//!
//! Annotates a query BED file with the closest feature from each of the
//! seven annotation collections in the annotation directory.

use clap::Parser;
use fast_genome2vec::formats::{annotate_file, default_output_path, load_bundle, AnnotationSource};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fast-genome2vec")]
#[command(about = "High-performance nearest-feature genomic annotation")]
#[command(version)]
#[command(author = "FastGenome2Vec Contributors")]
struct Cli {
    /// Input query BED file, at least 7 columns:
    /// chrom, start, end, name, score, strand, value_1..
    #[arg(short = 'a', long = "input")]
    input: PathBuf,

    /// Output table with header (default: <input stem>_genome2vec.bed)
    #[arg(short = 'b', long = "output")]
    output: Option<PathBuf>,

    /// Directory holding the seven annotation BED files
    #[arg(long = "anno-dir", default_value = "./anno_data")]
    anno_dir: PathBuf,

    /// Number of threads
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    eprintln!("Loading annotation sets from {:?}", cli.anno_dir);
    let bundle = load_bundle(&cli.anno_dir)?;
    eprintln!("Annotation sets loaded in {:.2}s", start.elapsed().as_secs_f64());

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));

    eprintln!("Annotating: {:?} -> {:?}", cli.input, output);
    let stats = annotate_file(&cli.input, &output, &bundle, cli.threads)?;

    eprintln!("\n=== Annotation Statistics ===");
    eprintln!("Query rows:      {}", stats.rows);
    for (source, matched) in AnnotationSource::ALL.iter().zip(&stats.matched) {
        eprintln!("{:<16} {} matched", format!("{}:", source.label()), matched);
    }
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
