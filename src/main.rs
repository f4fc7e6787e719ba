use clap::Parser;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;

use cfg_sampler::utils::{validate_input_path, validate_output_path};
use cfg_sampler::{generate_batch, Expander, Grammar};

/// Generate random strings conforming to a context-free grammar
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output file; must not already exist
    #[arg(short, long)]
    output: PathBuf,

    /// Number of strings to generate
    #[arg(short = 'n', long)]
    count: usize,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    validate_input_path(&cli.input)?;
    validate_output_path(&cli.output)?;
    if cli.count == 0 {
        return Err("count must be a positive integer".into());
    }

    let grammar = Grammar::from_file(&cli.input)?;
    let expander = Expander::new(&grammar)?;
    println!(
        "Loaded {} rules and {} terminals from {}.",
        grammar.rules().len(),
        grammar.terminals().len(),
        cli.input.display()
    );

    // create_new keeps the no-overwrite guarantee even if the file appeared
    // after the eager check
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&cli.output)?;
    let mut writer = BufWriter::new(file);

    println!("Generating {} strings...", cli.count);
    generate_batch(&expander, cli.count, cli.seed, &mut writer)?;
    println!("Wrote {} lines to {}.", cli.count, cli.output.display());

    Ok(())
}
