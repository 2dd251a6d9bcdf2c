mod output;
mod report;
mod rewrite;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use report::{ImportReporter, StateParser};
use rewrite::DirectoryRewriter;

/// Name of the Terraform state file expected next to the source files.
const STATE_FILE: &str = "terraform.tfstate";

#[derive(Parser)]
#[command(name = "mdbsplit")]
#[command(
    about = "Splits inline databases and users out of managed database cluster resources",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory containing the .tf files to rewrite
    #[arg(short = 's', long)]
    source_directory: PathBuf,

    /// Suffix appended to the stem of every generated .tf file
    #[arg(long)]
    suffix: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rewriter = DirectoryRewriter::new(&cli.source_directory, &cli.suffix);
    let produced = rewriter.run()?;

    let cluster_ids = StateParser::new(&cli.source_directory.join(STATE_FILE)).parse()?;
    ImportReporter::new(cluster_ids).report(&produced);

    output::success("Done");

    Ok(())
}
