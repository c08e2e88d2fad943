//! # mshm
//!
//! Command-line front end for building, inspecting and plotting mass
//! spectrometry heat maps.
//!
//! ```bash
//! # Assemble a folder of UniDec results into a snapshot
//! mshm build deconvolved/ session.mshm
//!
//! # Show what a snapshot or folder contains
//! mshm info session.mshm
//!
//! # Plot two samples between 14 and 70 kDa, normalized to their top 3 peaks
//! mshm plot session.mshm heatmap.html --samples BSA,Lysozyme --range 14000:70000 --normalize --rank 3
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
