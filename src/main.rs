//! doxydoc — generate C++ docstring bindings from a Doxygen XML export.
//!
//! Reads `index.xml` plus the compound files next to it and writes a header
//! of template specializations that expose the documentation strings to a
//! runtime binding layer:
//!
//! ```text
//! doxydoc build/doc/xml/index.xml -o doxygen_autodoc.hh
//! ```

mod compound;
mod diag;
mod docstring;
mod emit;
mod index;
mod member;
mod model;
mod parser;

use anyhow::{Context, Result};
use clap::Parser;
use diag::Diagnostics;
use emit::Generator;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "doxydoc",
    about = "Generate C++ docstring bindings from Doxygen XML documentation"
)]
struct Cli {
    /// Path to the Doxygen index.xml. Compound files are read from the same
    /// directory.
    index: PathBuf,

    /// Output file. Writes to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Directory containing doxygen.hh, used in the generated #include.
    #[arg(long, default_value = ".")]
    header_dir: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut diag = Diagnostics::stderr();

    let generator = Generator::build(&cli.index, &mut diag)?;

    match cli.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            generator.write(&mut out, &cli.header_dir, &mut diag)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            generator.write(&mut stdout.lock(), &cli.header_dir, &mut diag)?;
        }
    }
    Ok(())
}
