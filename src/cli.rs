use std::path::PathBuf;

use clap::Parser;

use crate::modules::surface_fixup::{fixup_text, write_map};

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Convert a decompiled Nightfire .map file to one that is compatible \
             with the Source engine's Hammer Editor.",
    long_about = None
)]
struct Nf2SourceCli {
    /// Input file to convert
    path: PathBuf,

    /// Output file to write
    #[arg(short, long)]
    output: PathBuf,
}

pub enum CliRes {
    Ok,
    Err,
}

pub fn cli() -> CliRes {
    let cli = Nf2SourceCli::parse();

    println!("Reading: {}", cli.path.display());

    let text = match std::fs::read_to_string(&cli.path) {
        Ok(text) => text,
        Err(err) => {
            println!("Cannot open map file: {}", err);
            return CliRes::Err;
        }
    };

    println!("Fixing up surface descriptors...");

    let (fixed, stats) = fixup_text(&text);

    println!(
        "{} lines modified {} lines skipped.",
        stats.modified, stats.skipped
    );

    println!("Writing: {}", cli.output.display());

    if let Err(err) = write_map(&cli.output, &fixed) {
        println!("Error writing map: {}", err);
        return CliRes::Err;
    }

    println!(
        "Done. It's recommended to import this .map into JACK and re-save as a VMF, \
         because the Source engine Hammer is not good at importing old-style .map files."
    );

    CliRes::Ok
}
