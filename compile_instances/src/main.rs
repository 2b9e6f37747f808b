use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use mbma::InstanceBase;

#[derive(Parser, Debug)]
#[command(
    name = "compile_instances",
    about = "A program to compile a text instance base into a compressed model."
)]
struct Args {
    /// Text instance file: the window fields of each instance followed by its class label
    #[arg(long)]
    instances_in: PathBuf,

    /// The file to write the compiled model to
    #[arg(long)]
    model_out: PathBuf,

    /// The zstd compression level
    #[arg(long, default_value = "19")]
    zstd_level: i32,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading instance file...");
    let f = BufReader::new(File::open(args.instances_in)?);
    let base = InstanceBase::from_instances(f)?;
    eprintln!("# of instances: {}", base.len());

    eprintln!("Saving model file...");
    let mut f = zstd::Encoder::new(File::create(args.model_out)?, args.zstd_level)?;
    f.multithread(args.zstd_workers)?;
    base.write(&mut f)?;
    f.finish()?;

    Ok(())
}
