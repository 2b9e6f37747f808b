use std::fs::File;
use std::io::{prelude::*, stdin, stdout, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use mbma::document::{Document, PosAnnotation, Word};
use mbma::{Analyzer, Configuration, InstanceBase, MbmaSettings, TagTables};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "analyze",
    about = "A program to perform morphological analysis of POS-tagged words."
)]
struct Args {
    /// The configuration file. Tag tables are read from its directory
    #[arg(long)]
    config: PathBuf,

    /// The instance base to use instead of the configured one. Files ending in .zst are read as
    /// compiled models, others as text instance files
    #[arg(long)]
    model: Option<PathBuf>,

    /// Number of threads (0 analyses words on the main thread)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Number of words annotated at once
    #[arg(long, default_value = "1000")]
    batch_size: usize,

    /// Verbosity of diagnostics, overriding the configured value
    #[arg(long)]
    debug: Option<u32>,
}

fn log_level(debug: u32) -> Level {
    match debug {
        0 => Level::INFO,
        1 | 2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load_oracle(path: &Path) -> Result<InstanceBase, Box<dyn std::error::Error>> {
    if path.extension().is_some_and(|ext| ext == "zst") {
        let mut f = zstd::Decoder::new(File::open(path)?)?;
        Ok(InstanceBase::read(&mut f)?)
    } else {
        let f = BufReader::new(File::open(path)?);
        Ok(InstanceBase::from_instances(f)?)
    }
}

/// One input line: the word and, if its tag could be parsed, its position in the batch document.
struct Entry {
    text: String,
    index: Option<usize>,
}

fn parse_line(line: &str, doc: &mut Document) -> Entry {
    let (text, tag) = line.split_once('\t').unwrap_or((line, ""));
    let index = match PosAnnotation::from_cgn(tag) {
        Ok(pos) => {
            doc.push_word(Word::new(text, pos));
            Some(doc.words().len() - 1)
        }
        Err(e) => {
            tracing::warn!("skipping '{}': {}", text, e);
            None
        }
    };
    Entry {
        text: text.to_string(),
        index,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Configuration::read(&args.config)?;
    let settings = MbmaSettings::from_config(&config)?;
    tracing_subscriber::fmt()
        .with_max_level(log_level(args.debug.unwrap_or(settings.debug)))
        .with_writer(std::io::stderr)
        .init();

    eprintln!("Loading tag tables...");
    let tables = TagTables::load(config.config_dir())?;

    let model_path = args.model.clone().unwrap_or_else(|| settings.tree_file.clone());
    eprintln!("Loading model file...");
    tracing::info!(
        "instance base {} (classifier options: {})",
        model_path.display(),
        settings.classifier_options
    );
    let oracle = load_oracle(&model_path)?;

    let analyzer = Analyzer::new(Arc::new(tables), settings);
    let mt_analyzer = if args.threads == 0 {
        None
    } else {
        Some(analyzer.clone().multithreading(oracle.clone(), args.threads)?)
    };
    let batch_size = args.batch_size.max(1);

    eprintln!("Start analysis");
    let mut out = BufWriter::new(stdout().lock());
    let mut n_words = 0;
    let mut n_failures = 0;
    let start = Instant::now();
    let mut lines = stdin().lock().lines().peekable();
    while lines.peek().is_some() {
        let mut doc = Document::new();
        let mut entries = vec![];
        for line in lines.by_ref() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            entries.push(parse_line(line, &mut doc));
            if entries.len() == batch_size {
                break;
            }
        }

        let errors = match &mt_analyzer {
            Some(mt_analyzer) => mt_analyzer.annotate_document(&mut doc)?,
            None => analyzer.annotate_document(&oracle, &mut doc),
        };
        n_failures += errors.len();

        for entry in &entries {
            let layers = entry.index.map_or_else(String::new, |i| {
                doc.words()[i]
                    .morphology()
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            });
            if entry.index.is_none() {
                n_failures += 1;
            }
            writeln!(out, "{}\t{}", entry.text, layers)?;
        }
        n_words += entries.len();
    }
    out.flush()?;

    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [words/sec]",
        n_words as f64 / duration.as_secs_f64()
    );
    if n_failures != 0 {
        eprintln!("{} of {} words left unannotated", n_failures, n_words);
    }

    Ok(())
}
