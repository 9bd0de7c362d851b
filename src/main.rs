use std::process::ExitCode;

use clap::Parser;
use manualdex::{
    chunking::SegmentConfig,
    cli::{Cli, Command, ExtractArgs, IndexSelection, PageArgs, SearchArgs},
    config::Config,
    error::{self, Error},
    index_file::load_index,
    page,
    pipeline,
    record::ImageRecord,
    search::{self, IndexKind, SearchParams},
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MANUALDEX_LOG";

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var(LOG_ENV) {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let config = Config::resolve(&cli.overrides())?;

    match cli.command {
        Command::Extract(args) => cmd_extract(&config, &args)?,
        Command::Search(args) => cmd_search(&config, &args)?,
        Command::Page(args) => cmd_page(&config, &args)?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_extract(config: &Config, args: &ExtractArgs) -> error::Result<()> {
    let segments = SegmentConfig::new(args.segment_size, args.overlap)?;

    if args.wants(IndexSelection::Text) {
        let count = pipeline::extract_text_index(
            config.corpus_root(),
            config.text_index(),
            &config.corpus,
            &segments,
        )?;
        println!(
            "Wrote {count} text segment(s) to {}",
            config.text_index().display()
        );
    }

    if args.wants(IndexSelection::Images) {
        let count = pipeline::extract_image_index(
            config.corpus_root(),
            config.image_index(),
            &config.corpus,
        )?;
        println!(
            "Wrote {count} image record(s) to {}",
            config.image_index().display()
        );
    }

    Ok(())
}

fn cmd_search(config: &Config, args: &SearchArgs) -> error::Result<()> {
    let query = args.query_text();
    if query.is_empty() {
        return Err(Error::Config("search query is empty".to_string()));
    }

    let (kind, path) = if args.text {
        (IndexKind::Text, config.text_index())
    } else {
        (IndexKind::Images, config.image_index())
    };
    let params = SearchParams {
        query,
        count: args.count,
        kind,
    };
    let results = search::execute_search(&params, path)?;

    if args.json {
        println!("{}", search::format_json(&results)?);
    } else {
        print!("{}", search::format_human(&results));
    }
    Ok(())
}

fn cmd_page(config: &Config, args: &PageArgs) -> error::Result<()> {
    let query = args
        .query_text()
        .unwrap_or_else(|| page::DEFAULT_QUERY.to_string());
    let records: Vec<ImageRecord> = load_index(config.image_index())?;

    let generated =
        page::generate(&records, &query, config.corpus_root(), config.page_dir())?;

    println!("Wrote sample page to {}", generated.path.display());
    Ok(())
}
