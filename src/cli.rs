use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::{
    chunking::{DEFAULT_SEGMENT_OVERLAP, DEFAULT_SEGMENT_SIZE},
    config::PathOverrides,
    search::DEFAULT_RESULT_COUNT,
};

#[derive(Debug, Parser)]
#[command(
    name = "manualdex",
    about = "Index a product manual's HTML pages and search its text and images"
)]
pub struct Cli {
    /// Root directory of the HTML manual
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Text segment index file
    #[arg(long, global = true)]
    pub text_index: Option<PathBuf>,

    /// Image index file
    #[arg(long, global = true)]
    pub image_index: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Paths given on the command line, for [`crate::config::Config::resolve`].
    pub fn overrides(&self) -> PathOverrides {
        let page_dir = match &self.command {
            Command::Page(args) => args.out.clone(),
            _ => None,
        };
        PathOverrides {
            corpus: self.corpus.clone(),
            text_index: self.text_index.clone(),
            image_index: self.image_index.clone(),
            page_dir,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk the manual and rebuild the index files
    Extract(ExtractArgs),
    /// Search the image index (or the text index with --text)
    Search(SearchArgs),
    /// Generate the sample setup page from the image index
    Page(PageArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Extract --

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexSelection {
    Text,
    Images,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Rebuild only one of the two indexes
    #[arg(long, value_enum)]
    pub only: Option<IndexSelection>,

    /// Characters per text segment
    #[arg(long, default_value_t = DEFAULT_SEGMENT_SIZE)]
    pub segment_size: usize,

    /// Characters shared by consecutive segments
    #[arg(long, default_value_t = DEFAULT_SEGMENT_OVERLAP)]
    pub overlap: usize,
}

impl ExtractArgs {
    pub fn wants(&self, selection: IndexSelection) -> bool {
        self.only.is_none_or(|only| only == selection)
    }
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Search text segments instead of images
    #[arg(long)]
    pub text: bool,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_COUNT)]
    pub count: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ").trim().to_string()
    }
}

// -- Page --

#[derive(Debug, Parser)]
pub struct PageArgs {
    /// Fallback query for steps whose own query matches nothing
    pub query: Vec<String>,

    /// Output directory for the page and its images
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl PageArgs {
    pub fn query_text(&self) -> Option<String> {
        let query = self.query.join(" ").trim().to_string();
        (!query.is_empty()).then_some(query)
    }
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "manualdex",
            &mut std::io::stdout(),
        );
    }
}
