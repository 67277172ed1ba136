use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::graph::ReferenceMode;
use crate::pipeline::RunConfig;
use crate::source::{DEFAULT_API_URL, SourceConfig};

/// Build a citation graph for a Semantic Scholar author.
///
/// Find the author ID in the URL of the author's Semantic Scholar page.
#[derive(Parser, Debug)]
#[command(name = "citegraph")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Output graph file (Graph Exchange XML Format unless --format says otherwise)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Semantic Scholar author ID (also accepted as `-id`)
    #[arg(long = "id", value_name = "ID")]
    pub author_id: Option<String>,

    /// Only collect papers published in or after this year
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub year: i32,

    /// Include references to self and co-author papers (overrides --include-all-references)
    #[arg(long, overrides_with = "include_all_references")]
    pub include_relevant_references: bool,

    /// Include all references (overrides --include-relevant-references)
    #[arg(long, overrides_with = "include_relevant_references")]
    pub include_all_references: bool,

    /// Output format
    #[arg(long, default_value = "gexf", value_parser = ["gexf", "graph-json"])]
    pub format: String,

    /// Root URL of the Semantic Scholar v1 API
    #[arg(long, env = "CITEGRAPH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Pause before each paper request, in milliseconds
    #[arg(long, env = "CITEGRAPH_DELAY_MS", default_value_t = 4000)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Rewrite the legacy single-dash `-id` spelling to `--id`
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.as_str() {
            "-id" => "--id".to_string(),
            _ => match arg.strip_prefix("-id=") {
                Some(value) => format!("--id={value}"),
                None => arg,
            },
        })
        .collect()
}

impl Args {
    /// Parse from an argument list after `-id` normalization
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Reference mode selected by the flags; the last flag given wins
    pub fn reference_mode(&self) -> ReferenceMode {
        if self.include_all_references {
            ReferenceMode::All
        } else if self.include_relevant_references {
            ReferenceMode::RelevantOnly
        } else {
            ReferenceMode::Ignore
        }
    }

    /// Output path, unless missing or blank
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
    }

    /// Run configuration, unless the author ID is missing or blank
    pub fn run_config(&self) -> Option<RunConfig> {
        let author_id = self.author_id.as_deref().map(str::trim)?;
        if author_id.is_empty() {
            return None;
        }

        Some(RunConfig {
            author_id: author_id.to_string(),
            min_year: self.year,
            reference_mode: self.reference_mode(),
            request_delay: Duration::from_millis(self.delay_ms),
        })
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
