use clap::CommandFactory;
use tracing_subscriber::{EnvFilter, fmt};

use citegraph::cli::Args;
use citegraph::io::FormatRegistry;
use citegraph::pipeline;
use citegraph::source::SemanticScholarClient;

/// Log to stderr so the stdout summary line stays machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse_normalized(std::env::args()) {
        Ok(args) => args,
        // Malformed arguments are handled like missing ones
        Err(err) if err.use_stderr() => {
            eprint!("{err}");
            Args::command().print_help()?;
            return Ok(());
        }
        Err(err) => err.exit(),
    };

    // Output path and author ID are mandatory
    let (Some(output), Some(config)) = (args.output_path(), args.run_config()) else {
        Args::command().print_help()?;
        return Ok(());
    };

    init_tracing();

    let registry = FormatRegistry::with_defaults();
    let writer = registry.writer_for_format(&args.format)?;
    let source = SemanticScholarClient::new(args.source_config())?;

    let result = pipeline::run(&source, &config).await?;

    println!("{}", result.summary);
    writer.write(&result.graph, output)?;

    Ok(())
}
