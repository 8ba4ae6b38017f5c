use anyhow::Context;
use clap::{Parser, builder::RangedU64ValueParser};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use media_resolver::{
    Resolver, ResolverConfig,
    extractor::DEFAULT_MAX_ROUNDS,
    media::{MediaInfo, Stream, dash},
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The URL of the video page to resolve
    url: String,

    /// Output the result in JSON format
    #[arg(long, conflicts_with = "dash")]
    json: bool,

    /// Output a DASH manifest built from the adaptive streams
    #[arg(long)]
    dash: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Maximum number of request rounds
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_ROUNDS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_rounds: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "media_resolver=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn spinner(message: &'static str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(ProgressStyle::with_template("{spinner:.blue} {msg}")?.tick_strings(&[
        "▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸", "▪▪▪▪▪",
    ]));
    pb.set_message(message);
    Ok(pb)
}

fn print_stream(stream: &Stream) {
    if let Some((video, audio)) = stream.codecs_split() {
        println!("  {} {}", "Video codec:".yellow(), video.unwrap_or("-").cyan());
        println!("  {} {}", "Audio codec:".yellow(), audio.unwrap_or("-").cyan());
    }
    println!(
        "  {} {}",
        "Resolution:".yellow(),
        format!("{}x{}@{}", stream.width, stream.height, stream.fps).cyan()
    );
    println!("  {} {}\n", "URI:".yellow(), stream.uri.as_str().blue());
}

fn print_summary(info: &MediaInfo) {
    println!("\n{}", "Media Information:".green().bold());
    println!("{} {}", "Title:".green(), info.title().unwrap_or("-").cyan());
    println!(
        "{} {}",
        "Duration:".green(),
        format!("{}s", info.duration()).cyan()
    );
    println!(
        "{} {}",
        "Streams:".green(),
        info.streams().len().to_string().cyan()
    );
    println!(
        "{} {}\n",
        "Adaptive streams:".green(),
        info.adaptive_streams().len().to_string().cyan()
    );

    for stream in info.streams() {
        print_stream(stream);
    }
    for stream in info.adaptive_streams() {
        print_stream(stream);
    }

    if !info.request_headers().is_empty() {
        println!("{}", "Request headers:".green().bold());
        for (name, value) in info.request_headers() {
            println!("  {}: {}", name.yellow(), value.cyan());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ResolverConfig::builder()
        .timeout(Duration::from_secs(args.timeout))
        .max_rounds(args.max_rounds)
        .build();
    let resolver = Resolver::new(&config).context("Failed to create HTTP client")?;

    let pb = spinner("Resolving media information...")?;
    let result = resolver.resolve(&args.url).await;
    pb.finish_and_clear();

    let info = result.with_context(|| format!("Failed to resolve URL: {}", args.url))?;

    if args.json {
        println!("{}", info.to_json_pretty()?);
    } else if args.dash {
        let manifest = dash::generate_manifest(&info)
            .context("No adaptive streams with byte ranges to build a DASH manifest from")?;
        println!("{manifest}");
    } else {
        print_summary(&info);
    }

    Ok(())
}
