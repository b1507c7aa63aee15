//! media-sniff command line
//!
//! Extracts the media of one page and prints a summary or the raw JSON.

use clap::{Parser, ValueEnum};
use media_sniff::browser::{LaunchOptions, ScrapeOptions};
use media_sniff::extractor::{MediaExtractor, PageMedia};
use media_sniff::report::{self, Delivery};
use media_sniff::tools::utils::resolve_target;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Numbered summary, full results inline or as a file, image previews
    Summary,
    /// Results as pretty-printed JSON on stdout
    Json,
}

#[derive(Parser)]
#[command(name = "media-sniff")]
#[command(version)]
#[command(about = "List the video, audio and image URLs a web page loads", long_about = None)]
struct Cli {
    /// Page to extract media from
    url: String,

    /// Navigation and network idle timeout in milliseconds
    #[arg(long, value_name = "MS", default_value = "45000")]
    timeout_ms: u64,

    /// Extra wait after the page settles, in milliseconds
    #[arg(long, value_name = "MS", default_value = "2000")]
    wait_ms: u64,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "summary")]
    format: Format,

    /// Results listed in the summary
    #[arg(long, short = 'n', default_value_t = report::DEFAULT_SUMMARY_LIMIT)]
    limit: usize,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Drop small media bodies captured inline as data: URIs
    #[arg(long)]
    no_inline_data: bool,

    /// Directory for the results file when results are too long to print inline
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.chrome_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        options
    }

    fn scrape_options(&self) -> ScrapeOptions {
        ScrapeOptions::new()
            .timeout(Duration::from_millis(self.timeout_ms))
            .wait(Duration::from_millis(self.wait_ms))
            .include_inline_data(!self.no_inline_data)
    }
}

fn print_summary(cli: &Cli, page: &PageMedia) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", report::render_summary(&page.url, &page.results, cli.limit));

    if page.results.is_empty() {
        return Ok(());
    }

    println!();
    match report::plan_delivery(&page.results, report::DEFAULT_INLINE_LIMIT)? {
        Delivery::Inline(json) => println!("{}", json),
        Delivery::Attachment {
            file_name,
            contents,
            caption,
        } => {
            let path = cli.output_dir.join(file_name);
            std::fs::write(&path, contents)?;
            println!("{}: {}", caption, path.display());
        }
    }

    let previews = report::preview_candidates(&page.results, report::DEFAULT_PREVIEW_COUNT);
    if !previews.is_empty() {
        println!();
        println!("Image previews:");
        for image in previews {
            println!("  {} ({})", report::shorten_url(&image.url), report::preview_caption(image));
        }
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let url = resolve_target(&cli.url)?;
    log::info!("Processing {}", url);

    let extractor = MediaExtractor::new(cli.launch_options());
    let page = extractor.extract(&url, &cli.scrape_options())?;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&page.results)?),
        Format::Summary => print_summary(cli, &page)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error while processing:\n{}", e);
            ExitCode::FAILURE
        }
    }
}
