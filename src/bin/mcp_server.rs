//! media-sniff MCP Server
//!
//! This binary provides a Model Context Protocol (MCP) server for media extraction.
//! It exposes the extract_media and classify_media tools to AI assistants and other MCP clients.

use clap::{Parser, ValueEnum};
use media_sniff::browser::LaunchOptions;
use media_sniff::extractor::MediaExtractor;
use media_sniff::mcp::MediaServer;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[cfg(feature = "mcp-server")]
use rmcp::transport::{
    sse_server::{SseServer, SseServerConfig},
    streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
};

#[cfg(feature = "mcp-server")]
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output transport (default)
    Stdio,
    /// Server-Sent Events transport
    Sse,
    /// HTTP streamable transport
    Http,
}

#[derive(Parser)]
#[command(name = "media-sniff-mcp")]
#[command(version)]
#[command(about = "Media extraction MCP server", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// Pages served by one browser process before it is replaced (0 = never)
    #[arg(long, value_name = "N", default_value = "500")]
    max_pages_per_browser: usize,

    /// Transport type to use
    #[arg(long, short = 't', value_enum, default_value = "stdio")]
    transport: Transport,

    /// Port for SSE or HTTP transport (default: 3000)
    #[arg(long, short = 'p', default_value = "3000")]
    port: u16,

    /// SSE endpoint path (default: /sse)
    #[arg(long, default_value = "/sse")]
    sse_path: String,

    /// SSE POST path for messages (default: /message)
    #[arg(long, default_value = "/message")]
    sse_post_path: String,

    /// HTTP streamable endpoint path (default: /mcp)
    #[arg(long, default_value = "/mcp")]
    http_path: String,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new()
            .headless(!self.headed)
            .max_pages_per_browser(self.max_pages_per_browser);

        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        options
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.launch_options();

    log::info!("media-sniff MCP Server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Browser mode: {}", if options.headless { "headless" } else { "headed" });

    if let Some(ref path) = cli.executable_path {
        log::info!("Browser executable: {}", path);
    }

    if let Some(ref dir) = cli.user_data_dir {
        log::info!("User data directory: {}", dir);
    }

    // One browser for every connection
    let extractor = Arc::new(MediaExtractor::new(options));

    // Route to appropriate transport
    match cli.transport {
        Transport::Stdio => {
            log::info!("Transport: stdio");
            let service = MediaServer::from_extractor(extractor.clone());
            let server = service.serve(stdio()).await?;
            let quit_reason = server.waiting().await?;
            log::info!("Server quit with reason: {:?}", quit_reason);
            // Give a small delay for destructors to complete
            tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        }
        Transport::Sse => {
            log::info!("Transport: SSE (port {}, path {}, post path {})", cli.port, cli.sse_path, cli.sse_post_path);

            let bind_addr = format!("127.0.0.1:{}", cli.port);

            let config = SseServerConfig {
                bind: bind_addr.parse()?,
                sse_path: cli.sse_path.clone(),
                post_path: cli.sse_post_path.clone(),
                ct: CancellationToken::new(),
                sse_keep_alive: None,
            };

            let (sse_server, router) = SseServer::new(config);

            log::info!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.sse_path);

            // Register service factory for each connection
            let _cancellation_token =
                sse_server.with_service(move || MediaServer::from_extractor(extractor.clone()));

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            axum::serve(listener, router.into_make_service()).await?;
        }
        Transport::Http => {
            log::info!("Transport: HTTP streamable (port {}, path {})", cli.port, cli.http_path);

            let bind_addr = format!("127.0.0.1:{}", cli.port);

            let service_factory = move || Ok::<_, std::io::Error>(MediaServer::from_extractor(extractor.clone()));

            let http_service = StreamableHttpService::new(
                service_factory,
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service(&cli.http_path, http_service);

            log::info!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.http_path);

            let listener = tokio::net::TcpListener::bind(bind_addr).await?;
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
