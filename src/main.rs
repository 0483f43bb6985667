use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use kumo::core::config::Config;
use kumo::core::constants::DEFAULT_ENDPOINT;
use kumo::ui::chat_loop;
use kumo::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "kumo")]
#[command(about = "A terminal chat client for the Multi-Cloud Info Agent")]
#[command(long_about = "Kumo is a full-screen terminal chat interface for asking a cloud info \
agent about AWS and Azure resources in natural language. Answers are rendered \
as markdown with syntax-highlighted code blocks, next to an avatar whose mood \
tracks the state of the current request.\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a line break\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application")]
struct Args {
    #[arg(
        short,
        long,
        help = "Agent base URL (overrides the config file)",
        value_name = "URL"
    )]
    endpoint: Option<String>,

    #[arg(short, long, help = "UI theme: dark or light")]
    theme: Option<String>,

    #[arg(long, help = "Disable markdown rendering of agent replies")]
    no_markdown: bool,

    #[arg(long, help = "Disable syntax highlighting in fenced code blocks")]
    no_syntax: bool,

    #[arg(
        long,
        help = "Append diagnostics to this file (also: KUMO_LOG_FILE)",
        value_name = "PATH"
    )]
    log_file: Option<PathBuf>,
}

/// Diagnostics go to a file because the alternate screen owns the terminal.
/// No file configured means logging stays off entirely.
fn init_tracing(log_file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let log_file = log_file.or_else(|| std::env::var_os("KUMO_LOG_FILE").map(PathBuf::from));
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("KUMO_LOG")
                .unwrap_or_else(|_| "kumo=info".into()),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_tracing(args.log_file)?;

    // Config problems must surface before the terminal goes raw.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let endpoint = args
        .endpoint
        .or(config.endpoint)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let theme = Theme::from_name(
        args.theme
            .or(config.theme)
            .as_deref()
            .unwrap_or("dark"),
    );
    let markdown_enabled = !args.no_markdown && config.markdown.unwrap_or(true);
    let syntax_enabled = !args.no_syntax && config.syntax.unwrap_or(true);

    tracing::info!(%endpoint, markdown_enabled, syntax_enabled, "starting session");

    chat_loop::run(endpoint, theme, markdown_enabled, syntax_enabled).await
}
