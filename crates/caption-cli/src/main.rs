use caption_ai::{OpenAiProvider, Web3FormsRelay};
use caption_core::{
    CaptionError, CaptionGenerator, Clipboard, CompletionProvider, FeedbackForm, HashtagCount,
    MockProvider, ProviderConfig, SentenceCount, StudioConfig, Style, SubmitOutcome,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::{info, warn};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a caption for some content
    Generate {
        /// Content to caption (reads --file or stdin when omitted)
        content: Option<String>,

        /// Read content from a file
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Caption style
        #[arg(short, long, default_value_t = Style::Professional)]
        style: Style,

        /// Number of sentences (1-5)
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
        sentences: u8,

        /// Number of hashtags (0-4)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=4))]
        hashtags: u8,

        /// Model name (defaults to CAPTION_MODEL or gpt-3.5-turbo)
        #[arg(short, long)]
        model: Option<String>,

        /// Copy the caption to the system clipboard
        #[arg(long)]
        copy: bool,

        /// Skip the API and use the local fallback caption
        #[arg(long)]
        offline: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send feedback through the form relay
    Feedback {
        /// Your name
        #[arg(long)]
        name: String,

        /// Your email address
        #[arg(long)]
        email: String,

        /// Feedback message
        #[arg(long)]
        message: String,
    },

    /// List the available caption styles
    Styles,
}

/// System clipboard via arboard.
struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> caption_core::Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| CaptionError::Clipboard(e.to_string()))?;
        set_clipboard_text(&mut clipboard, text)
            .map_err(|e| CaptionError::Clipboard(e.to_string()))?;
        info!("Copied {} chars to clipboard", text.len());
        Ok(())
    }
}

/// X11 and Wayland serve the selection from this process, so the contents
/// vanish when the handle drops. Block until another client takes ownership.
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_clipboard_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    info!("Holding the clipboard until another application reads it");
    clipboard.set().wait().text(text.to_owned())
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_clipboard_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let config = StudioConfig::from_env();

    match cli.command {
        Commands::Generate {
            content,
            file,
            style,
            sentences,
            hashtags,
            model,
            copy,
            offline,
            json,
        } => {
            let content = read_content(content, file)?;

            let provider: Arc<dyn CompletionProvider> = if offline {
                info!("Offline mode: using the local fallback caption");
                Arc::new(MockProvider::failing())
            } else {
                let mut provider_config = ProviderConfig::from_env();
                if let Some(m) = model {
                    provider_config = provider_config.with_model(m);
                }
                if provider_config.api_key.is_none() {
                    warn!("No API key set (OPENAI_API_KEY); the fallback caption will be used");
                }
                Arc::new(OpenAiProvider::new(provider_config)?)
            };

            let generator = CaptionGenerator::new(provider, config);
            generator.set_content(content);
            generator.set_style(style);
            generator.set_sentence_count(SentenceCount::new(sentences)?);
            generator.set_hashtag_count(HashtagCount::new(hashtags)?);

            let caption = generator
                .generate()
                .await
                .context("Failed to generate caption")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&caption)?);
            } else {
                println!("{}", caption.text);
            }
            if caption.is_fallback() {
                info!("Caption generated locally (provider unavailable)");
            }

            if copy {
                generator
                    .copy(&SystemClipboard)
                    .context("Failed to copy caption")?;
            }
        }
        Commands::Feedback {
            name,
            email,
            message,
        } => {
            if config.access_key.is_empty() {
                warn!("WEB3FORMS_ACCESS_KEY is not set; the relay will likely reject this");
            }

            let relay = Web3FormsRelay::with_url(config.relay_url.clone())?;
            let form = FeedbackForm::new(relay, config);
            form.set_name(name);
            form.set_email(email);
            form.set_message(message);

            let outcome = form.submit().await.context("Invalid feedback")?;
            let banner = form.banner().unwrap_or_default();
            match outcome {
                SubmitOutcome::Sent => println!("{}", banner),
                SubmitOutcome::Failed => bail!("{}", banner),
            }
        }
        Commands::Styles => {
            for style in Style::ALL {
                println!("{:<14} {}", style.as_str(), style.guidance());
            }
        }
    }

    Ok(())
}

/// Content from the argument, a file, or stdin, in that order.
fn read_content(content: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(content) = content {
        return Ok(content);
    }
    if let Some(path) = file {
        info!("Reading content from {:?}", path);
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read content from stdin")?;
    Ok(buf)
}
