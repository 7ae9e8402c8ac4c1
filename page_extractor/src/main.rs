use anyhow::Context;
use clap::Parser;
use page_extractor::assistant::{GeminiAssistant, GeminiConfig, ReplyGenerator, DEFAULT_MODEL};
use page_extractor::{utils, Extractor};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL or bare hostname to analyze
    #[arg(short, long)]
    url: String,

    /// Where to write the extraction result
    #[arg(short, long, default_value = "result.json")]
    output: PathBuf,

    /// Ask the assistant a question about the page
    #[arg(short, long)]
    ask: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let url = args.url.trim();
    anyhow::ensure!(!url.is_empty(), "URL must not be empty");

    let extractor = Extractor::new().context("failed to build HTTP client")?;
    let result = extractor.extract(url).await;

    println!("{} [{:?}]", result.title, result.status);
    if result.is_success() {
        println!("{} words, {} headings", result.word_count, result.headings.len());
    } else {
        eprintln!("{}", result.content);
    }
    utils::save_json(&result, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(question) = args.ask {
        let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set to use --ask")?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let assistant = GeminiAssistant::new(GeminiConfig::new(api_key).with_model(model))?;

        let reply = match assistant.reply(&result, &question).await {
            Ok(reply) => reply,
            Err(err) => err.user_message().to_string(),
        };
        println!("\n{reply}");
        utils::save_text(&reply, "reply.txt")?;
    }

    Ok(())
}
