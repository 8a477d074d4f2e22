use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use gemini_farm::{
    ApiKey, Attachment, FarmReport, GeminiClient, GeminiConfig, UploadFileOptions,
    provider::DEFAULT_MODEL,
};
use tracing_subscriber::EnvFilter;

const HELP_EXAMPLES: &str = "Examples:\n  gemini-farm generate \"Analyze this farm data\" --file ./farm-data.pdf\n  gemini-farm upload ./farm-data.pdf --display-name \"Farm Data 2024\"\n  gemini-farm chat ./test.pdf";

#[derive(Debug, Parser)]
#[command(
    name = "gemini-farm",
    about = "Turn farm documents into plot and crop JSON with Gemini",
    after_help = HELP_EXAMPLES
)]
struct Cli {
    /// Model to use
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Environment variable holding the API key (defaults to GEMINI_API_KEY)
    #[arg(long, global = true)]
    api_key_env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate a reply from a prompt and optional files")]
    Generate {
        prompt: String,
        /// File to attach; repeat for several
        #[arg(long = "file", short = 'f')]
        files: Vec<PathBuf>,
        /// Constrain the reply to the farm report schema and validate it
        #[arg(long)]
        structured: bool,
    },
    #[command(about = "Upload a file to the Gemini file service")]
    Upload {
        path: PathBuf,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        mime_type: Option<String>,
    },
    #[command(about = "Chat about a farm-data PDF until you type \"exit\"")]
    Chat {
        path: PathBuf,
        /// Constrain replies to the farm report schema
        #[arg(long)]
        structured: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_key = cli.api_key_env.map_or(ApiKey::Default, ApiKey::Env);
    let config = GeminiConfig::from_api_key(&api_key)?.with_model(cli.model);

    match cli.command {
        Commands::Generate {
            prompt,
            files,
            structured,
        } => {
            let config = if structured {
                config.with_structured_output()
            } else {
                config
            };
            let client = GeminiClient::new(config)?;

            let attachments: Vec<Attachment> = files.into_iter().map(Attachment::guess).collect();
            let text = client.generate_with_attachments(&prompt, &attachments).await?;

            if structured {
                let report = FarmReport::parse(&text)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{text}");
            }
        }
        Commands::Upload {
            path,
            display_name,
            mime_type,
        } => {
            let client = GeminiClient::new(config)?;
            let options = UploadFileOptions {
                mime_type,
                display_name,
                name: None,
            };
            let response = client.upload_file(&path, options).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Chat { path, structured } => {
            let config = if structured {
                config.with_structured_output()
            } else {
                config
            };
            GeminiClient::new(config)?.start_chat_repl(&path).await?;
        }
    }

    Ok(())
}
