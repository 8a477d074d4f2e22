//! Walks through the three client operations against a local farm-data PDF.
//!
//! Run with: cargo run --example farm-data -- generate|upload|chat [path]
use dotenv::dotenv;
use gemini_farm::{GeminiClient, UploadFileOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "chat".to_string());
    let path = args.next().unwrap_or_else(|| "./farm-data.pdf".to_string());

    let client = GeminiClient::from_env()?;

    match mode.as_str() {
        "generate" => {
            let response = client
                .generate_content("Analyze this farm data", [&path])
                .await?;
            println!("{response}");
        }
        "upload" => {
            let upload = client
                .upload_file(
                    &path,
                    UploadFileOptions::new().with_display_name("Farm Data 2024"),
                )
                .await?;
            println!("{upload:#?}");
        }
        // The file should list plots and crops for the chat to be useful.
        _ => client.start_chat_repl(&path).await?,
    }

    Ok(())
}
