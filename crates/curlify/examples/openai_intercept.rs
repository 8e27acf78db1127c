//! Send one chat completion through a client that prints it as curl first.
//!
//! Run with `OPENAI_API_KEY` set. The key appears in the printed command as
//! `$OPENAI_API_KEY`, and the request body is written via a heredoc to
//! `fetch_payload.json`.
//!
//! ```sh
//! OPENAI_API_KEY=sk-... RUST_LOG=curlify=debug cargo run --example openai_intercept
//! ```

use anyhow::{Context, Result};
use curlify::{CurlLoggerMiddleware, Environment, PrettyJsonLogger};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;

    let logger = PrettyJsonLogger::new(Environment::from_process());
    let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
        .with(CurlLoggerMiddleware::new(logger))
        .build();

    let body = json!({
        "model": "gpt-4o-mini",
        "messages": [{"role": "user", "content": "Hello!"}],
    });

    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {api_key}"))
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(&body)?)
        .send()
        .await?;

    println!("Status: {}", response.status());
    println!("{}", response.text().await?);

    Ok(())
}
