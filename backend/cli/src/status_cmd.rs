//! CLI Status Command
//!
//! Asks a running gateway for its health report.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/health");
    let client = reqwest::Client::new();

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => println!("QuizForge answered {} at {url}", resp.status()),
        Err(_) => println!("QuizForge is not running on port {port}"),
    }

    Ok(())
}
