use anyhow::{Context, Result};
use lyrica_client::{Config, HttpSearchClient};

pub async fn show_status(config: &Config) -> Result<()> {
    let client = HttpSearchClient::from_config(config)?;
    let status = client
        .status()
        .await
        .with_context(|| format!("Failed to reach backend at {}", client.base_url()))?;

    println!("\n🎵 Lyrica Backend Status\n");
    println!("  Backend: {}", client.base_url());
    println!("  Protocol: {}", client.protocol());
    println!(
        "  Embeddings loaded: {}",
        if status.embeddings_loaded { "yes" } else { "no" }
    );
    println!("  Indexed lines: {}", status.total_lines);
    println!(
        "  Model: {}",
        status.model_name.as_deref().unwrap_or("<unknown>")
    );

    if !status.embeddings_loaded {
        println!("\n  Semantic search will return nothing until embeddings are built.");
    }

    Ok(())
}
