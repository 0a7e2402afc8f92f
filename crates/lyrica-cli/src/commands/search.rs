use std::io::IsTerminal;

use anyhow::Result;
use lyrica_client::{Config, HttpSearchClient, SearchOutcome, SearchSession};
use lyrica_core::FilterState;

use crate::render::{self, OutputFormat};

pub async fn run_search(
    config: &Config,
    include: &[String],
    exclude: &[String],
    format: OutputFormat,
) -> Result<()> {
    let mut filter = FilterState::new();
    for term in include {
        filter.add_include(term);
    }
    for term in exclude {
        filter.add_exclude(term);
    }

    let client = HttpSearchClient::from_config(config)?;
    log::debug!("Searching {} ({} protocol)", client.base_url(), client.protocol());
    let session = SearchSession::new(client);

    let outcome = match session.search(&filter.snapshot()).await {
        Ok(outcome) => outcome,
        Err(e) => anyhow::bail!("{}", e.user_prompt()),
    };

    if let SearchOutcome::Failed { error, .. } = &outcome {
        if error.is_transient() {
            log::info!("The backend at {} may be unavailable", config.backend_url);
        }
    }

    let state = session.state();
    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    render::write_results(&mut stdout.lock(), &state.results, format, styled)?;

    Ok(())
}
