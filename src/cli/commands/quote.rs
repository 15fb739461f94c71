//! Quote command implementation

use crate::bridge::{Quote, QuoteError, QuoteRequest};
use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::manager::{FundingError, FundingManager};
use crate::types::OutputFormat;

#[derive(Debug, thiserror::Error)]
pub enum QuoteCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Funding error: {0}")]
    Funding(#[from] FundingError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fetch a funding quote and print it, with a decoded transaction preview
pub async fn get_quote(
    request: QuoteRequest,
    overrides: ConfigOverrides,
    format: OutputFormat,
) -> Result<(), QuoteCommandError> {
    let config = load_config(None, overrides)?;
    let manager = FundingManager::new(config);

    let quote = manager.request_quote(&request).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        OutputFormat::Table => {
            print_quote(&quote);

            let preview = manager.preview_transaction(&quote);
            if let Some(memo) = &preview.memo {
                println!("  Memo:          {}", memo);
            }
        }
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("Quote via {}:", quote.tool);
    println!("  From:          {} sats", quote.from_amount);
    println!("  To:            {}", quote.to_amount);
    println!("  To (minimum):  {}", quote.to_amount_min);
    if let Some(usd) = &quote.to_amount_usd {
        println!("  Value (USD):   {}", usd);
    }
    println!("  Est. duration: {}s", quote.execution_duration);
    println!("  Deposit to:    {}", quote.transaction_request.to);
    if let Some(sats) = quote.value_sats() {
        println!("  Deposit value: {} sats", sats);
    }
}
