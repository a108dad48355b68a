use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradejournal_market_data::{DirectoryProvider, StockData, StockLookupService, YahooProvider};
use tradejournal_symbol_input::{
    InputSnapshot, ResolutionEngine, SymbolInput, SymbolInputHandle, SymbolInputListener,
    ValidationStatus,
};

use crate::config::{Config, ProviderKind};

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_service(config: &Config) -> anyhow::Result<Arc<dyn StockLookupService>> {
    let service: Arc<dyn StockLookupService> = match config.provider {
        ProviderKind::Yahoo => Arc::new(YahooProvider::new()?),
        ProviderKind::Directory => Arc::new(DirectoryProvider::default()),
    };
    tracing::info!("Using {} for symbol lookups", service.id());
    Ok(service)
}

/// Writes form callbacks to the log.
struct TerminalListener;

impl SymbolInputListener for TerminalListener {
    fn on_change(&self, symbol: &str, stock: Option<&StockData>) {
        match stock {
            Some(data) => tracing::info!(
                "onChange: {} -> {} ({}) {}",
                symbol,
                data.name,
                data.exchange,
                data.price
            ),
            None => tracing::debug!("onChange: '{}'", symbol),
        }
    }

    fn on_price_update(&self, price: Decimal) {
        tracing::info!("onPriceUpdate: {}", price);
    }
}

enum Line<'a> {
    Text(&'a str),
    Pick(&'a str),
    Dismiss,
    Quit,
}

fn parse_line(line: &str) -> Line<'_> {
    match line.trim_end_matches(['\r', '\n']) {
        ":quit" | ":q" => Line::Quit,
        ":dismiss" => Line::Dismiss,
        other => match other.strip_prefix(":pick ") {
            Some(symbol) => Line::Pick(symbol.trim()),
            None => Line::Text(other),
        },
    }
}

pub fn render(snapshot: &InputSnapshot) -> String {
    let mut out = format!("[{}] {:?}", snapshot.token, snapshot.text);

    if let Some(message) = snapshot.required_error() {
        out.push_str(&format!("  ! {}", message));
    }

    match &snapshot.status {
        ValidationStatus::Idle => {}
        ValidationStatus::Checking => out.push_str("  checking..."),
        ValidationStatus::Confirmed(valid) => {
            out.push_str(&format!("  ok {} ({})", valid.display_name, valid.exchange));
            if let Some(price) = snapshot.displayed_price() {
                out.push_str(&format!(
                    "  {} {:+} ({:+}%) {:?}",
                    price,
                    valid.change_abs,
                    valid.change_pct,
                    valid.trend()
                ));
            }
        }
        ValidationStatus::Rejected { message } => out.push_str(&format!("  x {}", message)),
    }

    if snapshot.searching {
        out.push_str("  searching...");
    }
    if snapshot.dropdown_open {
        for candidate in &snapshot.candidates {
            out.push_str(&format!(
                "\n    {:<12} {} [{}]",
                candidate.symbol, candidate.display_name, candidate.exchange
            ));
        }
    }
    out
}

/// Print every published snapshot until the input stops.
fn spawn_renderer(input: &SymbolInputHandle) -> tokio::task::JoinHandle<()> {
    let mut updates = input.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            println!("{}", render(&snapshot));
        }
    })
}

/// Feed stdin lines into a symbol input. Each line is the full field value.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let input = SymbolInput::spawn(
        ResolutionEngine::new(service),
        config.input_config(),
        Arc::new(TerminalListener),
    );
    let renderer = spawn_renderer(&input);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Line::Quit => break,
            Line::Dismiss => input.dismiss()?,
            Line::Pick(symbol) => input.select_candidate(symbol)?,
            Line::Text(text) => input.set_text(text)?,
        }
    }

    input.shutdown().await;
    renderer.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert!(matches!(parse_line(":quit"), Line::Quit));
        assert!(matches!(parse_line(":dismiss"), Line::Dismiss));
        assert!(matches!(parse_line(":pick  TCS "), Line::Pick("TCS")));
        assert!(matches!(parse_line("rel\r"), Line::Text("rel")));
        assert!(matches!(parse_line(""), Line::Text("")));
    }
}
