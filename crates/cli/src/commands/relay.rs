//! `folio relay` — Start the HTTP relay server.

use folio_config::AppConfig;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port {
        config.relay.port = port;
    }

    println!();
    println!("  Folio relay");
    println!("  Listening:  http://{}:{}", config.relay.host, config.relay.port);
    println!("  Upstream:   {}", config.relay.upstream_url);
    println!(
        "  API key:    {}",
        if config.api_key.is_some() { "configured" } else { "MISSING" }
    );
    println!();

    folio_relay::serve(config).await
}
