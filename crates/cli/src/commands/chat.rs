//! `folio chat` — Interactive or single-message chat mode.

use folio_assistant::Assistant;
use folio_config::AppConfig;
use folio_core::completion::CompletionService;
use folio_knowledge::KnowledgeBase;
use folio_providers::{OpenAiCompatClient, RelayClient};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

pub async fn run(
    message: Option<String>,
    relay_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let service: Arc<dyn CompletionService> = match relay_url {
        Some(url) => Arc::new(RelayClient::new(url)),
        None => {
            let Some(api_key) = config.api_key.clone() else {
                eprintln!();
                eprintln!("  ERROR: No API key configured!");
                eprintln!();
                eprintln!("  Set one of these environment variables:");
                eprintln!("    FOLIO_API_KEY  = 'sk-...'");
                eprintln!("    OPENAI_API_KEY = 'sk-...'");
                eprintln!();
                eprintln!("  Or add it to your config file:");
                eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
                eprintln!();
                eprintln!("  Alternatively, point at a running relay: folio chat --relay-url URL");
                eprintln!();
                return Err("No API key found. See above for setup instructions.".into());
            };
            Arc::new(OpenAiCompatClient::new(
                "openai",
                config.relay.upstream_url.clone(),
                api_key,
            ))
        }
    };

    let kb = KnowledgeBase::load_or_fallback(&config.knowledge.path);
    let owner = kb.personal_info.name.clone();

    let mut assistant = Assistant::new(service, kb)
        .with_model(&config.chat.model)
        .with_temperature(config.chat.temperature)
        .with_max_tokens(config.chat.max_tokens)
        .with_limits(
            config.limits.max_message_chars,
            Duration::from_millis(config.limits.min_message_interval_ms),
        );

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = assistant.respond(&msg).await;
        eprint!("\r              \r");
        println!("{}", reply.text);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Folio — chat with {owner}'s portfolio assistant");
    println!();
    println!("  Model: {}", config.chat.model);
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        eprint!("  ...");
        let reply = assistant.respond(line).await;
        eprint!("\r    \r");
        println!();
        println!("  Assistant > {}", reply.text);
        if let Some(actions) = &reply.actions {
            let labels: Vec<String> = actions.iter().map(|a| format!("{a:?}")).collect();
            println!("  [suggested: {}]", labels.join(", "));
        }
        println!();
    }

    Ok(())
}
