//! `answersmith doctor`: diagnose configuration and connectivity.

use super::build_store;
use answersmith_config::AppConfig;
use answersmith_core::error::StoreError;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Answersmith Doctor");
    println!("==================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ok    Config file found at {}", config_path.display());
    } else {
        println!("  info  No config file, using defaults and environment");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ok    Configuration valid");
            config
        }
        Err(e) => {
            println!("  FAIL  Configuration invalid: {e}");
            println!("\n  1 issue found. Fix the configuration first.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ok    API key configured");
    } else {
        println!("  warn  No API key configured (set ANSWERSMITH_API_KEY or OPENAI_API_KEY)");
        issues += 1;
    }

    match answersmith_providers::build_from_config(&config) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("  ok    Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  FAIL  Provider '{}' rejected the health check", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  FAIL  Provider '{}' unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        Err(e) => {
            println!("  FAIL  Provider '{}' not configured: {e}", config.provider);
            issues += 1;
        }
    }

    if config.store.enabled {
        let lookup = match build_store(&config) {
            Ok(store) => store.lookup("answersmith doctor check").await,
            Err(e) => Err(e),
        };
        match lookup {
            Ok(_) | Err(StoreError::Status(_)) | Err(StoreError::Malformed(_)) => {
                println!("  ok    Answer store reachable at {}", config.store.base_url);
            }
            Err(e) => {
                println!("  warn  Answer store at {}: {e}", config.store.base_url);
                println!("        Lookups will miss and answers will not be saved.");
                issues += 1;
            }
        }
    } else {
        println!("  info  Answer store disabled");
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
