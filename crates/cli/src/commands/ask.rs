//! `answersmith ask`: Resolve a single question.

use super::{build_resolver, load_config};

pub async fn run(
    question: &str,
    context: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let resolver = build_resolver(&config)?;

    let resolution = resolver.resolve_detailed(question, context).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}", resolution.text);
    }

    Ok(())
}
