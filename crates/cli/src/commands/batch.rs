//! `answersmith batch`: resolve every question in a file.
//!
//! Questions resolve concurrently; output keeps input order.

use super::{build_resolver, load_config};
use futures::StreamExt;
use std::path::Path;

pub async fn run(
    file: &Path,
    context: Option<&str>,
    concurrency: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let questions = parse_questions(&contents);
    if questions.is_empty() {
        println!("No questions found in {}", file.display());
        return Ok(());
    }

    let config = load_config()?;
    let resolver = build_resolver(&config)?;

    let answers: Vec<String> = futures::stream::iter(questions.iter())
        .map(|q| resolver.resolve(q, context))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (question, answer) in questions.iter().zip(&answers) {
        println!("Q: {question}");
        println!("A: {answer}");
        println!();
    }
    tracing::debug!(
        questions = questions.len(),
        cached = resolver.cache().len(),
        "Batch complete"
    );

    Ok(())
}

/// One question per line; blank lines and `#` comments are skipped.
fn parse_questions(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let contents = "# application for ACME\nWhy this role?\n\n   \n  Notice period?  \n";
        assert_eq!(parse_questions(contents), vec!["Why this role?", "Notice period?"]);
    }

    #[tokio::test]
    async fn empty_file_prints_nothing_to_resolve() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "\n# nothing here\n").unwrap();
        assert!(run(file.path(), None, 4).await.is_ok());
    }
}
