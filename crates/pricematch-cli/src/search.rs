use futures::stream::{self, StreamExt};
use pricematch_core::{AppConfig, Candidate, SourceConfig, SourcesFile};
use pricematch_sources::{SourceClient, SourceError};

/// One-shot fan-out search; prints every source's candidates in configured
/// order once all have answered.
pub(crate) async fn run(config: &AppConfig, sources: &SourcesFile, term: &str) -> anyhow::Result<()> {
    let term = term.trim();
    anyhow::ensure!(!term.is_empty(), "search term must not be empty");

    let client = SourceClient::new(
        &config.base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let mut results: Vec<(&SourceConfig, Result<Vec<Candidate>, SourceError>)> =
        stream::iter(&sources.sources)
            .map(|source| {
                let fut = client.search(source, term);
                async move { (source, fut.await) }
            })
            .buffer_unordered(sources.sources.len().max(1))
            .collect()
            .await;

    let order = |s: &SourceConfig| sources.sources.iter().position(|c| c.name == s.name);
    results.sort_by_key(|(source, _)| order(*source));

    let failed = results.iter().filter(|(_, r)| matches!(r, Err(e) if e.is_transport())).count();
    print!("{}", format_results(&results));

    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "some sources failed");
    }
    Ok(())
}

fn format_results(results: &[(&SourceConfig, Result<Vec<Candidate>, SourceError>)]) -> String {
    let mut out = String::new();
    for (source, result) in results {
        out.push_str(&format!("{}:\n", source.label));
        match result {
            Ok(candidates) if !candidates.is_empty() => {
                for candidate in candidates {
                    out.push_str(&format!("  [{}] {}\n", candidate.id, candidate.label()));
                }
            }
            Ok(_) => out.push_str("  no products found\n"),
            Err(e) if !e.is_transport() => {
                tracing::debug!(source = %source.name, message = %e, "source returned no products");
                out.push_str("  no products found\n");
            }
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "search failed");
                out.push_str(&format!("  error: {e}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> SourceConfig {
        SourcesFile::builtin().get(name).cloned().unwrap()
    }

    #[test]
    fn formats_candidates_and_placeholders() {
        let pnp = source("pnp");
        let checkers = source("checkers");
        let deeliver = source("deeliver");
        let results = vec![
            (
                &pnp,
                Ok(vec![Candidate {
                    id: "1".to_string(),
                    name: "Milk 1L".to_string(),
                    price: "15.99".to_string(),
                }]),
            ),
            (&checkers, Ok(vec![])),
            (
                &deeliver,
                Err(SourceError::Api {
                    message: Some("No products found.".to_string()),
                }),
            ),
        ];
        assert_eq!(
            format_results(&results),
            "Pick n Pay:\n  [1] Milk 1L - 15.99\nCheckers:\n  no products found\nDeeliver:\n  no products found\n"
        );
    }

    #[test]
    fn transport_failure_is_reported() {
        let pnp = source("pnp");
        let results = vec![(
            &pnp,
            Err(SourceError::UnexpectedStatus {
                status: 502,
                url: "http://localhost:5000/pnp/search".to_string(),
            }),
        )];
        let out = format_results(&results);
        assert!(out.starts_with("Pick n Pay:\n  error: "));
    }
}
