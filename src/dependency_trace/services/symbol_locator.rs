use crate::cache::ResultCache;
use crate::dependency_trace::domain::{
    Language, RepoId, SourceLocation, SymbolKind, SymbolReference,
};
use crate::dependency_trace::policies::CandidateRanking;
use crate::ports::outbound::{SearchHit, SourceHost};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Search hits examined per locate call.
const MAX_CANDIDATES: usize = 20;

/// Concurrent window fetches per locate call. The host adapter applies the
/// global in-flight limit on top of this.
const FETCH_CONCURRENCY: usize = 8;

/// Options controlling one locate call.
#[derive(Debug, Clone)]
pub struct LocateOptions {
    /// Maximum number of ranked locations returned
    pub top_n: usize,
    /// Primary language of the repository, for the extension filter
    pub language: Language,
    /// Lines of context fetched on each side of a hit
    pub context_lines: usize,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            language: Language::Java,
            context_lines: 12,
        }
    }
}

/// Finds and ranks the most likely source location of a symbol inside a
/// repository.
///
/// The locator issues a scoped lexical query through the source host,
/// fetches a bounded window of content around each hit, and scores the
/// windows with the replaceable `CandidateRanking` policy. Results are
/// ordered by descending confidence, then shorter path, then path, then
/// line number, so identical inputs always rank identically.
pub struct SymbolLocator<H: SourceHost> {
    host: Arc<H>,
    cache: ResultCache<(String, String), Vec<SourceLocation>>,
}

impl<H: SourceHost> SymbolLocator<H> {
    pub fn new(host: Arc<H>, cache_ttl: Duration) -> Self {
        Self {
            host,
            cache: ResultCache::new(cache_ttl),
        }
    }

    /// Returns at most `options.top_n` candidate locations, best first.
    /// An empty result means nothing plausible was found; that is not an
    /// error.
    pub async fn locate(
        &self,
        repository: &RepoId,
        symbol: &SymbolReference,
        options: &LocateOptions,
    ) -> Result<Vec<SourceLocation>> {
        let key = cache_key(repository, symbol, options.language);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(truncated(cached, options.top_n));
        }

        let ranked = self.locate_uncached(repository, symbol, options).await?;
        self.cache.put(key, ranked.clone());
        Ok(truncated(ranked, options.top_n))
    }

    /// Forced refresh for one (repository, symbol) pair.
    pub fn invalidate(&self, repository: &RepoId, symbol: &SymbolReference, language: Language) {
        self.cache.invalidate(&cache_key(repository, symbol, language));
    }

    async fn locate_uncached(
        &self,
        repository: &RepoId,
        symbol: &SymbolReference,
        options: &LocateOptions,
    ) -> Result<Vec<SourceLocation>> {
        let query = build_query(symbol);
        let extension = options.language.extension();

        let hits = self
            .host
            .search_code(repository, &query, Some(extension))
            .await?;

        let scored: Vec<Option<SourceLocation>> = stream::iter(
            hits.into_iter().take(MAX_CANDIDATES).map(|hit| {
                let repository = repository.clone();
                async move {
                    self.score_hit(&repository, symbol, options, hit).await
                }
            }),
        )
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

        let mut locations: Vec<SourceLocation> = scored.into_iter().flatten().collect();

        locations.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then(a.path.len().cmp(&b.path.len()))
                .then(a.path.cmp(&b.path))
                .then(a.line_start.cmp(&b.line_start))
        });

        Ok(locations)
    }

    /// Fetches a content window for one hit and scores it. A fetch failure
    /// falls back to scoring the search snippet alone; it never fails the
    /// whole locate call.
    async fn score_hit(
        &self,
        repository: &RepoId,
        symbol: &SymbolReference,
        options: &LocateOptions,
        hit: SearchHit,
    ) -> Option<SourceLocation> {
        let lines = match self.fetch_window(repository, &hit, options).await {
            Some(lines) => lines,
            None => snippet_lines(&hit),
        };

        let (line, confidence) =
            CandidateRanking::score_window(symbol, options.language, &hit.path, &lines)?;

        let line_start = lines.first().map(|(n, _)| *n).unwrap_or(line);
        let line_end = lines.last().map(|(n, _)| *n).unwrap_or(line);
        let snippet = lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Some(SourceLocation::new(
            repository.clone(),
            hit.path,
            line_start.min(line),
            line_end.max(line),
            snippet,
            confidence,
        ))
    }

    /// Fetches the numbered window around a hit. With an unknown hit line
    /// (0), the whole file is fetched and scanned instead.
    async fn fetch_window(
        &self,
        repository: &RepoId,
        hit: &SearchHit,
        options: &LocateOptions,
    ) -> Option<Vec<(usize, String)>> {
        let range = if hit.line_number > 0 {
            let start = hit.line_number.saturating_sub(options.context_lines).max(1);
            let end = hit.line_number + options.context_lines;
            Some((start, end))
        } else {
            None
        };

        let content = self
            .host
            .get_file_content(repository, &hit.path, range)
            .await
            .ok()?;

        let first_line = range.map(|(start, _)| start).unwrap_or(1);
        Some(
            content
                .lines()
                .enumerate()
                .map(|(i, text)| (first_line + i, text.to_string()))
                .collect(),
        )
    }
}

fn cache_key(
    repository: &RepoId,
    symbol: &SymbolReference,
    language: Language,
) -> (String, String) {
    (
        repository.visit_key(),
        format!("{}#{}", symbol.qualified_name(), language.extension()),
    )
}

fn truncated(mut locations: Vec<SourceLocation>, top_n: usize) -> Vec<SourceLocation> {
    locations.truncate(top_n);
    locations
}

/// Lexical query for the host's code search. Class lookups search for the
/// declaration form; methods and fields search for the bare name, with the
/// enclosing type left to the ranking bonus.
fn build_query(symbol: &SymbolReference) -> String {
    match symbol.kind() {
        SymbolKind::Class => format!("class {}", symbol.simple_name()),
        SymbolKind::Method | SymbolKind::Field => symbol.simple_name().to_string(),
    }
}

fn snippet_lines(hit: &SearchHit) -> Vec<(usize, String)> {
    let base = hit.line_number.max(1);
    hit.snippet
        .lines()
        .enumerate()
        .map(|(i, text)| (base + i, text.to_string()))
        .collect()
}
