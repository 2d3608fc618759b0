use crate::dependency_trace::domain::{Language, SymbolReference};
use regex::Regex;

/// CandidateRanking policy scoring how likely a fetched code window is the
/// definition of a symbol.
///
/// The available signal is purely lexical, so this policy is deliberately a
/// self-contained, replaceable unit: any deterministic scoring that orders
/// (a) signature-shaped declarations above (b) bare-name declaration lines
/// above (c) comments and call sites satisfies the locator's contract.
///
/// Scores, bounded to 0..=100:
/// - signature-shaped declaration (declaration keyword + name + parameter
///   list on one line): 88
/// - bare name on a declaration-context line: 56
/// - comment or call-site occurrence: 18
/// - +12 when the enclosing-type hint appears in the window or the file path
pub struct CandidateRanking;

const SCORE_SIGNATURE: u8 = 88;
const SCORE_DECLARATION: u8 = 56;
const SCORE_MENTION: u8 = 18;
const ENCLOSING_TYPE_BONUS: u8 = 12;

/// How a single line relates to the symbol being located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClass {
    SignatureDeclaration,
    DeclarationContext,
    Mention,
}

impl CandidateRanking {
    /// Scores a window of file content. `lines` carries (line number, text)
    /// pairs; the best-scoring line wins and its line number is returned
    /// alongside the score. Returns None when the window never mentions the
    /// symbol's simple name.
    pub fn score_window(
        symbol: &SymbolReference,
        language: Language,
        path: &str,
        lines: &[(usize, String)],
    ) -> Option<(usize, u8)> {
        let name = symbol.simple_name();

        let mut best: Option<(usize, u8)> = None;
        for (line_number, text) in lines {
            if !contains_word(text, name) {
                continue;
            }

            let class = Self::classify_line(text, name, language);
            let score = match class {
                MatchClass::SignatureDeclaration => SCORE_SIGNATURE,
                MatchClass::DeclarationContext => SCORE_DECLARATION,
                MatchClass::Mention => SCORE_MENTION,
            };

            // Earlier line wins a tie within one window.
            let better = match best {
                Some((_, current)) => score > current,
                None => true,
            };
            if better {
                best = Some((*line_number, score));
            }
        }

        let (line, mut score) = best?;

        if Self::enclosing_type_hinted(symbol, path, lines) {
            score = score.saturating_add(ENCLOSING_TYPE_BONUS).min(100);
        }

        Some((line, score))
    }

    /// Classifies one line of source against the symbol's simple name.
    pub fn classify_line(text: &str, name: &str, language: Language) -> MatchClass {
        let trimmed = text.trim_start();

        if is_comment_line(trimmed) {
            return MatchClass::Mention;
        }

        if signature_pattern(name).is_match(trimmed)
            && declaration_keywords(language)
                .iter()
                .any(|kw| contains_word(trimmed, kw))
        {
            return MatchClass::SignatureDeclaration;
        }

        if declaration_keywords(language)
            .iter()
            .any(|kw| contains_word(trimmed, kw))
        {
            return MatchClass::DeclarationContext;
        }

        MatchClass::Mention
    }

    fn enclosing_type_hinted(
        symbol: &SymbolReference,
        path: &str,
        lines: &[(usize, String)],
    ) -> bool {
        let Some(enclosing) = symbol.enclosing_type() else {
            return false;
        };

        path.contains(enclosing) || lines.iter().any(|(_, text)| contains_word(text, enclosing))
    }
}

/// Whole-word occurrence check; identifier characters on either side
/// disqualify the match.
fn contains_word(haystack: &str, word: &str) -> bool {
    let mut start = 0;
    while let Some(idx) = haystack[start..].find(word) {
        let at = start + idx;
        let before_ok = at == 0
            || !haystack[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        let after = at + word.len();
        let after_ok = after >= haystack.len()
            || !haystack[after..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');

        if before_ok && after_ok {
            return true;
        }
        start = at + word.len();
    }
    false
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

fn signature_pattern(name: &str) -> Regex {
    // name immediately followed by a parameter list
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name)))
        .expect("escaped identifier always forms a valid pattern")
}

fn declaration_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Java => &[
            "public",
            "protected",
            "private",
            "static",
            "final",
            "abstract",
            "class",
            "interface",
            "enum",
            "void",
        ],
        Language::Kotlin => &[
            "fun", "val", "var", "class", "interface", "object", "override", "private", "internal",
        ],
        Language::Scala => &["def", "val", "var", "class", "trait", "object", "override"],
        Language::Groovy => &["def", "class", "interface", "static", "void", "private"],
    }
}
