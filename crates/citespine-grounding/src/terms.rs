//! Content-term extraction shared by the scorer and the filler.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("static token pattern"));

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "being", "between", "both", "but", "by", "can", "could", "did", "do",
    "does", "each", "either", "for", "from", "had", "has", "have", "how", "if", "in", "into",
    "is", "it", "its", "may", "might", "must", "no", "not", "of", "on", "or", "other", "our",
    "over", "same", "shall", "should", "so", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "to", "under", "up", "upon", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "within", "would", "you", "your",
];

const SUFFIXES: &[&str] = &[
    "ations", "ation", "ments", "ment", "ings", "ing", "ies", "es", "ed", "s", "e",
];

/// Minimum stem length, in characters, left after stripping a suffix.
const MIN_STEM: usize = 4;

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Light suffix stripping, applied until stable. British `-is-` verb forms
/// are folded onto `-iz-` first so "recognise" and "recognize" agree.
pub fn stem(word: &str) -> String {
    let mut w = word.to_string();
    for british in ["isations", "isation", "ised", "ises", "ising", "ise"] {
        if let Some(root) = w.strip_suffix(british) {
            w = format!("{root}iz{}", &british[2..]);
            break;
        }
    }
    for _ in 0..3 {
        let Some(next) = strip_once(&w) else { break };
        w = next;
    }
    w
}

fn strip_once(w: &str) -> Option<String> {
    for suffix in SUFFIXES {
        if let Some(root) = w.strip_suffix(suffix) {
            let replacement = if *suffix == "ies" { "y" } else { "" };
            if root.chars().count() + replacement.len() >= MIN_STEM {
                return Some(format!("{root}{replacement}"));
            }
        }
    }
    None
}

/// Lowercased, stemmed content terms of `text`, without stop-words or
/// single-character tokens.
pub fn content_terms(text: &str) -> BTreeSet<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.chars().count() > 1 && !is_stopword(t))
        .map(|t| stem(&t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwords_are_sorted_for_binary_search() {
        assert!(STOPWORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn inflections_share_a_stem() {
        assert_eq!(stem("leases"), stem("lease"));
        assert_eq!(stem("leasing"), stem("lease"));
        assert_eq!(stem("liabilities"), stem("liability"));
        assert_eq!(stem("measured"), stem("measurement"));
        assert_eq!(stem("payments"), stem("payment"));
        assert_eq!(stem("recognised"), stem("recognized"));
        assert_eq!(stem("recognise"), stem("recognize"));
    }

    #[test]
    fn short_words_are_left_alone() {
        assert_eq!(stem("use"), "use");
        assert_eq!(stem("rate"), "rate");
    }

    #[test]
    fn content_terms_drop_noise() {
        let t = content_terms("How does a lessee recognize a lease liability?");
        let expected: BTreeSet<String> = ["lessee", "recognize", "lease", "liability"]
            .iter()
            .map(|s| stem(s))
            .collect();
        assert_eq!(t, expected);
    }
}
