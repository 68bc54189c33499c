//! Sentence splitting for regulatory prose.
//!
//! A boundary is `.`, `!` or `?` followed by whitespace and then an
//! uppercase letter, digit, or opening quote/bracket, or by end of text.
//! Periods ending a known abbreviation (`e.g.`, `para.`, `U.S.`) are not
//! boundaries.

/// One sentence and its position in the source, in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
}

const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "cf.", "vs.", "approx.", "para.", "paras.", "no.", "nos.", "art.",
    "sec.", "p.", "pp.", "fig.", "vol.", "ch.", "inc.", "ltd.", "co.", "u.s.", "u.k.", "mr.",
    "mrs.", "ms.", "dr.",
];

fn ends_with_abbreviation(prefix: &str) -> bool {
    let last_word = prefix
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or(prefix);
    let lower = last_word.to_lowercase();
    ABBREVIATIONS.iter().any(|a| lower == *a)
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '(' | '[' | '\u{201c}')
}

pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0usize;

    let mut i = 0;
    while i < chars.len() {
        let (byte, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let end_byte = byte + c.len_utf8();
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            let at_end = j == chars.len();
            let is_boundary = at_end
                || (j > i + 1
                    && opens_sentence(chars[j].1)
                    && !(c == '.' && ends_with_abbreviation(&text[..end_byte])));
            if is_boundary {
                push_sentence(&chars, text, start, i + 1, &mut sentences);
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    push_sentence(&chars, text, start, chars.len(), &mut sentences);
    sentences
}

/// Push `chars[from..to]` trimmed, if anything is left.
fn push_sentence(chars: &[(usize, char)], text: &str, from: usize, to: usize, out: &mut Vec<Sentence>) {
    let mut from = from;
    let mut to = to;
    while from < to && chars[from].1.is_whitespace() {
        from += 1;
    }
    while to > from && chars[to - 1].1.is_whitespace() {
        to -= 1;
    }
    if from >= to {
        return;
    }
    let byte_start = chars[from].0;
    let byte_end = chars.get(to).map_or(text.len(), |(b, _)| *b);
    out.push(Sentence {
        text: text[byte_start..byte_end].to_string(),
        start: from,
        end: to,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_basic_sentences() {
        let s = split_sentences("Hello world. This is a test. Final sentence.");
        let texts: Vec<_> = s.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Hello world.", "This is a test.", "Final sentence."]);
    }

    #[test]
    fn offsets_are_character_positions() {
        let text = "Café rules apply. Next one.";
        let s = split_sentences(text);
        assert_eq!(s.len(), 2);
        let chars: Vec<char> = text.chars().collect();
        for sentence in &s {
            let slice: String = chars[sentence.start..sentence.end].iter().collect();
            assert_eq!(slice, sentence.text);
        }
    }

    #[test]
    fn abbreviations_and_decimals_do_not_split() {
        let s = split_sentences("See para. 12 of the U.S. rules, e.g. Topic 842. The rate is 4.5 percent.");
        assert_eq!(s.len(), 2);
        assert!(s[0].text.ends_with("Topic 842."));
    }

    #[test]
    fn lowercase_continuation_is_not_a_boundary() {
        let s = split_sentences("Amounts in approx. terms. Done? yes. Then stop!");
        let texts: Vec<_> = s.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Amounts in approx. terms.", "Done? yes.", "Then stop!"]);
    }

    #[test]
    fn empty_and_unterminated() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
        let s = split_sentences("no ending punctuation");
        assert_eq!(s.len(), 1);
        assert_eq!((s[0].start, s[0].end), (0, 21));
    }
}
