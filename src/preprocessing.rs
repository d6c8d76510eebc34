use unicode_segmentation::UnicodeSegmentation;

use crate::resources::stemmer::Stemmer;
use crate::utils::Token;

const CLITICS: &[&str] = &["n't", "'s", "'m", "'d", "'re", "'ve", "'ll"];

/// Splits an utterance into word and punctuation tokens.
///
/// Whitespace is dropped, every punctuation mark becomes its own token and
/// English clitics are detached from their host word ("don't" gives "do" and
/// "n't").
pub fn tokenize(input: &str) -> Vec<Token> {
    input
        .split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
        .flat_map(split_clitic)
        .collect()
}

fn split_clitic(word: &str) -> Vec<Token> {
    CLITICS
        .iter()
        .filter_map(|clitic| {
            let split_index = word.len().checked_sub(clitic.len())?;
            if split_index > 0
                && word.is_char_boundary(split_index)
                && word[split_index..].to_lowercase() == *clitic
            {
                Some(split_index)
            } else {
                None
            }
        })
        .next()
        .map(|split_index| {
            vec![
                word[..split_index].to_string(),
                word[split_index..].to_string(),
            ]
        })
        .unwrap_or_else(|| vec![word.to_string()])
}

pub fn normalize(token: &str) -> Token {
    token.to_lowercase()
}

pub fn normalize_stem(tokens: &[Token], stemmer: &dyn Stemmer) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| stemmer.stem(&normalize(token)))
        .collect()
}
