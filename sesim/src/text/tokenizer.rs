use lazy_static::lazy_static;
use regex::Regex;

use super::stop_words::is_stop_word;

/// The token of a document without any other token.
pub(crate) const PLACEHOLDER: &str = " ";

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap(/* valid constant pattern */);
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|word| word.as_str())
}

/// Splits the text of a document of the given query into lowercased word tokens.
///
/// Stop words and numbers are dropped. If `remove_query_term` is set, the words of the query
/// and words containing the whole query are dropped as well. A document without any tokens
/// is represented by the [`PLACEHOLDER`] token.
pub(crate) fn tokenize(query: &str, text: &str, remove_query_term: bool) -> Vec<String> {
    let query = query.trim().to_lowercase();
    let text = text.to_lowercase();
    let query_words = words(&query).collect::<Vec<_>>();

    let tokens = words(&text)
        .filter(|word| !is_stop_word(word) && !word.chars().all(|c| c.is_ascii_digit()))
        .filter(|word| {
            !remove_query_term
                || !(query_words.contains(word) || (!query.is_empty() && word.contains(&query)))
        })
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if tokens.is_empty() {
        vec![PLACEHOLDER.to_string()]
    } else {
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_and_numbers() {
        let tokens = tokenize("athens", "The weather of Athens in 2020, sunny!", false);
        assert_eq!(tokens, ["weather", "athens", "sunny"]);
    }

    #[test]
    fn test_query_term_removal() {
        let tokens = tokenize(
            "Athens Greece",
            "Athens hotels near athens-greece and greece beaches",
            true,
        );
        assert_eq!(tokens, ["hotels", "near", "beaches"]);
    }

    #[test]
    fn test_query_substring_removal() {
        let tokens = tokenize("rust", "rustacean guide", true);
        assert_eq!(tokens, ["guide"]);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(tokenize("q", "", true), [PLACEHOLDER]);
        assert_eq!(tokenize("q", "the of 42 ...", false), [PLACEHOLDER]);
        assert_eq!(tokenize("q", "q", true), [PLACEHOLDER]);
    }
}
