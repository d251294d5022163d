use crate::text::stopwords::StopWords;

/// Lowercase word tokenizer.
///
/// A token is a run of alphanumeric characters or underscores at least
/// `min_token_len` characters long; everything else separates tokens.
/// Stop words are dropped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: StopWords,
    min_token_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}

impl Tokenizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            min_token_len: 2,
        }
    }

    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len.max(1);
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_drops_stop_words() {
        let tokens = Tokenizer::default().tokenize("The Web-Developer Bootcamp: HTML5, CSS & JS!");
        assert_eq!(tokens, vec!["web", "developer", "bootcamp", "html5", "css", "js"]);
    }

    #[test]
    fn drops_single_characters() {
        let tokens = Tokenizer::default().tokenize("C programming a to z");
        assert_eq!(tokens, vec!["programming"]);
    }

    #[test]
    fn stop_word_free_tokenizer_keeps_everything_long_enough() {
        let tokens = Tokenizer::new(StopWords::none()).tokenize("Learn to code in the cloud");
        assert_eq!(tokens, vec!["learn", "to", "code", "in", "the", "cloud"]);
    }
}
