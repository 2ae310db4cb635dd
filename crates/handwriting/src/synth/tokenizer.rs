//! Greedy longest-match-first text tokenization.
//!
//! Resolution order within a word: whole trained word, then trained ligature
//! pair, then single trained character, then untrained character. Whitespace
//! becomes advance/line-break tokens.

use crate::library::SampleLibrary;

/// One resolved segment of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A trained key: whole word, ligature pair, or single character
    Key(String),
    /// A character with no trained sample; rendered as a fallback glyph
    Untrained(char),
    Space,
    Newline,
}

/// Tokenize text against the trained keys in a library.
pub fn tokenize(text: &str, library: &SampleLibrary) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            flush_word(&mut word, library, &mut tokens);
            if c == '\n' {
                tokens.push(Token::Newline);
            } else {
                tokens.push(Token::Space);
            }
        } else {
            word.push(c);
        }
    }
    flush_word(&mut word, library, &mut tokens);

    tokens
}

/// Resolve one whitespace-delimited word into tokens.
fn flush_word(word: &mut String, library: &SampleLibrary, tokens: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }

    // Whole trained word beats any per-character split
    if library.has_key(word) {
        tokens.push(Token::Key(std::mem::take(word)));
        return;
    }

    let chars: Vec<char> = word.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        // Trained ligature pair beats two independent characters
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if library.has_key(&pair) {
                tokens.push(Token::Key(pair));
                i += 2;
                continue;
            }
        }

        let single = chars[i].to_string();
        if library.has_key(&single) {
            tokens.push(Token::Key(single));
        } else {
            tokens.push(Token::Untrained(chars[i]));
        }
        i += 1;
    }

    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Stroke, TrainingSample};

    fn library_with(keys: &[&str]) -> SampleLibrary {
        let mut lib = SampleLibrary::new();
        for key in keys {
            lib.insert(TrainingSample::new(
                *key,
                0,
                vec![Stroke::new(vec![
                    Point::new(0.0, 0.0, 0.5, 0),
                    Point::new(10.0, 10.0, 0.5, 16),
                ])],
            ))
            .unwrap();
        }
        lib
    }

    #[test]
    fn test_untrained_text_splits_into_chars() {
        let lib = SampleLibrary::new();
        assert_eq!(
            tokenize("hi", &lib),
            vec![Token::Untrained('h'), Token::Untrained('i')]
        );
    }

    #[test]
    fn test_ligature_beats_single_characters() {
        let lib = library_with(&["th", "t", "h", "e"]);
        assert_eq!(
            tokenize("the", &lib),
            vec![Token::Key("th".into()), Token::Key("e".into())]
        );
    }

    #[test]
    fn test_whole_word_beats_ligature() {
        let lib = library_with(&["the", "th", "e"]);
        assert_eq!(tokenize("the", &lib), vec![Token::Key("the".into())]);
    }

    #[test]
    fn test_whitespace_tokens() {
        let lib = library_with(&["a"]);
        assert_eq!(
            tokenize("a a\na", &lib),
            vec![
                Token::Key("a".into()),
                Token::Space,
                Token::Key("a".into()),
                Token::Newline,
                Token::Key("a".into()),
            ]
        );
    }

    #[test]
    fn test_mixed_trained_and_untrained() {
        let lib = library_with(&["t"]);
        assert_eq!(
            tokenize("to", &lib),
            vec![Token::Key("t".into()), Token::Untrained('o')]
        );
    }
}
