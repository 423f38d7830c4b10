//! Splitting text into diffable tokens

use unicode_segmentation::UnicodeSegmentation;

use crate::config::Unit;

/// Split `text` by `unit`. Concatenating the tokens gives back `text`.
pub fn tokenize(text: &str, unit: Unit) -> Vec<&str> {
    match unit {
        Unit::Line => text.split_inclusive('\n').collect(),
        Unit::Word => text.split_word_bounds().collect(),
        Unit::Char => text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect(),
        Unit::Grapheme => text.graphemes(true).collect(),
    }
}
