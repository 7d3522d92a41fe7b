//! 検索用マッチャー

use super::types::MatchSpan;
use crate::buffer::text_buffer::char_to_byte_index;

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// `origin`（文字インデックス）以降で最初のマッチを返す
    fn find_first(&self, text: &str, pattern: &str, origin: usize) -> Option<MatchSpan>;
}

/// 大文字小文字を区別する前方リテラルマッチャー
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher;

impl LiteralMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for LiteralMatcher {
    fn find_first(&self, text: &str, pattern: &str, origin: usize) -> Option<MatchSpan> {
        if pattern.is_empty() {
            return None;
        }

        let origin_byte = char_to_byte_index(text, origin);
        let local_byte = text[origin_byte..].find(pattern)?;
        let local = text[origin_byte..origin_byte + local_byte].chars().count();
        let start = origin + local;

        Some(MatchSpan::new(start, start + pattern.chars().count()))
    }
}

#[cfg(test)]
mod tests {
    use super::{LiteralMatcher, StringMatcher};
    use crate::search::types::MatchSpan;

    #[test]
    fn finds_first_occurrence_after_origin() {
        let matcher = LiteralMatcher::new();
        assert_eq!(
            matcher.find_first("hello world hello", "hello", 0),
            Some(MatchSpan::new(0, 5))
        );
        assert_eq!(
            matcher.find_first("hello world hello", "hello", 1),
            Some(MatchSpan::new(12, 17))
        );
    }

    #[test]
    fn is_case_sensitive() {
        let matcher = LiteralMatcher::new();
        assert_eq!(matcher.find_first("Hello", "hello", 0), None);
    }

    #[test]
    fn origin_at_end_finds_nothing() {
        let matcher = LiteralMatcher::new();
        assert_eq!(matcher.find_first("abc", "a", 3), None);
    }

    #[test]
    fn reports_character_offsets() {
        let matcher = LiteralMatcher::new();
        assert_eq!(
            matcher.find_first("日本語の日本", "日本", 1),
            Some(MatchSpan::new(4, 6))
        );
    }
}
