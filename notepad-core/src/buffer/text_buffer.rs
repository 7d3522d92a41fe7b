//! テキストバッファ
//!
//! 文書の文字列と現在の選択範囲を保持する。
//! オフセットはすべて文字インデックスで扱い、範囲外の指定は切り詰めずに拒否する。

use super::selection::Selection;
use crate::error::buffer::Result;
use crate::error::BufferError;

/// 文書の内容と選択範囲を保持するバッファ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    /// 文字数キャッシュ
    char_len: usize,
    selection: Selection,
}

impl TextBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列からバッファを作成（選択は先頭）
    pub fn from_str(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load(text);
        buffer
    }

    /// 現在の内容を取得
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.char_len
    }

    /// 空か判定
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// 内容を丸ごと置き換える
    ///
    /// 選択範囲は新しい長さに収まるよう切り詰める。
    /// 文書の再読み込みとして先頭に戻したい場合は [`TextBuffer::load`] を使う。
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.char_len = self.content.chars().count();
        self.selection = self.selection.clamped(self.char_len);
    }

    /// 文書を読み込み、選択を `(0, 0)` に戻す
    pub fn load(&mut self, text: &str) {
        self.set_content(text);
        self.selection = Selection::default();
    }

    /// 新規文書として空にする
    pub fn reset(&mut self) {
        self.load("");
    }

    /// 現在の選択範囲
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// 選択範囲を設定する
    ///
    /// ホストから渡される生のオフセットを受け取るため符号付き。
    /// `start > end` や `[0, len]` の外は `InvalidRange` で拒否し、バッファは変更しない。
    pub fn set_selection(&mut self, start: isize, end: isize) -> Result<()> {
        let range = self.checked_range(start, end)?;
        self.selection = Selection::new(range.0, range.1);
        Ok(())
    }

    /// 検証済みの選択範囲を設定する
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        if !selection.fits(self.char_len) {
            return Err(BufferError::invalid_range(
                selection.start as isize,
                selection.end as isize,
                self.char_len,
            ));
        }
        self.selection = selection;
        Ok(())
    }

    /// 半開区間 `[start, end)` の文字列を取得する
    pub fn slice(&self, start: isize, end: isize) -> Result<String> {
        let (start, end) = self.checked_range(start, end)?;
        Ok(slice_chars(&self.content, start, end).to_string())
    }

    /// 現在選択されている文字列
    pub fn selected_text(&self) -> &str {
        slice_chars(&self.content, self.selection.start, self.selection.end)
    }

    /// 内容と選択範囲をまとめて置き換える（検索エンジン用）
    ///
    /// 呼び出し側は範囲が新しい内容に収まることを保証する。
    pub(crate) fn replace_with(&mut self, text: String, selection: Selection) {
        self.content = text;
        self.char_len = self.content.chars().count();
        debug_assert!(selection.fits(self.char_len));
        self.selection = selection.clamped(self.char_len);
    }

    fn checked_range(&self, start: isize, end: isize) -> Result<(usize, usize)> {
        let len = self.char_len;
        let in_bounds = |value: isize| value >= 0 && (value as usize) <= len;
        if !in_bounds(start) || !in_bounds(end) || start > end {
            return Err(BufferError::invalid_range(start, end, len));
        }
        Ok((start as usize, end as usize))
    }
}

/// 文字インデックスをバイトインデックスに変換
pub(crate) fn char_to_byte_index(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

/// 文字インデックスで部分文字列を取得
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte_index(text, start);
    let end_byte = char_to_byte_index(text, end);
    &text[start_byte..end_byte]
}
