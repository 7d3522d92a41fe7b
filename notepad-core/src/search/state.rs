//! 検索セッションの状態管理

use super::types::{MatchSpan, SessionMode};
use crate::buffer::Selection;

/// 検索・置換UIが開いている間の状態
///
/// `restore_text` は常に注釈なしの本来の文書内容を保持する。
#[derive(Debug, Clone)]
pub struct SearchSession {
    /// 現在のUI種類
    pub mode: SessionMode,
    /// 復元用テキスト
    pub restore_text: String,
    /// 復元用テキストの文字数
    pub restore_len: usize,
    /// 復元用の選択範囲
    pub restore_selection: Selection,
    /// 直近に確定したマッチ範囲（括弧なし）
    pub span: Option<MatchSpan>,
    /// バッファに括弧付きハイライトを表示中か
    pub highlighted: bool,
    /// 検索へ切り替わった置換で入力されていた置換文字列
    pub pending_replacement: Option<String>,
}

impl SearchSession {
    /// 現在のバッファ内容と選択範囲からセッションを作成
    pub fn snapshot(mode: SessionMode, text: &str, selection: Selection) -> Self {
        Self {
            mode,
            restore_text: text.to_string(),
            restore_len: text.chars().count(),
            restore_selection: selection,
            span: None,
            highlighted: false,
            pending_replacement: None,
        }
    }

    /// 検索開始位置を決定する
    ///
    /// ハイライト表示中でバッファの選択がハイライトのままなら、マッチ終端から続ける。
    /// 選択が動かされていれば、その終端を括弧なしの座標に戻して使う。
    /// 開始位置が文書末尾以降なら先頭に折り返す。
    pub fn search_origin(&self, selection: Selection) -> usize {
        let end = match (self.highlighted, self.span) {
            (true, Some(span)) if selection == highlight_selection(span) => span.end,
            (true, Some(span)) => unbracketed_offset(selection.end, span.start, span.len()),
            _ => selection.end,
        };

        if end >= self.restore_len {
            0
        } else {
            end
        }
    }

    /// 新しい基準テキストを採用する
    pub fn commit(&mut self, text: String, caret: usize) {
        self.restore_len = text.chars().count();
        self.restore_text = text;
        self.restore_selection = Selection::collapsed(caret);
        self.span = Some(MatchSpan::new(caret, caret));
        self.highlighted = false;
        self.pending_replacement = None;
    }

    /// ハイライトを解除する
    pub fn clear_match(&mut self) {
        self.span = None;
        self.highlighted = false;
    }
}

/// 括弧付き表示でマッチ全体（括弧を含む）を覆う選択範囲
pub(crate) fn highlight_selection(span: MatchSpan) -> Selection {
    Selection::new(span.start, span.end + 2)
}

/// 括弧付き表示上の位置を括弧なしの位置に戻す
///
/// `[` は `marker_start`、`]` は `marker_start + term_len + 1` にある。
/// 括弧の内側の位置は1つ、`]` より後ろは2つ前にずれる。
pub(crate) fn unbracketed_offset(offset: usize, marker_start: usize, term_len: usize) -> usize {
    if offset <= marker_start {
        offset
    } else if offset <= marker_start + term_len + 1 {
        offset - 1
    } else {
        offset - 2
    }
}
