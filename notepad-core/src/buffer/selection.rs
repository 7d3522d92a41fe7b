//! 選択範囲
//!
//! バッファ内の選択範囲を文字インデックスで表現する

use serde::{Deserialize, Serialize};

/// 選択範囲（文字インデックス、終端は排他的）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// 選択開始位置
    pub start: usize,
    /// 選択終了位置
    pub end: usize,
}

impl Selection {
    /// 新しい選択範囲を作成
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 幅ゼロの選択（キャレット）を作成
    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// 選択幅（文字数）
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// 幅ゼロか判定
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `(start, end)` のタプルとして取得
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// 指定長のテキストに収まるか判定
    pub fn fits(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }

    /// テキストが短くなった場合に範囲を切り詰める
    pub(crate) fn clamped(self, len: usize) -> Self {
        let end = self.end.min(len);
        Self {
            start: self.start.min(end),
            end,
        }
    }
}
