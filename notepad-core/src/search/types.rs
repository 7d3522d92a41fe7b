//! 検索関連の共通型

use serde::{Deserialize, Serialize};

/// 検索UIの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// 検索
    Find,
    /// 置換
    Replace,
}

/// エンジンの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineState {
    /// セッションなし
    Closed,
    /// セッション中（ハイライトなし）
    SessionOpen,
    /// セッション中で括弧付きのマッチを表示している
    MatchDisplayed,
}

/// マッチ範囲（復元用テキスト上の文字インデックス、終端は排他的）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// マッチ長（文字数）
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// マッチが空か判定
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 何もしなかった理由（診断用。エラーではない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoOpReason {
    /// 検索セッションが開いていない
    NoSession,
    /// 検索語が空
    EmptyTerm,
    /// 復元用テキストが空
    EmptyDocument,
}

/// 検索の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    /// マッチを表示した
    Found(MatchSpan),
    /// 見つからず、内容を復元して選択を先頭に戻した
    NotFound,
    /// 何もしなかった
    Skipped(NoOpReason),
}

impl FindOutcome {
    pub fn span(&self) -> Option<MatchSpan> {
        match self {
            FindOutcome::Found(span) => Some(*span),
            _ => None,
        }
    }
}

/// 置換の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// 置換を確定した（`inserted` は挿入した置換文字列の範囲）
    Replaced { inserted: MatchSpan },
    /// 確定済みのマッチがなかったため検索を行った
    Searched(FindOutcome),
    /// 何もしなかった
    Skipped(NoOpReason),
}

/// セッション開閉操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Opened(SessionMode),
    Switched(SessionMode),
    Closed,
}
