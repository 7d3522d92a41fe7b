use notepad::buffer::{locate, CursorLocation, Selection};
use notepad::error::Result;
use notepad::search::{EngineState, MatchSpan, SessionMode};
use serde::{Deserialize, Serialize};

use crate::context::EditorContext;

/// ホストUIへ渡す編集状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellSnapshot {
    /// 表示中の内容（検索中はハイライト注釈を含む）
    pub content: String,
    pub selection: Selection,
    pub cursor: CursorLocation,
    pub status_line: String,
    pub title: String,
    pub saved: bool,
    pub default_filename: String,
    pub session: Option<SessionSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub state: EngineState,
    pub match_span: Option<MatchSpan>,
    pub pending_replacement: Option<String>,
}

impl ShellSnapshot {
    pub fn from_context(context: &EditorContext) -> Result<Self> {
        let selection = context.buffer.selection();
        let cursor = locate(context.buffer.content(), selection.end)?;
        let session = context.engine.mode().map(|mode| SessionSnapshot {
            mode,
            state: context.engine.state(),
            match_span: context.engine.match_span(),
            pending_replacement: context.engine.pending_replacement().map(str::to_string),
        });

        Ok(Self {
            content: context.buffer.content().to_string(),
            selection,
            cursor,
            status_line: cursor.status_line(),
            title: context.title(),
            saved: context.document.is_saved(),
            default_filename: context.document.default_filename().to_string(),
            session,
        })
    }
}
