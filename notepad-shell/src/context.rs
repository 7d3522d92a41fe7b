use notepad::buffer::TextBuffer;
use notepad::document::DocumentStatus;
use notepad::search::FindReplaceEngine;

/// ホストが所有する編集状態
///
/// バッファ・検索セッション・文書状態をまとめ、コマンドハンドラへ渡す。
#[derive(Debug)]
pub struct EditorContext {
    pub buffer: TextBuffer,
    pub engine: FindReplaceEngine,
    pub document: DocumentStatus,
    pub app_name: String,
}

impl EditorContext {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            buffer: TextBuffer::new(),
            engine: FindReplaceEngine::new(),
            document: DocumentStatus::new(),
            app_name: app_name.into(),
        }
    }

    /// ハイライト注釈を含まない本来の文書内容
    pub fn document_text(&self) -> &str {
        self.engine.document_text(&self.buffer)
    }

    /// 現在のウィンドウタイトル
    pub fn title(&self) -> String {
        self.document.title(&self.app_name)
    }
}
