use std::path::PathBuf;

use log::{debug, warn};
use notepad::buffer::TextBuffer;
use notepad::error::{CommandError, NotepadError, Result};

use crate::commands::{Command, CommandTable, HostRequest};
use crate::context::EditorContext;
use crate::keymap::KeyStrokePayload;
use crate::logging::{DebugLogger, ShellEvent};
use crate::options::ShellOptions;
use crate::snapshot::ShellSnapshot;

/// ホスト（ウィンドウ・ダイアログ・ディスクI/O）から編集状態を操作するコントローラー
pub struct ShellController {
    context: EditorContext,
    table: CommandTable,
    options: ShellOptions,
    logger: Option<DebugLogger>,
}

impl ShellController {
    pub fn new(options: ShellOptions) -> Result<Self> {
        let logger = match options.resolve_log_path() {
            Some(path) => Some(DebugLogger::new(path).map_err(log_error)?),
            None => None,
        };
        Ok(Self {
            context: EditorContext::new(options.app_name.clone()),
            table: CommandTable::standard(),
            options,
            logger,
        })
    }

    pub fn options(&self) -> &ShellOptions {
        &self.options
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    /// コマンドを実行し、ホストへの依頼を返す
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<HostRequest>> {
        self.log_event(&ShellEvent::Command(&command))?;
        let requests = self.table.dispatch(&mut self.context, command)?;
        self.log_event(&ShellEvent::Requests(&requests))?;
        Ok(requests)
    }

    /// JSON 形式のコマンドを実行する
    pub fn dispatch_json(&mut self, raw: &str) -> Result<Vec<HostRequest>> {
        let command: Command = serde_json::from_str(raw).map_err(|err| {
            CommandError::InvalidPayload {
                command: raw.to_string(),
                message: err.to_string(),
            }
        })?;
        self.dispatch(command)
    }

    /// キー入力を処理する（ショートカット以外は無視）
    pub fn handle_key(&mut self, payload: &KeyStrokePayload) -> Result<Vec<HostRequest>> {
        match payload.resolve(self.options.primary_modifier)? {
            Some(command) => self.dispatch(command),
            None => Ok(Vec::new()),
        }
    }

    /// 文書が差し替えられた（新規作成・ファイル読み込み）
    pub fn document_replaced(
        &mut self,
        content: &str,
        path: Option<PathBuf>,
    ) -> Result<Vec<HostRequest>> {
        self.context.engine.discard();
        self.context.buffer.load(content);
        match &path {
            Some(path) => self.context.document.opened(path.clone()),
            None => self.context.document.new_document(),
        }
        self.log_event(&ShellEvent::DocumentReplaced {
            path: path.as_deref(),
        })?;
        Ok(vec![HostRequest::SetTitle {
            title: self.context.title(),
        }])
    }

    /// 内容がディスクへ保存された（バッファは変更しない）
    pub fn content_committed(&mut self, path: Option<PathBuf>) -> Result<Vec<HostRequest>> {
        self.log_event(&ShellEvent::ContentCommitted {
            path: path.as_deref(),
        })?;
        self.context.document.committed(path);
        Ok(vec![HostRequest::SetTitle {
            title: self.context.title(),
        }])
    }

    /// 文書が直接編集された
    ///
    /// 選択範囲が新しい内容に収まらない場合は拒否し、状態を変更しない。
    /// ハイライト表示中の編集は注釈を外した内容として取り込む。注釈が崩れていれば
    /// セッションを閉じてバッファを復元し、編集を拒否する。
    pub fn content_edited(&mut self, content: &str, start: isize, end: isize) -> Result<()> {
        let mut edited = TextBuffer::from_str(content);
        edited.set_selection(start, end)?;
        if self.context.engine.is_open() {
            let Some((text, selection)) = self.context.engine.unannotate(content, edited.selection())
            else {
                let reason = "検索ハイライトが編集で崩れたため、編集を取り消しました";
                warn!("direct edit broke the search highlight; restoring document");
                self.context.engine.close_session(&mut self.context.buffer);
                self.log_event(&ShellEvent::EditRejected { reason })?;
                return Err(CommandError::InvalidPayload {
                    command: "content-edited".to_string(),
                    message: reason.to_string(),
                }
                .into());
            };
            edited = TextBuffer::from_str(&text);
            edited.select(selection)?;
            debug!("direct edit while search session is open; discarding session");
            self.context.engine.discard();
        }
        self.context.buffer = edited;
        self.context.document.mark_modified();
        Ok(())
    }

    /// カーソル・選択範囲が移動した。ステータス表示を返す
    pub fn selection_changed(&mut self, start: isize, end: isize) -> Result<String> {
        self.context.buffer.set_selection(start, end)?;
        self.status_line()
    }

    /// 検索UIからフォーカスが外れた
    pub fn search_focus_lost(&mut self) -> bool {
        self.context.engine.focus_lost(&mut self.context.buffer)
    }

    /// 既定ファイル名を更新する
    pub fn update_default_name(&mut self, name: &str) {
        self.context.document.set_default_filename(name);
    }

    /// ウィンドウを閉じる前に確認が必要か判定
    pub fn close_requested(&self) -> bool {
        self.context
            .document
            .needs_discard_confirmation(self.context.document_text())
    }

    /// ファイルがドロップされた
    pub fn file_dropped(&mut self, paths: &[PathBuf]) -> Vec<HostRequest> {
        let Some(path) = paths.first().cloned() else {
            warn!("file drop without paths");
            return Vec::new();
        };
        if self.close_requested() {
            vec![HostRequest::ConfirmDiscard { path }]
        } else {
            vec![HostRequest::OpenPath { path }]
        }
    }

    /// ステータスバー表示
    pub fn status_line(&self) -> Result<String> {
        let location = notepad::buffer::locate(
            self.context.buffer.content(),
            self.context.buffer.selection().end,
        )?;
        Ok(location.status_line())
    }

    pub fn snapshot(&self) -> Result<ShellSnapshot> {
        ShellSnapshot::from_context(&self.context)
    }

    fn log_event(&self, event: &ShellEvent<'_>) -> Result<()> {
        if let Some(logger) = &self.logger {
            logger.record(event).map_err(|err| {
                NotepadError::Application(format!("デバッグログ出力に失敗しました: {err}"))
            })?;
        }
        Ok(())
    }
}

fn log_error(err: std::io::Error) -> NotepadError {
    NotepadError::Application(format!("デバッグログの初期化に失敗しました: {err}"))
}
