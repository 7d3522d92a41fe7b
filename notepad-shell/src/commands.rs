//! コマンドのディスパッチ
//!
//! ホストから届くコマンドを識別子ごとのハンドラへ振り分け、
//! ホストに依頼する処理（保存・ダイアログ表示など）を返す。

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::debug;
use notepad::document::SaveTarget;
use notepad::error::{CommandError, Result};
use notepad::search::{ReplaceOutcome, SessionTransition};
use serde::{Deserialize, Serialize};

use crate::context::EditorContext;

/// ホストから呼び出せるコマンド
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    NewDocument,
    OpenDocument,
    Save,
    SaveAs,
    OpenFind,
    OpenReplace,
    SubmitFind { term: String },
    SubmitReplace { term: String, replacement: String },
    CloseSession,
}

impl Command {
    pub fn id(&self) -> CommandId {
        match self {
            Command::NewDocument => CommandId::NewDocument,
            Command::OpenDocument => CommandId::OpenDocument,
            Command::Save => CommandId::Save,
            Command::SaveAs => CommandId::SaveAs,
            Command::OpenFind => CommandId::OpenFind,
            Command::OpenReplace => CommandId::OpenReplace,
            Command::SubmitFind { .. } => CommandId::SubmitFind,
            Command::SubmitReplace { .. } => CommandId::SubmitReplace,
            Command::CloseSession => CommandId::CloseSession,
        }
    }
}

/// コマンド識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    NewDocument,
    OpenDocument,
    Save,
    SaveAs,
    OpenFind,
    OpenReplace,
    SubmitFind,
    SubmitReplace,
    CloseSession,
}

impl CommandId {
    pub const ALL: [CommandId; 9] = [
        CommandId::NewDocument,
        CommandId::OpenDocument,
        CommandId::Save,
        CommandId::SaveAs,
        CommandId::OpenFind,
        CommandId::OpenReplace,
        CommandId::SubmitFind,
        CommandId::SubmitReplace,
        CommandId::CloseSession,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandId::NewDocument => "new-document",
            CommandId::OpenDocument => "open-document",
            CommandId::Save => "save",
            CommandId::SaveAs => "save-as",
            CommandId::OpenFind => "open-find",
            CommandId::OpenReplace => "open-replace",
            CommandId::SubmitFind => "submit-find",
            CommandId::SubmitReplace => "submit-replace",
            CommandId::CloseSession => "close-session",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = CommandError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| CommandError::NotFound {
                command: value.to_string(),
            })
    }
}

/// ホストへの依頼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "kebab-case")]
pub enum HostRequest {
    /// 現在のパスへ内容を保存
    Persist { content: String },
    /// 保存先を選ばせて内容を保存
    PersistAs { content: String },
    /// 開くファイルを選ばせる
    PickDocument,
    /// ウィンドウタイトルを更新
    SetTitle { title: String },
    /// 未保存の変更を破棄してよいか確認し、了承されたら `path` を開く
    ConfirmDiscard { path: PathBuf },
    /// `path` を読み込む
    OpenPath { path: PathBuf },
    /// 文書へフォーカスを戻す
    FocusDocument,
}

/// コマンドハンドラ
pub type CommandHandler = fn(&mut EditorContext, Command) -> Result<Vec<HostRequest>>;

/// コマンド識別子からハンドラへの対応表
#[derive(Clone)]
pub struct CommandTable {
    handlers: HashMap<CommandId, CommandHandler>,
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandTable {
    /// 空の対応表
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 標準コマンドをすべて登録した対応表
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(CommandId::NewDocument, new_document);
        table.register(CommandId::OpenDocument, open_document);
        table.register(CommandId::Save, save);
        table.register(CommandId::SaveAs, save_as);
        table.register(CommandId::OpenFind, open_find);
        table.register(CommandId::OpenReplace, open_replace);
        table.register(CommandId::SubmitFind, submit_find);
        table.register(CommandId::SubmitReplace, submit_replace);
        table.register(CommandId::CloseSession, close_session);
        table
    }

    /// ハンドラを登録（既存の登録は置き換える）
    pub fn register(&mut self, id: CommandId, handler: CommandHandler) {
        self.handlers.insert(id, handler);
    }

    pub fn contains(&self, id: CommandId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// コマンドを実行
    pub fn dispatch(
        &self,
        context: &mut EditorContext,
        command: Command,
    ) -> Result<Vec<HostRequest>> {
        let id = command.id();
        let handler = self.handlers.get(&id).ok_or_else(|| CommandError::NotFound {
            command: id.to_string(),
        })?;
        debug!("dispatch {id}");
        handler(context, command)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn new_document(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    context.engine.discard();
    context.buffer.reset();
    context.document.new_document();
    Ok(vec![
        HostRequest::SetTitle {
            title: context.title(),
        },
        HostRequest::FocusDocument,
    ])
}

fn open_document(_: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    Ok(vec![HostRequest::PickDocument])
}

fn save(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    let content = context.document_text().to_string();
    let request = match context.document.save_target() {
        SaveTarget::Save => HostRequest::Persist { content },
        SaveTarget::SaveAs => HostRequest::PersistAs { content },
    };
    Ok(vec![request])
}

fn save_as(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    Ok(vec![HostRequest::PersistAs {
        content: context.document_text().to_string(),
    }])
}

fn open_find(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    let transition = context.engine.open_find(&mut context.buffer);
    Ok(focus_after(transition))
}

fn open_replace(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    let transition = context.engine.open_replace(&mut context.buffer);
    Ok(focus_after(transition))
}

fn submit_find(context: &mut EditorContext, command: Command) -> Result<Vec<HostRequest>> {
    let Command::SubmitFind { term } = command else {
        return Err(payload_mismatch(CommandId::SubmitFind).into());
    };
    context.engine.find(&mut context.buffer, &term);
    Ok(Vec::new())
}

fn submit_replace(context: &mut EditorContext, command: Command) -> Result<Vec<HostRequest>> {
    let Command::SubmitReplace { term, replacement } = command else {
        return Err(payload_mismatch(CommandId::SubmitReplace).into());
    };
    let outcome = context
        .engine
        .replace(&mut context.buffer, &term, &replacement);
    if matches!(outcome, ReplaceOutcome::Replaced { .. }) {
        context.document.mark_modified();
    }
    Ok(Vec::new())
}

fn close_session(context: &mut EditorContext, _: Command) -> Result<Vec<HostRequest>> {
    if context.engine.close_session(&mut context.buffer) {
        Ok(vec![HostRequest::FocusDocument])
    } else {
        Ok(Vec::new())
    }
}

fn focus_after(transition: SessionTransition) -> Vec<HostRequest> {
    match transition {
        SessionTransition::Closed => vec![HostRequest::FocusDocument],
        SessionTransition::Opened(_) | SessionTransition::Switched(_) => Vec::new(),
    }
}

fn payload_mismatch(id: CommandId) -> CommandError {
    CommandError::InvalidPayload {
        command: id.to_string(),
        message: "handler received a different command".to_string(),
    }
}
