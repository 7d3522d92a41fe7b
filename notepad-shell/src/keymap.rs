use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notepad::error::{NotepadError, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::{Command, CommandId};
use crate::options::PrimaryModifier;

/// ホストから届くキー入力
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyStrokePayload {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    /// macOS の Command キー
    #[serde(default)]
    pub meta: bool,
}

#[derive(Debug, Error)]
pub enum KeyConversionError {
    #[error("未対応のキーです: {0}")]
    UnsupportedKey(String),
}

impl KeyStrokePayload {
    pub fn to_key_event(&self) -> std::result::Result<KeyEvent, KeyConversionError> {
        let code = parse_key_code(&self.key)?;
        let mut modifiers = KeyModifiers::empty();
        if self.ctrl {
            modifiers |= KeyModifiers::CONTROL;
        }
        if self.alt {
            modifiers |= KeyModifiers::ALT;
        }
        if self.shift {
            modifiers |= KeyModifiers::SHIFT;
        }
        if self.meta {
            modifiers |= KeyModifiers::SUPER;
        }
        Ok(KeyEvent::new(code, modifiers))
    }

    /// キー入力をコマンドに変換する（ショートカットでなければ `None`）
    pub fn resolve(&self, primary: PrimaryModifier) -> Result<Option<Command>> {
        let event = self.to_key_event().map_err(|err| {
            NotepadError::Application(format!("キー入力の変換に失敗しました: {err}"))
        })?;
        Ok(resolve_accelerator(&event, primary))
    }
}

/// 主修飾キー付きの入力をコマンドに対応付ける
pub fn resolve_accelerator(event: &KeyEvent, primary: PrimaryModifier) -> Option<Command> {
    if !event.modifiers.contains(primary_flag(primary)) {
        return None;
    }

    let KeyCode::Char(ch) = event.code else {
        return None;
    };
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    let command = match ch.to_ascii_lowercase() {
        'n' => Command::NewDocument,
        'o' => Command::OpenDocument,
        's' if shift => Command::SaveAs,
        's' => Command::Save,
        'f' => Command::OpenFind,
        'h' => Command::OpenReplace,
        _ => return None,
    };
    Some(command)
}

/// メニュー表示用のショートカット表記
pub fn shortcut_label(id: CommandId, primary: PrimaryModifier) -> Option<String> {
    let label = match id {
        CommandId::NewDocument => "Ctrl+N",
        CommandId::OpenDocument => "Ctrl+O",
        CommandId::Save => "Ctrl+S",
        CommandId::SaveAs => "Ctrl+Shift+S",
        CommandId::OpenFind => "Ctrl+F",
        CommandId::OpenReplace => "Ctrl+H",
        CommandId::SubmitFind | CommandId::SubmitReplace | CommandId::CloseSession => {
            return None
        }
    };
    Some(relabel_shortcut(label, primary))
}

/// 主修飾キーが Cmd の場合に表記中の `Ctrl` を `Cmd` に置き換える
pub fn relabel_shortcut(label: &str, primary: PrimaryModifier) -> String {
    match primary {
        PrimaryModifier::Cmd => label.replace("Ctrl", PrimaryModifier::Cmd.label()),
        PrimaryModifier::Ctrl => label.to_string(),
    }
}

fn primary_flag(primary: PrimaryModifier) -> KeyModifiers {
    match primary {
        PrimaryModifier::Ctrl => KeyModifiers::CONTROL,
        PrimaryModifier::Cmd => KeyModifiers::SUPER,
    }
}

fn parse_key_code(raw: &str) -> std::result::Result<KeyCode, KeyConversionError> {
    let key = raw.trim();
    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(ch));
    }

    let lower = key.to_ascii_lowercase();
    if let Some(number) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&number) {
            return Ok(KeyCode::F(number));
        }
    }

    let code = match lower.as_str() {
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "escape" | "esc" => KeyCode::Esc,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        _ => return Err(KeyConversionError::UnsupportedKey(key.to_string())),
    };

    Ok(code)
}
