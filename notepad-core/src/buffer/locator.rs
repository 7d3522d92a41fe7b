//! カーソル位置の行・列への変換
//!
//! ステータスバー表示用に、文字オフセットを1始まりの行・列と総行数へ射影する

use serde::{Deserialize, Serialize};

use crate::error::buffer::Result;
use crate::error::BufferError;

/// 行・列・総行数（1始まり。改行文字上の列のみ 0）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorLocation {
    pub line: usize,
    pub column: usize,
    pub total_lines: usize,
}

impl CursorLocation {
    /// 総行数の単位（1行なら "line"、それ以外は "lines"）
    pub fn lines_label(&self) -> &'static str {
        if self.total_lines == 1 {
            "line"
        } else {
            "lines"
        }
    }

    /// ステータスバー用の表示文字列
    pub fn status_line(&self) -> String {
        format!(
            "line {}, col {} - {} {}",
            self.line,
            self.column,
            self.total_lines,
            self.lines_label()
        )
    }
}

/// 文字オフセットを行・列へ変換する
///
/// 末尾の改行も1行として数える。オフセットが内容の長さを超える場合は拒否する。
///
/// 行頭はオフセット位置を含めてそれ以前の最後の改行の直後とする。
/// そのためカーソルが改行文字の上にあるときの列は 0 になる。
pub fn locate(content: &str, cursor_offset: usize) -> Result<CursorLocation> {
    let mut line = 1;
    let mut line_start = 0;
    let mut total_lines = 1;
    let mut len = 0;

    for (idx, ch) in content.chars().enumerate() {
        len = idx + 1;
        if ch != '\n' {
            continue;
        }
        total_lines += 1;
        if idx < cursor_offset {
            line += 1;
        }
        if idx <= cursor_offset {
            line_start = idx + 1;
        }
    }

    if cursor_offset > len {
        return Err(BufferError::invalid_range(
            cursor_offset as isize,
            cursor_offset as isize,
            len,
        ));
    }

    Ok(CursorLocation {
        line,
        column: cursor_offset + 1 - line_start,
        total_lines,
    })
}
