use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use notepad_shell::{logging, OptionOverrides, ShellController, ShellOptions};
use serde_json::json;

/// 標準入力から1行1コマンドの JSON を読み、依頼とスナップショットを出力する
/// ヘッドレス実行用のエントリポイント
fn main() -> Result<()> {
    let base = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ShellOptions::load(&path)
            .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()))?,
        None => ShellOptions::default(),
    };
    let overrides = OptionOverrides::from_env().context("環境変数の設定が不正です")?;
    let options = base.merged_with(&overrides);

    logging::init(options.level_filter()?).context("ロガーの初期化に失敗しました")?;

    let mut controller =
        ShellController::new(options).context("コントローラーの初期化に失敗しました")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match controller.dispatch_json(&line) {
            Ok(requests) => json!({
                "requests": requests,
                "snapshot": controller.snapshot()?,
            }),
            Err(err) => {
                log::warn!("command rejected: {err}");
                json!({ "error": err.to_string() })
            }
        };
        writeln!(stdout, "{response}")?;
    }

    Ok(())
}
