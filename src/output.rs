// パス: src/output.rs
// 役割: 生成テキストを差分確認つきでファイルへ書き出す
// 意図: 内容が同じなら書き込みを省略し、ビルドの無駄な再実行を誘発しない
// 関連ファイル: src/render/mod.rs, src/cli.rs, tests/manifest_output.rs
//! 出力ファイル境界
//!
//! - 既存ファイルと生成テキストを純粋なテキスト比較で突き合わせ、
//!   一致すれば書かない（Unchanged）。
//! - 書く場合は同じディレクトリの一時ファイルへ書いてから差し替える。

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::model::FunctionSet;
use crate::normalize::normalize;
use crate::render::{GenResult, Renderer};

/// 書き込みの結果（利用者向けメッセージの元になる三値）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

impl WriteOutcome {
    /// 利用者向けの報告メッセージ。
    pub fn message(&self, path: &Path) -> String {
        match self {
            WriteOutcome::Created => format!("生成ファイルを新規作成しました: {}", path.display()),
            WriteOutcome::Updated => format!("生成ファイルを更新しました: {}", path.display()),
            WriteOutcome::Unchanged => {
                format!("生成ファイルに変更はありません: {}", path.display())
            }
        }
    }
}

/// 内容が変わるときだけファイルを書き換える。
pub fn write_if_changed(path: &Path, content: &str) -> GenResult<WriteOutcome> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    if existing.as_deref() == Some(content) {
        return Ok(WriteOutcome::Unchanged);
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path)?;

    Ok(if existing.is_some() {
        WriteOutcome::Updated
    } else {
        WriteOutcome::Created
    })
}

/// 抽出結果を正規化・レンダリングして出力ファイルへ書く。
///
/// モジュール名を省略した場合は出力ファイル名の語幹を使う。
pub fn generate_module_file(
    renderer: &dyn Renderer,
    path: &Path,
    funcs: FunctionSet,
    includes: &[String],
    module_name: Option<&str>,
) -> GenResult<WriteOutcome> {
    let stem;
    let module_name = match module_name {
        Some(name) => name,
        None => {
            stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "ffi_module".to_string());
            &stem
        }
    };

    let mut normalized = Vec::with_capacity(funcs.len());
    for func in funcs {
        normalized.push(normalize(func)?);
    }
    let code = renderer.render_module(&normalized, includes, module_name)?;
    write_if_changed(path, &code)
}
