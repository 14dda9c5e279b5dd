// パス: src/lib.rs
// 役割: Crate root wiring modules and exports
// 意図: Expose minimal API surface for the signature pipeline
// 関連ファイル: src/model.rs, src/extract.rs, src/dispatch.rs
//! kernelgen ルートモジュール
//!
//! 目的:
//! - CUDA 風ソースから呼び出し可能関数のシグネチャを抽出し、テンプレート
//!   インスタンスの直積から FFI ディスパッチ表と明示的実体化を合成する。
//! - ビルドごとに一度走る生成器であり、スループットよりも生成コードの
//!   正しさ（順序・キー導出・検証失敗の即時性）を優先する。
//!
//! 方針:
//! - コメント/ドキュメントは日本語、識別子は英語。
//! - 文法（tree-sitter-cuda）は `cuda` フィーチャのアダプタに閉じ込め、
//!   抽出器自体は合成木だけでテストできるようにする。
//! - パブリックAPIは最小限。

pub mod dispatch;
pub mod dtype;
pub mod errors;
pub mod extract;
pub mod manifest;
pub mod model;
pub mod normalize;
pub mod output;
pub mod render;
pub mod syntax;

#[cfg(feature = "cuda")]
pub mod cli;

// 便利な再エクスポート（利用側からモデル/エラー/正規化のみ直接参照可）
pub use crate::errors::*;
pub use crate::model::*;
pub use crate::normalize::normalize;

/// CUDA ソーステキストから関数シグネチャを抽出する。
#[cfg(feature = "cuda")]
pub fn extract_from_source(src: &str) -> Result<model::FunctionSet, errors::ExtractError> {
    let root = syntax::cuda::parse_source(src)?;
    extract::extract_functions(&root)
}

/// ファイルを読み込んで抽出する。`only_kernels` で `__global__` 以外を落とし、
/// `names` を与えた場合はその関数だけに選別する（欠けている名前は
/// ファイル名つきの参照エラー）。
#[cfg(feature = "cuda")]
pub fn extract_from_file(
    path: &std::path::Path,
    only_kernels: bool,
    names: Option<&[&str]>,
) -> render::GenResult<model::FunctionSet> {
    let src = std::fs::read_to_string(path)?;
    let mut funcs = extract_from_source(&src)?;
    if only_kernels {
        funcs.retain_kernels();
    }
    if let Some(names) = names {
        funcs.select(names, &path.display().to_string())?;
    }
    Ok(funcs)
}
