// パス: src/render/mod.rs
// 役割: 生成段階共通のエラー型とレンダラ境界を定義し、各出力実装を束ねる
// 意図: レンダラを差し替え可能にし、正規化済みの関数しか渡らないことを型で保証する
// 関連ファイル: src/render/xla.rs, src/output.rs, src/errors.rs

pub mod xla;

pub use xla::XlaCppRenderer;

use std::io;

use thiserror::Error;

use crate::errors::{ContractError, ExtractError, LookupError};
use crate::model::NormalizedFunction;

/// 生成（レンダリング・ファイル出力）で発生しうるエラー種別。
#[derive(Debug, Error)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("マニフェストの JSON が不正です: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("{0}")]
    Extract(#[from] ExtractError),
    #[error("{0}")]
    Contract(#[from] ContractError),
    #[error("{0}")]
    Lookup(#[from] LookupError),
}

/// 生成段階の結果を表す型。
pub type GenResult<T> = Result<T, GenError>;

impl From<tempfile::PersistError> for GenError {
    fn from(err: tempfile::PersistError) -> Self {
        GenError::Io(err.error)
    }
}

/// レンダラ境界。正規化済みの関数だけを受け取る。
pub trait Renderer {
    /// 関数ひとつ分の呼び出しコードを生成する。
    fn render_call(&self, func: &NormalizedFunction) -> GenResult<String>;

    /// モジュール全体（複数関数 + include 指令 + モジュール名）を生成する。
    fn render_module(
        &self,
        funcs: &[NormalizedFunction],
        includes: &[String],
        module_name: &str,
    ) -> GenResult<String>;
}
