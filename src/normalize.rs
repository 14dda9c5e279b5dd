// パス: src/normalize.rs
// 役割: 抽出済み関数を検証し、生成に使える正規形へ変換する
// 意図: 変換を値渡しの一方向にし、二重正規化の事故を型で封じる
// 関連ファイル: src/model.rs, src/dispatch.rs, tests/normalize_dispatch.rs
//! 検証・正規化
//!
//! - ホスト関数は先頭引数が `stream` でなければ契約違反。`stream` は生成側が
//!   自動で供給するため、正規形からは取り除く。
//! - 空のインスタンス列を持つテンプレート引数のうち bool 非型だけは
//!   true/false を既定値にできる。それ以外の空は契約違反
//!   （この非対称は生成対象の挙動に合わせて意図的に保っている）。

use crate::errors::ContractError;
use crate::model::{Function, NormalizedFunction};

/// ホスト関数の先頭に要求される実行コンテキスト引数の名前。
pub const STREAM_PARAM: &str = "stream";

/// 関数を消費して正規形を返す。失敗時は元の関数ごと破棄される。
pub fn normalize(func: Function) -> Result<NormalizedFunction, ContractError> {
    let Function {
        name,
        return_type,
        mut params,
        mut template_params,
        is_kernel,
        block_size,
        grid_size,
        smem_size,
        init_outputs_zero,
    } = func;

    if !is_kernel {
        match params.first() {
            Some(p) if p.name == STREAM_PARAM => {
                params.remove(0);
            }
            _ => {
                return Err(ContractError::in_function(
                    "CON001",
                    format!("ホスト関数の先頭引数は {STREAM_PARAM} でなければなりません"),
                    name,
                ));
            }
        }
    }

    for tp in &mut template_params {
        if tp.instances.is_empty() {
            if tp.kind.is_bool() {
                tp.instances = vec!["true".to_string(), "false".to_string()];
            } else {
                return Err(ContractError::in_function(
                    "CON002",
                    format!("テンプレート引数 {} のインスタンスを指定してください", tp.name),
                    name,
                ));
            }
        }
    }

    Ok(NormalizedFunction {
        name,
        return_type,
        params,
        template_params,
        is_kernel,
        block_size,
        grid_size,
        smem_size,
        init_outputs_zero,
    })
}
