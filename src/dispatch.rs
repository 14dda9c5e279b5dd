// パス: src/dispatch.rs
// 役割: テンプレート引数のインスタンス集合から実体化行とディスパッチキー行を合成する
// 意図: 行メジャー（先頭引数が最も遅く変わる）順序を唯一の正とし、両列を行対応で揃える
// 関連ファイル: src/model.rs, src/dtype.rs, tests/normalize_dispatch.rs
//! ディスパッチ合成器
//!
//! - 実体化行: 各テンプレート引数のインスタンストークンの直積。
//! - ディスパッチキー行: 同じ直積だが、型引数の列だけ型マッパーを通して
//!   実行時タグ（`DT::` 形）へ写したもの。
//! - 両者は行数・行順が完全に一致する。レンダラはこの順序に依存して
//!   明示的実体化と分岐表を安定した並びで生成する。
//! - テンプレート引数が 0 個なら、どちらも空行ちょうど 1 行。

use std::fmt::{self, Display, Formatter};

use crate::dtype::{element_type, ElementType};
use crate::errors::ContractError;
use crate::model::{NormalizedFunction, TemplateKind};

/// ディスパッチキー 1 列分のトークン。型引数は要素型タグ、非型はリテラル。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchToken {
    Dtype(ElementType),
    Literal(String),
}

impl Display for DispatchToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DispatchToken::Dtype(dt) => Display::fmt(dt, f),
            DispatchToken::Literal(lit) => f.write_str(lit),
        }
    }
}

/// 実体化行（リテラルトークンの直積）を行メジャー順で返す。
pub fn instantiation_rows(func: &NormalizedFunction) -> Vec<Vec<String>> {
    let sets: Vec<Vec<String>> = func
        .template_params
        .iter()
        .map(|tp| tp.instances.clone())
        .collect();
    cartesian(&sets)
}

/// ディスパッチキー行を行メジャー順で返す。型引数の写像失敗はそのまま伝播する。
pub fn dispatch_rows(
    func: &NormalizedFunction,
) -> Result<Vec<Vec<DispatchToken>>, ContractError> {
    let mut sets: Vec<Vec<DispatchToken>> = Vec::with_capacity(func.template_params.len());
    for tp in &func.template_params {
        let column = match &tp.kind {
            TemplateKind::Typename => tp
                .instances
                .iter()
                .map(|inst| element_type(inst).map(DispatchToken::Dtype))
                .collect::<Result<Vec<_>, _>>()?,
            TemplateKind::Value(_) => tp
                .instances
                .iter()
                .map(|inst| DispatchToken::Literal(inst.clone()))
                .collect(),
        };
        sets.push(column);
    }
    Ok(cartesian(&sets))
}

/// 実体化行をカンマ連結したテキスト行（そのまま `<...>` に差し込める形）。
pub fn instantiation_rows_joined(func: &NormalizedFunction) -> Vec<String> {
    instantiation_rows(func)
        .iter()
        .map(|row| row.join(", "))
        .collect()
}

/// ディスパッチキー行をカンマ連結したテキスト行。
pub fn dispatch_rows_joined(func: &NormalizedFunction) -> Result<Vec<String>, ContractError> {
    Ok(dispatch_rows(func)?
        .iter()
        .map(|row| {
            row.iter()
                .map(|tok| tok.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect())
}

/// 行メジャー順の直積。集合が 0 個なら空行ちょうど 1 行を返す。
fn cartesian<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut rows: Vec<Vec<T>> = vec![Vec::new()];
    for set in sets {
        let mut next = Vec::with_capacity(rows.len() * set.len());
        for row in &rows {
            for item in set {
                let mut extended = row.clone();
                extended.push(item.clone());
                next.push(extended);
            }
        }
        rows = next;
    }
    rows
}
