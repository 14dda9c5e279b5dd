// パス: src/manifest.rs
// 役割: テンプレートインスタンスを宣言的に与える JSON マニフェストを読む
// 意図: CLI からでも非 bool テンプレート引数のインスタンスを供給できるようにする
// 関連ファイル: src/model.rs, src/cli.rs, tests/manifest_output.rs
//! インスタンスマニフェスト
//!
//! 形式は「関数名 → テンプレート引数名 → 指定」の二段マップ。指定は
//! インスタンスの配列か、`instances` / `dtype_from_buffer` を持つ
//! オブジェクトのどちらでもよい。
//!
//! ```json
//! {
//!   "axpy": { "T": ["float", "int32_t"] },
//!   "gemm": { "T": { "instances": ["float"], "dtype_from_buffer": "out" } }
//! }
//! ```
//!
//! マニフェストに書かれた名前が抽出結果に存在しない場合は参照エラーになる。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::LookupError;
use crate::model::FunctionSet;
use crate::render::GenError;

/// テンプレート引数ひとつ分の指定。
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ParamSpec {
    /// インスタンス列だけの省略形。
    Instances(Vec<String>),
    /// インスタンス列と実行時要素型の推定元バッファ名。
    Detailed {
        #[serde(default)]
        instances: Vec<String>,
        #[serde(default)]
        dtype_from_buffer: Option<String>,
    },
}

/// マニフェスト全体（関数名 → テンプレート引数名 → 指定）。
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InstanceManifest {
    #[serde(flatten)]
    functions: BTreeMap<String, BTreeMap<String, ParamSpec>>,
}

impl InstanceManifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// 抽出結果へインスタンス指定を適用する。未知の名前は参照エラー。
    pub fn apply(&self, set: &mut FunctionSet) -> Result<(), LookupError> {
        for (func_name, params) in &self.functions {
            let func = set.get_mut(func_name).ok_or_else(|| {
                LookupError::new(
                    "LKP002",
                    format!("マニフェストの関数 {func_name} が抽出結果にありません"),
                )
            })?;
            for (param_name, spec) in params {
                let tp = func.template_param_mut(param_name).ok_or_else(|| {
                    LookupError::in_function(
                        "LKP003",
                        format!("テンプレート引数 {param_name} が見つかりません"),
                        func_name.clone(),
                    )
                })?;
                match spec {
                    ParamSpec::Instances(instances) => {
                        tp.instances = instances.clone();
                    }
                    ParamSpec::Detailed {
                        instances,
                        dtype_from_buffer,
                    } => {
                        if !instances.is_empty() {
                            tp.instances = instances.clone();
                        }
                        if dtype_from_buffer.is_some() {
                            tp.dtype_from_buffer = dtype_from_buffer.clone();
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
