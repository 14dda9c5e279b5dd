// パス: src/model.rs
// 役割: 抽出された関数シグネチャのデータモデルを定義する
// 意図: 抽出済み（Function）と正規化済み（NormalizedFunction）を型で区別する
// 関連ファイル: src/extract.rs, src/normalize.rs, src/dispatch.rs
//! シグネチャモデル
//!
//! - `Parameter` / `TemplateParameter` / `Function` は構文木から抽出した生の形。
//! - `NormalizedFunction` は `normalize` を通過した後の形で、レンダラと
//!   ディスパッチ合成だけが消費する。二重正規化は型レベルで表現不能。
//! - 引数・テンプレート引数は宣言順の列で保持する。テンプレート引数の順序は
//!   ディスパッチキーの列順そのものであり、意味を持つ。

use crate::errors::LookupError;

/// 呼び出し可能関数の仮引数ひとつ。抽出後は不変。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
    pub is_ptr: bool,
    pub is_const: bool,
    /// 生成コードへそのまま渡す初期化式（任意）。
    pub expression: Option<String>,
    /// 出力バッファをゼロ初期化するかどうか。
    pub init_zero: bool,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn pointer(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_ptr: true,
            ..Self::new(ty, name)
        }
    }
}

/// テンプレート引数の種別。`Typename` は型引数、`Value` は非型引数（宣言型の綴り付き）。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Typename,
    Value(String),
}

impl TemplateKind {
    /// bool 型の非型引数だけが空インスタンスの既定値（true/false）を持てる。
    pub fn is_bool(&self) -> bool {
        matches!(self, TemplateKind::Value(ty) if ty == "bool")
    }
}

/// 呼び出し可能関数のテンプレート仮引数ひとつ。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateParameter {
    pub kind: TemplateKind,
    pub name: String,
    /// この引数を実体化してよいリテラルトークンの列。抽出直後は空。
    pub instances: Vec<String>,
    /// 実行時要素型を推定するバッファ引数の名前（任意）。
    pub dtype_from_buffer: Option<String>,
}

impl TemplateParameter {
    pub fn typename(name: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::Typename,
            name: name.into(),
            instances: Vec::new(),
            dtype_from_buffer: None,
        }
    }

    pub fn value(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: TemplateKind::Value(ty.into()),
            name: name.into(),
            instances: Vec::new(),
            dtype_from_buffer: None,
        }
    }

    /// ディスパッチタプルで使う C 型（型引数なら DT、非型なら宣言型の綴り）。
    pub fn ctype(&self) -> &str {
        match &self.kind {
            TemplateKind::Typename => "DT",
            TemplateKind::Value(ty) => ty,
        }
    }
}

/// 構文木から抽出された関数ひとつ。`normalize` に渡すまでの中間表現。
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    /// 宣言順の仮引数列。名前での参照は `param` を使う。
    pub params: Vec<Parameter>,
    /// 宣言順のテンプレート仮引数列。この順序がディスパッチキーの列順。
    pub template_params: Vec<TemplateParameter>,
    /// true なら GPU エントリポイント（`__global__`）、false ならホスト関数。
    pub is_kernel: bool,
    // 以下はレンダラへそのまま渡す自由形式のフィールド。
    pub block_size: String,
    pub grid_size: String,
    pub smem_size: String,
    pub init_outputs_zero: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>, is_kernel: bool) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
            template_params: Vec::new(),
            is_kernel,
            block_size: String::new(),
            grid_size: String::new(),
            smem_size: String::new(),
            init_outputs_zero: false,
        }
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn template_param_mut(&mut self, name: &str) -> Option<&mut TemplateParameter> {
        self.template_params.iter_mut().find(|p| p.name == name)
    }

    /// テンプレート引数のインスタンス列を名前指定で設定する。
    pub fn set_instances(&mut self, param: &str, instances: &[&str]) -> Result<(), LookupError> {
        let func = self.name.clone();
        match self.template_param_mut(param) {
            Some(tp) => {
                tp.instances = instances.iter().map(|s| s.to_string()).collect();
                Ok(())
            }
            None => Err(LookupError::in_function(
                "LKP003",
                format!("テンプレート引数 {param} が見つかりません"),
                func,
            )),
        }
    }
}

/// `normalize` を通過した関数。ホスト関数の stream 引数は除去済みで、
/// すべてのテンプレート引数は空でないインスタンス列を持つ。
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedFunction {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Parameter>,
    pub template_params: Vec<TemplateParameter>,
    pub is_kernel: bool,
    pub block_size: String,
    pub grid_size: String,
    pub smem_size: String,
    pub init_outputs_zero: bool,
}

/// 抽出された関数の名前付きコレクション。
///
/// 挿入順を保持しつつ、同名の再挿入は元の位置を保ったまま上書きする
/// （同名の後方宣言が前方宣言を置き換える、という抽出規則に対応する）。
#[derive(Clone, Debug, Default)]
pub struct FunctionSet {
    entries: Vec<Function>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同名エントリがあれば置換、なければ末尾に追加する。
    pub fn insert(&mut self, func: Function) {
        match self.entries.iter_mut().find(|f| f.name == func.name) {
            Some(slot) => *slot = func,
            None => self.entries.push(func),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.entries.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.entries.iter_mut().find(|f| f.name == name)
    }

    /// 名前で関数を要求し、存在しなければ関数名とファイル名入りで失敗する。
    pub fn require(&self, name: &str, file: &str) -> Result<&Function, LookupError> {
        self.get(name).ok_or_else(|| {
            LookupError::with_file("LKP001", format!("関数 {name} が見つかりません"), file)
        })
    }

    /// 指定した名前の関数だけを残す（要求と選別を兼ねる）。
    /// 欠けている名前はファイル名つきの参照エラーになる。
    pub fn select(&mut self, names: &[&str], file: &str) -> Result<(), LookupError> {
        for name in names {
            self.require(name, file)?;
        }
        self.entries.retain(|f| names.contains(&f.name.as_str()));
        Ok(())
    }

    /// カーネル（エントリポイント）以外を取り除く。
    pub fn retain_kernels(&mut self) {
        self.entries.retain(|f| f.is_kernel);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.entries.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FunctionSet {
    type Item = Function;
    type IntoIter = std::vec::IntoIter<Function>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
