// パス: src/extract.rs
// 役割: 構文木から関数シグネチャを抽出しシグネチャモデルを構築する
// 意図: 対応しない構文形を黙殺せず、モデル化漏れとして即時に失敗させる
// 関連ファイル: src/syntax/mod.rs, src/model.rs, tests/extract.rs
//! シグネチャ抽出器
//!
//! - 関数定義（テンプレート宣言に包まれたものを含む）を木のどの深さからでも
//!   収集する。`__device__` 付きの内部ヘルパは既定で読み飛ばす。
//! - 仮引数は「裸の識別子 → 値引数」「ポインタ宣言子 → ポインタ引数」の
//!   二形だけを受理し、それ以外の宣言子は回復不能な抽出エラーにする。
//! - 同名関数は後方の宣言が前方を置き換える（`FunctionSet` の上書き規則）。

use crate::errors::ExtractError;
use crate::model::{Function, FunctionSet, Parameter, TemplateParameter};
use crate::syntax::{Field, NodeKind, SyntaxNode};

/// 抽出の挙動を切り替えるオプション。
#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    /// true なら `__device__` 付きの内部ヘルパを読み飛ばす。
    pub skip_device: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { skip_device: true }
    }
}

/// 既定オプションでの抽出。
pub fn extract_functions(root: &SyntaxNode) -> Result<FunctionSet, ExtractError> {
    extract_functions_with(root, &ExtractOptions::default())
}

/// 構文木全体を走査し、関数名からシグネチャへの集合を構築する。
pub fn extract_functions_with(
    root: &SyntaxNode,
    opts: &ExtractOptions,
) -> Result<FunctionSet, ExtractError> {
    let mut out = FunctionSet::new();
    collect(root, None, opts, &mut out)?;
    Ok(out)
}

fn collect(
    node: &SyntaxNode,
    template: Option<&SyntaxNode>,
    opts: &ExtractOptions,
    out: &mut FunctionSet,
) -> Result<(), ExtractError> {
    match node.kind() {
        NodeKind::TemplateDeclaration => {
            // テンプレート宣言は直下の関数定義へテンプレート引数リストを引き渡す。
            let params = node
                .field(Field::Parameters)
                .or_else(|| node.child_of_kind(&NodeKind::TemplateParameterList));
            for child in node.children() {
                collect(child, params, opts, out)?;
            }
            Ok(())
        }
        NodeKind::FunctionDefinition => {
            if let Some(func) = build_function(node, template, opts)? {
                out.insert(func);
            }
            Ok(())
        }
        _ => {
            for child in node.children() {
                collect(child, None, opts, out)?;
            }
            Ok(())
        }
    }
}

/// 関数定義ノードひとつからシグネチャを組み立てる。
///
/// 期待する形（修飾子・宣言子）に一致しない定義は、照会に掛からなかったもの
/// として `None` を返す。一致したうえで中身が解釈できない場合はエラー。
fn build_function(
    node: &SyntaxNode,
    template: Option<&SyntaxNode>,
    opts: &ExtractOptions,
) -> Result<Option<Function>, ExtractError> {
    if opts.skip_device && node.has_child(&NodeKind::DeviceQualifier) {
        return Ok(None);
    }
    let is_kernel = node.has_child(&NodeKind::KernelQualifier);

    let Some(return_type) = node.field(Field::Type) else {
        return Ok(None);
    };
    let Some(declarator) = node.field(Field::Declarator) else {
        return Ok(None);
    };
    if declarator.kind() != &NodeKind::FunctionDeclarator {
        // ポインタ返却などの形は対象外（照会形に一致しない）。
        return Ok(None);
    }
    let Some(name_node) = declarator.field(Field::Declarator) else {
        return Ok(None);
    };
    if name_node.kind() != &NodeKind::Identifier {
        return Ok(None);
    }

    let mut func = Function::new(name_node.text(), return_type.text(), is_kernel);

    if let Some(param_list) = declarator.field(Field::Parameters) {
        func.params = parse_parameter_list(param_list, &func.name)?;
    }
    if let Some(template_list) = template {
        func.template_params = parse_template_list(template_list, &func.name)?;
    }
    Ok(Some(func))
}

fn parse_parameter_list(
    node: &SyntaxNode,
    func: &str,
) -> Result<Vec<Parameter>, ExtractError> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            NodeKind::Comment => continue,
            NodeKind::ParameterDeclaration | NodeKind::OptionalParameterDeclaration => {
                out.push(parse_parameter(child, func)?);
            }
            other => {
                return Err(ExtractError::in_function(
                    "EXT010",
                    format!("対応していない仮引数ノードです: {other:?}"),
                    func,
                ));
            }
        }
    }
    Ok(out)
}

fn parse_parameter(node: &SyntaxNode, func: &str) -> Result<Parameter, ExtractError> {
    let is_const = node
        .children()
        .iter()
        .any(|c| c.kind() == &NodeKind::TypeQualifier && c.text() == "const");

    let ty = node.field(Field::Type).ok_or_else(|| {
        ExtractError::in_function("EXT011", "仮引数の型フィールドがありません", func)
    })?;
    let decl = node.field(Field::Declarator).ok_or_else(|| {
        ExtractError::in_function("EXT012", "仮引数の宣言子フィールドがありません", func)
    })?;

    let mut param = Parameter::new(ty.text(), "");
    param.is_const = is_const;
    match decl.kind() {
        NodeKind::Identifier => {
            param.name = decl.text().to_string();
        }
        NodeKind::PointerDeclarator => {
            param.is_ptr = true;
            let inner = decl
                .field(Field::Declarator)
                .or_else(|| decl.child_of_kind(&NodeKind::Identifier))
                .ok_or_else(|| {
                    ExtractError::in_function(
                        "EXT013",
                        "ポインタ宣言子の内側に識別子がありません",
                        func,
                    )
                })?;
            param.name = inner.text().to_string();
        }
        other => {
            return Err(ExtractError::in_function(
                "EXT014",
                format!("対応していない宣言子の形です: {other:?}"),
                func,
            ));
        }
    }
    Ok(param)
}

fn parse_template_list(
    node: &SyntaxNode,
    func: &str,
) -> Result<Vec<TemplateParameter>, ExtractError> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.kind() {
            NodeKind::Comment => continue,
            NodeKind::TypeParameterDeclaration => {
                // typename/class 形。識別子は末尾の子に現れる。
                let name = child.children().last().ok_or_else(|| {
                    ExtractError::in_function(
                        "EXT021",
                        "型テンプレート引数の識別子がありません",
                        func,
                    )
                })?;
                out.push(TemplateParameter::typename(name.text()));
            }
            NodeKind::ParameterDeclaration | NodeKind::OptionalParameterDeclaration => {
                let ty = child.field(Field::Type).ok_or_else(|| {
                    ExtractError::in_function(
                        "EXT022",
                        "非型テンプレート引数の型フィールドがありません",
                        func,
                    )
                })?;
                let decl = child.field(Field::Declarator).ok_or_else(|| {
                    ExtractError::in_function(
                        "EXT023",
                        "非型テンプレート引数の宣言子フィールドがありません",
                        func,
                    )
                })?;
                out.push(TemplateParameter::value(ty.text(), decl.text()));
            }
            other => {
                return Err(ExtractError::in_function(
                    "EXT020",
                    format!("対応していないテンプレート引数ノードです: {other:?}"),
                    func,
                ));
            }
        }
    }
    Ok(out)
}
