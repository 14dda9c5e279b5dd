// パス: tests/test_support.rs
// 役割: 統合テスト共通の合成構文木ビルダーと補助関数を提供する
// 意図: 文法フィーチャなしで抽出から生成までの経路を検証できるようにする
// 関連ファイル: tests/extract.rs, tests/normalize_dispatch.rs, tests/render_module.rs
#![allow(dead_code)]
use kernelgen::extract::{extract_functions, extract_functions_with, ExtractOptions};
use kernelgen::model::FunctionSet;
use kernelgen::syntax::{Field, NodeKind, SyntaxNode};

/// 基本型ノード（抽出器は kind を見ないので Other で十分）。
pub fn type_node(ty: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Other("primitive_type".into()), ty)
}

pub fn ident(name: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Identifier, name)
}

/// 値渡しの仮引数 `ty name`。
pub fn value_param(ty: &str, name: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::ParameterDeclaration, format!("{ty} {name}"))
        .with_field(Field::Type, type_node(ty))
        .with_field(Field::Declarator, ident(name))
}

/// ポインタ仮引数 `[const] ty* name`。
pub fn pointer_param(ty: &str, name: &str, is_const: bool) -> SyntaxNode {
    let qual = if is_const { "const " } else { "" };
    let mut node =
        SyntaxNode::new(NodeKind::ParameterDeclaration, format!("{qual}{ty}* {name}"));
    if is_const {
        node = node.with_child(SyntaxNode::new(NodeKind::TypeQualifier, "const"));
    }
    node.with_field(Field::Type, type_node(ty)).with_field(
        Field::Declarator,
        SyntaxNode::new(NodeKind::PointerDeclarator, format!("* {name}"))
            .with_field(Field::Declarator, ident(name)),
    )
}

/// 型テンプレート引数 `typename name`。
pub fn typename_param(name: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TypeParameterDeclaration, format!("typename {name}"))
        .with_child(SyntaxNode::new(NodeKind::Other("type_identifier".into()), name))
}

/// 非型テンプレート引数 `ty name`。
pub fn nontype_param(ty: &str, name: &str) -> SyntaxNode {
    value_param(ty, name)
}

/// 関数定義ノードを組み立てる。
pub fn function_node(
    name: &str,
    return_type: &str,
    is_kernel: bool,
    is_device: bool,
    params: Vec<SyntaxNode>,
) -> SyntaxNode {
    let mut node = SyntaxNode::new(NodeKind::FunctionDefinition, name.to_string());
    if is_kernel {
        node = node.with_child(SyntaxNode::new(NodeKind::KernelQualifier, "__global__"));
    }
    if is_device {
        node = node.with_child(SyntaxNode::new(NodeKind::DeviceQualifier, "__device__"));
    }
    let mut param_list = SyntaxNode::new(NodeKind::ParameterList, "(...)");
    for p in params {
        param_list = param_list.with_child(p);
    }
    node.with_field(Field::Type, type_node(return_type)).with_field(
        Field::Declarator,
        SyntaxNode::new(NodeKind::FunctionDeclarator, format!("{name}(...)"))
            .with_field(Field::Declarator, ident(name))
            .with_field(Field::Parameters, param_list),
    )
}

/// テンプレート宣言で関数定義を包む。
pub fn template_function(template_params: Vec<SyntaxNode>, func: SyntaxNode) -> SyntaxNode {
    let mut list = SyntaxNode::new(NodeKind::TemplateParameterList, "<...>");
    for p in template_params {
        list = list.with_child(p);
    }
    SyntaxNode::new(NodeKind::TemplateDeclaration, "template")
        .with_field(Field::Parameters, list)
        .with_child(func)
}

/// トップレベルのノード列を翻訳単位へまとめる。
pub fn translation_unit(items: Vec<SyntaxNode>) -> SyntaxNode {
    let mut root = SyntaxNode::new(NodeKind::TranslationUnit, "");
    for item in items {
        root = root.with_child(item);
    }
    root
}

pub fn extract(root: &SyntaxNode) -> FunctionSet {
    extract_functions(root).expect("extract functions")
}

pub fn extract_with_device(root: &SyntaxNode) -> FunctionSet {
    extract_functions_with(root, &ExtractOptions { skip_device: false })
        .expect("extract functions with device helpers")
}
