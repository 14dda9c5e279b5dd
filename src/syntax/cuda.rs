// パス: src/syntax/cuda.rs
// 役割: tree-sitter-cuda の構文木を閉じたノード語彙へ変換するアダプタ
// 意図: 文法クレートへの依存をこのファイルに閉じ込め、抽出器を文法から独立させる
// 関連ファイル: src/syntax/mod.rs, src/extract.rs, src/cli.rs
//! CUDA 文法アダプタ（`cuda` フィーチャ）
//!
//! - tree-sitter のノードをバイト範囲でスライスし、所有権付きの
//!   `SyntaxNode` へ写し替える。
//! - 名前付きノードに加えて、匿名トークンのうち `__global__` / `__device__`
//!   だけを保持する（関数定義の修飾子検出に必要なため）。

use tree_sitter::{Node, Parser};

use super::{Field, NodeKind, SyntaxNode};
use crate::errors::ExtractError;

/// CUDA ソース全体を解析し、閉じた語彙の構文木を返す。
pub fn parse_source(src: &str) -> Result<SyntaxNode, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_cuda::language())
        .map_err(|e| ExtractError::new("EXT100", format!("CUDA 文法の読み込みに失敗しました: {e}")))?;
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| ExtractError::new("EXT101", "ソースの解析に失敗しました"))?;
    Ok(convert(tree.root_node(), src))
}

fn map_kind(kind: &str) -> NodeKind {
    match kind {
        "translation_unit" => NodeKind::TranslationUnit,
        "function_definition" => NodeKind::FunctionDefinition,
        "function_declarator" => NodeKind::FunctionDeclarator,
        "parameter_list" => NodeKind::ParameterList,
        "parameter_declaration" => NodeKind::ParameterDeclaration,
        "optional_parameter_declaration" => NodeKind::OptionalParameterDeclaration,
        "type_parameter_declaration" => NodeKind::TypeParameterDeclaration,
        "template_declaration" => NodeKind::TemplateDeclaration,
        "template_parameter_list" => NodeKind::TemplateParameterList,
        "pointer_declarator" => NodeKind::PointerDeclarator,
        "identifier" => NodeKind::Identifier,
        "type_qualifier" => NodeKind::TypeQualifier,
        "__global__" => NodeKind::KernelQualifier,
        "__device__" => NodeKind::DeviceQualifier,
        "comment" => NodeKind::Comment,
        other => NodeKind::Other(other.to_string()),
    }
}

fn node_text(node: Node<'_>, src: &str) -> String {
    src[node.start_byte()..node.end_byte()].to_string()
}

fn convert(node: Node<'_>, src: &str) -> SyntaxNode {
    let mut out = SyntaxNode::new(map_kind(node.kind()), node_text(node, src));

    // フィールド対応は tree-sitter 側の参照と子の id を突き合わせて復元する。
    let field_ids = [
        (Field::Type, node.child_by_field_name("type").map(|n| n.id())),
        (
            Field::Declarator,
            node.child_by_field_name("declarator").map(|n| n.id()),
        ),
        (
            Field::Parameters,
            node.child_by_field_name("parameters").map(|n| n.id()),
        ),
    ];

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let keep_anonymous = matches!(child.kind(), "__global__" | "__device__");
        if !child.is_named() && !keep_anonymous {
            continue;
        }
        let converted = convert(child, src);
        let field = field_ids
            .iter()
            .find(|(_, id)| *id == Some(child.id()))
            .map(|(f, _)| *f);
        out = match field {
            Some(f) => out.with_field(f, converted),
            None => out.with_child(converted),
        };
    }
    out
}
