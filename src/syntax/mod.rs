// パス: src/syntax/mod.rs
// 役割: 構文サービス境界の閉じたノード語彙と所有権付き構文木を定義する
// 意図: 文法実装を注入可能にし、テストでは合成木だけで抽出器を検証できるようにする
// 関連ファイル: src/syntax/cuda.rs, src/extract.rs, tests/test_support.rs
//! 構文サービス境界
//!
//! - 抽出器が消費するノード種別は閉じた列挙 `NodeKind` としてモデル化する。
//!   対応しない種別は `Other` に落ち、抽出器側で明示的に扱いを決める
//!   （黙殺ではなくモデル化漏れとして見えるようにする）。
//! - `SyntaxNode` は自分の正確なソース断片を所有する。バイト範囲の切り出しは
//!   文法アダプタ（`cuda` フィーチャ）の責務で、ここには漏れない。
//! - フィールド参照（type / declarator / parameters）も閉じた列挙で表す。

#[cfg(feature = "cuda")]
pub mod cuda;

/// 抽出器が参照するフィールド名の閉じた語彙。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Type,
    Declarator,
    Parameters,
}

/// 消費対象のノード種別。文法が返しうるがモデル化していない種別は `Other`。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    FunctionDefinition,
    FunctionDeclarator,
    ParameterList,
    ParameterDeclaration,
    OptionalParameterDeclaration,
    TypeParameterDeclaration,
    TemplateDeclaration,
    TemplateParameterList,
    PointerDeclarator,
    Identifier,
    TypeQualifier,
    /// `__global__` 修飾子（GPU エントリポイントの印）。
    KernelQualifier,
    /// `__device__` 修飾子（内部ヘルパの印）。
    DeviceQualifier,
    Comment,
    Other(String),
}

/// 所有権付きの構文ノード。子は宣言順、フィールドは子への索引で保持する。
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    kind: NodeKind,
    text: String,
    children: Vec<SyntaxNode>,
    fields: Vec<(Field, usize)>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// 無名の子を末尾に追加する（ビルダー形式）。
    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    /// フィールド付きの子を末尾に追加する（ビルダー形式）。
    pub fn with_field(mut self, field: Field, child: SyntaxNode) -> Self {
        self.children.push(child);
        self.fields.push((field, self.children.len() - 1));
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// このノードに対応する正確なソース断片。
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn field(&self, field: Field) -> Option<&SyntaxNode> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| &self.children[*idx])
    }

    /// 直下の子に指定種別が含まれるかどうか（修飾子の検出に使う）。
    pub fn has_child(&self, kind: &NodeKind) -> bool {
        self.children.iter().any(|c| c.kind() == kind)
    }

    /// 直下の子から指定種別の最初のものを返す。
    pub fn child_of_kind(&self, kind: &NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// フィールドは登録順に索引され、同じ子を無名・フィールド付きで混在できる。
    fn field_access_and_children_order() {
        let node = SyntaxNode::new(NodeKind::ParameterDeclaration, "const float* in")
            .with_child(SyntaxNode::new(NodeKind::TypeQualifier, "const"))
            .with_field(Field::Type, SyntaxNode::new(NodeKind::Other("primitive_type".into()), "float"))
            .with_field(
                Field::Declarator,
                SyntaxNode::new(NodeKind::PointerDeclarator, "* in"),
            );

        assert_eq!(node.children().len(), 3);
        assert_eq!(node.field(Field::Type).unwrap().text(), "float");
        assert_eq!(
            node.field(Field::Declarator).unwrap().kind(),
            &NodeKind::PointerDeclarator
        );
        assert!(node.field(Field::Parameters).is_none());
        assert!(node.has_child(&NodeKind::TypeQualifier));
    }
}
