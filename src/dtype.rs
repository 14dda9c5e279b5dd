// パス: src/dtype.rs
// 役割: C の基本型の綴りを実行時要素型タグへ写像する
// 意図: 固定語彙の総関数として提供し、語彙外は即時に契約違反で失敗させる
// 関連ファイル: src/dispatch.rs, src/model.rs, tests/normalize_dispatch.rs
//! 型マッパー
//!
//! - 受理する綴りの集合と各綴りが写る列挙タグは公開契約の一部であり、
//!   変更は生成コードに対する破壊的変更になる。
//! - 未知の綴りは黙って既定値に落とさず、必ず失敗させる。

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;

use crate::errors::ContractError;

/// 実行時ディスパッチで用いる要素型タグ。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    F64,
    F16,
    S8,
    S16,
    S32,
    S64,
    U8,
    U16,
    U32,
    U64,
    Pred,
}

impl ElementType {
    /// 列挙タグ名（`DT::` 接頭辞なし）。
    pub const fn tag(&self) -> &'static str {
        match self {
            ElementType::F32 => "F32",
            ElementType::F64 => "F64",
            ElementType::F16 => "F16",
            ElementType::S8 => "S8",
            ElementType::S16 => "S16",
            ElementType::S32 => "S32",
            ElementType::S64 => "S64",
            ElementType::U8 => "U8",
            ElementType::U16 => "U16",
            ElementType::U32 => "U32",
            ElementType::U64 => "U64",
            ElementType::Pred => "PRED",
        }
    }
}

impl Display for ElementType {
    /// 生成コードに埋め込む綴り（`DT::F32` の形）で表示する。
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DT::{}", self.tag())
    }
}

/// 受理する基本型の綴りと対応タグの固定語彙。
static DTYPE_MAP: Lazy<HashMap<&'static str, ElementType>> = Lazy::new(|| {
    HashMap::from([
        ("float", ElementType::F32),
        ("double", ElementType::F64),
        ("int", ElementType::S32),
        ("int32_t", ElementType::S32),
        ("int64_t", ElementType::S64),
        ("long long", ElementType::S64),
        ("int16_t", ElementType::S16),
        ("short", ElementType::S16),
        ("int8_t", ElementType::S8),
        ("uint32_t", ElementType::U32),
        ("unsigned int", ElementType::U32),
        ("uint64_t", ElementType::U64),
        ("unsigned long long", ElementType::U64),
        ("uint16_t", ElementType::U16),
        ("unsigned short", ElementType::U16),
        ("uint8_t", ElementType::U8),
        ("half", ElementType::F16),
        ("__half", ElementType::F16),
        ("bool", ElementType::Pred),
    ])
});

/// 綴りを要素型タグへ写像する。語彙外は契約違反。
pub fn element_type(spelling: &str) -> Result<ElementType, ContractError> {
    DTYPE_MAP.get(spelling).copied().ok_or_else(|| {
        ContractError::new(
            "CON003",
            format!("型 {spelling} には実行時表現がなく、FFI 型へ写像できません"),
        )
    })
}
