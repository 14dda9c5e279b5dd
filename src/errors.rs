//! エラー型の定義（共通フォーマット: \[CODE\] メッセージ @function / @file）。
//!
//! 抽出・検証・参照の各段階で発生するエラーを段階ごとの newtype で区別する。
//! 生成段階（レンダリング・ファイル出力）のエラーは `render::GenError` 側で扱う。

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub msg: String,
    pub function: Option<String>, // 対象の関数名（任意）
    pub file: Option<String>,     // 対象のソースファイル（任意）
}

impl ErrorInfo {
    pub fn new(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            function: None,
            file: None,
        }
    }
    pub fn in_function(
        code: &'static str,
        msg: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            code,
            msg: msg.into(),
            function: Some(function.into()),
            file: None,
        }
    }
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.function, &self.file) {
            (Some(func), Some(file)) => {
                write!(f, "[{}] {} @function={} @file={}", self.code, self.msg, func, file)
            }
            (Some(func), None) => write!(f, "[{}] {} @function={}", self.code, self.msg, func),
            (None, Some(file)) => write!(f, "[{}] {} @file={}", self.code, self.msg, file),
            (None, None) => write!(f, "[{}] {}", self.code, self.msg),
        }
    }
}

/// 構文木がモデル化していない形を含んでいた場合のエラー（回復不能）。
#[derive(Debug, Clone)]
pub struct ExtractError(pub ErrorInfo);
impl ExtractError {
    pub fn new(code: &'static str, msg: impl Into<String>) -> Self {
        Self(ErrorInfo::new(code, msg))
    }
    pub fn in_function(
        code: &'static str,
        msg: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self(ErrorInfo::in_function(code, msg, function))
    }
}

/// 構造的な事前条件の違反（stream 引数欠落・インスタンス未指定・未知の型綴り）。
#[derive(Debug, Clone)]
pub struct ContractError(pub ErrorInfo);
impl ContractError {
    pub fn new(code: &'static str, msg: impl Into<String>) -> Self {
        Self(ErrorInfo::new(code, msg))
    }
    pub fn in_function(
        code: &'static str,
        msg: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self(ErrorInfo::in_function(code, msg, function))
    }
}

/// 存在しない関数・テンプレート引数を名前で参照した場合のエラー。
#[derive(Debug, Clone)]
pub struct LookupError(pub ErrorInfo);
impl LookupError {
    pub fn new(code: &'static str, msg: impl Into<String>) -> Self {
        Self(ErrorInfo::new(code, msg))
    }
    pub fn in_function(
        code: &'static str,
        msg: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self(ErrorInfo::in_function(code, msg, function))
    }
    pub fn with_file(code: &'static str, msg: impl Into<String>, file: impl Into<String>) -> Self {
        Self(ErrorInfo::new(code, msg).with_file(file))
    }
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
impl StdError for ExtractError {}

impl Display for ContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
impl StdError for ContractError {}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
impl StdError for LookupError {}
