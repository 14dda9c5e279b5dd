// パス: src/cli.rs
// 役割: コマンドライン引数の定義と生成パイプラインの実行を束ねる
// 意図: バイナリ本体を薄く保ち、パイプラインをライブラリ側でテスト可能にする
// 関連ファイル: src/bin/kernelgen.rs, src/output.rs, src/manifest.rs
//! CLI（`cuda` フィーチャ）
//!
//! 入力 CUDA ソースを解析し、抽出・マニフェスト適用・正規化・レンダリングを
//! 経て出力ファイルへ差分書き込みする。結果は三値の利用者向けメッセージで報告する。

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::extract::extract_functions;
use crate::manifest::InstanceManifest;
use crate::output::generate_module_file;
use crate::render::{GenResult, XlaCppRenderer};
use crate::syntax::cuda::parse_source;

#[derive(Debug, Parser)]
#[command(
    name = "kernelgen",
    about = "CUDA カーネル署名から XLA FFI バインディングを生成する"
)]
pub struct Cli {
    /// 入力 CUDA ソースファイル
    pub input: PathBuf,

    /// 出力先のパス
    #[arg(short, long)]
    pub output: PathBuf,

    /// 生成モジュール名（省略時は出力ファイル名の語幹）
    #[arg(long)]
    pub module_name: Option<String>,

    /// 生成コードに含める #include（複数指定可）
    #[arg(long = "include")]
    pub includes: Vec<String>,

    /// テンプレートインスタンスのマニフェスト（JSON）
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// __global__ カーネル以外のホスト関数も生成対象にする
    #[arg(long)]
    pub all_functions: bool,
}

/// 引数解析済みの CLI を実行し、利用者向けメッセージを返す。
pub fn run_cli(cli: &Cli) -> GenResult<String> {
    let src = fs::read_to_string(&cli.input)?;
    let root = parse_source(&src)?;
    let mut funcs = extract_functions(&root)?;
    if !cli.all_functions {
        funcs.retain_kernels();
    }
    if let Some(path) = &cli.manifest {
        InstanceManifest::load(path)?.apply(&mut funcs)?;
    }
    let outcome = generate_module_file(
        &XlaCppRenderer,
        &cli.output,
        funcs,
        &cli.includes,
        cli.module_name.as_deref(),
    )?;
    Ok(outcome.message(&cli.output))
}

/// バイナリ用エントリポイント。終了コードを返す。
pub fn run() -> i32 {
    let cli = Cli::parse();
    match run_cli(&cli) {
        Ok(message) => {
            println!("{message}");
            0
        }
        Err(err) => {
            eprintln!("kernelgen: {err}");
            1
        }
    }
}
