// パス: src/bin/kernelgen.rs
// 役割: Binary entrypoint that runs the generation pipeline
// 意図: Offer a CLI executable for build-time binding generation
// 関連ファイル: src/cli.rs, src/lib.rs, src/output.rs
fn main() {
    std::process::exit(kernelgen::cli::run());
}
