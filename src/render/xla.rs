// パス: src/render/xla.rs
// 役割: 正規化済みシグネチャから XLA FFI 向け C++ グルーコードを出力する
// 意図: 実体化行とディスパッチキー行の行対応・行順にだけ依存した安定な出力にする
// 関連ファイル: src/render/mod.rs, src/dispatch.rs, tests/render_module.rs
//! XLA FFI 出力バックエンド
//!
//! 関数ひとつにつき次を出力する:
//! - テンプレート付きカーネルの明示的実体化（実体化行の順）
//! - ディスパッチ関数: キータプルを実体化行と同順で比較する分岐列。
//!   どの行にも一致しないキーは InvalidArgument で返す。
//!
//! テンプレート型の引数はラッパ署名では `void*`（スカラは `double`）で受け、
//! 各分岐の中でその行のインスタンス型へキャストする。

use crate::dispatch::{dispatch_rows_joined, instantiation_rows};
use crate::model::{NormalizedFunction, Parameter, TemplateKind, TemplateParameter};
use crate::render::{GenResult, Renderer};

/// 組み込みの XLA FFI C++ レンダラ。
pub struct XlaCppRenderer;

fn expr_or<'a>(expr: &'a str, default: &'a str) -> &'a str {
    if expr.is_empty() {
        default
    } else {
        expr
    }
}

/// 引数の型がテンプレート型引数を指しているなら、その列番号を返す。
fn template_column(param: &Parameter, templates: &[TemplateParameter]) -> Option<usize> {
    templates
        .iter()
        .position(|tp| tp.kind == TemplateKind::Typename && tp.name == param.ty)
}

/// ラッパ関数の署名に書く引数宣言。
fn wrapper_decl(param: &Parameter, templates: &[TemplateParameter]) -> String {
    let is_template = template_column(param, templates).is_some();
    let base = if is_template {
        if param.is_ptr { "void" } else { "double" }
    } else {
        param.ty.as_str()
    };
    let qual = if param.is_const { "const " } else { "" };
    let star = if param.is_ptr { "*" } else { "" };
    format!("{qual}{base}{star} {}", param.name)
}

/// 明示的実体化に書く引数宣言（テンプレート型はその行のインスタンスで置換）。
fn instantiated_decl(param: &Parameter, templates: &[TemplateParameter], row: &[String]) -> String {
    let base = match template_column(param, templates) {
        Some(col) => row[col].as_str(),
        None => param.ty.as_str(),
    };
    let qual = if param.is_const { "const " } else { "" };
    let star = if param.is_ptr { "*" } else { "" };
    format!("{qual}{base}{star} {}", param.name)
}

/// 分岐の中で実際の呼び出しに渡す引数（必要ならキャストを挟む）。
/// `expression` 指定があれば引数名の代わりにその式をそのまま渡す。
fn call_arg(param: &Parameter, templates: &[TemplateParameter], row: &[String]) -> String {
    let value = param
        .expression
        .clone()
        .unwrap_or_else(|| param.name.clone());
    match template_column(param, templates) {
        Some(col) => {
            let inst = row[col].as_str();
            if param.is_ptr {
                let qual = if param.is_const { "const " } else { "" };
                format!("static_cast<{qual}{inst}*>({value})")
            } else {
                format!("static_cast<{inst}>({value})")
            }
        }
        None => value,
    }
}

fn key_tuple_type(func: &NormalizedFunction) -> String {
    func.template_params
        .iter()
        .map(|tp| tp.ctype().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 分岐の中の 1 回分の呼び出し文。実体化行は構造化列のまま受け取る
/// （連結形はあくまで整形であり、列の復元には使わない）。
fn call_stmt(func: &NormalizedFunction, row: &[String]) -> String {
    let targs = if row.is_empty() {
        String::new()
    } else {
        format!("<{}>", row.join(", "))
    };
    let args: Vec<String> = func
        .params
        .iter()
        .map(|p| call_arg(p, &func.template_params, row))
        .collect();
    if func.is_kernel {
        let grid = expr_or(&func.grid_size, "1");
        let block = expr_or(&func.block_size, "1");
        let smem = expr_or(&func.smem_size, "0");
        format!(
            "{}{targs}<<<{grid}, {block}, {smem}, stream>>>({});",
            func.name,
            args.join(", ")
        )
    } else {
        // ホスト関数には除去済みの stream を生成側が先頭に補う。
        let mut all_args = vec!["stream".to_string()];
        all_args.extend(args);
        format!("{}{targs}({});", func.name, all_args.join(", "))
    }
}

fn zero_init_lines(func: &NormalizedFunction, out: &mut String) {
    for p in &func.params {
        if p.is_ptr && !p.is_const && (func.init_outputs_zero || p.init_zero) {
            out.push_str(&format!(
                "  cudaMemsetAsync({name}, 0, {name}_bytes, stream);\n",
                name = p.name
            ));
        }
    }
}

impl Renderer for XlaCppRenderer {
    fn render_call(&self, func: &NormalizedFunction) -> GenResult<String> {
        let mut out = String::new();
        let role = if func.is_kernel { "kernel" } else { "host" };
        out.push_str(&format!("// ==== {} ({role}) ====\n", func.name));

        for tp in &func.template_params {
            if let Some(buffer) = &tp.dtype_from_buffer {
                out.push_str(&format!(
                    "// key column {}: element type taken from buffer '{buffer}'\n",
                    tp.name
                ));
            }
        }

        let inst_rows = instantiation_rows(func);
        let key_rows = dispatch_rows_joined(func)?;

        // 明示的実体化はテンプレート付きカーネルだけに必要。
        if func.is_kernel && !func.template_params.is_empty() {
            for row in &inst_rows {
                let decls: Vec<String> = func
                    .params
                    .iter()
                    .map(|p| instantiated_decl(p, &func.template_params, row))
                    .collect();
                out.push_str(&format!(
                    "template __global__ void {}<{}>({});\n",
                    func.name,
                    row.join(", "),
                    decls.join(", ")
                ));
            }
            out.push('\n');
        }

        let decls: Vec<String> = func
            .params
            .iter()
            .map(|p| wrapper_decl(p, &func.template_params))
            .collect();
        if func.template_params.is_empty() {
            out.push_str(&format!(
                "static ffi::Error {}_dispatch(cudaStream_t stream{}{}) {{\n",
                func.name,
                if decls.is_empty() { "" } else { ", " },
                decls.join(", ")
            ));
            zero_init_lines(func, &mut out);
            out.push_str(&format!("  {}\n", call_stmt(func, &[])));
            out.push_str("  return ffi::Error::Success();\n}\n");
        } else {
            let tuple_ty = key_tuple_type(func);
            out.push_str(&format!(
                "static ffi::Error {}_dispatch(cudaStream_t stream, const std::tuple<{tuple_ty}>& key{}{}) {{\n",
                func.name,
                if decls.is_empty() { "" } else { ", " },
                decls.join(", ")
            ));
            zero_init_lines(func, &mut out);
            for (row, key_row) in inst_rows.iter().zip(key_rows.iter()) {
                out.push_str(&format!(
                    "  if (key == std::tuple<{tuple_ty}>{{{key_row}}}) {{\n"
                ));
                out.push_str(&format!("    {}\n", call_stmt(func, row)));
                out.push_str("    return ffi::Error::Success();\n  }\n");
            }
            out.push_str(&format!(
                "  return ffi::Error::InvalidArgument(\"{}: unsupported dispatch key\");\n}}\n",
                func.name
            ));
        }
        Ok(out)
    }

    fn render_module(
        &self,
        funcs: &[NormalizedFunction],
        includes: &[String],
        module_name: &str,
    ) -> GenResult<String> {
        let mut out = String::new();
        out.push_str("// generated by kernelgen. do not edit.\n");
        out.push_str(&format!("// module: {module_name}\n\n"));
        out.push_str("#include <cuda_runtime.h>\n");
        for inc in includes {
            if inc.starts_with('<') {
                out.push_str(&format!("#include {inc}\n"));
            } else {
                out.push_str(&format!("#include \"{inc}\"\n"));
            }
        }
        out.push_str(&format!("\nnamespace {module_name} {{\n\n"));

        for func in funcs {
            out.push_str(&self.render_call(func)?);
            out.push('\n');
        }

        out.push_str(&format!(
            "static void register_{module_name}(ffi::Registry& registry) {{\n"
        ));
        for func in funcs {
            out.push_str(&format!(
                "  registry.add(\"{name}\", {name}_dispatch);\n",
                name = func.name
            ));
        }
        out.push_str("}\n");
        out.push_str(&format!("\n}}  // namespace {module_name}\n"));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Function, Parameter, TemplateParameter};
    use crate::normalize::normalize;

    fn sample_kernel() -> NormalizedFunction {
        let mut func = Function::new("axpy", "void", true);
        func.params = vec![
            Parameter::pointer("T", "out"),
            Parameter {
                is_const: true,
                ..Parameter::pointer("T", "in")
            },
            Parameter::new("int", "n"),
        ];
        let mut tp = TemplateParameter::typename("T");
        tp.instances = vec!["float".to_string(), "int32_t".to_string()];
        func.template_params = vec![tp];
        func.grid_size = "grid_for(n)".to_string();
        func.block_size = "256".to_string();
        normalize(func).unwrap()
    }

    #[test]
    /// 実体化行の順で明示的実体化と分岐が並び、キャストが行の型を使う。
    fn kernel_dispatch_follows_row_order() {
        let text = XlaCppRenderer.render_call(&sample_kernel()).unwrap();
        let float_inst = text.find("template __global__ void axpy<float>").unwrap();
        let int_inst = text.find("template __global__ void axpy<int32_t>").unwrap();
        assert!(float_inst < int_inst);

        let float_branch = text.find("std::tuple<DT>{DT::F32}").unwrap();
        let int_branch = text.find("std::tuple<DT>{DT::S32}").unwrap();
        assert!(float_branch < int_branch);
        assert!(text.contains("static_cast<float*>(out)"));
        assert!(text.contains("static_cast<const int32_t*>(in)"));
        assert!(text.contains("<<<grid_for(n), 256, 0, stream>>>"));
    }

    #[test]
    /// ホスト関数の呼び出しには stream が先頭で補われる。
    fn host_call_reinserts_stream() {
        let mut func = Function::new("scale", "void", false);
        func.params = vec![
            Parameter::new("cudaStream_t", "stream"),
            Parameter::pointer("float", "out"),
            Parameter::new("int", "n"),
        ];
        let norm = normalize(func).unwrap();
        let text = XlaCppRenderer.render_call(&norm).unwrap();
        assert!(text.contains("scale(stream, out, n);"));
        assert!(!text.contains("<<<"));
    }

    #[test]
    /// カンマを含む非型インスタンスがあっても後続の列の対応は崩れない。
    fn multi_token_value_instance_keeps_columns() {
        let mut func = Function::new("axpy", "void", true);
        func.params = vec![Parameter::pointer("T", "out")];
        let mut shape = TemplateParameter::value("Shape", "S");
        shape.instances = vec!["Pair<1, 2>".to_string()];
        let mut elem = TemplateParameter::typename("T");
        elem.instances = vec!["float".to_string()];
        func.template_params = vec![shape, elem];
        let norm = normalize(func).unwrap();

        let text = XlaCppRenderer.render_call(&norm).unwrap();
        assert!(
            text.contains("template __global__ void axpy<Pair<1, 2>, float>(float* out);"),
            "{text}"
        );
        assert!(text.contains("static_cast<float*>(out)"), "{text}");
        assert!(text.contains("axpy<Pair<1, 2>, float><<<"), "{text}");
    }

    #[test]
    /// expression 指定のある引数は名前の代わりにその式が渡る。
    fn expression_overrides_argument_name() {
        let mut func = Function::new("scale", "void", false);
        let mut n = Parameter::new("int", "n");
        n.expression = Some("static_cast<int>(out_size)".to_string());
        func.params = vec![Parameter::new("cudaStream_t", "stream"), n];
        let norm = normalize(func).unwrap();
        let text = XlaCppRenderer.render_call(&norm).unwrap();
        assert!(text.contains("scale(stream, static_cast<int>(out_size));"));
    }

    #[test]
    /// モジュール出力は include と登録表を関数の並び順で持つ。
    fn module_contains_includes_and_registration() {
        let funcs = vec![sample_kernel()];
        let text = XlaCppRenderer
            .render_module(&funcs, &["kernels.cuh".to_string()], "ops")
            .unwrap();
        assert!(text.contains("#include \"kernels.cuh\""));
        assert!(text.contains("namespace ops {"));
        assert!(text.contains("registry.add(\"axpy\", axpy_dispatch);"));
    }
}
