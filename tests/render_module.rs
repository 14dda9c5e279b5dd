// パス: tests/render_module.rs
// 役割: 抽出から XLA FFI モジュール出力までの全経路の統合テスト
// 意図: 出力がディスパッチ行の順序に従い、正規化済みの関数だけを映すことを保証する
// 関連ファイル: src/render/xla.rs, src/dispatch.rs, tests/test_support.rs
#[path = "test_support.rs"]
mod support;

use kernelgen::normalize;
use kernelgen::render::{Renderer, XlaCppRenderer};
use support::{
    extract, function_node, nontype_param, pointer_param, template_function, translation_unit,
    typename_param, value_param,
};

#[test]
/// テンプレート付きカーネルの出力は、明示的実体化と分岐が行メジャー順で並ぶ。
fn rendered_kernel_follows_dispatch_order() {
    let root = translation_unit(vec![template_function(
        vec![typename_param("T"), nontype_param("bool", "UseFast")],
        function_node(
            "axpy",
            "void",
            true,
            false,
            vec![pointer_param("T", "out", false), value_param("int", "n")],
        ),
    )]);
    let mut funcs = extract(&root);
    funcs
        .get_mut("axpy")
        .unwrap()
        .set_instances("T", &["float", "int32_t"])
        .unwrap();
    let norm = normalize(funcs.get("axpy").unwrap().clone()).unwrap();

    let text = XlaCppRenderer.render_call(&norm).unwrap();

    // 実体化: float が先、各 float 行の中では UseFast=true が先。
    let order = [
        "axpy<float, true>",
        "axpy<float, false>",
        "axpy<int32_t, true>",
        "axpy<int32_t, false>",
    ];
    let mut last = 0;
    for inst in order {
        let pos = text.find(inst).unwrap_or_else(|| panic!("{inst} が出力にない"));
        assert!(pos >= last, "{inst} の順序が乱れている");
        last = pos;
    }

    // キータプルは (DT, bool) で、型引数の列は DT:: タグに写っている。
    assert!(text.contains("std::tuple<DT, bool>"));
    assert!(text.contains("{DT::F32, true}"));
    assert!(text.contains("{DT::S32, false}"));
    // テンプレート型のポインタ引数は行の型へキャストされる。
    assert!(text.contains("static_cast<float*>(out)"));
    assert!(text.contains("static_cast<int32_t*>(out)"));
    // どの行にも一致しないキーは即時にエラー。
    assert!(text.contains("unsupported dispatch key"));
}

#[test]
/// ホスト関数とカーネルが混在するモジュールは、宣言順の本体と登録表を持つ。
fn module_renders_functions_and_registration_in_order() {
    let root = translation_unit(vec![
        function_node(
            "scale",
            "void",
            false,
            false,
            vec![
                value_param("cudaStream_t", "stream"),
                pointer_param("float", "out", false),
            ],
        ),
        function_node("fill", "void", true, false, vec![value_param("int", "n")]),
    ]);
    let funcs = extract(&root);
    let normalized: Vec<_> = funcs
        .into_iter()
        .map(|f| normalize(f).unwrap())
        .collect();

    let text = XlaCppRenderer
        .render_module(&normalized, &["ops.cuh".to_string(), "<cstdint>".to_string()], "ops")
        .unwrap();

    assert!(text.contains("#include \"ops.cuh\""));
    assert!(text.contains("#include <cstdint>"));
    let scale_pos = text.find("scale_dispatch").unwrap();
    let fill_pos = text.find("fill_dispatch").unwrap();
    assert!(scale_pos < fill_pos);
    // ホスト呼び出しは stream を補い、カーネルは起動構文を使う。
    assert!(text.contains("scale(stream, out);"));
    assert!(text.contains("fill<<<1, 1, 0, stream>>>(n);"));
    assert!(text.contains("registry.add(\"scale\", scale_dispatch);"));
    assert!(text.contains("registry.add(\"fill\", fill_dispatch);"));
}

#[test]
/// dtype_from_buffer の指定は生成コードのキー注記に現れる。
fn buffer_link_is_noted_in_output() {
    let root = translation_unit(vec![template_function(
        vec![typename_param("T")],
        function_node("axpy", "void", true, false, vec![pointer_param("T", "out", false)]),
    )]);
    let mut funcs = extract(&root);
    {
        let axpy = funcs.get_mut("axpy").unwrap();
        axpy.set_instances("T", &["float"]).unwrap();
        axpy.template_param_mut("T").unwrap().dtype_from_buffer = Some("out".to_string());
    }
    let norm = normalize(funcs.get("axpy").unwrap().clone()).unwrap();
    let text = XlaCppRenderer.render_call(&norm).unwrap();
    assert!(text.contains("element type taken from buffer 'out'"));
}
