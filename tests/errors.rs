//! Each required diagnostic substring ("precision", "deprecated",
//! "duplicate", "not implemented") is exercised once here, independent of
//! `tests/scenarios.rs`'s behavioral coverage of the same failures.

use tombc::Compiler;

#[test]
fn precision_overflow_diagnostic() {
    let source = r#"
contract test {
    global amount: decimal<3>;
    constructor() { amount = 2.4587; }
}
"#;
    let err = Compiler::compile(source).unwrap_err();
    assert!(err.to_string().contains("precision"), "got: {}", err);
}

#[test]
fn deprecated_operator_diagnostic() {
    let source = r#"
contract test {
    public run():number {
        local y = 1;
        _x := y;
        return 0;
    }
}
"#;
    let err = Compiler::compile(source).unwrap_err();
    assert!(err.to_string().contains("deprecated"), "got: {}", err);
}

#[test]
fn duplicate_method_diagnostic() {
    let source = r#"
contract test {
    public testme():number { return 1; }
    public testme():number { return 2; }
}
"#;
    let err = Compiler::compile(source).unwrap_err();
    assert!(err.to_string().contains("duplicate"), "got: {}", err);
}

/// A library method catalogued ahead of its VM intrinsic (no lowering
/// callback yet) fails at codegen with "not implemented".
#[test]
fn unimplemented_library_method_diagnostic() {
    let source = r#"
contract test {
    public run():address {
        return Crypto.recoverSigner(Crypto.hash("msg"), "sig");
    }
}
"#;
    let err = Compiler::compile(source).unwrap_err();
    assert!(err.to_string().contains("not implemented"), "got: {}", err);
}

/// A plain syntax error still carries the line/column-tagged diagnostic
/// format every phase shares.
#[test]
fn syntax_error_reports_phase_and_line() {
    let source = "contract test { public run(: number { return 0; } }";
    let err = Compiler::compile(source).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("error at"), "got: {}", rendered);
}
