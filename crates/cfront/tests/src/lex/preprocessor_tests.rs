use super::*;

use crate::basic::diagnostic::{DiagnosticsEngine, SharedDiagnosticBuffer};
use crate::config::LangOptions;

struct Fixture {
    pp: Preprocessor,
    diags: DiagnosticsEngine,
    buffer: SharedDiagnosticBuffer,
}

fn fixture(source: &str) -> Fixture {
    let buffer = SharedDiagnosticBuffer::new();
    let diags = DiagnosticsEngine::new(Box::new(buffer.clone()));
    let mut pp = Preprocessor::new(LangOptions::default());
    pp.enter_main_buffer("input.c", source);
    Fixture {
        pp,
        diags,
        buffer,
    }
}

impl Fixture {
    fn kinds_and_spellings(&mut self) -> Vec<(TokenKind, String)> {
        let mut out = Vec::new();
        loop {
            let token = self.pp.next(&mut self.diags);
            if token.is(TokenKind::Eof) {
                return out;
            }
            let spelling = self.pp.spelling(&token);
            out.push((token.kind, spelling));
        }
    }

    fn spellings(&mut self) -> Vec<String> {
        self.kinds_and_spellings().into_iter().map(|(_, s)| s).collect()
    }
}

#[test]
fn plain_tokens_flow_through() {
    let mut f = fixture("int x ;");
    assert_eq!(f.spellings(), vec!["int", "x", ";"]);
    assert!(f.buffer.is_empty());
}

#[test]
fn object_macros_expand() {
    let mut f = fixture("#define N 42\nint x = N;\n");
    assert_eq!(f.spellings(), vec!["int", "x", "=", "42", ";"]);
}

#[test]
fn function_macros_substitute_arguments() {
    let mut f = fixture("#define M(x) x+1\nint y = M(2);\n");
    assert_eq!(f.spellings(), vec!["int", "y", "=", "2", "+", "1", ";"]);
}

#[test]
fn expanded_tokens_carry_macro_locations() {
    let source = "#define M(x) x+1\nint y = M(2);\n";
    let mut f = fixture(source);

    // Pull tokens until the expanded `2`.
    let two = loop {
        let token = f.pp.next(&mut f.diags);
        assert!(!token.is(TokenKind::Eof), "ran out of tokens");
        if f.pp.spelling(&token) == "2" {
            break token;
        }
    };
    assert!(two.loc.is_macro_id());

    // Physical side: where the characters live, inside the invocation's
    // argument list. Logical side: the `M` at the call site.
    let phys = f.pp.sm.physical_loc(two.loc);
    let logical = f.pp.sm.logical_loc(two.loc);
    assert!(phys.is_file_id());
    assert!(logical.is_file_id());
    assert_eq!(phys.raw_file_pos(), source.find("(2)").unwrap() as u32 + 1);
    assert_eq!(logical.raw_file_pos(), source.find("M(2)").unwrap() as u32);

    // The `+` comes physically from the definition body.
    let plus = f.pp.next(&mut f.diags);
    assert_eq!(f.pp.spelling(&plus), "+");
    let plus_phys = f.pp.sm.physical_loc(plus.loc);
    assert_eq!(plus_phys.raw_file_pos(), source.find("x+1").unwrap() as u32 + 1);
    assert_eq!(f.pp.sm.logical_loc(plus.loc).raw_file_pos(), source.find("M(2)").unwrap() as u32);
}

#[test]
fn function_macro_without_invocation_stays_an_identifier() {
    let mut f = fixture("#define M(x) x\nint M;\n");
    assert_eq!(f.spellings(), vec!["int", "M", ";"]);
}

#[test]
fn nested_expansion_terminates_and_substitutes() {
    let mut f = fixture("#define A 1\n#define B A+A\nint x = B;\n");
    assert_eq!(f.spellings(), vec!["int", "x", "=", "1", "+", "1", ";"]);
}

#[test]
fn self_referential_macros_do_not_recurse() {
    let mut f = fixture("#define X X\nint X;\n");
    assert_eq!(f.spellings(), vec!["int", "X", ";"]);
}

#[test]
fn undef_removes_the_definition() {
    let mut f = fixture("#define N 1\n#undef N\nint N;\n");
    assert_eq!(f.spellings(), vec!["int", "N", ";"]);
}

#[test]
fn redefinition_warns() {
    let mut f = fixture("#define N 1\n#define N 2\nint x = N;\n");
    assert_eq!(f.spellings(), vec!["int", "x", "=", "2", ";"]);
    let diagnostics = f.buffer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message().contains("macro redefined"));
}

#[test]
fn arity_mismatch_is_diagnosed() {
    let mut f = fixture("#define M(a,b) a+b\nint x = M(1);\n");
    f.spellings();
    let diagnostics = f.buffer.diagnostics();
    assert!(diagnostics.iter().any(|d| d.message().contains("expects 2 argument(s), 1 given")));
}

#[test]
fn conditional_blocks_skip_and_take() {
    let mut f = fixture("#define YES 1\n#ifdef YES\nint a;\n#else\nint b;\n#endif\n");
    assert_eq!(f.spellings(), vec!["int", "a", ";"]);

    let mut f = fixture("#ifdef NO\nint a;\n#else\nint b;\n#endif\n");
    assert_eq!(f.spellings(), vec!["int", "b", ";"]);

    let mut f = fixture("#ifndef NO\nint a;\n#endif\n");
    assert_eq!(f.spellings(), vec!["int", "a", ";"]);

    let mut f = fixture("#if 0\nint a;\n#if 1\nint nested;\n#endif\n#endif\nint b;\n");
    assert_eq!(f.spellings(), vec!["int", "b", ";"]);
}

#[test]
fn unterminated_conditional_is_diagnosed() {
    let mut f = fixture("#ifdef NO\nint a;\n");
    f.spellings();
    assert!(f.buffer.diagnostics().iter().any(|d| d.message().contains("unterminated conditional")));
}

#[test]
fn lookahead_and_backtracking() {
    let mut f = fixture("a b c d");
    let first = f.pp.lookahead(&mut f.diags, 0);
    assert_eq!(f.pp.spelling(&first), "a");
    let third = f.pp.lookahead(&mut f.diags, 2);
    assert_eq!(f.pp.spelling(&third), "c");

    let mark = f.pp.mark();
    f.pp.next(&mut f.diags);
    f.pp.next(&mut f.diags);
    let current = f.pp.lookahead(&mut f.diags, 0);
    assert_eq!(f.pp.spelling(&current), "c");

    f.pp.backtrack_to(mark);
    let rewound = f.pp.lookahead(&mut f.diags, 0);
    assert_eq!(f.pp.spelling(&rewound), "a");
}

#[test]
fn eof_is_sticky() {
    let mut f = fixture("x");
    f.pp.next(&mut f.diags);
    assert!(f.pp.next(&mut f.diags).is(TokenKind::Eof));
    assert!(f.pp.next(&mut f.diags).is(TokenKind::Eof));
}
