//! Shared helpers for the integration tests: run the whole pipeline over
//! an in-memory buffer and hand back the parser state plus the captured
//! diagnostics.

use cfront::basic::diagnostic::{Diagnostic, DiagnosticsEngine, SharedDiagnosticBuffer};
use cfront::basic::source_location::FileId;
use cfront::config::LangOptions;
use cfront::decl::decl::DeclId;
use cfront::parse::Parser;

pub struct Compiled {
    pub parser: Parser,
    pub buffer: SharedDiagnosticBuffer,
    pub main_file: FileId,
    pub tu: DeclId,
}

impl Compiled {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.buffer.diagnostics()
    }

    pub fn messages(&self) -> Vec<String> {
        self.diagnostics().iter().map(|d| d.message()).collect()
    }

    pub fn top_level_decls(&self) -> Vec<DeclId> {
        self.parser.sema.ctx.decls.context_decls(self.tu).to_vec()
    }
}

pub fn compile_with(
    options: LangOptions,
    source: &str,
) -> Compiled {
    let buffer = SharedDiagnosticBuffer::new();
    let engine = DiagnosticsEngine::new(Box::new(buffer.clone()));
    let mut parser = Parser::new(options, engine);
    let main_file = parser.enter_main_buffer("input.c", source);
    let tu = parser.parse_translation_unit();
    Compiled {
        parser,
        buffer,
        main_file,
        tu,
    }
}

pub fn compile(source: &str) -> Compiled {
    compile_with(LangOptions::default(), source)
}
