//! Diagnostic emission.
//!
//! Diagnostics are built through a scoped [`DiagnosticBuilder`]: the
//! reporting site attaches arguments, ranges, and fix-its, and the finished
//! diagnostic is dispatched to the client when the builder is dropped. The
//! builder mutably borrows the engine, so at most one diagnostic can be
//! under construction at a time.

use crate::basic::source_location::{SourceLocation, SourceRange};

/// Severity after mapping (warnings-as-errors etc.) has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

/// Every message the front-end can emit, with its format string and
/// default severity. Arguments are spliced at `%0`..`%9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagCode {
    // Driver / source manager
    ErrCannotOpenFile,
    // Lexer / preprocessor
    ErrUnterminatedBlockComment,
    ErrInvalidCharacter,
    ErrMacroArgCountMismatch,
    ErrUnterminatedMacroInvocation,
    ErrUnterminatedConditional,
    ErrEndifWithoutIf,
    WarnMacroRedefined,
    // Parser
    ErrExpectedToken,
    ErrExpectedExpression,
    ErrExpectedIdentifier,
    ErrExpectedTypeName,
    ErrExpectedDeclaration,
    ErrExpectedMember,
    // Sema
    ErrUndeclaredIdentifier,
    ErrRedefinition,
    ErrConflictingTypes,
    ErrMemberNotFound,
    ErrNotAStruct,
    ErrNotCallable,
    ErrArgCountMismatch,
    ErrTypeMismatch,
    ErrInvalidOperands,
    ErrAssignToRvalue,
    ErrNotModifiableLvalue,
    ErrAddrOfRvalue,
    ErrIndirectionRequiresPointer,
    ErrSizeofIncomplete,
    ErrSubscriptNotPointer,
    ErrReturnValueInVoid,
    ErrBreakNotInLoop,
    ErrContinueNotInLoop,
    ErrVlaNotPermitted,
    ErrArraySizeNotConstant,
    ErrExprNotConstant,
    ErrFieldIncompleteType,
    ErrAmbiguousCall,
    ErrNoMatchingFunction,
    WarnImplicitConversion,
    WarnReturnMissingValue,
    WarnUnsupportedConstruct,
    NotePreviousDeclaration,
    NotePreviousDefinition,
    NoteCandidate,
}

impl DiagCode {
    pub fn text(self) -> &'static str {
        match self {
            Self::ErrCannotOpenFile => "cannot open file: %0",
            Self::ErrUnterminatedBlockComment => "unterminated block comment",
            Self::ErrInvalidCharacter => "invalid character in source",
            Self::ErrMacroArgCountMismatch => "macro '%0' expects %1 argument(s), %2 given",
            Self::ErrUnterminatedMacroInvocation => "unterminated invocation of macro '%0'",
            Self::ErrUnterminatedConditional => "unterminated conditional directive",
            Self::ErrEndifWithoutIf => "#%0 without matching #if",
            Self::WarnMacroRedefined => "'%0' macro redefined",
            Self::ErrExpectedToken => "expected '%0'",
            Self::ErrExpectedExpression => "expected expression",
            Self::ErrExpectedIdentifier => "expected identifier",
            Self::ErrExpectedTypeName => "expected a type name",
            Self::ErrExpectedDeclaration => "expected a declaration",
            Self::ErrExpectedMember => "expected member name after '%0'",
            Self::ErrUndeclaredIdentifier => "use of undeclared identifier '%0'",
            Self::ErrRedefinition => "redefinition of '%0'",
            Self::ErrConflictingTypes => "conflicting types for '%0'",
            Self::ErrMemberNotFound => "no member named '%0' in '%1'",
            Self::ErrNotAStruct => "member reference base type '%0' is not a structure or union",
            Self::ErrNotCallable => "called object type '%0' is not a function or function pointer",
            Self::ErrArgCountMismatch => "too %0 arguments to function call, expected %1, have %2",
            Self::ErrTypeMismatch => "incompatible types: expected '%0', found '%1'",
            Self::ErrInvalidOperands => "invalid operands to binary expression ('%0' and '%1')",
            Self::ErrAssignToRvalue => "expression is not assignable",
            Self::ErrNotModifiableLvalue => "cannot modify an expression of type '%0'",
            Self::ErrAddrOfRvalue => "cannot take the address of an rvalue",
            Self::ErrIndirectionRequiresPointer => "indirection requires pointer operand ('%0' invalid)",
            Self::ErrSizeofIncomplete => "invalid application of '%0' to an incomplete type '%1'",
            Self::ErrSubscriptNotPointer => "subscripted value is not an array or pointer",
            Self::ErrReturnValueInVoid => "void function should not return a value",
            Self::ErrBreakNotInLoop => "'break' statement not in loop or switch statement",
            Self::ErrContinueNotInLoop => "'continue' statement not in loop statement",
            Self::ErrVlaNotPermitted => "variable length arrays are not permitted in this dialect",
            Self::ErrArraySizeNotConstant => "array size is not a constant expression",
            Self::ErrExprNotConstant => "expression is not an integer constant expression",
            Self::ErrFieldIncompleteType => "field '%0' has incomplete type '%1'",
            Self::ErrAmbiguousCall => "call to '%0' is ambiguous",
            Self::ErrNoMatchingFunction => "no matching function for call to '%0'",
            Self::WarnImplicitConversion => "implicit conversion from '%0' to '%1'",
            Self::WarnReturnMissingValue => "non-void function should return a value",
            Self::WarnUnsupportedConstruct => "unsupported construct; emitting undefined placeholder",
            Self::NotePreviousDeclaration => "previous declaration is here",
            Self::NotePreviousDefinition => "previous definition is here",
            Self::NoteCandidate => "candidate function",
        }
    }

    pub fn default_level(self) -> Level {
        match self {
            Self::WarnMacroRedefined
            | Self::WarnImplicitConversion
            | Self::WarnReturnMissingValue
            | Self::WarnUnsupportedConstruct => Level::Warning,
            Self::NotePreviousDeclaration | Self::NotePreviousDefinition | Self::NoteCandidate => Level::Note,
            _ => Level::Error,
        }
    }
}

/// A typed format argument.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagArg {
    Str(String),
    Sint(i64),
    Uint(u64),
    Identifier(String),
    QualType(String),
    DeclName(String),
}

impl DiagArg {
    fn render(&self) -> String {
        match self {
            Self::Str(s) | Self::Identifier(s) | Self::QualType(s) | Self::DeclName(s) => s.clone(),
            Self::Sint(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
        }
    }
}

/// A suggested edit attached to a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum FixItHint {
    Insertion {
        loc: SourceLocation,
        code: String,
    },
    Removal {
        range: SourceRange,
    },
    Replacement {
        range: SourceRange,
        code: String,
    },
}

/// Most arguments a single diagnostic can carry.
pub const MAX_ARGUMENTS: usize = 10;
/// Most highlight ranges a single diagnostic can carry.
pub const MAX_RANGES: usize = 10;
/// Most fix-it hints a single diagnostic can carry.
pub const MAX_FIXIT_HINTS: usize = 3;

/// A finalized diagnostic as handed to the client.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub code: DiagCode,
    pub loc: SourceLocation,
    pub args: Vec<DiagArg>,
    pub ranges: Vec<SourceRange>,
    pub fixits: Vec<FixItHint>,
}

impl Diagnostic {
    /// Render the format string with its arguments spliced in.
    pub fn message(&self) -> String {
        let text = self.code.text();
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%'
                && let Some(d) = chars.peek().and_then(|c| c.to_digit(10))
            {
                chars.next();
                match self.args.get(d as usize) {
                    Some(arg) => out.push_str(&arg.render()),
                    None => out.push_str("<missing argument>"),
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}

/// Receives finalized diagnostics.
pub trait DiagnosticClient {
    fn handle_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
    );
}

/// Client backed by a shared buffer, so the caller that installed it can
/// read the diagnostics back out after the engine is done. Used by the
/// driver, the expected-diagnostic verifier, and tests.
#[derive(Clone, Default)]
pub struct SharedDiagnosticBuffer {
    inner: std::rc::Rc<std::cell::RefCell<Vec<Diagnostic>>>,
}

impl SharedDiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.borrow().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.inner.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl DiagnosticClient for SharedDiagnosticBuffer {
    fn handle_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
    ) {
        self.inner.borrow_mut().push(diagnostic.clone());
    }
}

pub struct DiagnosticsEngine {
    client: Box<dyn DiagnosticClient>,
    pub warnings_as_errors: bool,
    pub ignore_all_warnings: bool,
    error_occurred: bool,
    fatal_error_occurred: bool,
    num_diagnostics: usize,
    num_errors: usize,
}

impl DiagnosticsEngine {
    pub fn new(client: Box<dyn DiagnosticClient>) -> Self {
        Self {
            client,
            warnings_as_errors: false,
            ignore_all_warnings: false,
            error_occurred: false,
            fatal_error_occurred: false,
            num_diagnostics: 0,
            num_errors: 0,
        }
    }

    /// Start building a diagnostic at `loc`. The diagnostic is dispatched
    /// when the returned builder is dropped.
    pub fn report(
        &mut self,
        loc: SourceLocation,
        code: DiagCode,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            engine: self,
            diagnostic: Diagnostic {
                level: code.default_level(),
                code,
                loc,
                args: Vec::new(),
                ranges: Vec::new(),
                fixits: Vec::new(),
            },
        }
    }

    pub fn error_occurred(&self) -> bool {
        self.error_occurred
    }

    pub fn fatal_error_occurred(&self) -> bool {
        self.fatal_error_occurred
    }

    pub fn num_diagnostics(&self) -> usize {
        self.num_diagnostics
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn client(&self) -> &dyn DiagnosticClient {
        self.client.as_ref()
    }

    /// Replace the client, returning the old one.
    pub fn set_client(
        &mut self,
        client: Box<dyn DiagnosticClient>,
    ) -> Box<dyn DiagnosticClient> {
        std::mem::replace(&mut self.client, client)
    }

    fn emit(
        &mut self,
        mut diagnostic: Diagnostic,
    ) {
        match diagnostic.level {
            Level::Warning => {
                if self.ignore_all_warnings {
                    return;
                }
                if self.warnings_as_errors {
                    diagnostic.level = Level::Error;
                }
            },
            Level::Ignored => return,
            _ => {},
        }

        self.num_diagnostics += 1;
        if diagnostic.level >= Level::Error {
            self.num_errors += 1;
            self.error_occurred = true;
        }
        if diagnostic.level == Level::Fatal {
            self.fatal_error_occurred = true;
        }
        self.client.handle_diagnostic(&diagnostic);
    }
}

/// In-flight diagnostic. Attach arguments and ranges, then let it drop.
pub struct DiagnosticBuilder<'a> {
    engine: &'a mut DiagnosticsEngine,
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    pub fn level(
        mut self,
        level: Level,
    ) -> Self {
        self.diagnostic.level = level;
        self
    }

    pub fn arg(
        mut self,
        arg: DiagArg,
    ) -> Self {
        assert!(self.diagnostic.args.len() < MAX_ARGUMENTS, "too many diagnostic arguments");
        self.diagnostic.args.push(arg);
        self
    }

    pub fn arg_str(
        self,
        value: impl Into<String>,
    ) -> Self {
        self.arg(DiagArg::Str(value.into()))
    }

    pub fn arg_int(
        self,
        value: i64,
    ) -> Self {
        self.arg(DiagArg::Sint(value))
    }

    pub fn arg_uint(
        self,
        value: u64,
    ) -> Self {
        self.arg(DiagArg::Uint(value))
    }

    pub fn arg_identifier(
        self,
        name: impl Into<String>,
    ) -> Self {
        self.arg(DiagArg::Identifier(name.into()))
    }

    pub fn arg_qualtype(
        self,
        printed: impl Into<String>,
    ) -> Self {
        self.arg(DiagArg::QualType(printed.into()))
    }

    pub fn arg_decl_name(
        self,
        name: impl Into<String>,
    ) -> Self {
        self.arg(DiagArg::DeclName(name.into()))
    }

    pub fn range(
        mut self,
        range: SourceRange,
    ) -> Self {
        assert!(self.diagnostic.ranges.len() < MAX_RANGES, "too many highlight ranges");
        self.diagnostic.ranges.push(range);
        self
    }

    pub fn fixit(
        mut self,
        hint: FixItHint,
    ) -> Self {
        assert!(self.diagnostic.fixits.len() < MAX_FIXIT_HINTS, "too many fix-it hints");
        self.diagnostic.fixits.push(hint);
        self
    }
}

impl Drop for DiagnosticBuilder<'_> {
    fn drop(&mut self) {
        let diagnostic = Diagnostic {
            level: self.diagnostic.level,
            code: self.diagnostic.code,
            loc: self.diagnostic.loc,
            args: std::mem::take(&mut self.diagnostic.args),
            ranges: std::mem::take(&mut self.diagnostic.ranges),
            fixits: std::mem::take(&mut self.diagnostic.fixits),
        };
        self.engine.emit(diagnostic);
    }
}

#[cfg(test)]
#[path = "../../tests/src/basic/diagnostic_tests.rs"]
mod tests;
