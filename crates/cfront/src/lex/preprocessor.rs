//! The macro-expanding token supply.
//!
//! Sits between the raw lexer and the parser: handles directives, expands
//! object- and function-like macros (minting macro locations so every
//! expanded token keeps both its physical and logical position), resolves
//! `#include`s, and provides the lookahead / mark / backtrack surface that
//! tentative parsing needs.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::basic::diagnostic::{DiagCode, DiagnosticsEngine};
use crate::basic::ident::{IdentId, IdentifierTable};
use crate::basic::source_location::{FileId, SourceLocation};
use crate::basic::source_manager::{SourceError, SourceManager};
use crate::basic::token_kinds::{PpDirective, TokenKind};
use crate::config::LangOptions;
use crate::lex::lexer::lex_buffer;
use crate::lex::token::Token;

/// A macro definition: `params` is `None` for object-like macros.
#[derive(Debug, Clone)]
pub struct MacroInfo {
    pub params: Option<Vec<IdentId>>,
    pub body: Vec<Token>,
    pub loc: SourceLocation,
}

/// Notifications about preprocessing events.
pub trait PpCallbacks {
    fn on_macro_defined(
        &mut self,
        name: &str,
        info: &MacroInfo,
    ) {
        let _ = (name, info);
    }

    fn on_macro_undef(
        &mut self,
        name: &str,
    ) {
        let _ = name;
    }

    fn on_include(
        &mut self,
        path: &Path,
        loc: SourceLocation,
    ) {
        let _ = (path, loc);
    }
}

struct ConditionalState {
    /// Whether some branch of this conditional has been entered.
    taken: bool,
    seen_else: bool,
}

struct FileState {
    file_id: FileId,
    tokens: Vec<Token>,
    pos: usize,
    conditionals: Vec<ConditionalState>,
}

/// Opaque position for speculative parsing; see [`Preprocessor::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpMark(usize);

pub struct Preprocessor {
    pub sm: SourceManager,
    pub idents: IdentifierTable,
    pub lang: LangOptions,
    macros: HashMap<IdentId, MacroInfo>,
    include_dirs: Vec<PathBuf>,
    files: Vec<FileState>,
    /// Expanded tokens waiting to be handed out.
    pending: VecDeque<Token>,
    /// Every token produced so far; `cursor` points at the next one. Marks
    /// index into this buffer, so backtracking is just resetting `cursor`.
    out: Vec<Token>,
    cursor: usize,
    callbacks: Option<Box<dyn PpCallbacks>>,
    eof_loc: SourceLocation,
}

impl Preprocessor {
    pub fn new(lang: LangOptions) -> Self {
        let idents = IdentifierTable::new(&lang);
        Self {
            sm: SourceManager::new(),
            idents,
            lang,
            macros: HashMap::new(),
            include_dirs: Vec::new(),
            files: Vec::new(),
            pending: VecDeque::new(),
            out: Vec::new(),
            cursor: 0,
            callbacks: None,
            eof_loc: SourceLocation::invalid(),
        }
    }

    pub fn set_callbacks(
        &mut self,
        callbacks: Box<dyn PpCallbacks>,
    ) {
        self.callbacks = Some(callbacks);
    }

    pub fn add_include_dir(
        &mut self,
        dir: impl Into<PathBuf>,
    ) {
        self.include_dirs.push(dir.into());
    }

    /// Ingest the main file and start the token stream there.
    pub fn enter_main_file(
        &mut self,
        path: &Path,
    ) -> Result<FileId, SourceError> {
        let file_id = self.sm.create_file_id(path, SourceLocation::invalid())?;
        self.enter_file(file_id);
        Ok(file_id)
    }

    /// Ingest an in-memory buffer as the main file.
    pub fn enter_main_buffer(
        &mut self,
        name: impl Into<String>,
        text: impl Into<Vec<u8>>,
    ) -> FileId {
        let file_id = self.sm.create_file_id_for_buffer(name, text.into());
        self.enter_file(file_id);
        file_id
    }

    fn enter_file(
        &mut self,
        file_id: FileId,
    ) {
        let tokens = lex_buffer(&self.sm, file_id, &mut self.idents);
        let end = self.sm.buffer_data(file_id).len() as u32;
        self.eof_loc = self.sm.location_for_offset(file_id, end);
        self.files.push(FileState {
            file_id,
            tokens,
            pos: 0,
            conditionals: Vec::new(),
        });
    }

    pub fn macro_info(
        &self,
        name: IdentId,
    ) -> Option<&MacroInfo> {
        self.macros.get(&name)
    }

    /// Spelling of a token: the bytes at its physical location.
    pub fn spelling(
        &self,
        token: &Token,
    ) -> String {
        if token.len == 0 {
            return String::new();
        }
        let data = self.sm.character_data(token.loc);
        String::from_utf8_lossy(&data[..token.len as usize]).into_owned()
    }

    // ── the token stream ────────────────────────────────────────────────

    /// Consume and return the next token.
    pub fn next(
        &mut self,
        diags: &mut DiagnosticsEngine,
    ) -> Token {
        let token = self.lookahead(diags, 0);
        if !token.is(TokenKind::Eof) {
            self.cursor += 1;
        }
        token
    }

    /// Peek `n` tokens ahead without consuming anything.
    pub fn lookahead(
        &mut self,
        diags: &mut DiagnosticsEngine,
        n: usize,
    ) -> Token {
        while self.out.len() <= self.cursor + n {
            let token = self.produce(diags);
            let at_eof = token.is(TokenKind::Eof);
            self.out.push(token);
            if at_eof {
                break;
            }
        }
        let idx = (self.cursor + n).min(self.out.len() - 1);
        self.out[idx]
    }

    /// Checkpoint the stream for tentative parsing.
    pub fn mark(&self) -> PpMark {
        PpMark(self.cursor)
    }

    /// Rewind to a checkpoint taken earlier with [`Preprocessor::mark`].
    pub fn backtrack_to(
        &mut self,
        mark: PpMark,
    ) {
        assert!(mark.0 <= self.out.len(), "mark from another stream");
        self.cursor = mark.0;
    }

    // ── production ──────────────────────────────────────────────────────

    fn produce(
        &mut self,
        diags: &mut DiagnosticsEngine,
    ) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }

            let Some(file) = self.files.last_mut() else {
                return Token::eof(self.eof_loc);
            };

            if file.pos >= file.tokens.len() {
                if !file.conditionals.is_empty() {
                    diags.report(self.eof_loc, DiagCode::ErrUnterminatedConditional);
                }
                self.files.pop();
                if self.files.is_empty() {
                    return Token::eof(self.eof_loc);
                }
                continue;
            }

            let token = file.tokens[file.pos];
            file.pos += 1;

            if token.is(TokenKind::Hash) && token.at_line_start {
                self.handle_directive(diags);
                continue;
            }

            if let Some(ident) = token.ident
                && self.idents.info(ident).has_macro
                && let Some(info) = self.macros.get(&ident).cloned()
            {
                if self.try_expand(diags, token, ident, &info) {
                    continue;
                }
            }

            return token;
        }
    }

    /// Expand a macro use at file level. Returns false when a function-like
    /// macro name is not followed by an invocation (the name then stands as
    /// an ordinary identifier).
    fn try_expand(
        &mut self,
        diags: &mut DiagnosticsEngine,
        name_token: Token,
        name: IdentId,
        info: &MacroInfo,
    ) -> bool {
        let args = match &info.params {
            None => None,
            Some(params) => {
                let file = self.files.last_mut().expect("expanding with no active file");
                if file.pos >= file.tokens.len() || !file.tokens[file.pos].is(TokenKind::LParen) {
                    return false;
                }
                let mut pos = file.pos;
                let Some(args) = gather_macro_args(&file.tokens, &mut pos) else {
                    diags
                        .report(name_token.loc, DiagCode::ErrUnterminatedMacroInvocation)
                        .arg_identifier(self.idents.spelling(name));
                    file.pos = file.tokens.len();
                    return true;
                };
                file.pos = pos;

                let arity_matches = args.len() == params.len() || (params.is_empty() && args.len() == 1 && args[0].is_empty());
                if !arity_matches {
                    diags
                        .report(name_token.loc, DiagCode::ErrMacroArgCountMismatch)
                        .arg_identifier(self.idents.spelling(name))
                        .arg_uint(params.len() as u64)
                        .arg_uint(args.len() as u64);
                    return true;
                }
                Some(args)
            },
        };

        let param_map = match (&info.params, args) {
            (Some(params), Some(args)) => {
                let mut map = HashMap::new();
                for (param, arg) in params.iter().zip(args) {
                    map.insert(*param, arg);
                }
                Some(map)
            },
            _ => None,
        };

        let mut active = vec![name];
        let mut expanded = Vec::new();
        self.expand_token_list(diags, &info.body, name_token.loc, param_map.as_ref(), &mut active, &mut expanded);
        debug!(name = self.idents.spelling(name), tokens = expanded.len(), "expanded macro");
        for token in expanded {
            self.pending.push_back(token);
        }
        true
    }

    /// Substitute and remap one token list. Every emitted token's location
    /// becomes a macro location whose physical side is where its characters
    /// live and whose logical side resolves to `use_loc`'s file position.
    fn expand_token_list(
        &mut self,
        diags: &mut DiagnosticsEngine,
        tokens: &[Token],
        use_loc: SourceLocation,
        param_map: Option<&HashMap<IdentId, Vec<Token>>>,
        active: &mut Vec<IdentId>,
        out: &mut Vec<Token>,
    ) {
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            i += 1;

            if let Some(ident) = token.ident {
                // Parameter reference: splice the argument tokens, remapped
                // so their physical side stays at the invocation site.
                if let Some(map) = param_map
                    && let Some(arg) = map.get(&ident)
                {
                    for arg_token in arg {
                        out.push(self.remap(*arg_token, use_loc));
                    }
                    continue;
                }

                // Nested macro, unless it is already being expanded.
                if self.idents.info(ident).has_macro && !active.contains(&ident) {
                    if let Some(info) = self.macros.get(&ident).cloned() {
                        match &info.params {
                            None => {
                                let nested_use = self.remap(token, use_loc).loc;
                                active.push(ident);
                                self.expand_token_list(diags, &info.body, nested_use, None, active, out);
                                active.pop();
                                continue;
                            },
                            Some(params) => {
                                if i < tokens.len() && tokens[i].is(TokenKind::LParen) {
                                    let mut pos = i;
                                    let Some(args) = gather_macro_args(tokens, &mut pos) else {
                                        diags
                                            .report(token.loc, DiagCode::ErrUnterminatedMacroInvocation)
                                            .arg_identifier(self.idents.spelling(ident));
                                        i = tokens.len();
                                        continue;
                                    };
                                    i = pos;
                                    if args.len() == params.len()
                                        || (params.is_empty() && args.len() == 1 && args[0].is_empty())
                                    {
                                        let mut map = HashMap::new();
                                        for (param, arg) in params.iter().zip(args) {
                                            // Arguments may themselves use outer parameters.
                                            let mut expanded_arg = Vec::new();
                                            self.expand_token_list(
                                                diags,
                                                &arg,
                                                use_loc,
                                                param_map,
                                                active,
                                                &mut expanded_arg,
                                            );
                                            map.insert(*param, expanded_arg);
                                        }
                                        let nested_use = self.remap(token, use_loc).loc;
                                        active.push(ident);
                                        self.expand_token_list(
                                            diags,
                                            &info.body,
                                            nested_use,
                                            Some(&map),
                                            active,
                                            out,
                                        );
                                        active.pop();
                                        continue;
                                    }
                                    diags
                                        .report(token.loc, DiagCode::ErrMacroArgCountMismatch)
                                        .arg_identifier(self.idents.spelling(ident))
                                        .arg_uint(params.len() as u64)
                                        .arg_uint(args.len() as u64);
                                    continue;
                                }
                            },
                        }
                    }
                }
            }

            out.push(self.remap(token, use_loc));
        }
    }

    fn remap(
        &mut self,
        mut token: Token,
        use_loc: SourceLocation,
    ) -> Token {
        token.loc = self.sm.instantiation_loc(token.loc, use_loc);
        token
    }

    // ── directives ──────────────────────────────────────────────────────

    fn handle_directive(
        &mut self,
        diags: &mut DiagnosticsEngine,
    ) {
        let file = self.files.last_mut().expect("directive with no active file");
        let line_start = file.pos;
        let line_end = line_end(&file.tokens, line_start);
        file.pos = line_end;

        let line: Vec<Token> = file.tokens[line_start..line_end].to_vec();
        let Some(first) = line.first() else {
            // A lone `#` is a null directive.
            return;
        };

        let directive = first
            .ident
            .map(|id| self.idents.spelling(id).to_owned())
            .and_then(|s| PpDirective::from_spelling(&s));

        // Keywords lex as keyword kinds but `#if` must still be seen.
        let directive = directive.or(match first.kind {
            TokenKind::KwIf => Some(PpDirective::If),
            TokenKind::KwElse => Some(PpDirective::Else),
            _ => None,
        });

        match directive {
            Some(PpDirective::Define) => self.handle_define(diags, &line[1..]),
            Some(PpDirective::Undef) => self.handle_undef(&line[1..]),
            Some(PpDirective::Include) => self.handle_include(diags, first.loc, &line[1..]),
            Some(PpDirective::Ifdef) => {
                let taken = self.macro_defined(&line[1..]);
                self.enter_conditional(diags, taken);
            },
            Some(PpDirective::Ifndef) => {
                let taken = !self.macro_defined(&line[1..]);
                self.enter_conditional(diags, taken);
            },
            Some(PpDirective::If) => {
                let taken = self.evaluate_pp_condition(&line[1..]);
                self.enter_conditional(diags, taken);
            },
            Some(PpDirective::Else) => {
                let file = self.files.last_mut().expect("no active file");
                match file.conditionals.last_mut() {
                    Some(state) if !state.seen_else => {
                        state.seen_else = true;
                        // The branch we were in was taken; skip the else.
                        self.skip_conditional_block(diags);
                    },
                    _ => {
                        diags.report(first.loc, DiagCode::ErrEndifWithoutIf).arg_str("else");
                    },
                }
            },
            Some(PpDirective::Endif) => {
                let file = self.files.last_mut().expect("no active file");
                if file.conditionals.pop().is_none() {
                    diags.report(first.loc, DiagCode::ErrEndifWithoutIf).arg_str("endif");
                }
            },
            Some(PpDirective::Line) | Some(PpDirective::Pragma) => {
                debug!("ignoring #line/#pragma directive");
            },
            None => {
                debug!("unknown preprocessor directive");
            },
        }
    }

    fn handle_define(
        &mut self,
        diags: &mut DiagnosticsEngine,
        line: &[Token],
    ) {
        let Some(name_token) = line.first() else {
            return;
        };
        let Some(name) = name_token.ident else {
            return;
        };

        let mut body_start = 1;
        let mut params = None;

        // A parameter list only exists when `(` is glued to the name.
        if line.len() > 1 && line[1].is(TokenKind::LParen) && !line[1].has_leading_space {
            let mut list = Vec::new();
            let mut i = 2;
            while i < line.len() && !line[i].is(TokenKind::RParen) {
                if let Some(param) = line[i].ident {
                    list.push(param);
                }
                i += 1;
            }
            body_start = (i + 1).min(line.len());
            params = Some(list);
        }

        let info = MacroInfo {
            params,
            body: line[body_start..].to_vec(),
            loc: name_token.loc,
        };

        if self.idents.info(name).has_macro {
            diags
                .report(name_token.loc, DiagCode::WarnMacroRedefined)
                .arg_identifier(self.idents.spelling(name));
        }
        self.idents.info_mut(name).has_macro = true;
        if let Some(callbacks) = &mut self.callbacks {
            let spelling = self.idents.spelling(name).to_owned();
            callbacks.on_macro_defined(&spelling, &info);
        }
        self.macros.insert(name, info);
    }

    fn handle_undef(
        &mut self,
        line: &[Token],
    ) {
        let Some(name) = line.first().and_then(|t| t.ident) else {
            return;
        };
        self.idents.info_mut(name).has_macro = false;
        if self.macros.remove(&name).is_some()
            && let Some(callbacks) = &mut self.callbacks
        {
            let spelling = self.idents.spelling(name).to_owned();
            callbacks.on_macro_undef(&spelling);
        }
    }

    fn handle_include(
        &mut self,
        diags: &mut DiagnosticsEngine,
        directive_loc: SourceLocation,
        line: &[Token],
    ) {
        let Some(first) = line.first() else {
            return;
        };

        let name = if first.is(TokenKind::StringLiteral) {
            let spelling = self.spelling(first);
            spelling.trim_matches('"').to_owned()
        } else if first.is(TokenKind::Less) {
            let mut name = String::new();
            for token in &line[1..] {
                if token.is(TokenKind::Greater) {
                    break;
                }
                name.push_str(&self.spelling(token));
            }
            name
        } else {
            return;
        };

        let Some(path) = self.resolve_include(&name) else {
            diags.report(directive_loc, DiagCode::ErrCannotOpenFile).arg_str(&name);
            return;
        };

        if let Some(callbacks) = &mut self.callbacks {
            callbacks.on_include(&path, directive_loc);
        }

        match self.sm.create_file_id(&path, directive_loc) {
            Ok(file_id) => self.enter_file(file_id),
            Err(error) => {
                diags.report(directive_loc, DiagCode::ErrCannotOpenFile).arg_str(error.to_string());
            },
        }
    }

    fn resolve_include(
        &self,
        name: &str,
    ) -> Option<PathBuf> {
        // Relative to the including file first, then the search path.
        if let Some(file) = self.files.last() {
            let current = self.sm.source_name(self.sm.location_for_offset(file.file_id, 0));
            if let Some(parent) = Path::new(current).parent() {
                let candidate = parent.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        for dir in &self.include_dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    fn macro_defined(
        &self,
        line: &[Token],
    ) -> bool {
        line.first()
            .and_then(|t| t.ident)
            .map(|id| self.idents.info(id).has_macro)
            .unwrap_or(false)
    }

    /// Minimal `#if` evaluation: integer literals, `defined(X)` and
    /// `!defined(X)`. Anything more elaborate evaluates to false.
    fn evaluate_pp_condition(
        &self,
        line: &[Token],
    ) -> bool {
        let mut i = 0;
        let mut negate = false;
        if i < line.len() && line[i].is(TokenKind::Exclaim) {
            negate = true;
            i += 1;
        }

        let value = if i < line.len() && line[i].is(TokenKind::NumericConstant) {
            let spelling = self.spelling(&line[i]);
            spelling.parse::<i64>().map(|v| v != 0).unwrap_or(false)
        } else if i < line.len() && line[i].ident.map(|id| self.idents.spelling(id) == "defined").unwrap_or(false) {
            let name = if i + 1 < line.len() && line[i + 1].is(TokenKind::LParen) {
                line.get(i + 2).and_then(|t| t.ident)
            } else {
                line.get(i + 1).and_then(|t| t.ident)
            };
            name.map(|id| self.idents.info(id).has_macro).unwrap_or(false)
        } else {
            false
        };

        value != negate
    }

    fn enter_conditional(
        &mut self,
        diags: &mut DiagnosticsEngine,
        taken: bool,
    ) {
        let file = self.files.last_mut().expect("no active file");
        file.conditionals.push(ConditionalState {
            taken,
            seen_else: false,
        });
        if !taken {
            self.skip_conditional_block(diags);
        }
    }

    /// Skip tokens of an inactive branch until the matching `#else` or
    /// `#endif`, respecting nested conditionals.
    fn skip_conditional_block(
        &mut self,
        diags: &mut DiagnosticsEngine,
    ) {
        let mut depth = 0usize;
        loop {
            let file = self.files.last_mut().expect("no active file");
            if file.pos >= file.tokens.len() {
                diags.report(self.eof_loc, DiagCode::ErrUnterminatedConditional);
                file.conditionals.clear();
                return;
            }

            let token = file.tokens[file.pos];
            if !(token.is(TokenKind::Hash) && token.at_line_start) {
                file.pos += 1;
                continue;
            }

            let line_start = file.pos + 1;
            let end = line_end(&file.tokens, line_start);
            let directive = file.tokens[line_start..end]
                .first()
                .map(|t| match t.kind {
                    TokenKind::KwIf => Some(PpDirective::If),
                    TokenKind::KwElse => Some(PpDirective::Else),
                    _ => t
                        .ident
                        .map(|id| self.idents.spelling(id).to_owned())
                        .and_then(|s| PpDirective::from_spelling(&s)),
                })
                .flatten();

            match directive {
                Some(PpDirective::If) | Some(PpDirective::Ifdef) | Some(PpDirective::Ifndef) => {
                    depth += 1;
                    file.pos = end;
                },
                Some(PpDirective::Endif) => {
                    file.pos = end;
                    if depth == 0 {
                        file.conditionals.pop();
                        return;
                    }
                    depth -= 1;
                },
                Some(PpDirective::Else) if depth == 0 => {
                    file.pos = end;
                    let state = file.conditionals.last_mut().expect("conditional state missing");
                    if !state.seen_else && !state.taken {
                        state.seen_else = true;
                        state.taken = true;
                        return;
                    }
                    state.seen_else = true;
                },
                _ => {
                    file.pos = end;
                },
            }
        }
    }
}

/// Index of the first token of the next line (or the end of the list).
fn line_end(
    tokens: &[Token],
    from: usize,
) -> usize {
    let mut i = from;
    while i < tokens.len() && !tokens[i].at_line_start {
        i += 1;
    }
    i
}

/// Collect a function-like macro's arguments. On entry `pos` addresses the
/// `(`; on success it is left just past the matching `)`. Top-level commas
/// separate arguments; nested parentheses are respected.
fn gather_macro_args(
    tokens: &[Token],
    pos: &mut usize,
) -> Option<Vec<Vec<Token>>> {
    debug_assert!(tokens[*pos].is(TokenKind::LParen));
    let mut i = *pos + 1;
    let mut depth = 1usize;
    let mut args = Vec::new();
    let mut current = Vec::new();

    loop {
        if i >= tokens.len() {
            return None;
        }
        let token = tokens[i];
        match token.kind {
            TokenKind::LParen => {
                depth += 1;
                current.push(token);
            },
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    args.push(current);
                    i += 1;
                    break;
                }
                current.push(token);
            },
            TokenKind::Comma if depth == 1 => {
                args.push(std::mem::take(&mut current));
            },
            _ => current.push(token),
        }
        i += 1;
    }

    *pos = i;
    Some(args)
}

#[cfg(test)]
#[path = "../../tests/src/lex/preprocessor_tests.rs"]
mod tests;
