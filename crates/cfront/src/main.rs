use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cfront::ast::dump::AstDumper;
use cfront::basic::diagnostic::{DiagnosticsEngine, Level, SharedDiagnosticBuffer};
use cfront::basic::verify;
use cfront::config::LangOptions;
use cfront::parse::Parser;

#[derive(ClapParser, Debug)]
#[command(name = "cfront", version, about)]
struct Args {
    /// Source file to compile.
    input: PathBuf,

    /// Print the typed AST as JSON after parsing.
    #[arg(long)]
    ast_dump: bool,

    /// Check diagnostics against `// expected-...` comments in the input.
    #[arg(long)]
    verify: bool,

    /// Language options file (defaults to ./cfront.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Additional include search directories.
    #[arg(short = 'I', long = "include-dir")]
    include_dirs: Vec<PathBuf>,

    #[arg(long, short)]
    verbose: bool,
}

fn load_lang_options(args: &Args) -> LangOptions {
    let path = args.config.clone().or_else(|| {
        let default = PathBuf::from("cfront.toml");
        default.is_file().then_some(default)
    });
    let Some(path) = path else {
        return LangOptions::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => match LangOptions::from_toml_str(&text) {
            Ok(options) => options,
            Err(error) => {
                eprintln!("cfront: warning: ignoring malformed {}: {error}", path.display());
                LangOptions::default()
            },
        },
        Err(error) => {
            eprintln!("cfront: warning: cannot read {}: {error}", path.display());
            LangOptions::default()
        },
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("cfront=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cfront=warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = load_lang_options(&args);
    let buffer = SharedDiagnosticBuffer::new();
    let engine = DiagnosticsEngine::new(Box::new(buffer.clone()));

    let mut parser = Parser::new(options, engine);
    for dir in &args.include_dirs {
        parser.pp.add_include_dir(dir.clone());
    }

    let main_file = match parser.enter_main_file(&args.input) {
        Ok(file_id) => file_id,
        Err(error) => {
            eprintln!("cfront: error: {error}");
            return ExitCode::FAILURE;
        },
    };

    parser.parse_translation_unit();
    info!(diagnostics = parser.diags.num_diagnostics(), errors = parser.diags.num_errors(), "parse finished");

    let diagnostics = buffer.diagnostics();
    let sm = &parser.pp.sm;

    if args.verify {
        let problems = verify::check_expected(sm, main_file, &diagnostics);
        if problems.is_empty() {
            println!("verified: {} diagnostic(s) matched", diagnostics.len());
            return ExitCode::SUCCESS;
        }
        for problem in &problems {
            eprintln!("cfront: verify: {problem}");
        }
        return ExitCode::FAILURE;
    }

    for diagnostic in &diagnostics {
        let level = match diagnostic.level {
            Level::Note => "note",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal error",
            Level::Ignored => continue,
        };
        if diagnostic.loc.is_valid() {
            let logical = sm.logical_loc(diagnostic.loc);
            eprintln!(
                "{}:{}:{}: {level}: {}",
                sm.source_name(logical),
                sm.line_number(logical),
                sm.column_number(logical),
                diagnostic.message()
            );
        } else {
            eprintln!("cfront: {level}: {}", diagnostic.message());
        }
    }

    if args.ast_dump {
        let dumper = AstDumper::new(&parser.sema.ctx, &parser.pp.idents, Some(sm));
        let dump = dumper.dump_translation_unit();
        println!("{}", serde_json::to_string_pretty(&dump).expect("dump serializes"));
    }

    if parser.diags.error_occurred() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
