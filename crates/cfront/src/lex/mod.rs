pub mod lexer;
pub mod preprocessor;
pub mod token;

pub use preprocessor::{MacroInfo, PpCallbacks, PpMark, Preprocessor};
pub use token::Token;
