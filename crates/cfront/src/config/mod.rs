mod lang;

pub use lang::{LangDialect, LangOptions};
