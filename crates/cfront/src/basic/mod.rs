pub mod diagnostic;
pub mod ident;
pub mod selector;
pub mod source_location;
pub mod source_manager;
pub mod token_kinds;
pub mod verify;
