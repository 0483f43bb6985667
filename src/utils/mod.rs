pub mod input;
pub mod scroll;
pub mod syntax;
pub mod url;
