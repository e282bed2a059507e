pub mod diagnostic;
pub mod json;
pub mod summary;
pub mod terminal;
pub mod view;
