mod document;
pub mod geometry;
mod models;
mod parser;

pub use document::Document;
pub use models::{Element, ElementDef, NodeId, PageDef, Rect};
pub use parser::parse_page;
