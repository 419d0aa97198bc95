//! Page file parsing
//!
//! A page is a TOML document: a viewport height plus a list of `[[element]]`
//! tables, each with optional id, classes, attrs and nested children.

use crate::error::{Error, Result};

use super::document::Document;
use super::models::PageDef;

/// Parse a TOML page description into a document
pub fn parse_page(input: &str) -> Result<Document> {
    let def: PageDef = toml::from_str(input).map_err(|e| Error::Page(e.to_string()))?;
    Document::from_def(&def)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_page() {
        let doc = parse_page(
            r#"
            viewport_height = 600.0

            [[element]]
            id = "loader"

            [[element]]
            id = "hero"
            classes = ["hero"]
            top = 0.0
            height = 500.0

              [[element.children]]
              classes = ["reveal"]
              top = 60.0
              height = 40.0

            [[element]]
            classes = ["reveal"]
            top = 900.0
            height = 200.0
            "#,
        )
        .unwrap();

        assert!(doc.by_element_id("loader").is_some());
        assert_eq!(doc.with_class("reveal").len(), 2);
        let hero = doc.by_element_id("hero").unwrap();
        assert_eq!(doc.descendants_with_class(hero, "reveal").len(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_viewport() {
        assert!(parse_page("viewport_height = 0.0").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        assert!(parse_page("[[element").is_err());
    }
}
