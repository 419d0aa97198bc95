//! Session history collaborator
//!
//! Stands in for the host history API: scroll-restoration mode and the
//! current location fragment. Calls can be rejected by the host; callers
//! catch and ignore those failures, they are never user-visible.

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct History {
    supported: bool,
    manual_restoration: bool,
    fragment: Option<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            supported: true,
            manual_restoration: false,
            fragment: None,
        }
    }

    /// A host that rejects history manipulation
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            manual_restoration: false,
            fragment: None,
        }
    }

    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    /// Switch scroll restoration to manual
    pub fn set_manual_restoration(&mut self) -> Result<()> {
        if !self.supported {
            return Err(Error::History("scroll restoration".to_string()));
        }
        self.manual_restoration = true;
        Ok(())
    }

    /// Replace the location fragment without navigation
    pub fn replace_fragment(&mut self, fragment: Option<String>) -> Result<()> {
        if !self.supported {
            return Err(Error::History("replace state".to_string()));
        }
        self.fragment = fragment;
        Ok(())
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn manual_restoration(&self) -> bool {
        self.manual_restoration
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_replacement() {
        let mut h = History::new().with_fragment("#services");
        assert_eq!(h.fragment(), Some("#services"));
        h.replace_fragment(None).unwrap();
        assert_eq!(h.fragment(), None);
        h.replace_fragment(Some("#contact".to_string())).unwrap();
        assert_eq!(h.fragment(), Some("#contact"));
    }

    #[test]
    fn test_unsupported_host_rejects() {
        let mut h = History::unsupported();
        assert!(h.set_manual_restoration().is_err());
        assert!(h.replace_fragment(None).is_err());
        assert!(!h.manual_restoration());
    }
}
