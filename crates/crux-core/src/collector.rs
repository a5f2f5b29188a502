// ── URL working list ──
//
// Accumulates the URLs a search will fetch. Every rejection happens here,
// before anything reaches the network.

use serde::Serialize;
use url::Url;

use crate::error::CoreError;

pub const EMPTY_URL: &str = "URL cannot be empty";
pub const INVALID_URL: &str = "Please enter a valid URL";
pub const DUPLICATE_URL: &str = "URL already added";
pub const NO_URLS: &str = "Please add at least one URL";

/// Ordered, duplicate-free list of URLs queued for a search.
///
/// Entries are kept as typed (minus surrounding whitespace), not
/// normalized, so `https://a.com` and `https://a.com/` are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UrlList {
    urls: Vec<String>,
}

impl UrlList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append one URL. On error the list is unchanged.
    pub fn add(&mut self, input: &str) -> Result<(), CoreError> {
        let url = validate(input)?;
        if self.urls.iter().any(|u| *u == url) {
            return Err(CoreError::invalid_input(DUPLICATE_URL));
        }
        self.urls.push(url);
        Ok(())
    }

    /// Remove the entry at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.urls.len()).then(|| self.urls.remove(index))
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Hand the list over for a search.
    ///
    /// When the list is empty and there is still text in the entry box,
    /// that text is validated and used on its own.
    pub fn take_for_search(&mut self, pending: Option<&str>) -> Result<Vec<String>, CoreError> {
        let pending = pending.filter(|p| !p.trim().is_empty());
        if let (true, Some(pending)) = (self.urls.is_empty(), pending) {
            self.urls.push(validate(pending)?);
        }
        if self.urls.is_empty() {
            return Err(CoreError::invalid_input(NO_URLS));
        }
        Ok(std::mem::take(&mut self.urls))
    }
}

fn validate(input: &str) -> Result<String, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_input(EMPTY_URL));
    }
    Url::parse(trimmed).map_err(|_| CoreError::invalid_input(INVALID_URL))?;
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(err: &CoreError) -> String {
        match err {
            CoreError::InvalidInput { message } => message.clone(),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_is_rejected_and_list_unchanged() {
        let mut list = UrlList::new();
        list.add("https://a.com").unwrap();
        let err = list.add("https://a.com").unwrap_err();
        assert_eq!(message(&err), DUPLICATE_URL);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut list = UrlList::new();
        list.add("  https://a.com  ").unwrap();
        assert_eq!(list.urls(), ["https://a.com"]);
        assert!(list.add("https://a.com\n").is_err());
    }

    #[test]
    fn empty_and_blank_are_rejected() {
        let mut list = UrlList::new();
        assert_eq!(message(&list.add("").unwrap_err()), EMPTY_URL);
        assert_eq!(message(&list.add("   ").unwrap_err()), EMPTY_URL);
        assert!(list.is_empty());
    }

    #[test]
    fn relative_or_garbage_is_rejected() {
        let mut list = UrlList::new();
        for bad in ["example.com", "/path/only", "http://", "not a url"] {
            assert_eq!(message(&list.add(bad).unwrap_err()), INVALID_URL, "{bad}");
        }
        assert!(list.is_empty());
    }

    #[test]
    fn remove_by_index() {
        let mut list = UrlList::new();
        list.add("https://a.com").unwrap();
        list.add("https://b.com").unwrap();
        list.add("https://c.com").unwrap();
        assert_eq!(list.remove(1).as_deref(), Some("https://b.com"));
        assert_eq!(list.urls(), ["https://a.com", "https://c.com"]);
        assert_eq!(list.remove(9), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn search_uses_pending_input_when_list_empty() {
        let mut list = UrlList::new();
        let urls = list.take_for_search(Some("https://a.com")).unwrap();
        assert_eq!(urls, vec!["https://a.com"]);
        assert!(list.is_empty());
    }

    #[test]
    fn search_ignores_pending_when_list_populated() {
        let mut list = UrlList::new();
        list.add("https://a.com").unwrap();
        let urls = list.take_for_search(Some("https://b.com")).unwrap();
        assert_eq!(urls, vec!["https://a.com"]);
    }

    #[test]
    fn search_with_nothing_fails() {
        let mut list = UrlList::new();
        assert_eq!(message(&list.take_for_search(None).unwrap_err()), NO_URLS);
        assert_eq!(message(&list.take_for_search(Some("  ")).unwrap_err()), NO_URLS);
        assert_eq!(
            message(&list.take_for_search(Some("nope")).unwrap_err()),
            INVALID_URL
        );
    }
}
