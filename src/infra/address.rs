use crate::app::ports::AddressPort;
use crate::error::{Result, WorksError};
use reqwest::Url;
use std::sync::Mutex;

/// Navigable address held in memory. Stands in for the browser location in
/// tests and for the CLI, where `--work` seeds the query parameter.
#[derive(Debug)]
pub struct InMemoryAddress {
    url: Mutex<Url>,
}

impl InMemoryAddress {
    pub fn new(href: &str) -> Result<Self> {
        let url = Url::parse(href).map_err(|e| WorksError::Config(format!("Invalid address '{}': {}", href, e)))?;
        Ok(Self { url: Mutex::new(url) })
    }

    /// Address for `origin` + `path`.
    pub fn for_page(origin: &str, path: &str) -> Result<Self> {
        let base = Url::parse(origin).map_err(|e| WorksError::Config(format!("Invalid origin '{}': {}", origin, e)))?;
        let url = base
            .join(path)
            .map_err(|e| WorksError::Config(format!("Invalid path '{}': {}", path, e)))?;
        Ok(Self { url: Mutex::new(url) })
    }

    fn url(&self) -> Url {
        self.url.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl AddressPort for InMemoryAddress {
    fn query_param(&self, name: &str) -> Option<String> {
        self.url()
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    fn replace_query_param(&self, name: &str, value: Option<&str>) {
        let mut url = self.url.lock().unwrap_or_else(|p| p.into_inner());
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != name)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() && value.is_none() {
            url.set_query(None);
            return;
        }

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        if let Some(v) = value {
            pairs.append_pair(name, v);
        }
    }

    fn href(&self) -> String {
        self.url().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_sets_and_clears_param() {
        let address = InMemoryAddress::for_page("https://ucp.example", "/Our-works").unwrap();
        assert!(address.query_param("work").is_none());

        address.replace_query_param("work", Some("hull-survey"));
        assert_eq!(address.href(), "https://ucp.example/Our-works?work=hull-survey");

        address.replace_query_param("work", Some("draft-survey"));
        assert_eq!(address.query_param("work").as_deref(), Some("draft-survey"));

        address.replace_query_param("work", None);
        assert_eq!(address.href(), "https://ucp.example/Our-works");
    }

    #[test]
    fn test_other_params_survive() {
        let address = InMemoryAddress::new("https://ucp.example/Our-works?utm=mail").unwrap();
        address.replace_query_param("work", Some("a b"));
        assert_eq!(address.query_param("utm").as_deref(), Some("mail"));
        assert_eq!(address.query_param("work").as_deref(), Some("a b"));
        address.replace_query_param("work", None);
        assert_eq!(address.href(), "https://ucp.example/Our-works?utm=mail");
    }
}
