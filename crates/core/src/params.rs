// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! URL query parameters.
//!
//! The viewer is driven by two parameters: `bm` selects the benchmark to
//! load and `dbg` turns on the debug log. Parameters keep their original
//! order so a re-serialized query string looks like the one it came from.

use serde::Serialize;
use url::form_urlencoded;

/// Query parameter selecting the benchmark to load.
pub const BM_PARAM: &str = "bm";

/// Query parameter enabling the debug log.
pub const DEBUG_PARAM: &str = "dbg";

/// Ordered set of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a query string. A leading `?` is ignored; later duplicates
    /// override earlier ones.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            params.set(key.into_owned(), value.into_owned());
        }
        params
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `name`, or `fallback` when absent.
    pub fn get_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.get(name).unwrap_or(fallback)
    }

    /// Set `name` to `value`, keeping its position when it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Remove `name`.
    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    /// Whether `name` is present with a truthy value.
    ///
    /// An empty value (`?dbg` or `?dbg=`), `0`, `false`, `no` and `off`
    /// are falsy.
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.get(name) {
            None => false,
            Some(v) => !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "no" | "off"
            ),
        }
    }

    /// Serialize back to a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Iterate over the parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let params = QueryParams::parse("?bm=sort&dbg=1");
        assert_eq!(params.get("bm"), Some("sort"));
        assert_eq!(params.get("dbg"), Some("1"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn test_parse_decodes_values() {
        let params = QueryParams::parse("bm=vector%3Cint%3E+push");
        assert_eq!(params.get("bm"), Some("vector<int> push"));
    }

    #[test]
    fn test_set_keeps_order() {
        let mut params = QueryParams::parse("bm=a&dbg=1");
        params.set("bm", "b");
        params.set("extra", "x");
        assert_eq!(params.to_query_string(), "bm=b&dbg=1&extra=x");
    }

    #[test]
    fn test_remove() {
        let mut params = QueryParams::parse("bm=a&dbg=1");
        params.remove("bm");
        assert_eq!(params.to_query_string(), "dbg=1");
    }

    #[test]
    fn test_truthy() {
        assert!(QueryParams::parse("dbg=1").is_truthy("dbg"));
        assert!(QueryParams::parse("dbg=yes").is_truthy("dbg"));
        assert!(!QueryParams::parse("dbg=0").is_truthy("dbg"));
        assert!(!QueryParams::parse("dbg=false").is_truthy("dbg"));
        assert!(!QueryParams::parse("bm=x").is_truthy("dbg"));
    }

    #[test]
    fn test_empty_flag_is_falsy() {
        assert!(!QueryParams::parse("dbg").is_truthy("dbg"));
        assert!(!QueryParams::parse("?dbg=").is_truthy("dbg"));
        assert!(!QueryParams::parse("bm=a&dbg=+").is_truthy("dbg"));
    }
}
