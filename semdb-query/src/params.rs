//! Raw inline query parameters
//!
//! Parser-function parameters come in three shapes:
//! - query text: one or more `[[...]]` conditions, possibly with `<q>...</q>`
//!   subqueries
//! - printouts: `?Property`
//! - directives: `key=value` (`format=list`, `limit=10`, ...)

use semdb_vocab::formats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameters of one inline query, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    /// Top-level conditions in document order
    pub conditions: Vec<String>,
    /// Printout labels without the leading `?`
    pub printouts: Vec<String>,
    /// Directives with lowercased keys
    pub directives: BTreeMap<String, String>,
    /// Number of conditions including those inside subqueries
    pub condition_count: usize,
    /// Deepest `<q>` nesting level
    pub max_nesting: usize,
}

impl QueryParams {
    /// Split raw parameters
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut params = QueryParams::default();
        for param in raw {
            let param = param.as_ref().trim();
            if param.is_empty() {
                continue;
            }
            if let Some(printout) = param.strip_prefix('?') {
                let label = printout.split('=').next().unwrap_or(printout).trim();
                if !label.is_empty() {
                    params.printouts.push(label.to_string());
                }
                continue;
            }
            if !param.starts_with("[[") {
                if let Some((key, value)) = param.split_once('=') {
                    params
                        .directives
                        .insert(key.trim().to_lowercase(), value.trim().to_string());
                    continue;
                }
            }
            params.scan_conditions(param);
        }
        params
    }

    /// Normalized query string: top-level conditions joined by one space
    pub fn query_string(&self) -> String {
        self.conditions.join(" ")
    }

    /// Result format
    ///
    /// Unknown formats fall back to `table`; without a format directive the
    /// default is `table` when there are printouts and `list` otherwise.
    pub fn format(&self) -> String {
        match self.directives.get("format") {
            Some(format) => {
                let format = format.to_lowercase();
                if formats::is_known(&format) {
                    format
                } else {
                    formats::DEFAULT.to_string()
                }
            }
            None if self.printouts.is_empty() => formats::PLAIN.to_string(),
            None => formats::DEFAULT.to_string(),
        }
    }

    /// `limit` directive, if present and numeric
    pub fn limit(&self) -> Option<usize> {
        self.directives.get("limit").and_then(|l| l.parse().ok())
    }

    fn scan_conditions(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut i = 0;
        let mut brackets = 0usize;
        let mut nesting = 0usize;
        let mut start = None;
        while i < bytes.len() {
            let rest = &text[i..];
            if rest.starts_with("[[") {
                if brackets == 0 && nesting == 0 {
                    start = Some(i);
                }
                brackets += 1;
                if nesting > 0 || brackets == 1 {
                    self.condition_count += 1;
                }
                i += 2;
            } else if rest.starts_with("]]") && brackets > 0 {
                brackets -= 1;
                i += 2;
                if brackets == 0 && nesting == 0 {
                    if let Some(s) = start.take() {
                        self.conditions.push(text[s..i].to_string());
                    }
                }
            } else if rest.starts_with("<q>") {
                nesting += 1;
                self.max_nesting = self.max_nesting.max(nesting);
                i += 3;
            } else if rest.starts_with("</q>") && nesting > 0 {
                nesting -= 1;
                i += 4;
            } else {
                i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
            }
        }
    }
}
