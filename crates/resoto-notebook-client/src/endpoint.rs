//! Request URLs for the three graph service endpoints.

use url::Url;

use crate::error::{ClientError, Result};

/// A graph service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `POST /graph/{graph}/search/list`
    SearchList { graph: &'a str },
    /// `POST /graph/{graph}/search/graph`
    SearchGraph { graph: &'a str },
    /// `POST /cli/execute`, graph passed as a query parameter.
    CliExecute { graph: &'a str },
}

impl<'a> Endpoint<'a> {
    fn segments(&self) -> [&'a str; 4] {
        match *self {
            Self::SearchList { graph } => ["graph", graph, "search", "list"],
            Self::SearchGraph { graph } => ["graph", graph, "search", "graph"],
            Self::CliExecute { .. } => ["cli", "execute", "", ""],
        }
    }

    /// Path for logging, e.g. `/graph/resoto/search/list`.
    pub fn path(&self) -> String {
        self.segments()
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| format!("/{s}"))
            .collect()
    }

    /// Absolute request URL against `base`.
    ///
    /// Any path, query, or fragment on `base` is replaced. Query parameters
    /// are appended in order: `section` (only if non-empty), `graph` (CLI
    /// only), `session_id`.
    pub fn url(&self, base: &Url, section: Option<&str>, session_id: &str) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{base} cannot be a base URL")))?
            .clear()
            .extend(self.segments().iter().filter(|s| !s.is_empty()));

        {
            let mut query = url.query_pairs_mut();
            if let Some(section) = section.filter(|s| !s.is_empty()) {
                query.append_pair("section", section);
            }
            if let Self::CliExecute { graph } = *self {
                query.append_pair("graph", graph);
            }
            query.append_pair("session_id", session_id);
        }

        Ok(url)
    }
}
