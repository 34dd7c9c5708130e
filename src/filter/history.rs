//! Address bar synchronisation.
//!
//! A [History] is the store's view of the browser location: it exposes the
//! current query string and accepts push and replace updates.

/// Build the URL for `path` with `query`, leaving out the `?` when the query is empty.
pub fn url_for(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

/// The location the filter store reads from and writes to.
pub trait History {
    /// The query string of the current entry, without the leading `?`.
    fn query(&self) -> &str;

    /// Add a new entry after the current one.
    fn push(&mut self, query: &str);

    /// Overwrite the current entry without adding a new one.
    fn replace(&mut self, query: &str);
}

/// A navigable history kept in memory, with back and forward support.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    path: String,
    entries: Vec<String>,
    index: usize,
}

#[cfg(test)]
impl MemoryHistory {
    /// Create a history with a single entry at `path` with `query`.
    pub fn new(path: &str, query: &str) -> Self {
        Self {
            path: path.to_owned(),
            entries: vec![query.to_owned()],
            index: 0,
        }
    }

    /// The URL of the current entry.
    pub fn current_url(&self) -> String {
        url_for(&self.path, self.query())
    }

    /// The number of entries, including any forward entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Move to the previous entry, returning `false` if already at the first one.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }

        self.index -= 1;
        true
    }

    /// Move to the next entry, returning `false` if already at the last one.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }

        self.index += 1;
        true
    }
}

#[cfg(test)]
impl History for MemoryHistory {
    fn query(&self) -> &str {
        &self.entries[self.index]
    }

    fn push(&mut self, query: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(query.to_owned());
        self.index += 1;
    }

    fn replace(&mut self, query: &str) {
        self.entries[self.index] = query.to_owned();
    }
}

/// A history update requested while handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// A new entry should be added with this query string.
    Push(String),
    /// The current entry should be overwritten with this query string.
    Replace(String),
}

impl HistoryUpdate {
    /// The query string of the updated entry.
    pub fn query(&self) -> &str {
        match self {
            Self::Push(query) | Self::Replace(query) => query,
        }
    }
}

/// The location of a single HTTP request.
///
/// Updates are recorded rather than applied, the HTTP layer turns the last
/// one into htmx headers or a redirect.
#[derive(Debug, Clone)]
pub struct ResponseHistory {
    query: String,
    update: Option<HistoryUpdate>,
}

impl ResponseHistory {
    /// Create the location of a request that carried `query`.
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_owned(),
            update: None,
        }
    }

    /// The last update requested, if any.
    pub fn update(&self) -> Option<&HistoryUpdate> {
        self.update.as_ref()
    }

    /// Whether an update changed the query string the request was made with.
    pub fn changed_location(&self, request_query: &str) -> bool {
        self.update
            .as_ref()
            .is_some_and(|update| update.query() != request_query)
    }
}

impl History for ResponseHistory {
    fn query(&self) -> &str {
        &self.query
    }

    fn push(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.update = Some(HistoryUpdate::Push(query.to_owned()));
    }

    fn replace(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.update = Some(HistoryUpdate::Replace(query.to_owned()));
    }
}
