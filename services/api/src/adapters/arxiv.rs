//! services/api/src/adapters/arxiv.rs
//!
//! The adapter for the arXiv query API. It implements the `PaperSourceService`
//! port: one GET per search, with the Atom feed flattened into `PaperSummary`s.

use async_trait::async_trait;
use paper_shelf_core::domain::PaperSummary;
use paper_shelf_core::ports::{PaperSourceService, PortError, PortResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{error, info};

pub const DEFAULT_ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_AFFILIATION: &str = "No affiliation listed";
pub const UNTITLED: &str = "Untitled";

pub struct ArxivAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaperSourceService for ArxivAdapter {
    async fn search(&self, keyword: &str, max_results: u32) -> PortResult<Vec<PaperSummary>> {
        info!("Searching arXiv for {:?} (max {})", keyword, max_results);

        let query = format!("all:\"{}\"", keyword);
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("arXiv request failed: {}", e);
                PortError::Upstream(e.to_string())
            })?;

        let body = response.text().await.map_err(|e| {
            error!("Failed to read arXiv response body: {}", e);
            PortError::Upstream(e.to_string())
        })?;

        parse_feed(&body)
    }
}

//=========================================================================================
// Atom Feed Parsing
//=========================================================================================

#[derive(Default)]
struct AuthorFields {
    name: String,
    affiliation: Option<String>,
}

#[derive(Default)]
struct EntryFields {
    title: String,
    id: String,
    published: String,
    summary: String,
    authors: Vec<AuthorFields>,
}

impl EntryFields {
    fn finish(self) -> PaperSummary {
        let link = self.id.trim().to_string();
        let doi = link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let first = self.authors.into_iter().next();
        let first_author = first
            .as_ref()
            .map(|a| a.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();
        let author_affiliation = first
            .as_ref()
            .and_then(|a| a.affiliation.as_deref())
            .map(str::trim)
            .filter(|aff| !aff.is_empty())
            .unwrap_or(NO_AFFILIATION)
            .to_string();

        let title = match self.title.trim() {
            "" => UNTITLED.to_string(),
            title => title.to_string(),
        };

        PaperSummary {
            title,
            link,
            doi,
            published: self.published.trim().to_string(),
            summary: self.summary.trim().to_string(),
            first_author,
            author_affiliation,
        }
    }
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Id,
    Published,
    Summary,
    AuthorName,
    AuthorAffiliation,
}

/// Flattens an arXiv Atom feed into summaries, one per `<entry>`.
///
/// Elements are matched by local name, so the `arxiv:` prefix on
/// `<arxiv:affiliation>` does not matter. Only the first affiliation of each
/// author is kept.
pub fn parse_feed(xml: &str) -> PortResult<Vec<PaperSummary>> {
    let mut reader = Reader::from_str(xml);
    let malformed = |e: quick_xml::Error| {
        error!("Malformed arXiv feed: {}", e);
        PortError::Upstream(format!("malformed feed: {}", e))
    };

    let mut papers = Vec::new();
    let mut entry: Option<EntryFields> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;
    let mut saw_feed = false;
    let mut feed_closed = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let local = e.local_name();
                let name = local.as_ref();
                if name == b"feed" {
                    saw_feed = true;
                } else if name == b"entry" && entry.is_none() {
                    entry = Some(EntryFields::default());
                } else if let Some(current) = entry.as_mut() {
                    field = match name {
                        b"author" => {
                            in_author = true;
                            current.authors.push(AuthorFields::default());
                            None
                        }
                        b"name" if in_author => Some(Field::AuthorName),
                        b"affiliation" if in_author => match current.authors.last_mut() {
                            Some(author) if author.affiliation.is_none() => {
                                author.affiliation = Some(String::new());
                                Some(Field::AuthorAffiliation)
                            }
                            _ => None,
                        },
                        b"title" if !in_author => Some(Field::Title),
                        b"id" if !in_author => Some(Field::Id),
                        b"published" if !in_author => Some(Field::Published),
                        b"summary" if !in_author => Some(Field::Summary),
                        _ => None,
                    };
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"feed" => feed_closed = true,
                b"entry" => {
                    if let Some(done) = entry.take() {
                        papers.push(done.finish());
                    }
                    in_author = false;
                    field = None;
                }
                b"author" => {
                    in_author = false;
                    field = None;
                }
                _ => field = None,
            },
            Event::Text(t) => {
                if let (Some(f), Some(current)) = (field, entry.as_mut()) {
                    let text = t.unescape().map_err(malformed)?;
                    push_text(current, f, &text);
                }
            }
            Event::CData(t) => {
                if let (Some(f), Some(current)) = (field, entry.as_mut()) {
                    let raw = t.into_inner();
                    push_text(current, f, &String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_feed {
        error!("arXiv response was not an Atom feed");
        return Err(PortError::Upstream("response is not an Atom feed".to_string()));
    }
    if entry.is_some() || !feed_closed {
        error!("arXiv feed ended before </feed>");
        return Err(PortError::Upstream("truncated feed".to_string()));
    }

    Ok(papers)
}

fn push_text(entry: &mut EntryFields, field: Field, text: &str) {
    let target = match field {
        Field::Title => &mut entry.title,
        Field::Id => &mut entry.id,
        Field::Published => &mut entry.published,
        Field::Summary => &mut entry.summary,
        Field::AuthorName => match entry.authors.last_mut() {
            Some(author) => &mut author.name,
            None => return,
        },
        Field::AuthorAffiliation => {
            match entry.authors.last_mut().and_then(|a| a.affiliation.as_mut()) {
                Some(aff) => aff,
                None => return,
            }
        }
    };
    target.push_str(text);
}
