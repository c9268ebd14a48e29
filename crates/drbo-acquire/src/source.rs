use std::fmt;
use std::path::PathBuf;

use drbo_model::{DrboError, Result};

use crate::decode;
use crate::fetch::{self, FetchOptions};

const BASE_URL: &str = "http://www.drbo.org";

/// Which rendition of a chapter to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edition {
    /// Latin Vulgate and Douay-Rheims side by side.
    #[default]
    Parallel,
    /// Douay-Rheims English only.
    DouayRheims,
}

impl Edition {
    fn path(self) -> &'static str {
        match self {
            Edition::Parallel => "drl/chapter",
            Edition::DouayRheims => "chapter",
        }
    }
}

/// Address of one chapter page on drbo.org.
///
/// Page ids are the book number padded to two digits followed by the
/// chapter padded to three (Matthew 1 is `47001`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRef {
    pub edition: Edition,
    pub book: u16,
    pub chapter: u16,
}

impl Default for ChapterRef {
    fn default() -> Self {
        Self {
            edition: Edition::Parallel,
            book: 47,
            chapter: 1,
        }
    }
}

impl ChapterRef {
    pub fn page_id(&self) -> String {
        format!("{:02}{:03}", self.book, self.chapter)
    }

    pub fn url(&self) -> String {
        format!("{BASE_URL}/{}/{}.htm", self.edition.path(), self.page_id())
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Where the chapter HTML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlSource {
    /// Fetch over HTTP.
    Url(String),
    /// Read a previously saved page from disk.
    File(PathBuf),
}

impl HtmlSource {
    pub async fn load(&self, options: &FetchOptions) -> Result<String> {
        match self {
            HtmlSource::Url(url) => {
                tracing::info!(url = %url, "Fetching chapter page");
                let html = fetch::fetch_page(url, options).await?;
                tracing::info!(bytes = html.len(), "Received HTML");
                Ok(html)
            }
            HtmlSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| DrboError::filesystem(path, e))?;
                let html = decode::decode_html(&bytes, None);
                tracing::info!(path = %path.display(), bytes = bytes.len(), "Read HTML from file");
                Ok(html)
            }
        }
    }
}

impl From<ChapterRef> for HtmlSource {
    fn from(chapter: ChapterRef) -> Self {
        HtmlSource::Url(chapter.url())
    }
}

impl fmt::Display for HtmlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlSource::Url(url) => write!(f, "{url}"),
            HtmlSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
