//! Blog posts: markdown files with a front matter header.
//!
//! A post file looks like
//!
//! ```text
//! ---
//! title: "Your First Blog Post Title"
//! date: 2024-01-15
//! category: Research
//! excerpt: A compelling excerpt...
//! ---
//! Body text.
//! ```
//!
//! The header is the text between the first two `---` separators. Each
//! `key: value` line becomes a field; the value is everything after the first
//! colon, so it may contain colons itself, and one pair of surrounding quotes
//! is stripped. The body is shown as-is, no markdown conversion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

const SEPARATOR: &str = "---";
const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("`{0}` is not a post file name")]
    BadName(String),
}

/// The card data for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub filename: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub category: String,
    pub excerpt: String,
}

impl PostMeta {
    /// `January 15, 2024`, or `Undated`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.map_or_else(|| "Undated".to_string(), format_date)
    }
}

/// A post opened for reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub meta: PostMeta,
    pub body: String,
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

// ---------------------------------------------------------------------------
// Front matter
// ---------------------------------------------------------------------------

/// Split a post into header fields and body. Without a complete header the
/// whole text is the body.
#[must_use]
pub fn parse_front_matter(text: &str) -> (Vec<(String, String)>, String) {
    let parts: Vec<&str> = text.split(SEPARATOR).collect();
    if parts.len() < 3 {
        return (Vec::new(), text.trim().to_string());
    }

    let fields = parts[1]
        .trim()
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), strip_quotes(value.trim()).to_string()))
        })
        .collect();

    (fields, parts[2..].join(SEPARATOR).trim().to_string())
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Build the metadata of `filename` from its text.
#[must_use]
pub fn parse_post(filename: &str, text: &str) -> Post {
    let (fields, body) = parse_front_matter(text);
    let stem = filename.strip_suffix(".md").unwrap_or(filename);

    let date = field(&fields, "date").and_then(|d| match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(filename, date = d, %err, "unreadable post date");
            None
        }
    });

    let excerpt = field(&fields, "excerpt").map_or_else(|| excerpt_of(&body), str::to_string);

    Post {
        meta: PostMeta {
            filename: filename.to_string(),
            title: field(&fields, "title").unwrap_or(stem).to_string(),
            date,
            category: field(&fields, "category").unwrap_or("").to_string(),
            excerpt,
        },
        body,
    }
}

/// The first paragraph, cut at a character limit.
fn excerpt_of(body: &str) -> String {
    let para = body.split("\n\n").map(str::trim).find(|p| !p.is_empty()).unwrap_or("");
    let flat = para.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Every `*.md` post in `dir`, newest first. Undated posts go last. A
/// missing directory is an empty blog; unreadable files are skipped.
///
/// # Errors
///
/// Fails if `dir` exists but cannot be listed.
pub fn load_catalog(dir: &Path) -> Result<Vec<PostMeta>, PostError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "posts directory not found");
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| PostError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut posts = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(text) => posts.push(parse_post(filename, &text).meta),
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable post"),
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.filename.cmp(&b.filename)));
    debug!(count = posts.len(), dir = %dir.display(), "posts loaded");
    Ok(posts)
}

/// Read one post for the reader view.
///
/// # Errors
///
/// Fails if `filename` is not a plain `.md` name in `dir` or cannot be read.
pub fn read_post(dir: &Path, filename: &str) -> Result<Post, PostError> {
    let plain = Path::new(filename).file_name().and_then(|n| n.to_str()) == Some(filename);
    if !plain || !filename.ends_with(".md") {
        return Err(PostError::BadName(filename.to_string()));
    }
    let path = dir.join(filename);
    let text = fs::read_to_string(&path).map_err(|source| PostError::Io { path, source })?;
    Ok(parse_post(filename, &text))
}
