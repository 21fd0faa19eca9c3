// Material store
// Lists and extracts text from the local files that get embedded

#[cfg(test)]
mod tests;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

/// Read access to the materials directory
#[derive(Debug, Clone)]
pub struct MaterialStore {
    dir: PathBuf,
}

impl MaterialStore {
    #[inline]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names in directory enumeration order; empty when the directory does not exist
    #[inline]
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Materials directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to list materials in {}", self.dir.display())
                });
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to list materials in {}", self.dir.display()))?;

            // Follows symlinks, so a link to a regular file counts as a file
            let is_file = fs::metadata(entry.path())
                .map(|metadata| metadata.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => files.push(name),
                Err(name) => warn!("Skipping material with non UTF-8 name: {:?}", name),
            }
        }

        debug!("Found {} materials in {}", files.len(), self.dir.display());
        Ok(files)
    }

    /// Whether `filename` is part of the current listing
    #[inline]
    pub fn contains(&self, filename: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|name| name == filename))
    }

    /// Extracted text of a material; PDFs are flattened page by page
    #[inline]
    pub fn read(&self, filename: &str) -> Result<String> {
        let path = self.dir.join(filename);

        if is_pdf(filename) {
            return extract_pdf_text(&path);
        }

        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read material {}", path.display()))
    }

    /// Raw file contents, used when serving PDFs as-is
    #[inline]
    pub fn read_bytes(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(filename);
        fs::read(&path).with_context(|| format!("Failed to read material {}", path.display()))
    }
}

/// Whether the text after the last `.` is `pdf`; a bare `pdf` or `.pdf` counts
#[inline]
pub fn is_pdf(filename: &str) -> bool {
    filename
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Join per-page text with newlines, preserving page order
#[inline]
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for (index, page) in pages.into_iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        text.push_str(page.as_ref());
    }
    text
}

fn extract_pdf_text(path: &Path) -> Result<String> {
    let mut document = Document::load(path)
        .with_context(|| format!("Failed to open PDF {}", path.display()))?;
    inherit_page_resources(&mut document);

    let pages = document.get_pages();
    debug!("Extracting text from {} pages of {}", pages.len(), path.display());

    let texts = pages.keys().map(|&page_number| {
        match document.extract_text(&[page_number]) {
            Ok(text) => {
                let text = text.trim_end_matches(['\r', '\n']);
                if text.is_empty() {
                    debug!("Page {} of {} has no text", page_number, path.display());
                }
                text.to_string()
            }
            Err(e) => {
                warn!(
                    "No extractable text on page {} of {}: {}",
                    page_number,
                    path.display(),
                    e
                );
                String::new()
            }
        }
    });

    Ok(join_pages(texts))
}

/// Copy `/Resources` inherited through the page tree onto each page that lacks its own.
///
/// Text extraction only resolves fonts from a page's own resources or from
/// inherited ones held by reference, so inline inherited dictionaries are
/// stored as objects and referenced from the page.
fn inherit_page_resources(document: &mut Document) {
    let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

    for page_id in page_ids {
        let resources_id = match inherited_resources(document, page_id) {
            Some(Object::Reference(id)) => id,
            Some(Object::Dictionary(resources)) => document.add_object(resources),
            _ => continue,
        };

        if let Ok(page) = document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
        {
            page.set("Resources", resources_id);
        }
    }
}

fn inherited_resources(document: &Document, page_id: ObjectId) -> Option<Object> {
    const MAX_TREE_DEPTH: usize = 64;

    let page = document.get_dictionary(page_id).ok()?;
    if page.has(b"Resources") {
        return None;
    }

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = document.get_dictionary(parent?).ok()?;
        if let Ok(resources) = node.get(b"Resources") {
            return Some(resources.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
