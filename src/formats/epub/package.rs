//! EPUB package XML: container, OPF manifest/spine and NCX titles
//!
//! Only the handful of elements the extractor needs are read. Namespace
//! prefixes are ignored by matching on local names.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::content::Result;

/// Manifest and spine of an OPF package document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Manifest item id to href
    pub manifest: HashMap<String, String>,
    /// Spine idrefs in reading order
    pub spine: Vec<String>,
}

impl Package {
    /// Spine hrefs in order, skipping idrefs without a manifest item
    pub fn spine_hrefs(&self) -> impl Iterator<Item = &str> {
        self.spine
            .iter()
            .filter_map(|id| self.manifest.get(id).map(String::as_str))
    }
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `full-path` of the first `rootfile` in `META-INF/container.xml`
pub fn parse_container(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    if !path.is_empty() {
                        return Ok(Some(path));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Parse manifest `item` and spine `itemref` elements of an OPF document
pub fn parse_package(xml: &str) -> Result<Package> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut package = Package::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"item" => {
                    if let (Some(id), Some(href)) =
                        (attribute(&e, b"id")?, attribute(&e, b"href")?)
                    {
                        package.manifest.insert(id, href);
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref")? {
                        package.spine.push(idref);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(package)
}

/// Titles of every `navPoint` in an NCX document, in document order
///
/// Nested navPoints follow their parent. A navPoint without label text
/// contributes nothing.
pub fn parse_ncx_titles(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut titles = Vec::new();
    let mut in_label = false;
    let mut in_text = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"navLabel" => in_label = true,
                b"text" if in_label => {
                    in_text = true;
                    current.clear();
                }
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::CData(t) if in_text => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()))
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"text" if in_text => {
                    in_text = false;
                    let title = current.trim();
                    if !title.is_empty() {
                        titles.push(title.to_string());
                    }
                }
                b"navLabel" => in_label = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(titles)
}

/// Directory part of an archive path, with a trailing slash, or empty
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..=pos],
        None => "",
    }
}

/// Archive entry names to try for a manifest href, most likely first
///
/// The href is resolved against the package directory, then tried raw,
/// then both again percent-decoded. Fragments are dropped.
pub fn candidate_paths(opf_dir: &str, href: &str) -> Vec<String> {
    let href = href.split('#').next().unwrap_or(href);
    let mut candidates = Vec::with_capacity(4);
    let mut push = |path: String| {
        if !path.is_empty() && !candidates.contains(&path) {
            candidates.push(path);
        }
    };

    push(resolve(opf_dir, href));
    push(href.to_string());
    if let Ok(decoded) = urlencoding::decode(href) {
        push(resolve(opf_dir, &decoded));
        push(decoded.into_owned());
    }
    candidates
}

/// Join `href` onto `dir`, collapsing `.` and `..` segments
fn resolve(dir: &str, href: &str) -> String {
    let joined = format!("{dir}{href}");
    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}
