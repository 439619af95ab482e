//! File name classification

use super::types::ContentType;

/// Extensions treated as comic page images
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Classify a file by its name's extension, case-insensitively
pub fn classify(file_name: &str) -> ContentType {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        ContentType::Pdf
    } else if lower.ends_with(".epub") {
        ContentType::Epub
    } else if lower.ends_with(".cbz") || lower.ends_with(".zip") {
        ContentType::ComicZip
    } else if lower.ends_with(".cbr") || lower.ends_with(".rar") {
        ContentType::ComicRar
    } else {
        ContentType::Unknown
    }
}

/// Returns true if `name` is an image file we treat as a comic page.
pub fn is_image_name(name: &str) -> bool {
    if name.ends_with('/') {
        return false;
    }
    image_extension(name).is_some()
}

/// Lower-cased image extension of `name`, if it has one we recognize
pub fn image_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(classify("book.pdf"), ContentType::Pdf);
        assert_eq!(classify("book.epub"), ContentType::Epub);
        assert_eq!(classify("issue.cbz"), ContentType::ComicZip);
        assert_eq!(classify("issue.zip"), ContentType::ComicZip);
        assert_eq!(classify("issue.cbr"), ContentType::ComicRar);
        assert_eq!(classify("issue.rar"), ContentType::ComicRar);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("A.PDF"), classify("a.pdf"));
        assert_eq!(classify("A.PDF"), ContentType::Pdf);
        assert_eq!(classify("Vol.01.CbR"), ContentType::ComicRar);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("notes.txt"), ContentType::Unknown);
        assert_eq!(classify("pdf"), ContentType::Unknown);
        assert_eq!(classify(""), ContentType::Unknown);
        assert_eq!(classify("archive.cbz.bak"), ContentType::Unknown);
    }

    #[test]
    fn test_image_names() {
        assert!(is_image_name("pages/001.JPG"));
        assert!(is_image_name("cover.webp"));
        assert!(!is_image_name("ComicInfo.xml"));
        assert!(!is_image_name("images.png/"));
        assert!(!is_image_name("thumbs.gif"));
        assert_eq!(image_extension("a/B.JpEg").as_deref(), Some("jpeg"));
    }
}
