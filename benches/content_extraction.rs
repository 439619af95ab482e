//! Content Extraction Benchmarks
//!
//! Chapter normalization and narration text preparation run once per chapter
//! on every open, so they dominate EPUB load time for long books.
//!
//! Run with: `cargo bench --bench content_extraction`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::{Cursor, Write};
use std::time::Duration;

use readlab::formats::epub::{normalize_chapter, plain_text, EpubExtractor};
use readlab::narration::split_sentences;

/// Chapter markup with the clutter real EPUBs carry
fn create_chapter(paragraphs: usize) -> String {
    let mut html = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Chapter</title><style>p { text-indent: 1em; }</style></head>
<body class="chapter">
<svg><image href="ornament.png"/></svg>
<h2 class="title">A Long Chapter</h2>
"#,
    );
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p class=\"para\">Paragraph {i} opens quietly. It goes on &amp; on, &#8220;quoted&#8221;! Does it end?</p>\n"
        ));
        if i % 10 == 0 {
            html.push_str("<ul><li class=\"item\"><p>First point.</p></li><li>Second point.</li></ul>\n");
        }
    }
    html.push_str("<!-- end --></body></html>");
    html
}

/// EPUB with `chapters` spine items and an NCX
fn create_epub(chapters: usize) -> Vec<u8> {
    use zip::{write::SimpleFileOptions, ZipWriter};

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("META-INF/container.xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#).unwrap();

    let mut manifest = String::new();
    let mut spine = String::new();
    let mut nav = String::new();
    for i in 0..chapters {
        manifest.push_str(&format!(
            r#"<item id="c{i}" href="text/c{i}.xhtml" media-type="application/xhtml+xml"/>"#
        ));
        spine.push_str(&format!(r#"<itemref idref="c{i}"/>"#));
        nav.push_str(&format!(
            "<navPoint><navLabel><text>Chapter {i}</text></navLabel></navPoint>"
        ));
    }

    zip.start_file("OEBPS/content.opf", options).unwrap();
    zip.write_all(format!(
        r#"<package xmlns="http://www.idpf.org/2007/opf" version="2.0"><manifest>{manifest}</manifest><spine>{spine}</spine></package>"#
    ).as_bytes()).unwrap();

    zip.start_file("OEBPS/toc.ncx", options).unwrap();
    zip.write_all(format!("<ncx><navMap>{nav}</navMap></ncx>").as_bytes())
        .unwrap();

    let chapter = create_chapter(40);
    for i in 0..chapters {
        zip.start_file(format!("OEBPS/text/c{i}.xhtml"), options).unwrap();
        zip.write_all(chapter.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn bench_normalize_chapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_chapter");

    for paragraphs in [10, 100, 1000] {
        let html = create_chapter(paragraphs);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &html, |b, html| {
            b.iter(|| black_box(normalize_chapter(black_box(html))))
        });
    }

    group.finish();
}

fn bench_narration_text(c: &mut Criterion) {
    let html = normalize_chapter(&create_chapter(200)).expect("chapter has text");

    let mut group = c.benchmark_group("narration_text");
    group.bench_function("plain_text", |b| {
        b.iter(|| black_box(plain_text(black_box(&html))))
    });

    let text = plain_text(&html);
    group.bench_function("split_sentences", |b| {
        b.iter(|| black_box(split_sentences(black_box(&text))))
    });

    group.finish();
}

fn bench_epub_extraction(c: &mut Criterion) {
    let epub = create_epub(20);

    let mut group = c.benchmark_group("epub_extraction");
    group.throughput(Throughput::Bytes(epub.len() as u64));
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("twenty_chapters", |b| {
        b.iter(|| {
            let mut extractor =
                EpubExtractor::new(Cursor::new(black_box(epub.as_slice()))).expect("valid zip");
            black_box(extractor.extract().expect("extractable"))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize_chapter,
    bench_narration_text,
    bench_epub_extraction
);
criterion_main!(benches);
