use super::*;
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use tempfile::TempDir;

/// Write a PDF whose pages each draw one line of text
fn write_pdf(path: &Path, pages: &[&str]) {
    write_pdf_with_resources(path, pages, false);
}

/// Like [`write_pdf`]; `inline_resources` keeps the font table inline in the
/// page tree root instead of in its own object
fn write_pdf_with_resources(path: &Path, pages: &[&str], inline_resources: bool) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let font_table = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };
    let resources: Object = if inline_resources {
        Object::Dictionary(font_table)
    } else {
        doc.add_object(font_table).into()
    };

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content should encode"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = i64::try_from(kids.len()).expect("page count fits");
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("pdf should save");
}

#[test]
fn missing_directory_lists_nothing() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let store = MaterialStore::new(temp_dir.path().join("does-not-exist"));

    assert_eq!(store.list().expect("listing should succeed"), Vec::<String>::new());
}

#[test]
fn listing_skips_directories() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(temp_dir.path().join("a.txt"), "alpha").expect("should write");
    fs::write(temp_dir.path().join("b.md"), "beta").expect("should write");
    fs::create_dir(temp_dir.path().join("nested")).expect("should create dir");

    let store = MaterialStore::new(temp_dir.path());
    let mut files = store.list().expect("listing should succeed");
    files.sort();

    assert_eq!(files, vec!["a.txt".to_string(), "b.md".to_string()]);
    assert!(store.contains("a.txt").expect("contains should succeed"));
    assert!(!store.contains("nested").expect("contains should succeed"));
}

#[test]
fn every_listed_material_is_readable() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(temp_dir.path().join("notes.txt"), "line one\nline two\n").expect("should write");
    fs::write(temp_dir.path().join("empty.txt"), "").expect("should write");
    write_pdf(&temp_dir.path().join("slides.PDF"), &["Intro"]);

    let store = MaterialStore::new(temp_dir.path());
    for filename in store.list().expect("listing should succeed") {
        assert!(
            store.read(&filename).is_ok(),
            "failed to read listed material {}",
            filename
        );
    }
}

#[test]
fn text_is_read_verbatim() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let content = "Título\r\n\tindented ünïcode\n\n";
    fs::write(temp_dir.path().join("notes.txt"), content).expect("should write");

    let store = MaterialStore::new(temp_dir.path());
    assert_eq!(store.read("notes.txt").expect("read should succeed"), content);
}

#[test]
fn invalid_utf8_text_fails() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(temp_dir.path().join("binary.txt"), [0xff, 0xfe, 0x00]).expect("should write");

    let store = MaterialStore::new(temp_dir.path());
    assert!(store.read("binary.txt").is_err());
}

#[test]
fn pdf_detection_ignores_case() {
    assert!(is_pdf("report.pdf"));
    assert!(is_pdf("REPORT.PDF"));
    assert!(!is_pdf("report.pdf.txt"));
    assert!(!is_pdf("notes.txt"));
    assert!(!is_pdf("pdf.txt"));
}

#[test]
fn pdf_detection_uses_text_after_last_dot() {
    assert!(is_pdf("pdf"));
    assert!(is_pdf(".pdf"));
    assert!(is_pdf("archive.tar.Pdf"));
    assert!(!is_pdf("report.pdfx"));
}

#[test]
fn pages_join_with_newlines_in_order() {
    assert_eq!(join_pages(["first", "second", "third"]), "first\nsecond\nthird");
    assert_eq!(join_pages(["first", "", "third"]), "first\n\nthird");
    assert_eq!(join_pages(Vec::<String>::new()), "");
}

#[test]
fn pdf_pages_are_extracted_in_order() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    write_pdf(
        &temp_dir.path().join("lecture.pdf"),
        &["Page one", "Page two", "Page three"],
    );

    let store = MaterialStore::new(temp_dir.path());
    let text = store.read("lecture.pdf").expect("pdf should extract");

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    assert_eq!(lines, vec!["Page one", "Page two", "Page three"]);
}

#[test]
fn pdf_with_inline_inherited_resources_keeps_text() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    write_pdf_with_resources(
        &temp_dir.path().join("paper.pdf"),
        &["Vectors in PDF", "Second page"],
        true,
    );

    let store = MaterialStore::new(temp_dir.path());
    let text = store.read("paper.pdf").expect("pdf should extract");

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    assert_eq!(lines, vec!["Vectors in PDF", "Second page"]);
}

#[test]
fn raw_bytes_are_served_unchanged() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    write_pdf(&temp_dir.path().join("lecture.pdf"), &["Hello"]);

    let store = MaterialStore::new(temp_dir.path());
    let bytes = store.read_bytes("lecture.pdf").expect("bytes should read");
    assert!(bytes.starts_with(b"%PDF-1.5"));
}
