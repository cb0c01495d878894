mod common;

use std::io::Read;

use common::{settings, spawn_wiki_server, PIXEL_PNG};
use wikipub::cli::{build_book, CliRunError};
use wikipub::{scrape_chapter, scrape_index, ScraperError, WikiClient};
use zip::read::ZipArchive;

fn read_entry(archive: &mut ZipArchive<std::fs::File>, name: &str) -> String {
    let mut entry = archive.by_name(name).expect(name);
    let mut body = String::new();
    entry.read_to_string(&mut body).expect("utf-8 entry");
    body
}

#[test]
fn index_lists_chapters_in_page_order() {
    let server = spawn_wiki_server();
    let mut client = WikiClient::new().unwrap();
    let urls = scrape_index(&mut client, &format!("{}/Book_index", server.base_url)).unwrap();
    assert_eq!(urls, vec!["/Book_A", "/Book_B"]);
}

#[test]
fn chapter_scrape_localizes_image() {
    let server = spawn_wiki_server();
    let work = tempfile::tempdir().unwrap();
    let mut client = WikiClient::new().unwrap();
    let chapter = scrape_chapter(&mut client, &server.base_url, "/Book_A", work.path()).unwrap();

    assert_eq!(chapter.title, "A");
    assert_eq!(
        std::fs::read(work.path().join("OEBPS/images/foo.png")).unwrap(),
        PIXEL_PNG
    );
    assert!(chapter.content.contains(r#"src="images/foo.png""#));
    assert!(chapter.content.contains("Alpha text."));
    for marker in ["siteSub", "jump-to-nav", "editsection", "printfooter", "catlinks", "visualClear"] {
        assert!(!chapter.content.contains(marker), "{} left in content", marker);
    }
}

#[test]
fn end_to_end_builds_ordered_epub_with_stored_mimetype() {
    let server = spawn_wiki_server();
    let work = tempfile::tempdir().unwrap();
    let settings = settings(&server.base_url, "/Book_index", work.path());
    let mut client = settings.client().unwrap();

    let dest = build_book(&settings, &mut client).unwrap();
    assert_eq!(dest, work.path().join("book.epub"));
    assert!(settings.output.join("OEBPS/images/foo.png").is_file());

    let mut archive = ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
    {
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
    }

    let book = read_entry(&mut archive, "OEBPS/book.html");
    let a = book.find("Alpha text.").expect("chapter A in book");
    let b = book.find("Beta text.").expect("chapter B in book");
    assert!(a < b, "chapter order must follow the index");
    assert!(book.contains(r#"src="images/foo.png""#));
    assert!(!book.contains("printfooter"));

    let ncx = read_entry(&mut archive, "OEBPS/toc.ncx");
    assert!(ncx.find("book.html#A").unwrap() < ncx.find("book.html#B").unwrap());

    let opf = read_entry(&mut archive, "OEBPS/content.opf");
    assert!(opf.contains("<dc:title>Test Book</dc:title>"));
    assert!(opf.contains(r#"href="images/foo.png" media-type="image/png""#));

    assert!(archive.by_name("OEBPS/images/foo.png").is_ok());
    assert!(archive.by_name("OEBPS/images/cover.png").is_ok());
    assert!(archive.by_name("META-INF/container.xml").is_ok());
}

#[test]
fn existing_output_directory_aborts_before_fetching() {
    let work = tempfile::tempdir().unwrap();
    let settings = settings("http://127.0.0.1:1", "/Book_index", work.path());
    std::fs::create_dir(&settings.output).unwrap();
    let mut client = settings.client().unwrap();

    let err = build_book(&settings, &mut client).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(!work.path().join("book.epub").exists());
}

#[test]
fn missing_index_page_is_http_error() {
    let server = spawn_wiki_server();
    let work = tempfile::tempdir().unwrap();
    let settings = settings(&server.base_url, "/No_such_index", work.path());
    let mut client = settings.client().unwrap();

    let err = build_book(&settings, &mut client).unwrap_err();
    assert!(matches!(
        err,
        CliRunError::Scraper(ScraperError::HttpStatus { status: 404, .. })
    ));
    assert_eq!(err.exit_code(), 2);
    assert!(settings.output.is_dir(), "partial output is left in place");
}
