//! Local stand-in for the wiki: an index page, two chapters, and one image.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use wikipub::cli::Settings;

pub static PIXEL_PNG: &[u8] = &[
    137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 1, 0, 0, 0, 1, 8, 4, 0,
    0, 0, 181, 28, 12, 2, 0, 0, 0, 11, 73, 68, 65, 84, 120, 218, 99, 252, 255, 23, 0, 2, 3, 1, 128,
    110, 220, 25, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130,
];

const INDEX: &str = r#"<!doctype html>
<html><body>
<div id="mw-head"><ul><li><a href="/Main_Page">Main page</a></li></ul></div>
<div id="content">
  <h1 id="firstHeading">Book index</h1>
  <ul>
    <li><a href="/Book_A">A</a></li>
    <li><a href="/Book_B">B</a></li>
  </ul>
</div>
</body></html>
"#;

const CHAPTER_A: &str = r#"<!doctype html>
<html><body>
<h1 id="firstHeading">A</h1>
<div id="bodyContent">
  <div id="siteSub">From Test Wiki</div>
  <div id="jump-to-nav">Jump to: navigation, search</div>
  <h2><span class="editsection">[edit]</span> Opening</h2>
  <p>Alpha text.</p>
  <p><img src="/w/images/1/12/foo.png" alt="foo"></p>
  <div class="printfooter">Retrieved from "http://wiki/Book_A"</div>
  <div class="catlinks">Category: Book</div>
  <div class="visualClear"></div>
</div>
</body></html>
"#;

const CHAPTER_B: &str = r#"<!doctype html>
<html><body>
<h1 id="firstHeading">B</h1>
<div id="bodyContent">
  <div id="contentSub"></div>
  <p>Beta text.</p>
</div>
</body></html>
"#;

pub struct WikiServer {
    pub base_url: String,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Drop for WikiServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn spawn_wiki_server() -> WikiServer {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }
        let request = match server.recv_timeout(Duration::from_millis(50)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(_) => break,
        };
        let response = match request.url() {
            "/Book_index" => tiny_http::Response::from_data(INDEX.as_bytes()),
            "/Book_A" => tiny_http::Response::from_data(CHAPTER_A.as_bytes()),
            "/Book_B" => tiny_http::Response::from_data(CHAPTER_B.as_bytes()),
            "/w/images/1/12/foo.png" => tiny_http::Response::from_data(PIXEL_PNG),
            _ => tiny_http::Response::from_data(&b"not found"[..]).with_status_code(404),
        };
        let _ = request.respond(response);
    });

    WikiServer {
        base_url,
        shutdown: shutdown_tx,
        handle: Some(handle),
    }
}

pub fn settings(base_url: &str, start_path: &str, work: &Path) -> Settings {
    Settings {
        domain: base_url.to_string(),
        start_url: format!("{}{}", base_url, start_path),
        title: "Test Book".to_string(),
        output: work.join("book"),
        templates_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
        log_file: work.join("epub.log"),
        user_agent: None,
        timeout_secs: Some(10),
        delay_secs: 0,
    }
}
