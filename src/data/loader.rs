use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use url::Url;

use super::error::FetchError;
use super::model::GalleryListing;

/// Outcome of a gallery fetch.
pub type GalleryResult = Result<GalleryListing, FetchError>;

/// Completion callback for a thumbnail fetch. Fires exactly once, on the
/// worker thread that ran the request.
pub type ThumbnailCallback = Box<dyn FnOnce(Result<Vec<u8>, FetchError>) + Send + 'static>;

// ---------------------------------------------------------------------------
// ImageFetcher – the seam between thumbnail consumers and the network
// ---------------------------------------------------------------------------

/// Something that can fetch raw image bytes in the background.
pub trait ImageFetcher: Send + Sync {
    fn fetch_thumbnail(&self, url: &str, on_complete: ThumbnailCallback);
}

// ---------------------------------------------------------------------------
// GalleryLoader
// ---------------------------------------------------------------------------

/// Fetches the gallery listing and thumbnail bytes over HTTP.
///
/// The `fetch_*` operations run on a spawned worker thread and report through
/// a callback on that thread; the caller is responsible for moving the result
/// back to its UI thread. The `load_*` operations do the same work on the
/// calling thread.
///
/// There is no retry, no cancellation and no deduplication: every call is one
/// independent request.
#[derive(Debug, Clone)]
pub struct GalleryLoader {
    client: Client,
}

impl GalleryLoader {
    pub fn new(timeout: Duration, use_proxy: bool) -> Result<Self, FetchError> {
        let mut client_builder = Client::builder().timeout(timeout);

        if !use_proxy {
            client_builder = client_builder.no_proxy();
        }

        let client = client_builder.build()?;
        Ok(Self { client })
    }

    /// Fetch and decode the listing at `endpoint`, authenticating with
    /// `Authorization: Client-ID <credential>`.
    pub fn load_gallery(&self, endpoint: &str, credential: &str) -> GalleryResult {
        let url = parse_url(endpoint)?;
        let auth = HeaderValue::from_str(&format!("Client-ID {credential}"))
            .map_err(|e| FetchError::invalid_input(credential, e.to_string()))?;

        log::debug!("Fetching gallery from {url}");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth)
            .send()?
            .error_for_status()?;
        let body = response.bytes()?;

        let listing = GalleryListing::from_json(&body)?;
        log::info!("Decoded gallery listing with {} items", listing.len());
        Ok(listing)
    }

    /// Background variant of [`load_gallery`](Self::load_gallery).
    pub fn fetch_gallery<F>(&self, endpoint: &str, credential: &str, on_complete: F)
    where
        F: FnOnce(GalleryResult) + Send + 'static,
    {
        let loader = self.clone();
        let endpoint = endpoint.to_string();
        let credential = credential.to_string();

        thread::spawn(move || {
            let result = loader.load_gallery(&endpoint, &credential);
            if let Err(e) = &result {
                log::warn!("Gallery fetch from {endpoint} failed: {e}");
            }
            on_complete(result);
        });
    }

    /// Download the raw bytes at `url`. The bytes are not decoded.
    pub fn load_thumbnail(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = parse_url(url)?;
        log::trace!("Fetching thumbnail {url}");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

impl ImageFetcher for GalleryLoader {
    fn fetch_thumbnail(&self, url: &str, on_complete: ThumbnailCallback) {
        let loader = self.clone();
        let url = url.to_string();

        thread::spawn(move || {
            let result = loader.load_thumbnail(&url);
            if let Err(e) = &result {
                log::warn!("Thumbnail fetch from {url} failed: {e}");
            }
            on_complete(result);
        });
    }
}

/// Parse an absolute http(s) URL.
pub fn parse_url(input: &str) -> Result<Url, FetchError> {
    let url = Url::parse(input.trim()).map_err(|e| FetchError::invalid_input(input, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::invalid_input(
            input,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(10);

    struct Canned {
        status: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    }

    fn ok_json(body: &str) -> Canned {
        Canned {
            status: "200 OK",
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    /// Answer one connection per canned response, in order. Returns the base
    /// URL and a handle yielding the raw request heads that were received.
    fn serve(responses: Vec<Canned>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut heads = Vec::new();
            for canned in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                heads.push(String::from_utf8_lossy(&buf).to_string());

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    canned.status,
                    canned.content_type,
                    canned.body.len()
                );
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(&canned.body).unwrap();
                stream.flush().unwrap();
            }
            heads
        });

        (base, handle)
    }

    fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/gallery")
    }

    fn loader() -> GalleryLoader {
        GalleryLoader::new(Duration::from_secs(5), false).unwrap()
    }

    #[test]
    fn fetch_gallery_delivers_items_in_order() {
        let (base, server) = serve(vec![ok_json(
            r#"{"data": [{"title": "A"}, {"title": "B"}, {"title": "C"}]}"#,
        )]);
        let (tx, rx) = mpsc::channel();

        loader().fetch_gallery(&format!("{base}/3/gallery/hot"), "abc123", move |r| {
            tx.send(r).unwrap();
        });

        let listing = rx.recv_timeout(WAIT).unwrap().unwrap();
        assert_eq!(listing.len(), 3);
        let titles: Vec<_> = listing.items.iter().map(|i| i.title.clone().unwrap()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        for item in &listing.items {
            assert_eq!(item.published_at, None);
            assert_eq!(item.extra_image_count, None);
            assert_eq!(item.thumbnail_url, None);
        }

        let heads = server.join().unwrap();
        let head = heads[0].to_ascii_lowercase();
        assert!(head.starts_with("get /3/gallery/hot "));
        assert!(head.contains("authorization: client-id abc123"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let (base, server) = serve(vec![ok_json(r#"{"data": "not-an-array"}"#)]);

        let err = loader().load_gallery(&base, "id").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
        server.join().unwrap();
    }

    #[test]
    fn error_status_is_a_transport_error() {
        let (base, server) = serve(vec![Canned {
            status: "500 Internal Server Error",
            content_type: "application/json",
            body: br#"{"data": []}"#.to_vec(),
        }]);

        let err = loader().load_gallery(&base, "id").unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status(), Some(500));
        server.join().unwrap();
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        let (tx, rx) = mpsc::channel();
        loader().fetch_gallery(&refused_url(), "id", move |r| tx.send(r).unwrap());

        let err = rx.recv_timeout(WAIT).unwrap().unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn invalid_endpoint_is_reported_through_callback() {
        let (tx, rx) = mpsc::channel();
        loader().fetch_gallery("not a url", "id", move |r| tx.send(r).unwrap());

        let err = rx.recv_timeout(WAIT).unwrap().unwrap_err();
        assert!(matches!(err, FetchError::InvalidInput { .. }));
    }

    #[test]
    fn credential_with_newline_is_invalid_input() {
        let err = loader()
            .load_gallery("http://127.0.0.1:9/gallery", "bad\nid")
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidInput { .. }));
    }

    #[test]
    fn thumbnail_bytes_are_returned_verbatim() {
        let bytes: Vec<u8> = (0..1024u32).map(|i| (i % 251) as u8).collect();
        let (base, server) = serve(vec![Canned {
            status: "200 OK",
            content_type: "image/png",
            body: bytes.clone(),
        }]);
        let (tx, rx) = mpsc::channel();

        loader().fetch_thumbnail(&format!("{base}/a.png"), Box::new(move |r| tx.send(r).unwrap()));

        let got = rx.recv_timeout(WAIT).unwrap().unwrap();
        assert_eq!(got.len(), 1024);
        assert_eq!(got, bytes);

        let heads = server.join().unwrap();
        assert!(!heads[0].to_ascii_lowercase().contains("authorization:"));
    }

    #[test]
    fn missing_thumbnail_is_a_transport_error() {
        let (base, server) = serve(vec![Canned {
            status: "404 Not Found",
            content_type: "text/plain",
            body: b"gone".to_vec(),
        }]);

        let err = loader().load_thumbnail(&format!("{base}/gone.png")).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status(), Some(404));
        server.join().unwrap();
    }

    #[test]
    fn same_thumbnail_requested_twice_is_fetched_twice() {
        let body = vec![7u8; 64];
        let canned = || Canned {
            status: "200 OK",
            content_type: "image/gif",
            body: body.clone(),
        };
        let (base, server) = serve(vec![canned(), canned()]);
        let url = format!("{base}/same.gif");
        let (tx, rx) = mpsc::channel();

        let loader = loader();
        for _ in 0..2 {
            let tx = tx.clone();
            loader.fetch_thumbnail(&url, Box::new(move |r| tx.send(r).unwrap()));
        }

        for _ in 0..2 {
            assert_eq!(rx.recv_timeout(WAIT).unwrap().unwrap(), body);
        }
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn parse_url_rejects_relative_and_non_http() {
        assert!(parse_url("/relative/path").is_err());
        assert!(parse_url("ftp://example.com/a.png").is_err());
        assert!(parse_url("https://i.imgur.com/a.png").is_ok());
    }
}
