//! Fetch API
//!
//! The engine only needs "GET this URL and give me the body"; everything
//! else about the content provider stays outside.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use url::Url;

use crate::{NetError, Response, DEFAULT_USER_AGENT};

/// Source of navigation documents
pub trait Fetcher {
    /// Issue a GET for `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response, NetError>>;
}

impl<F: Fetcher> Fetcher for Rc<F> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response, NetError>> {
        (**self).fetch(url)
    }
}

/// HTTP fetcher backed by reqwest's blocking client.
///
/// Requests run on smol's blocking thread pool so the event loop never
/// stalls on I/O.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, NetError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// GET `url` on the blocking pool
    pub async fn get(&self, url: &str) -> Result<Response, NetError> {
        tracing::info!(%url, "HTTP GET");

        let url = Url::parse(url)
            .map_err(|e| NetError::InvalidUrl(format!("{}: {}", url, e)))?;
        let client = self.client.clone();

        smol::unblock(move || {
            let response = client.get(url).send().map_err(|e| NetError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let headers = response.headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect();
            let body = response.bytes()
                .map_err(|e| NetError::Network(e.to_string()))?
                .to_vec();

            tracing::debug!(status, url = %final_url, bytes = body.len(), "HTTP response");
            Ok(Response { url: final_url, status, headers, body })
        })
        .await
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        self.get(url).await
    }
}

/// In-memory fetcher serving canned responses by exact URL.
///
/// Unknown URLs fail like a refused connection. Every requested URL is
/// recorded.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    routes: HashMap<String, Response>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with status 200 at `url`
    pub fn route(self, url: &str, html: &str) -> Self {
        self.respond(url, Response::ok(url, html))
    }

    /// Serve an arbitrary status at `url`
    pub fn route_status(self, url: &str, status: u16, body: &str) -> Self {
        self.respond(url, Response::with_status(url, status, body))
    }

    pub fn respond(mut self, url: &str, response: Response) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        self.requests.borrow_mut().push(url.to_string());
        self.routes.get(url)
            .cloned()
            .ok_or_else(|| NetError::Network(format!("connection refused: {}", url)))
    }
}
