//! HTTP request routing for the Grid API
//!
//! Every route maps to one logical resource. Handlers only delegate to the
//! bound adapter; nothing the adapter reports is cached or reinterpreted.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use grid_adapter::{Adapter, AdapterResult, SharedAdapter};

/// Content type set on every response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

pub const VERSION_PATH: &str = "/v1/version";
pub const EVENTS_PATH: &str = "/v1/events";
pub const SUBSCRIPTIONS_PATH: &str = "/v1/subscriptions";

/// Resources backed by one of the adapter's managers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Events,
    Subscriptions,
}

impl Resource {
    /// Resolve a request path to the resource it addresses
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            EVENTS_PATH => Some(Resource::Events),
            SUBSCRIPTIONS_PATH => Some(Resource::Subscriptions),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Events => "events",
            Resource::Subscriptions => "subscriptions",
        }
    }

    async fn list(self, adapter: &dyn Adapter) -> AdapterResult<Vec<String>> {
        match self {
            Resource::Events => adapter.event_manager().list().await,
            Resource::Subscriptions => adapter.subscription_manager().list().await,
        }
    }
}

/// JSON body for adapter failures
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Router for the Grid HTTP API
#[derive(Clone)]
pub struct GridHttpHandler {
    version: Arc<str>,
    adapter: SharedAdapter,
}

impl GridHttpHandler {
    pub fn new(version: impl Into<String>, adapter: SharedAdapter) -> Self {
        Self {
            version: Arc::from(version.into()),
            adapter,
        }
    }

    /// Route a request to its handler.
    ///
    /// The request body is never read, so any body type is accepted.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let (parts, _) = req.into_parts();
        let method = parts.method;
        let path = parts.uri.path();

        if path == VERSION_PATH {
            return self.handle_version();
        }
        match Resource::from_path(path) {
            Some(resource) => self.handle_resource(resource, &method).await,
            None => {
                debug!("No route for {} {}", method, path);
                json_response(StatusCode::NOT_FOUND, "Not found.")
            }
        }
    }

    /// Version string as provided, JSON encoded. Always 200.
    fn handle_version(&self) -> Response<Full<Bytes>> {
        json_response(StatusCode::OK, &*self.version)
    }

    async fn handle_resource(&self, resource: Resource, method: &Method) -> Response<Full<Bytes>> {
        match *method {
            Method::GET => match resource.list(self.adapter.as_ref()).await {
                Ok(names) => json_response(StatusCode::OK, &names),
                Err(err) => {
                    error!(
                        "Adapter {} failed to list {}: {}",
                        self.adapter.name(),
                        resource.as_str(),
                        err
                    );
                    json_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &ErrorBody {
                            error: err.to_string(),
                        },
                    )
                }
            },
            Method::POST => json_response(
                StatusCode::NOT_IMPLEMENTED,
                &format!("Creation of {} not implemented.", resource.as_str()),
            ),
            Method::DELETE => json_response(
                StatusCode::NOT_IMPLEMENTED,
                &format!("Deletion of {} not implemented.", resource.as_str()),
            ),
            _ => json_response(StatusCode::METHOD_NOT_ALLOWED, "Method not supported."),
        }
    }
}

/// Build a JSON response with the status fixed up front.
///
/// If the body cannot be encoded the failure is logged and the response goes
/// out with the chosen status and an empty body.
pub(crate) fn json_response<T>(status: StatusCode, body: &T) -> Response<Full<Bytes>>
where
    T: Serialize + ?Sized,
{
    let payload = match serde_json::to_vec(body) {
        Ok(mut encoded) => {
            encoded.push(b'\n');
            Bytes::from(encoded)
        }
        Err(err) => {
            error!("Error encoding {} response body: {}", status.as_u16(), err);
            Bytes::new()
        }
    };

    let mut response = Response::new(Full::new(payload));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}
