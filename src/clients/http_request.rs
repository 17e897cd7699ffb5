//! Request types for the Etsy API.
//!
//! This module provides the [`ApiRequest`] type and its builder, plus the
//! three payload encodings Etsy endpoints use: URL-encoded forms, JSON, and
//! multipart uploads.

use std::fmt;

use crate::clients::errors::InvalidApiRequestError;

/// HTTP methods used by Etsy v3 endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for complete replacement of a resource.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` if the method requires a payload.
    #[must_use]
    pub const fn requires_payload(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A form field value: scalar or repeated.
///
/// Etsy's form endpoints take list-valued fields (tags, materials, image
/// IDs) using the `key[]=a&key[]=b` array convention, which is what
/// [`FormValue::Many`] encodes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    /// A single value, encoded as `key=value`.
    Single(String),
    /// A repeated value, encoded as `key[]=a&key[]=b`.
    Many(Vec<String>),
}

impl FormValue {
    /// Convenience constructor for a scalar value.
    pub fn single(value: impl ToString) -> Self {
        Self::Single(value.to_string())
    }

    /// Convenience constructor for a repeated value.
    pub fn many<T: ToString>(values: impl IntoIterator<Item = T>) -> Self {
        Self::Many(values.into_iter().map(|v| v.to_string()).collect())
    }
}

/// A file to attach to a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// The multipart field name (e.g. `image`).
    pub name: String,
    /// The file name reported to the server.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    /// Elides file contents; raw bytes are useless in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// A request payload in one of the three encodings Etsy endpoints accept.
///
/// The executor sets the matching `Content-Type` for forms and JSON; for
/// multipart the underlying transport computes the boundary and header
/// itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// `application/x-www-form-urlencoded`, with `key[]=` array syntax for
    /// repeated fields. Field order is preserved.
    Form(Vec<(String, FormValue)>),
    /// `application/json`.
    Json(serde_json::Value),
    /// `multipart/form-data` with text fields and one file.
    Multipart {
        /// Plain text fields, sent before the file.
        fields: Vec<(String, String)>,
        /// The attached file.
        file: FilePart,
    },
}

impl Payload {
    /// Encodes a form payload into its URL-encoded body string.
    ///
    /// Scalars become `key=value`; [`FormValue::Many`] becomes one
    /// `key[]=value` pair per element, preserving element order. Keys and
    /// values are percent-encoded.
    #[must_use]
    pub fn encode_form(fields: &[(String, FormValue)]) -> String {
        let mut pairs: Vec<String> = Vec::new();
        for (key, value) in fields {
            match value {
                FormValue::Single(v) => {
                    pairs.push(format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(v)
                    ));
                }
                FormValue::Many(values) => {
                    for v in values {
                        pairs.push(format!(
                            "{}[]={}",
                            urlencoding::encode(key),
                            urlencoding::encode(v)
                        ));
                    }
                }
            }
        }
        pairs.join("&")
    }
}

/// A request to an Etsy v3 endpoint.
///
/// Use [`ApiRequest::builder`] to construct requests with the builder
/// pattern. Paths are relative to the configured API base URL and must start
/// with `/`.
///
/// # Example
///
/// ```rust
/// use etsy_api::clients::{ApiRequest, HttpMethod, Payload, FormValue};
///
/// let request = ApiRequest::builder(HttpMethod::Post, "/shops/123/listings")
///     .payload(Payload::Form(vec![
///         ("title".to_string(), FormValue::single("Hand-carved spoon")),
///         ("tags".to_string(), FormValue::many(["wood", "kitchen"])),
///     ]))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "/shops/123/listings");
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// The request payload, if any.
    pub payload: Option<Payload>,
    /// Whether to attach the user's OAuth bearer token. Almost always true;
    /// the ping endpoint authenticates with the API key alone.
    pub authenticated: bool,
    /// Maximum attempts for throttled (429) and upstream (5xx) responses.
    pub tries: u32,
}

/// Default maximum attempts for retryable responses.
pub const DEFAULT_TRIES: u32 = 3;

impl ApiRequest {
    /// Creates a new builder for constructing an `ApiRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidApiRequestError`] if:
    /// - the path does not start with `/`
    /// - `method` is `Post`, `Put`, or `Patch` but `payload` is `None`
    /// - `method` is `Get` or `Delete` but a payload was set
    pub fn verify(&self) -> Result<(), InvalidApiRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidApiRequestError::RelativePath {
                path: self.path.clone(),
            });
        }

        if self.method.requires_payload() && self.payload.is_none() {
            return Err(InvalidApiRequestError::MissingPayload {
                method: self.method.to_string(),
            });
        }

        if !self.method.requires_payload() && self.payload.is_some() {
            return Err(InvalidApiRequestError::UnexpectedPayload {
                method: self.method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`ApiRequest`] instances.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    payload: Option<Payload>,
    authenticated: bool,
    tries: u32,
}

impl ApiRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            payload: None,
            authenticated: true,
            tries: DEFAULT_TRIES,
        }
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the request payload.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Marks the request as API-key-only, skipping the bearer token.
    #[must_use]
    pub const fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Sets the maximum attempts for retryable responses.
    #[must_use]
    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = tries.max(1);
        self
    }

    /// Builds the [`ApiRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidApiRequestError`] if the request fails validation.
    pub fn build(self) -> Result<ApiRequest, InvalidApiRequestError> {
        let request = ApiRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            payload: self.payload,
            authenticated: self.authenticated,
            tries: self.tries,
        };
        request.verify()?;
        Ok(request)
    }
}
