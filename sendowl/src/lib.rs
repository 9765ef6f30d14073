#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc
)]

pub mod error;
mod multipart;
pub mod options;
mod request;
mod route;

use http_body_util::{combinators::UnsyncBoxBody, BodyExt};
use hyper::{
    body::Bytes,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    http::response::Parts,
    Request as HyperRequest,
};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client as HyperClient},
    rt::TokioExecutor,
};
use sendowl_models::{
    fields::ProductFields,
    id::{OrderId, ProductId},
    license::license_is_valid,
    page::PageRequest,
};
use serde_json::Value;

use error::{DeserializeBodyError, ErrorKind, SendOwlError};
use options::{ClientOptions, Credentials, Endpoints};
use request::Request;
use route::Route;

pub use sendowl_models as models;

/// Body of every request the client sends. Uploads stream from disk, so bodies
/// are not required to be in memory.
pub type RequestBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Client for the SendOwl REST API.
///
/// Every method issues exactly one request. Reads that check the status fail
/// with [`ErrorKind::Response`] on a non-2xx; [`SendOwlClient::get_product`],
/// [`SendOwlClient::create_product`] and [`SendOwlClient::list_subscriptions`]
/// decode whatever body comes back, and product updates and deletes only report
/// success as a `bool`.
///
/// An empty body decodes to [`Value::Null`]. On the unchecked operations a
/// non-JSON body also decodes to `Null` when the status is not 2xx; a non-JSON
/// 2xx body fails with [`ErrorKind::Deserialize`] everywhere.
#[derive(Clone)]
pub struct SendOwlClient {
    client: HyperClient<HttpsConnector<HttpConnector>, RequestBody>,
    credentials: Credentials,
    authorization: String,
    endpoints: Endpoints,
}

impl SendOwlClient {
    #[must_use]
    pub fn new(key: &str, secret: &str) -> Self {
        Self::with_options(key, secret, ClientOptions::default())
    }

    #[must_use]
    pub fn with_options(key: &str, secret: &str, options: ClientOptions) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = HyperClient::builder(TokioExecutor::new()).build(connector);
        Self::from_parts(client, Credentials::new(key, secret), options)
    }

    /// Builds a client on top of an already configured hyper client.
    #[must_use]
    pub fn from_parts(
        client: HyperClient<HttpsConnector<HttpConnector>, RequestBody>,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Self {
        Self {
            client,
            authorization: credentials.basic_auth(),
            credentials,
            endpoints: options.endpoints.normalized(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.credentials.key()
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        self.credentials.secret()
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// List all subscriptions. The body is decoded whatever the status.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn list_subscriptions(&self) -> Result<Value, SendOwlError> {
        let route = Route::ListSubscriptions;
        let request = self.route_request(route).build()?;
        let (parts, bytes) = self.request(request).await?;
        decode_unchecked(&parts, bytes)
    }

    /// List a page of products. A `per_page` below 1 falls back to 10 and a `page`
    /// below 1 falls back to 1.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn list_products(&self, per_page: i64, page: i64) -> Result<Value, SendOwlError> {
        let route = Route::ListProducts;
        let page = PageRequest::new(per_page, page);

        let request = self
            .route_request(route)
            .query("per_page", page.per_page)
            .query("page", page.page);
        let url = request.full_uri()?;

        let (parts, bytes) = self.request(request.build()?).await?;
        let bytes = ensure_success(url, &parts, bytes)?;
        deserialize(bytes)
    }

    /// Get a product.
    ///
    /// The status is not checked: a vendor error body is decoded and returned like
    /// a product would be.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn get_product(&self, product_id: ProductId) -> Result<Value, SendOwlError> {
        let route = Route::GetProduct { product_id };
        let request = self.route_request(route).build()?;
        let (parts, bytes) = self.request(request).await?;
        decode_unchecked(&parts, bytes)
    }

    /// Create a product through the upload host. The body is always
    /// `multipart/form-data`, with the attachment (if any) sent as a file part.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Attachment`] if the attachment cannot be opened, in
    /// which case nothing is sent. The attachment is streamed from disk and its
    /// handle is closed once the request body is dropped. The response status is
    /// not checked.
    pub async fn create_product(&self, fields: &ProductFields) -> Result<Value, SendOwlError> {
        let route = Route::CreateProduct;
        let multipart = multipart::encode_product(fields).await?;
        let content_type = multipart.content_type();
        let (content_length, body) = multipart.finish();

        let request = self
            .route_request(route)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length.to_string())
            .stream(body)
            .build()?;

        let (parts, bytes) = self.request(request).await?;
        decode_unchecked(&parts, bytes)
    }

    /// Update a product. Returns whether the vendor answered with a 2xx; the body
    /// is discarded either way.
    ///
    /// # Errors
    ///
    /// Only fails if the request could not be built or sent.
    pub async fn update_product(
        &self,
        product_id: ProductId,
        fields: &ProductFields,
    ) -> Result<bool, SendOwlError> {
        let route = Route::UpdateProduct { product_id };
        let body = serde_urlencoded::to_string(fields.form_pairs()).map_err(|source| {
            SendOwlError {
                source: Some(Box::new(source)),
                kind: ErrorKind::BuildingRequest,
            }
        })?;

        let request = self
            .route_request(route)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(CONTENT_LENGTH, body.len().to_string())
            .body(body.into_bytes())
            .build()?;

        let (parts, bytes) = self.request(request).await?;
        Ok(collapse_status(route, &parts, &bytes))
    }

    /// Delete a product. Returns whether the vendor answered with a 2xx.
    ///
    /// # Errors
    ///
    /// Only fails if the request could not be built or sent.
    pub async fn delete_product(&self, product_id: ProductId) -> Result<bool, SendOwlError> {
        let route = Route::DeleteProduct { product_id };
        let request = self.route_request(route).build()?;
        let (parts, bytes) = self.request(request).await?;
        Ok(collapse_status(route, &parts, &bytes))
    }

    /// Look up the license records matching a key for a product.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn get_license_meta_data(
        &self,
        product_id: ProductId,
        license_key: &str,
    ) -> Result<Value, SendOwlError> {
        let route = Route::CheckLicense { product_id };
        let request = self.route_request(route).query("key", license_key);
        let url = request.full_uri()?;

        let (parts, bytes) = self.request(request.build()?).await?;
        let bytes = ensure_success(url, &parts, bytes)?;
        deserialize(bytes)
    }

    /// Whether a license key is valid for a product: a record exists and its order
    /// was not refunded.
    ///
    /// # Errors
    ///
    /// Fails like [`SendOwlClient::get_license_meta_data`].
    pub async fn license_key_is_valid(
        &self,
        product_id: ProductId,
        license_key: &str,
    ) -> Result<bool, SendOwlError> {
        let records = self.get_license_meta_data(product_id, license_key).await?;
        Ok(license_is_valid(&records))
    }

    /// List the licenses issued for a product.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn get_licenses_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Value, SendOwlError> {
        self.list_licenses(product_id).await
    }

    /// List licenses. This currently hits the same product licenses endpoint as
    /// [`SendOwlClient::get_licenses_by_product`].
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn get_licenses_by_order(
        &self,
        product_id: ProductId,
    ) -> Result<Value, SendOwlError> {
        self.list_licenses(product_id).await
    }

    /// Get an order.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Value, SendOwlError> {
        let route = Route::GetOrder { order_id };
        let url = route.url(&self.endpoints);
        let request = self.route_request(route).build()?;
        let (parts, bytes) = self.request(request).await?;
        let bytes = ensure_success(url, &parts, bytes)?;
        deserialize(bytes)
    }

    /// Make a request to the SendOwl API.
    ///
    /// # Errors
    ///
    /// See [`SendOwlError`] for details.
    pub async fn request(
        &self,
        request: HyperRequest<RequestBody>,
    ) -> Result<(Parts, Vec<u8>), SendOwlError> {
        tracing::debug!(method = %request.method(), uri = %request.uri(), "sending request");

        let res = self
            .client
            .request(request)
            .await
            .map_err(|source| SendOwlError {
                source: Some(Box::new(source)),
                kind: ErrorKind::Sending,
            })?;

        let (parts, body) = res.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|source| SendOwlError {
                source: Some(Box::new(source)),
                kind: ErrorKind::ChunkingResponse,
            })?
            .to_bytes();

        tracing::trace!(status = %parts.status, len = bytes.len(), "received response");
        Ok((parts, bytes.into()))
    }

    async fn list_licenses(&self, product_id: ProductId) -> Result<Value, SendOwlError> {
        let route = Route::ListLicenses { product_id };
        let url = route.url(&self.endpoints);
        let request = self.route_request(route).build()?;
        let (parts, bytes) = self.request(request).await?;
        let bytes = ensure_success(url, &parts, bytes)?;
        deserialize(bytes)
    }

    fn route_request(&self, route: Route) -> Request {
        Request::new()
            .uri(route.url(&self.endpoints))
            .method(route.method())
            .authorized(&self.authorization)
    }
}

fn ensure_success(url: String, parts: &Parts, bytes: Vec<u8>) -> Result<Vec<u8>, SendOwlError> {
    if parts.status.is_success() {
        return Ok(bytes);
    }
    Err(SendOwlError {
        source: None,
        kind: ErrorKind::Response {
            url,
            status: parts.status,
            bytes,
        },
    })
}

fn collapse_status(route: Route, parts: &Parts, bytes: &[u8]) -> bool {
    let success = parts.status.is_success();
    if !success {
        tracing::warn!(
            ?route,
            status = %parts.status,
            body = %String::from_utf8_lossy(bytes),
            "product mutation was rejected"
        );
    }
    success
}

/// Decodes the body of an operation that does not check the status.
fn decode_unchecked(parts: &Parts, bytes: Vec<u8>) -> Result<Value, SendOwlError> {
    match deserialize(bytes) {
        Err(err) if !parts.status.is_success() => {
            tracing::warn!(status = %parts.status, error = %err, "error body is not JSON");
            Ok(Value::Null)
        }
        decoded => decoded,
    }
}

fn deserialize(bytes: Vec<u8>) -> Result<Value, SendOwlError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|source| SendOwlError {
        source: Some(Box::new(DeserializeBodyError {
            source: Some(Box::new(source)),
            bytes,
        })),
        kind: ErrorKind::Deserialize,
    })
}
