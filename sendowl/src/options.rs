use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};

pub const ORDERS_ENDPOINT: &str = "https://www.sendowl.com/api/v1_3/orders";
pub const PRODUCTS_ENDPOINT: &str = "https://www.sendowl.com/api/v1/products";
pub const SUBSCRIPTIONS_ENDPOINT: &str = "https://www.sendowl.com/api/v1/subscriptions";
pub const UPLOAD_ENDPOINT: &str = "https://upload.sendowl.com/api/v1/products";

/// The API key and secret, sent as basic auth on every request.
#[derive(Clone)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The value of the `Authorization` header for these credentials.
    #[must_use]
    pub fn basic_auth(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.key, self.secret));
        format!("Basic {encoded}")
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Base URLs of the vendor API.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub orders: String,
    pub products: String,
    pub subscriptions: String,
    /// Product creation goes to a separate upload host.
    pub upload: String,
}

impl Endpoints {
    /// Points every endpoint at the same base, keeping the vendor's paths. Meant
    /// for sandboxes and local mock servers.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            orders: format!("{base}/api/v1_3/orders"),
            products: format!("{base}/api/v1/products"),
            subscriptions: format!("{base}/api/v1/subscriptions"),
            upload: format!("{base}/upload/api/v1/products"),
        }
    }

    pub(crate) fn normalized(mut self) -> Self {
        for endpoint in [
            &mut self.orders,
            &mut self.products,
            &mut self.subscriptions,
            &mut self.upload,
        ] {
            let len = endpoint.trim_end_matches('/').len();
            endpoint.truncate(len);
        }
        self
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            orders: ORDERS_ENDPOINT.into(),
            products: PRODUCTS_ENDPOINT.into(),
            subscriptions: SUBSCRIPTIONS_ENDPOINT.into(),
            upload: UPLOAD_ENDPOINT.into(),
        }
    }
}

/// Client configuration. Authentication is not part of it and always comes from
/// the [`Credentials`] given to the client.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ClientOptions {
    pub endpoints: Endpoints,
}
