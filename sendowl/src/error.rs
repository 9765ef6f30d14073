use hyper::StatusCode;
use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

#[derive(Debug)]
pub enum ErrorKind {
    BuildingRequest,
    /// The attachment of a product could not be read.
    Attachment {
        path: PathBuf,
    },
    /// The request never got a response: connection, TLS or IO failure.
    Sending,
    ChunkingResponse,
    /// The vendor answered with a non-2xx status.
    Response {
        /// The request URL, query included.
        url: String,
        status: StatusCode,
        bytes: Vec<u8>,
    },
    Deserialize,
}

#[derive(Debug)]
pub struct SendOwlError {
    pub(super) source: Option<Box<dyn StdError + Send + Sync>>,
    pub(super) kind: ErrorKind,
}

#[derive(Debug)]
pub struct DeserializeBodyError {
    pub(super) source: Option<Box<dyn StdError + Send + Sync>>,
    pub(super) bytes: Vec<u8>,
}

impl SendOwlError {
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_source(self) -> Option<Box<dyn StdError + Send + Sync>> {
        self.source
    }

    pub fn into_parts(self) -> (ErrorKind, Option<Box<dyn StdError + Send + Sync>>) {
        (self.kind, self.source)
    }

    /// The status the vendor responded with, if this is a response error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match &self.kind {
            ErrorKind::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw body the vendor responded with, if this is a response error.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        match &self.kind {
            ErrorKind::Response { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Sending | ErrorKind::ChunkingResponse)
    }
}

impl Display for SendOwlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind() {
            ErrorKind::BuildingRequest => write!(f, "failed to build the request"),
            ErrorKind::Attachment { path } => {
                write!(f, "failed to read the attachment at {}", path.display())
            }
            ErrorKind::Sending => write!(f, "sending the request failed"),
            ErrorKind::ChunkingResponse => write!(f, "chunking the response failed"),
            ErrorKind::Response {
                url,
                status,
                bytes: _,
            } => write!(f, "failed with {status} on {url}"),
            ErrorKind::Deserialize => write!(f, "error deserializing"),
        }
    }
}

impl StdError for SendOwlError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}

impl Display for DeserializeBodyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let display = String::from_utf8_lossy(&self.bytes);
        write!(f, "bytes: {display}")
    }
}

impl StdError for DeserializeBodyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}
