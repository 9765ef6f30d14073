use futures_util::{stream, StreamExt, TryStreamExt};
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use sendowl_models::fields::{Field, ProductFields};
use std::{
    io::{Error as IoError, ErrorKind as IoErrorKind},
    mem,
    path::Path,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::{
    error::{ErrorKind, SendOwlError},
    RequestBody,
};

enum Segment {
    Bytes(Bytes),
    File(File),
}

/// A `multipart/form-data` body. Text parts are buffered, attachments are kept as
/// open files and streamed when the body is polled.
pub struct Multipart {
    boundary: String,
    segments: Vec<Segment>,
    pending: Vec<u8>,
    len: u64,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(format!("sendowl-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            segments: Vec::new(),
            pending: Vec::new(),
            len: 0,
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.pending.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape(name)
            )
            .as_bytes(),
        );
        self.pending.extend_from_slice(value.as_bytes());
        self.pending.extend_from_slice(b"\r\n");
    }

    /// Adds a file part. `len` must be the number of bytes the file will yield.
    pub fn file(&mut self, name: &str, filename: &str, file: File, len: u64) {
        self.open_part();
        self.pending.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                escape(name),
                escape(filename)
            )
            .as_bytes(),
        );
        self.flush();
        self.segments.push(Segment::File(file));
        self.len += len;
        self.pending.extend_from_slice(b"\r\n");
    }

    /// Closes the body, returning its total length and the body itself. Open files
    /// are dropped with the body, once the request is done with it.
    pub fn finish(mut self) -> (u64, RequestBody) {
        let closing = format!("--{}--\r\n", self.boundary);
        self.pending.extend_from_slice(closing.as_bytes());
        self.flush();

        let stream = stream::iter(self.segments).flat_map(|segment| match segment {
            Segment::Bytes(bytes) => stream::iter([Ok(bytes)]).left_stream(),
            Segment::File(file) => ReaderStream::new(file).right_stream(),
        });
        let body = StreamBody::new(stream.map_ok(Frame::data)).boxed_unsync();
        (self.len, body)
    }

    fn open_part(&mut self) {
        self.pending
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let bytes = mem::take(&mut self.pending);
        self.len += bytes.len() as u64;
        self.segments.push(Segment::Bytes(Bytes::from(bytes)));
    }
}

/// Encodes product fields as `product[<name>]` parts. The attachment is opened
/// here, so a missing file fails before anything is sent, and its content is
/// streamed from disk.
pub async fn encode_product(fields: &ProductFields) -> Result<Multipart, SendOwlError> {
    let mut multipart = Multipart::new();
    for field in fields {
        let name = format!("product[{}]", field.name());
        match field {
            Field::Value { value, .. } => multipart.text(&name, &value.to_string()),
            Field::Attachment(path) => {
                let (file, len) = open_attachment(path).await?;
                let filename = path
                    .file_name()
                    .map_or_else(|| "attachment".into(), |name| name.to_string_lossy());
                multipart.file(&name, &filename, file, len);
            }
        }
    }
    Ok(multipart)
}

async fn open_attachment(path: &Path) -> Result<(File, u64), SendOwlError> {
    let attachment_error = |source: IoError| SendOwlError {
        source: Some(Box::new(source)),
        kind: ErrorKind::Attachment {
            path: path.to_path_buf(),
        },
    };

    let file = File::open(path).await.map_err(attachment_error)?;
    let metadata = file.metadata().await.map_err(attachment_error)?;
    if !metadata.is_file() {
        return Err(attachment_error(IoError::new(
            IoErrorKind::InvalidInput,
            "attachment is not a regular file",
        )));
    }
    Ok((file, metadata.len()))
}

fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
