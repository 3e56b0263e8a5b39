//! Object storage integrations.

mod s3;

pub use s3::{S3Config, S3UploadSigner, UPLOAD_URL_EXPIRES_SECS};
