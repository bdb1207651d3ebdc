// Asset storage: the public figures bucket on S3 / MinIO.

pub mod figures;
pub mod handlers;
