//! Storage node data plane.
//!
//! File bytes move over plain HTTP: PUT to the path handed out by
//! `create_open`, GET from the paths returned by `get_paths`.

mod counting;
mod transport;

pub use counting::CountingReader;
pub use transport::{HttpTransport, ObjectReader, StorageResponse, StorageTransport, UploadBody};
