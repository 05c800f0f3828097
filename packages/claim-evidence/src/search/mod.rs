//! Literature search: the PubMed backend, request pacing, and the
//! failure-tolerant client the pipeline talks to.

pub mod client;
pub mod pacer;
pub mod pubmed;

pub use client::LiteratureSearchClient;
pub use pacer::RequestPacer;
pub use pubmed::PubMedBackend;
