pub mod client;

pub use client::{HttpFetch, HttpResponse, ReqwestFetcher, MAX_BODY_BYTES};
