//! # Repository Implementations
//!
//! One repository per persisted collection:
//!
//! - [`offline_sale`] - the offline sale queue (sole writer of `offline_sales`)
//! - [`snapshot`] - key→JSON reference-data blobs for offline use

pub mod offline_sale;
pub mod snapshot;
