//! Talking to the external PCA analysis service.
//!
//! [`client`] uploads the CSV, [`response`] validates what comes back.

pub mod client;
pub mod response;
