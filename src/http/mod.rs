//! HTTP protocol layer module
//!
//! Response builders shared by the page and API handlers.

pub mod response;

pub use response::{
    build_404_response, build_405_response, build_envelope_response, build_html_response,
};
