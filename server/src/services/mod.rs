//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `upload` holds the local validation rules; `media` talks to the media host.

pub mod media;
pub mod upload;
