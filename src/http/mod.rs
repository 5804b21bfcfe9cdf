//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP, implementado a mano:
//!
//! - Parsing de la request line (método, path, versión)
//! - Construcción de responses sin headers
//! - Códigos de estado 200, 403 y 404
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! (headers y body ignorados)
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! \r\n
//! <contenido>
//! ```

pub mod request;   // Parsing de la request line
pub mod response;  // Construcción de responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
