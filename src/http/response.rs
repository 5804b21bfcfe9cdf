//! # Construcción de Respuestas HTTP
//!
//! Respuestas mínimas, sin headers:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! \r\n
//! <contenido del archivo>
//! ```
//!
//! Los errores (403, 404) son solo la status line, sin terminador ni body:
//!
//! ```text
//! HTTP/1.1 404 Not Found
//! ```
//!
//! La versión es la que envió el cliente.

use super::StatusCode;
use crate::files::Outcome;

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: String,
    status: StatusCode,
    /// Cuerpo de la respuesta; `None` en las respuestas de error
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una respuesta sin body
    ///
    /// # Ejemplo
    /// ```
    /// use static_http_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new("HTTP/1.1", StatusCode::NotFound);
    /// assert_eq!(response.to_bytes(), b"HTTP/1.1 404 Not Found");
    /// ```
    pub fn new(version: &str, status: StatusCode) -> Self {
        Self {
            version: version.to_string(),
            status,
            body: None,
        }
    }

    /// Respuesta 200 con el contenido de un archivo
    pub fn ok(version: &str, body: Vec<u8>) -> Self {
        Self::new(version, StatusCode::Ok).with_body(body)
    }

    /// Establece el cuerpo de la respuesta
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Construye la respuesta que corresponde a servir un path
    pub fn from_outcome(version: &str, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Found(body) => Self::ok(version, body),
            Outcome::Forbidden => Self::new(version, StatusCode::Forbidden),
            Outcome::NotFound => Self::new(version, StatusCode::NotFound),
        }
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Con body: `<version> <status>\r\n\r\n<body>`
    /// - Sin body: `<version> <status>`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = format!("{} {}", self.version, self.status).into_bytes();

        if let Some(body) = &self.body {
            result.extend_from_slice(b"\r\n\r\n");
            result.extend_from_slice(body);
        }

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene la versión HTTP de la respuesta
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body, si lo hay
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
