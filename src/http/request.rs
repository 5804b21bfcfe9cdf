//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Solo interesa la primera línea del request; headers y body se ignoran.
//!
//! ## Formato
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Host: localhost\r\n          (ignorado)
//! \r\n
//! ```
//!
//! La request line se separa por espacios simples y necesita al menos tres
//! partes: método, path y versión. Lo que sobre se descarta.

use std::fmt;
use thiserror::Error;

/// Métodos HTTP reconocidos
///
/// Solo `GET` se despacha; el resto se reconoce para poder registrarlo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    /// Cualquier otro token en la posición del método
    Other(String),
}

impl Method {
    /// Parsea un método HTTP, sin distinguir mayúsculas
    pub fn parse(s: &str) -> Self {
        let upper = s.to_uppercase();
        match upper.as_str() {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            _ => Method::Other(upper),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request parseado: método, path crudo (con query) y versión
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Ninguno produce respuesta: el servidor simplemente cierra la conexión.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío (tras recortar espacios)
    #[error("Empty request")]
    EmptyRequest,

    /// La request line tiene menos de tres partes
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),
}

impl Request {
    /// Parsea un request a partir del texto recibido
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_http_server::http::{Method, Request};
    ///
    /// let request = Request::parse("get /index.html?v=1 HTTP/1.1\r\nHost: x").unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), "/index.html?v=1");
    /// assert_eq!(request.version(), "HTTP/1.1");
    /// ```
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        if text.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let line = text.split('\n').next().unwrap_or_default();
        let line = line.strip_suffix('\r').unwrap_or(line);

        let parts: Vec<&str> = line.split(' ').collect();
        if parts.len() < 3 {
            return Err(ParseError::InvalidRequestLine(line.to_string()));
        }

        Ok(Request {
            method: Method::parse(parts[0]),
            path: parts[1].to_string(),
            version: parts[2].to_string(),
        })
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path tal como llegó (incluye el query string)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP, que se repite en la respuesta
    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let request = Request::parse("GET / HTTP/1.1").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_ignores_headers_and_body() {
        let raw = "GET /a.html HTTP/1.0\r\nHost: localhost\r\nX: y\r\n\r\nbody";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/a.html");
        assert_eq!(request.version(), "HTTP/1.0");
    }

    #[test]
    fn test_parse_keeps_query_in_path() {
        let request = Request::parse("GET /page?x=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/page?x=1");
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let request = Request::parse("gEt / HTTP/1.1").unwrap();
        assert_eq!(request.method(), &Method::GET);
    }

    #[test]
    fn test_other_methods_are_recognised() {
        assert_eq!(Request::parse("POST / HTTP/1.1").unwrap().method(), &Method::POST);
        assert_eq!(
            Request::parse("brew /pot HTCPCP/1.0").unwrap().method(),
            &Method::Other("BREW".to_string())
        );
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let request = Request::parse("GET / HTTP/1.1 extra").unwrap();
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_trailing_nul_padding_is_trimmed() {
        let request = Request::parse("GET / HTTP/1.1\0\0\0\0").unwrap();
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(Request::parse(""), Err(ParseError::EmptyRequest));
        assert_eq!(Request::parse("  \r\n\t"), Err(ParseError::EmptyRequest));
    }

    #[test]
    fn test_invalid_request_line() {
        let result = Request::parse("GET /\r\nHost: x");
        assert!(matches!(result, Err(ParseError::InvalidRequestLine(_))));
    }

    #[test]
    fn test_single_spaces_are_significant() {
        // Dos espacios seguidos producen un token vacío
        let request = Request::parse("GET  / HTTP/1.1").unwrap();
        assert_eq!(request.path(), "");
        assert_eq!(request.version(), "/");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::Other("FOO".to_string()).to_string(), "FOO");
    }
}
