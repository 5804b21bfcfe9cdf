//! # Static HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP minimalista de archivos estáticos. Acepta conexiones TCP,
//! parsea una sola request line por conexión y sirve archivos desde un
//! conjunto restringido de directorios, rechazando lo que quede fuera.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `config`: Configuración inmutable (CLI + variables de entorno)
//! - `files`: Lista de directorios permitidos y resolución de paths
//! - `http`: Parsing de la request line y construcción de responses
//! - `server`: Loop de aceptación, tabla de conexiones y handlers
//! - `error`: Errores de arranque y de conexión
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_http_server::config::Config;
//! use static_http_server::files::Site;
//! use static_http_server::server::Server;
//!
//! let config = Config::default();
//! let site = Site::from_config(&config)?;
//! let mut server = Server::bind(&config, site)?;
//! server.run()?;
//! # Ok::<(), static_http_server::error::ServerError>(())
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod server;
