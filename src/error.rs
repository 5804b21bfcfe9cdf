//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores:
//!
//! - [`ServerError`]: errores fatales de arranque (bind, escaneo de directorios,
//!   configuración). El proceso los reporta y no empieza a servir.
//! - [`ConnectionError`]: errores recuperables de una sola conexión. Se
//!   registran en el log y la conexión se cierra sin afectar a las demás.
//!
//! Los 403/404 y los requests descartados no son errores: son resultados
//! normales del manejo de un request.

use std::path::PathBuf;
use thiserror::Error;

/// Alias de resultado para operaciones de arranque
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errores fatales durante el arranque del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el puerto de escucha
    #[error("No se pudo escuchar en {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Un directorio permitido no se pudo recorrer
    #[error("No se pudo escanear {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No se pudo determinar el directorio raíz de hosting
    #[error("No se pudo determinar el hosting root: {0}")]
    HostingRoot(String),

    /// Configuración inválida
    #[error("Configuración inválida: {0}")]
    InvalidConfig(String),

    /// Cualquier otro error de IO en el arranque
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errores de una conexión individual
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
