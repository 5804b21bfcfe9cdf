//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración inmutable del servidor, construida una sola vez al arrancar
//! desde argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_http_server --port 8080 \
//!   --root /srv/www \
//!   --dirs /srv/www/public /srv/www/assets
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HOSTING_ROOT=/srv/www ALLOWED_DIRS=/srv/www/public ./static_http_server
//! ```

use crate::files::GuardMode;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_http_server")]
#[command(about = "Servidor HTTP minimalista de archivos estáticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "80", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (por defecto todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio base desde el que se resuelven los paths de las URLs.
    /// Si no se indica, se usa el directorio del ejecutable.
    #[arg(short, long, env = "HOSTING_ROOT")]
    pub root: Option<PathBuf>,

    /// Directorios desde los que se permite servir archivos (recursivo).
    /// Si no se indica, se usa el hosting root.
    #[arg(short, long, num_args = 1.., value_delimiter = ',', env = "ALLOWED_DIRS")]
    pub dirs: Vec<PathBuf>,

    // === Lectura de requests ===

    /// Bytes pedidos en cada lectura del socket
    #[arg(long = "read-chunk", default_value = "1024", env = "READ_CHUNK")]
    pub read_chunk: usize,

    /// Tamaño máximo de un request; lo que exceda se ignora
    #[arg(long = "max-request-bytes", default_value = "8192", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Timeout de lectura en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Seguridad ===

    /// Cómo se compara el directorio de un archivo con la lista permitida
    #[arg(long, value_enum, default_value_t = GuardMode::Canonical, env = "GUARD_MODE")]
    pub guard: GuardMode,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_http_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:80");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.read_chunk == 0 {
            return Err("Read chunk must be >= 1".to_string());
        }
        if self.max_request_bytes < self.read_chunk {
            return Err("Max request bytes must be >= read chunk".to_string());
        }
        Ok(())
    }

    /// Directorio raíz de hosting
    ///
    /// Usa `--root` si se indicó; si no, el directorio que contiene el
    /// ejecutable en curso.
    pub fn hosting_root(&self) -> Result<PathBuf, String> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        let exe = std::env::current_exe().map_err(|e| e.to_string())?;
        exe.parent()
            .map(|dir| dir.to_path_buf())
            .ok_or_else(|| format!("{} has no parent directory", exe.display()))
    }

    /// Directorios permitidos; por defecto, solo el hosting root
    pub fn permitted_dirs(&self) -> Result<Vec<PathBuf>, String> {
        if self.dirs.is_empty() {
            Ok(vec![self.hosting_root()?])
        } else {
            Ok(self.dirs.clone())
        }
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(address = %self.address(), "red");
        match &self.root {
            Some(root) => info!(root = %root.display(), "hosting root"),
            None => info!("hosting root: directorio del ejecutable"),
        }
        if self.dirs.is_empty() {
            info!("directorios permitidos: hosting root");
        } else {
            for dir in &self.dirs {
                info!(dir = %dir.display(), "directorio permitido");
            }
        }
        info!(
            read_chunk = self.read_chunk,
            max_request_bytes = self.max_request_bytes,
            read_timeout_ms = self.read_timeout_ms,
            guard = ?self.guard,
            "límites de lectura"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 80,
            host: "0.0.0.0".to_string(),
            root: None,
            dirs: Vec::new(),
            read_chunk: 1024,
            max_request_bytes: 8192,
            read_timeout_ms: 30_000,
            guard: GuardMode::Canonical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 80);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.root.is_none());
        assert!(config.dirs.is_empty());
        assert_eq!(config.read_chunk, 1024);
        assert_eq!(config.guard, GuardMode::Canonical);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_chunk() {
        let mut config = Config::default();
        config.read_chunk = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Read chunk"));
    }

    #[test]
    fn test_validate_max_below_chunk() {
        let mut config = Config::default();
        config.max_request_bytes = 100;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Max request bytes"));
    }

    // ==================== Parsing CLI ====================

    #[test]
    fn test_parse_short_flags() {
        let config = Config::try_parse_from([
            "static_http_server", "-p", "8080", "-r", "/srv", "-d", "/srv/a", "/srv/b",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.root, Some(PathBuf::from("/srv")));
        assert_eq!(config.dirs, vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]);
    }

    #[test]
    fn test_parse_long_flags_and_guard() {
        let config = Config::try_parse_from([
            "static_http_server", "--port", "9000", "--dirs", "/x,/y", "--guard", "literal",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.dirs.len(), 2);
        assert_eq!(config.guard, GuardMode::Literal);
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(Config::try_parse_from(["static_http_server", "-p", "notaport"]).is_err());
    }

    // ==================== Resolución de directorios ====================

    #[test]
    fn test_permitted_dirs_default_to_root() {
        let mut config = Config::default();
        config.root = Some(PathBuf::from("/srv/www"));
        assert_eq!(config.permitted_dirs().unwrap(), vec![PathBuf::from("/srv/www")]);
    }

    #[test]
    fn test_permitted_dirs_explicit() {
        let mut config = Config::default();
        config.root = Some(PathBuf::from("/srv/www"));
        config.dirs = vec![PathBuf::from("/srv/www/public")];
        assert_eq!(config.permitted_dirs().unwrap(), vec![PathBuf::from("/srv/www/public")]);
    }

    #[test]
    fn test_hosting_root_defaults_to_executable_dir() {
        let config = Config::default();
        let root = config.hosting_root().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(Some(root.as_path()), exe.parent());
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        let mut config = Config::default();
        config.dirs = vec![PathBuf::from("/srv")];
        config.log_summary();
    }
}
