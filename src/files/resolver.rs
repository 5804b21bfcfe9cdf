//! # Resolución de Recursos y Guardia de Acceso
//! src/files/resolver.rs
//!
//! Convierte el path de un request en una ruta del sistema de archivos bajo el
//! hosting root y verifica que su directorio contenedor esté en la lista de
//! directorios permitidos.
//!
//! ## Pasos
//!
//! ```text
//! /docs//guide/?v=2
//!   → /docs//guide/          (se descarta el query string)
//!   → /docs/guide/           (un solo reemplazo de "//" por "/")
//!   → /docs/guide/index.html (paths terminados en "/" apuntan al índice)
//!   → <root>/docs/guide/index.html
//! ```

use super::AllowedDirs;
use crate::config::Config;
use crate::error::{Result, ServerError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Archivo servido para paths que terminan en `/`
pub const INDEX_FILE: &str = "index.html";

/// Forma de comparar el directorio contenedor con la lista permitida
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GuardMode {
    /// Resuelve `.`, `..` y symlinks antes de comparar
    Canonical,
    /// Compara el directorio tal como quedó escrito tras la concatenación,
    /// sin resolver `..` ni symlinks. Un symlink dentro de un directorio
    /// permitido puede apuntar fuera de él.
    Literal,
}

/// Recurso resuelto, antes de la verificación de acceso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Ruta en el sistema de archivos
    pub path: PathBuf,
    /// Si la ruta existe
    pub exists: bool,
    /// Directorio contenedor que se compara con la lista permitida
    pub directory: PathBuf,
}

/// Resultado de servir un path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Contenido completo del archivo, byte a byte (sin decodificar ni
    /// re-codificar: un BOM o bytes no UTF-8 se envían tal cual)
    Found(Vec<u8>),
    /// El directorio contenedor no está permitido
    Forbidden,
    /// El archivo no existe dentro de un directorio permitido
    NotFound,
}

/// Sitio servido: hosting root + directorios permitidos
#[derive(Debug, Clone)]
pub struct Site {
    root: String,
    allowed: AllowedDirs,
    guard: GuardMode,
}

impl Site {
    /// Crea un sitio sobre `hosting_root`
    ///
    /// El hosting root se canonicaliza para que sus rutas sean comparables
    /// con las de [`AllowedDirs`].
    pub fn new(hosting_root: &Path, allowed: AllowedDirs, guard: GuardMode) -> Result<Self> {
        let root = fs::canonicalize(hosting_root).map_err(|e| {
            ServerError::HostingRoot(format!("{}: {}", hosting_root.display(), e))
        })?;
        let root = root.to_string_lossy().trim_end_matches('/').to_string();
        Ok(Self { root, allowed, guard })
    }

    /// Construye el sitio desde la configuración: resuelve el hosting root y
    /// escanea los directorios permitidos
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = config.hosting_root().map_err(ServerError::HostingRoot)?;
        let dirs = config.permitted_dirs().map_err(ServerError::HostingRoot)?;
        let allowed = AllowedDirs::scan(&dirs)?;
        Self::new(&root, allowed, config.guard)
    }

    /// Directorios permitidos del sitio
    pub fn allowed(&self) -> &AllowedDirs {
        &self.allowed
    }

    /// Resuelve un path de request a una ruta bajo el hosting root
    pub fn resolve(&self, raw_path: &str) -> Resolved {
        let candidate = PathBuf::from(format!("{}{}", self.root, request_path(raw_path)));

        match self.guard {
            GuardMode::Literal => {
                let directory = parent_of(&candidate);
                Resolved {
                    exists: candidate.exists(),
                    path: candidate,
                    directory,
                }
            }
            GuardMode::Canonical => match fs::canonicalize(&candidate) {
                Ok(real) => Resolved {
                    directory: parent_of(&real),
                    path: real,
                    exists: true,
                },
                Err(_) => {
                    let parent = parent_of(&candidate);
                    Resolved {
                        directory: fs::canonicalize(&parent).unwrap_or(parent),
                        path: candidate,
                        exists: false,
                    }
                }
            },
        }
    }

    /// Verifica que el recurso esté dentro de un directorio permitido
    pub fn is_allowed(&self, resolved: &Resolved) -> bool {
        self.allowed.contains(&resolved.directory)
    }

    /// Resuelve, verifica y lee el archivo pedido
    ///
    /// Los errores de lectura distintos de "no existe" se propagan.
    pub fn serve(&self, raw_path: &str) -> io::Result<Outcome> {
        let resolved = self.resolve(raw_path);

        if !self.is_allowed(&resolved) {
            debug!(path = %resolved.path.display(), "fuera de los directorios permitidos");
            return Ok(Outcome::Forbidden);
        }

        if !resolved.exists || !resolved.path.is_file() {
            return Ok(Outcome::NotFound);
        }

        match fs::read(&resolved.path) {
            Ok(bytes) => Ok(Outcome::Found(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Outcome::NotFound),
            Err(e) => Err(e),
        }
    }
}

/// Normaliza el path de un request
///
/// # Ejemplo
/// ```
/// use static_http_server::files::request_path;
///
/// assert_eq!(request_path("/?x=1"), "/index.html");
/// assert_eq!(request_path("//a.txt"), "/a.txt");
/// ```
pub fn request_path(raw_path: &str) -> String {
    let without_query = match raw_path.find('?') {
        Some(pos) => &raw_path[..pos],
        None => raw_path,
    };

    let mut path = without_query.replacen("//", "/", 1);
    if path.ends_with('/') {
        path.push_str(INDEX_FILE);
    }
    path
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().unwrap_or(path).to_path_buf()
}
