//! # Módulo de Archivos
//!
//! Todo lo relacionado con el sistema de archivos:
//!
//! - `allowlist`: expansión recursiva de los directorios permitidos
//! - `resolver`: path de request → ruta en disco, verificación de acceso y lectura

pub mod allowlist;
pub mod resolver;

pub use allowlist::AllowedDirs;
pub use resolver::{request_path, GuardMode, Outcome, Resolved, Site, INDEX_FILE};
