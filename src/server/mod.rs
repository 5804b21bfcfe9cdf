//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea un request por conexión
//! 4. Envía la respuesta y cierra la conexión

pub mod connections;
pub mod reader;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connections::{ConnectionGuard, ConnectionRegistry};
pub use reader::{read_request, ReadLimits};
pub use tcp::{handle_connection, respond, Server, ShutdownHandle};
