//! # Tabla de Conexiones
//! src/server/connections.rs
//!
//! Registro thread-safe de las conexiones abiertas, indexado por la dirección
//! del cliente. Cada entrada se elimina cuando su [`ConnectionGuard`] sale de
//! scope, es decir, cuando el handler de la conexión termina por cualquier
//! camino.

use std::collections::HashMap;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

struct Entry {
    id: u64,
    stream: TcpStream,
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    open: Mutex<HashMap<SocketAddr, Entry>>,
}

/// Conexiones abiertas: dirección remota → handle del socket
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(&self) -> MutexGuard<'_, HashMap<SocketAddr, Entry>> {
        // Un handler que haya hecho panic no invalida la tabla
        self.inner.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registra una conexión aceptada
    ///
    /// Guarda un clon del socket para poder cerrarlo en el apagado. La
    /// entrada vive mientras viva el guard retornado.
    pub fn register(&self, peer: SocketAddr, stream: &TcpStream) -> std::io::Result<ConnectionGuard> {
        let stream = stream.try_clone()?;
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.open().insert(peer, Entry { id, stream });

        Ok(ConnectionGuard {
            registry: self.clone(),
            peer,
            id,
        })
    }

    /// Número de conexiones abiertas
    pub fn len(&self) -> usize {
        self.open().len()
    }

    pub fn is_empty(&self) -> bool {
        self.open().is_empty()
    }

    /// Verifica si hay una conexión abierta desde `peer`
    pub fn contains(&self, peer: &SocketAddr) -> bool {
        self.open().contains_key(peer)
    }

    /// Cierra (shutdown en ambos sentidos) todas las conexiones abiertas
    ///
    /// Los handlers bloqueados en lectura o escritura despiertan con EOF o
    /// error y terminan; sus guards eliminan las entradas.
    pub fn close_all(&self) {
        for (peer, entry) in self.open().iter() {
            if let Err(e) = entry.stream.shutdown(Shutdown::Both) {
                debug!(%peer, error = %e, "falló el shutdown de la conexión");
            }
        }
    }

    fn remove(&self, peer: &SocketAddr, id: u64) {
        let mut open = self.open();
        // Solo si la entrada sigue siendo la de este guard
        if open.get(peer).is_some_and(|entry| entry.id == id) {
            open.remove(peer);
        }
    }
}

/// Mantiene viva la entrada de una conexión en el registro
pub struct ConnectionGuard {
    registry: ConnectionRegistry,
    peer: SocketAddr,
    id: u64,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.peer, self.id);
    }
}
