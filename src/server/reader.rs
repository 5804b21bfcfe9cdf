//! # Lectura de Requests
//! src/server/reader.rs
//!
//! Lee del socket en bloques de `chunk` bytes hasta completar la request line
//! (primer `\n`), hasta que el cliente cierre su lado, o hasta juntar
//! `max_bytes`. Los headers no se esperan: un cliente que manda solo la
//! request line y deja el socket abierto recibe respuesta de inmediato. Lo que
//! exceda el máximo no se lee.
//!
//! Los bytes se decodifican como UTF-8 con reemplazo (`U+FFFD`), así que un
//! header en Latin-1 o un carácter cortado por el máximo no descartan el
//! request.

use crate::config::Config;
use crate::error::ConnectionError;
use std::io::{ErrorKind, Read};
use std::time::Duration;

/// Límites de lectura de un request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Bytes pedidos en cada `read`
    pub chunk: usize,
    /// Máximo total de bytes leídos
    pub max_bytes: usize,
    /// Timeout de cada `read`; `None` espera indefinidamente
    pub timeout: Option<Duration>,
}

impl ReadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk: config.read_chunk,
            max_bytes: config.max_request_bytes,
            timeout: match config.read_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Lee un request y lo decodifica como UTF-8 (con pérdida)
///
/// Si vence el timeout con datos ya recibidos, se procesa lo que haya.
pub fn read_request<R: Read>(stream: &mut R, limits: &ReadLimits) -> Result<String, ConnectionError> {
    let mut data = Vec::with_capacity(limits.chunk);
    let mut chunk = vec![0u8; limits.chunk];

    while data.len() < limits.max_bytes {
        let room = (limits.max_bytes - data.len()).min(chunk.len());
        let n = match stream.read(&mut chunk[..room]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e)
                if !data.is_empty()
                    && matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                break
            }
            Err(e) => return Err(e.into()),
        };

        data.extend_from_slice(&chunk[..n]);
        if data.contains(&b'\n') {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&data).into_owned())
}
