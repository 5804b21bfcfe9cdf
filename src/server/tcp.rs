//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones en un loop y procesa cada una en su propio thread. El
//! loop nunca espera a un handler antes de aceptar la siguiente conexión.
//!
//! Los handles de los threads se guardan para poder esperar a los handlers
//! pendientes durante el apagado (ver [`ShutdownHandle`]).

use super::connections::ConnectionRegistry;
use super::reader::{read_request, ReadLimits};
use crate::config::Config;
use crate::error::{ConnectionError, Result, ServerError};
use crate::files::Site;
use crate::http::{Method, Request, Response};
use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Servidor de archivos estáticos
pub struct Server {
    site: Arc<Site>,
    limits: ReadLimits,
    listener: TcpListener,
    connections: ConnectionRegistry,
    shutdown: Arc<AtomicBool>,
    handlers: Vec<JoinHandle<()>>,
}

impl Server {
    /// Valida la configuración y abre el puerto de escucha
    ///
    /// Un fallo de bind es fatal; no se reintenta.
    pub fn bind(config: &Config, site: Site) -> Result<Self> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        info!(%address, "servidor escuchando");

        Ok(Self {
            site: Arc::new(site),
            limits: ReadLimits::from_config(config),
            listener,
            connections: ConnectionRegistry::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            handlers: Vec::new(),
        })
    }

    /// Dirección local efectiva (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Conexiones abiertas en este momento
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Handle para detener el servidor desde otro thread
    pub fn shutdown_handle(&self) -> io::Result<ShutdownHandle> {
        let mut wake = self.local_addr()?;
        if wake.ip().is_unspecified() {
            let loopback = match wake.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            wake.set_ip(loopback);
        }

        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            connections: self.connections.clone(),
            wake,
        })
    }

    /// Loop de aceptación; retorna cuando se pide el apagado
    ///
    /// Antes de retornar cierra las conexiones abiertas y espera a que
    /// terminen todos los handlers.
    pub fn run(&mut self) -> Result<()> {
        info!("modo concurrente: un thread por conexión");

        loop {
            let accepted = self.listener.accept();
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match accepted {
                Ok((stream, _)) => self.dispatch(stream),
                Err(e) => warn!(error = %e, "error al aceptar conexión"),
            }
        }

        info!(pending = self.handlers.len(), "apagando servidor");
        self.connections.close_all();
        for handler in self.handlers.drain(..) {
            if handler.join().is_err() {
                warn!("handler de conexión hizo panic");
            }
        }
        info!("servidor detenido");
        Ok(())
    }

    fn dispatch(&mut self, stream: TcpStream) {
        self.handlers.retain(|handler| !handler.is_finished());

        let peer = match stream.peer_addr() {
            Ok(peer) => peer,
            Err(e) => {
                warn!(error = %e, "conexión sin dirección remota descartada");
                return;
            }
        };

        let guard = match self.connections.register(peer, &stream) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(%peer, error = %e, "no se pudo registrar la conexión");
                return;
            }
        };
        info!(%peer, open = self.connections.len(), "nueva conexión");

        let site = Arc::clone(&self.site);
        let limits = self.limits;
        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let _guard = guard;
                if let Err(e) = handle_connection(stream, peer, &site, &limits) {
                    warn!(%peer, error = %e, "error en conexión");
                }
            });

        match spawned {
            Ok(handle) => self.handlers.push(handle),
            Err(e) => warn!(%peer, error = %e, "no se pudo crear el thread"),
        }
    }
}

/// Detiene un [`Server`] en ejecución
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    connections: ConnectionRegistry,
    wake: SocketAddr,
}

impl ShutdownHandle {
    /// Pide el apagado: marca el flag, cierra las conexiones abiertas y
    /// despierta al loop de aceptación con una conexión propia
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.connections.close_all();
        if let Err(e) = TcpStream::connect(self.wake) {
            debug!(error = %e, "falló la conexión de despertar");
        }
    }
}

/// Procesa una conexión: lee un request, responde y cierra
///
/// La conexión se cierra al soltar `stream`, en cualquier camino de salida.
pub fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    site: &Site,
    limits: &ReadLimits,
) -> std::result::Result<(), ConnectionError> {
    let start = Instant::now();
    stream.set_read_timeout(limits.timeout)?;

    let text = read_request(&mut stream, limits)?;
    let request_line = text.lines().next().unwrap_or_default().to_string();

    match respond(&text, site)? {
        Some(response) => {
            stream.write_all(&response.to_bytes())?;
            stream.flush()?;
            info!(
                %peer,
                request = %request_line,
                status = %response.status(),
                served = response.status().is_success(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "respuesta enviada"
            );
        }
        None => info!(%peer, request = %request_line, "sin respuesta"),
    }

    Ok(())
}

/// Calcula la respuesta para el texto de un request
///
/// Retorna `None` cuando no se debe enviar nada: request vacío, request line
/// malformada o método distinto de GET.
pub fn respond(text: &str, site: &Site) -> io::Result<Option<Response>> {
    let request = match Request::parse(text) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "request ignorado");
            return Ok(None);
        }
    };

    if request.method() != &Method::GET {
        debug!(method = %request.method(), "método distinto de GET ignorado");
        return Ok(None);
    }

    let outcome = site.serve(request.path())?;
    Ok(Some(Response::from_outcome(request.version(), outcome)))
}
