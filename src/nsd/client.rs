// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TLS client for the NSD control socket.

use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{ControlCommand, ControlError};
use super::verifier::NsdServerVerifier;
use super::ControlClient;
use crate::config::NsdMasterConfig;
use crate::constants::NSD_CONTROL_VERSION;

/// Client for NSD's remote-control protocol over TLS.
///
/// A new TLS session is opened for every command, so a single client can be
/// shared between threads without locking.
#[derive(Debug, Clone)]
pub struct NsdControlClient {
    host: String,
    port: u16,
    server_name: ServerName<'static>,
    tls: Arc<ClientConfig>,
}

impl NsdControlClient {
    /// Build a client from the `NSDMaster` configuration section.
    ///
    /// Loads the client certificate chain and key, and the pinned server
    /// certificate when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a PEM file cannot be loaded, `controlhost` is not a
    /// valid server name, or the TLS configuration is rejected.
    pub fn from_config(config: &NsdMasterConfig) -> Result<Self, ControlError> {
        let server_name = ServerName::try_from(config.control_host.clone())
            .map_err(|_| ControlError::InvalidServerName(config.control_host.clone()))?;

        let pinned_certs = config.server_cert.as_deref().map(load_certs).transpose()?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = Arc::new(NsdServerVerifier::new(
            pinned_certs,
            provider.signature_verification_algorithms,
        ));

        let pinned = verifier.is_pinned();
        if !pinned {
            warn!(
                host = %config.control_host,
                "NSDMaster.servercert is not set; the NSD server certificate will not be verified"
            );
        }

        let tls = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_client_auth_cert(load_certs(&config.client_cert)?, load_key(&config.client_key)?)?;

        debug!(
            host = %config.control_host,
            port = config.control_port,
            pinned = pinned,
            "NSD control client configured"
        );

        Ok(Self {
            host: config.control_host.clone(),
            port: config.control_port,
            server_name,
            tls: Arc::new(tls),
        })
    }

    /// `host:port` of the control socket, bracketing IPv6 literals.
    #[must_use]
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl ControlClient for NsdControlClient {
    fn call(&self, command: ControlCommand, args: &[&str]) -> Result<String, ControlError> {
        let address = self.address();
        debug!(command = %command, args = ?args, address = %address, "Sending NSD control command");

        let socket = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(|source| ControlError::Connect { address, source })?;
        let connection = ClientConnection::new(Arc::clone(&self.tls), self.server_name.clone())?;
        let mut stream = StreamOwned::new(connection, socket);

        let response = exchange(&mut stream, &format_request(command, args))?;
        debug!(command = %command, response = %response, "NSD control command answered");
        Ok(response)
    }
}

/// Encode one request line: `NSDCT1 <command>[ <arg>]*\n`.
#[must_use]
pub fn format_request(command: ControlCommand, args: &[&str]) -> String {
    let mut request = format!("NSDCT{NSD_CONTROL_VERSION} {command}");
    for arg in args {
        request.push(' ');
        request.push_str(arg);
    }
    request.push('\n');
    request
}

/// Write `request` and read the response until the server closes the stream.
///
/// NSD may drop the connection without a TLS close_notify once it has
/// answered, so an unexpected EOF after some data ends the response normally.
///
/// # Errors
///
/// Returns an error if writing fails, or reading fails before any data arrived.
pub fn exchange<S: Read + Write>(stream: &mut S, request: &str) -> Result<String, ControlError> {
    stream.write_all(request.as_bytes())?;
    stream.flush()?;

    let mut response = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => response.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof && !response.is_empty() => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(String::from_utf8_lossy(&response).trim().to_string())
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ControlError> {
    let certs = CertificateDer::pem_file_iter(path)
        .and_then(|certs| certs.collect::<Result<Vec<_>, _>>())
        .map_err(|e| ControlError::Certificate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(ControlError::Certificate {
            path: path.to_path_buf(),
            reason: "no certificates found".to_string(),
        });
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, ControlError> {
    PrivateKeyDer::from_pem_file(path).map_err(|e| ControlError::Certificate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
