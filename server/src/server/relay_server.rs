use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::error::RelayError;
use crate::session::{run_session, SessionContext};

use super::RelayConfig;

/// Accept loop for the command listener.
///
/// One task per accepted client; all of them share the command encoder
/// and the single serial command sink through the cloned
/// [`SessionContext`]. Runs until the shutdown signal fires.
pub struct RelayServer {
    config: RelayConfig,
    ctx: SessionContext,
}

impl RelayServer {
    pub fn new(config: RelayConfig, ctx: SessionContext) -> Self {
        Self { config, ctx }
    }

    pub async fn run(&self) -> Result<(), RelayError> {
        let port = self.config.listen_port;
        info!("Initializing incoming command server on port {port}...");

        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| RelayError::Bind { port, source })?;

        let acceptor = if self.config.use_tls {
            let acceptor = build_tls_acceptor(&self.config)?;
            info!("TLS is enabled for the command listener.");
            Some(acceptor)
        } else {
            info!("TLS is not enabled for the command listener. Connections are plaintext.");
            None
        };

        loop {
            let (stream, addr) = tokio::select! {
                _ = self.ctx.shutdown.triggered() => break,
                accepted = listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!("Accept failed: {err}");
                        continue;
                    }
                },
            };

            let peer = addr.to_string();
            let ctx = self.ctx.clone();
            match &acceptor {
                Some(acceptor) => {
                    let acceptor = acceptor.clone();
                    tokio::spawn(async move {
                        match acceptor.accept(stream).await {
                            Ok(tls_stream) => run_session(tls_stream, &peer, ctx).await,
                            Err(err) => warn!("TLS handshake failed [{peer}]: {err}"),
                        }
                    });
                }
                None => {
                    tokio::spawn(async move {
                        run_session(stream, &peer, ctx).await;
                    });
                }
            }
        }

        info!("Command server shutting down.");
        Ok(())
    }
}

fn build_tls_acceptor(config: &RelayConfig) -> Result<TlsAcceptor, RelayError> {
    // Install default crypto provider if not already installed
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let certs = load_certs(&config.cert_file)?;
    let key = load_key(&config.key_file)?;

    let tls_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| RelayError::TlsCertificate {
            path: config.cert_file.clone(),
            reason: err.to_string(),
        })?;

    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, RelayError> {
    let file = File::open(path).map_err(|err| RelayError::TlsCertificate {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let certs: Vec<CertificateDer> = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<_, _>>()
        .map_err(|err| RelayError::TlsCertificate {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    if certs.is_empty() {
        return Err(RelayError::TlsCertificate {
            path: path.to_path_buf(),
            reason: "no certificates found in PEM file".to_string(),
        });
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, RelayError> {
    let file = File::open(path).map_err(|err| RelayError::TlsCertificate {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|err| RelayError::TlsCertificate {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?
        .ok_or_else(|| RelayError::TlsCertificate {
            path: path.to_path_buf(),
            reason: "no private key found in PEM file".to_string(),
        })
}
