//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

/// Error type for loading transport material.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("found {present:?} but {missing:?} is missing; provide both or neither")]
    Incomplete { present: PathBuf, missing: PathBuf },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no PEM certificate found in {0:?}")]
    NoCertificate(PathBuf),
    #[error("no PEM private key found in {0:?}")]
    NoPrivateKey(PathBuf),
    #[error("invalid TLS material: {0}")]
    Rustls(#[source] std::io::Error),
}

/// Raw PEM certificate chain and private key.
#[derive(Clone)]
pub struct TransportMaterial {
    pub certificate: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for TransportMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportMaterial")
            .field("certificate_bytes", &self.certificate.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl TransportMaterial {
    /// Read certificate material if present.
    ///
    /// Both files absent means plaintext (`Ok(None)`); only one present is an
    /// error rather than a silent downgrade.
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Option<Self>, TransportError> {
        match (cert_path.exists(), key_path.exists()) {
            (false, false) => return Ok(None),
            (true, false) => {
                return Err(TransportError::Incomplete {
                    present: cert_path.to_path_buf(),
                    missing: key_path.to_path_buf(),
                })
            }
            (false, true) => {
                return Err(TransportError::Incomplete {
                    present: key_path.to_path_buf(),
                    missing: cert_path.to_path_buf(),
                })
            }
            (true, true) => {}
        }

        let certificate = read(cert_path)?;
        let private_key = read(key_path)?;

        let has_cert = rustls_pemfile::certs(&mut certificate.as_slice()).any(|c| c.is_ok());
        if !has_cert {
            return Err(TransportError::NoCertificate(cert_path.to_path_buf()));
        }
        match rustls_pemfile::private_key(&mut private_key.as_slice()) {
            Ok(Some(_)) => {}
            _ => return Err(TransportError::NoPrivateKey(key_path.to_path_buf())),
        }

        Ok(Some(Self {
            certificate,
            private_key,
        }))
    }
}

fn read(path: &Path) -> Result<Vec<u8>, TransportError> {
    std::fs::read(path).map_err(|source| TransportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Listener transport selected at startup.
#[derive(Clone)]
pub enum Transport {
    Plaintext,
    Tls(RustlsConfig),
}

impl Transport {
    pub fn scheme(&self) -> &'static str {
        match self {
            Transport::Plaintext => "http",
            Transport::Tls(_) => "https",
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Load TLS configuration from certificate and key files, if both exist.
pub async fn load_transport(cert_path: &Path, key_path: &Path) -> Result<Transport, TransportError> {
    match TransportMaterial::load(cert_path, key_path)? {
        None => {
            tracing::info!(cert = ?cert_path, "No certificate found, serving plaintext");
            Ok(Transport::Plaintext)
        }
        Some(material) => {
            let config = RustlsConfig::from_pem(material.certificate, material.private_key)
                .await
                .map_err(TransportError::Rustls)?;
            tracing::info!(cert = ?cert_path, "TLS enabled");
            Ok(Transport::Tls(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_self_signed(dir: &TempDir) -> (PathBuf, PathBuf) {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("cert.key");
        fs::write(&cert_path, certified.cert.pem()).unwrap();
        fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();
        (cert_path, key_path)
    }

    #[tokio::test]
    async fn test_absent_material_is_plaintext() {
        let dir = TempDir::new().unwrap();
        let transport = load_transport(&dir.path().join("cert.pem"), &dir.path().join("cert.key"))
            .await
            .unwrap();
        assert!(matches!(transport, Transport::Plaintext));
        assert_eq!(transport.scheme(), "http");
    }

    #[tokio::test]
    async fn test_present_material_is_tls() {
        let dir = TempDir::new().unwrap();
        let (cert, key) = write_self_signed(&dir);
        let transport = load_transport(&cert, &key).await.unwrap();
        assert!(matches!(transport, Transport::Tls(_)));
        assert_eq!(transport.scheme(), "https");
    }

    #[test]
    fn test_half_present_material_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (cert, key) = write_self_signed(&dir);
        fs::remove_file(&key).unwrap();
        assert!(matches!(
            TransportMaterial::load(&cert, &key),
            Err(TransportError::Incomplete { .. })
        ));
    }

    #[test]
    fn test_garbage_pem_rejected() {
        let dir = TempDir::new().unwrap();
        let (cert, key) = write_self_signed(&dir);
        fs::write(&cert, "not a certificate").unwrap();
        assert!(matches!(
            TransportMaterial::load(&cert, &key),
            Err(TransportError::NoCertificate(_))
        ));
    }
}
