//! Legacy protocol probe.
//!
//! rustls cannot speak TLS 1.0/1.1, so the probe sends a hand-built
//! ClientHello offering only the legacy version and inspects the first
//! handshake record of the reply. A ServerHello echoing the offered version
//! means the server still accepts it; an alert or a closed connection means
//! it does not.

use std::net::IpAddr;

use anyhow::{Context, Result};
use rand::RngCore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::LEGACY_PROBE_TIMEOUT;

const CONTENT_TYPE_HANDSHAKE: u8 = 0x16;
const HANDSHAKE_CLIENT_HELLO: u8 = 0x01;
const HANDSHAKE_SERVER_HELLO: u8 = 0x02;

/// CBC suites every TLS 1.0/1.1 server supports
const LEGACY_CIPHER_SUITES: &[u16] = &[
    0xc014, // ECDHE_RSA_WITH_AES_256_CBC_SHA
    0xc013, // ECDHE_RSA_WITH_AES_128_CBC_SHA
    0xc00a, // ECDHE_ECDSA_WITH_AES_256_CBC_SHA
    0xc009, // ECDHE_ECDSA_WITH_AES_128_CBC_SHA
    0x0035, // RSA_WITH_AES_256_CBC_SHA
    0x002f, // RSA_WITH_AES_128_CBC_SHA
    0x000a, // RSA_WITH_3DES_EDE_CBC_SHA
];

/// Curves offered for the ECDHE suites: x25519, secp256r1, secp384r1
const SUPPORTED_GROUPS: &[u16] = &[0x001d, 0x0017, 0x0018];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyProtocol {
    Tls10,
    Tls11,
}

impl LegacyProtocol {
    pub fn wire_version(&self) -> u16 {
        match self {
            LegacyProtocol::Tls10 => 0x0301,
            LegacyProtocol::Tls11 => 0x0302,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegacyProtocol::Tls10 => "TLS 1.0",
            LegacyProtocol::Tls11 => "TLS 1.1",
        }
    }
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn put_u24(buf: &mut Vec<u8>, value: usize) {
    buf.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
}

fn put_extension(buf: &mut Vec<u8>, ext_type: u16, data: &[u8]) {
    put_u16(buf, ext_type);
    put_u16(buf, data.len() as u16);
    buf.extend_from_slice(data);
}

/// Builds a ClientHello record offering only `protocol`.
pub fn build_client_hello(protocol: LegacyProtocol, hostname: &str) -> Vec<u8> {
    let version = protocol.wire_version();

    let mut extensions = Vec::new();
    if hostname.parse::<IpAddr>().is_err() {
        // server_name: list length, type 0 (host_name), name
        let mut sni = Vec::new();
        put_u16(&mut sni, (hostname.len() + 3) as u16);
        sni.push(0);
        put_u16(&mut sni, hostname.len() as u16);
        sni.extend_from_slice(hostname.as_bytes());
        put_extension(&mut extensions, 0x0000, &sni);
    }
    let mut groups = Vec::new();
    put_u16(&mut groups, (SUPPORTED_GROUPS.len() * 2) as u16);
    for group in SUPPORTED_GROUPS {
        put_u16(&mut groups, *group);
    }
    put_extension(&mut extensions, 0x000a, &groups);
    // ec_point_formats: uncompressed
    put_extension(&mut extensions, 0x000b, &[1, 0]);
    // renegotiation_info: empty
    put_extension(&mut extensions, 0xff01, &[0]);

    let mut body = Vec::new();
    put_u16(&mut body, version);
    let mut random = [0u8; 32];
    rand::rng().fill_bytes(&mut random);
    body.extend_from_slice(&random);
    body.push(0); // empty session id
    put_u16(&mut body, (LEGACY_CIPHER_SUITES.len() * 2) as u16);
    for suite in LEGACY_CIPHER_SUITES {
        put_u16(&mut body, *suite);
    }
    body.extend_from_slice(&[1, 0]); // null compression only
    put_u16(&mut body, extensions.len() as u16);
    body.extend_from_slice(&extensions);

    let mut handshake = vec![HANDSHAKE_CLIENT_HELLO];
    put_u24(&mut handshake, body.len());
    handshake.extend_from_slice(&body);

    let mut record = vec![CONTENT_TYPE_HANDSHAKE];
    put_u16(&mut record, 0x0301);
    put_u16(&mut record, handshake.len() as u16);
    record.extend_from_slice(&handshake);
    record
}

/// True when `response` starts with a ServerHello that selected `protocol`.
pub(crate) fn server_accepted(protocol: LegacyProtocol, response: &[u8]) -> bool {
    // record header (5) + handshake type (1) + length (3) + server_version (2)
    if response.len() < 11 {
        return false;
    }
    response[0] == CONTENT_TYPE_HANDSHAKE
        && response[5] == HANDSHAKE_SERVER_HELLO
        && u16::from_be_bytes([response[9], response[10]]) == protocol.wire_version()
}

/// Probes `host:port` for `protocol`.
///
/// # Errors
///
/// Returns an error only when the TCP connection itself cannot be made. A
/// refused handshake, reset, or silence within the probe timeout is `Ok(false)`.
pub async fn accepts_legacy_protocol(host: &str, port: u16, protocol: LegacyProtocol) -> Result<bool> {
    let mut stream = tokio::time::timeout(LEGACY_PROBE_TIMEOUT, TcpStream::connect((host, port)))
        .await
        .with_context(|| format!("TCP connection timeout for {host}:{port}"))?
        .with_context(|| format!("Failed to connect to {host}:{port}"))?;

    let hello = build_client_hello(protocol, host);
    let exchange = async {
        stream.write_all(&hello).await?;
        let mut response = [0u8; 11];
        stream.read_exact(&mut response).await?;
        Ok::<[u8; 11], std::io::Error>(response)
    };

    match tokio::time::timeout(LEGACY_PROBE_TIMEOUT, exchange).await {
        Ok(Ok(response)) => {
            let accepted = server_accepted(protocol, &response);
            log::debug!("{host}: {} accepted = {accepted}", protocol.label());
            Ok(accepted)
        }
        Ok(Err(e)) => {
            log::debug!("{host}: {} rejected ({e})", protocol.label());
            Ok(false)
        }
        Err(_) => Ok(false),
    }
}
