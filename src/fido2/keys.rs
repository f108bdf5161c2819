//! ECDSA P-256 key engine: key pair generation, SPKI/PKCS#8 transport,
//! canonical COSE export, and ES256 signing with DER output.

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;

#[derive(Debug, thiserror::Error)]
pub(crate) enum KeyError {
    #[error("key material: {0}")]
    Pkcs8(String),
    #[error("public key coordinate is {0} bytes, expected 32")]
    InvalidCoordinate(usize),
    #[error("cbor: {0}")]
    Cbor(String),
}

/// Generate a fresh ECDSA key pair on curve P-256.
pub(crate) fn create_key_pair() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

/// Export the public half as a SubjectPublicKeyInfo DER document for the
/// wire response.
pub(crate) fn export_public_key_spki(key: &SigningKey) -> Result<Vec<u8>, KeyError> {
    key.verifying_key()
        .to_public_key_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| KeyError::Pkcs8(e.to_string()))
}

/// Export the private half as PKCS#8 DER for vault storage.
pub(crate) fn export_private_key_pkcs8(key: &SigningKey) -> Result<Vec<u8>, KeyError> {
    key.to_pkcs8_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| KeyError::Pkcs8(e.to_string()))
}

/// Re-import a stored PKCS#8 private key.
pub(crate) fn import_private_key_pkcs8(der: &[u8]) -> Result<SigningKey, KeyError> {
    SigningKey::from_pkcs8_der(der).map_err(|e| KeyError::Pkcs8(e.to_string()))
}

/// Encode the public key as a canonical COSE_Key map:
/// kty=EC2(2), alg=ES256(-7), crv=P-256(1), x, y.
///
/// The protocol requires deterministic byte ordering, so the 77-byte map is
/// laid out from a fixed template instead of a general-purpose CBOR encoder.
pub(crate) fn export_public_key_cose(key: &SigningKey) -> Result<[u8; 77], KeyError> {
    let point = key.verifying_key().to_encoded_point(false);
    let x = point.x().ok_or(KeyError::InvalidCoordinate(0))?;
    let y = point.y().ok_or(KeyError::InvalidCoordinate(0))?;
    if x.len() != 32 {
        return Err(KeyError::InvalidCoordinate(x.len()));
    }
    if y.len() != 32 {
        return Err(KeyError::InvalidCoordinate(y.len()));
    }

    let mut cose = [0u8; 77];
    // a5             map(5)
    // 01 02          kty: EC2
    // 03 26          alg: ES256
    // 20 01          crv: P-256
    // 21 58 20 <x>   x coordinate
    // 22 58 20 <y>   y coordinate
    cose[..10].copy_from_slice(&[0xa5, 0x01, 0x02, 0x03, 0x26, 0x20, 0x01, 0x21, 0x58, 0x20]);
    cose[10..42].copy_from_slice(x);
    cose[42..45].copy_from_slice(&[0x22, 0x58, 0x20]);
    cose[45..77].copy_from_slice(y);
    Ok(cose)
}

/// ECDSA-SHA-256 over `auth_data || client_data_hash`, returned in the
/// ASN.1 DER form the wire protocol mandates.
pub(crate) fn sign(auth_data: &[u8], client_data_hash: &[u8], key: &SigningKey) -> Vec<u8> {
    let mut message = Vec::with_capacity(auth_data.len() + client_data_hash.len());
    message.extend_from_slice(auth_data);
    message.extend_from_slice(client_data_hash);
    let signature: Signature = key.sign(&message);
    let mut raw = [0u8; 64];
    raw.copy_from_slice(&signature.to_bytes());
    p1363_to_der(&raw)
}

/// Convert a fixed-length P1363 signature (r || s) to ASN.1 DER.
pub(crate) fn p1363_to_der(raw: &[u8; 64]) -> Vec<u8> {
    let r_der = der_integer(&raw[0..32]);
    let s_der = der_integer(&raw[32..64]);
    let inner_len = (r_der.len() + s_der.len()) as u8;
    let mut out = vec![0x30u8, inner_len];
    out.extend_from_slice(&r_der);
    out.extend_from_slice(&s_der);
    out
}

fn der_integer(n: &[u8]) -> Vec<u8> {
    let n: Vec<u8> = n.iter().skip_while(|&&b| b == 0).copied().collect();
    let n = if n.is_empty() { vec![0u8] } else { n };
    let pad = n[0] & 0x80 != 0;
    let mut out = vec![0x02u8, n.len() as u8 + pad as u8];
    if pad {
        out.push(0);
    }
    out.extend_from_slice(&n);
    out
}
