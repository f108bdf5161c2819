use ciborium::value::Value;

use super::keys::KeyError;

/// Wrap authenticator data into the "none"-format attestation object:
/// a CBOR map with exactly the keys `fmt`, `attStmt` (empty) and `authData`.
pub(crate) fn build_attestation_object(auth_data: &[u8]) -> Result<Vec<u8>, KeyError> {
    let map = Value::Map(vec![
        (
            Value::Text("fmt".to_string()),
            Value::Text("none".to_string()),
        ),
        (Value::Text("attStmt".to_string()), Value::Map(vec![])),
        (
            Value::Text("authData".to_string()),
            Value::Bytes(auth_data.to_vec()),
        ),
    ]);
    let mut buf = Vec::new();
    ciborium::into_writer(&map, &mut buf).map_err(|e| KeyError::Cbor(e.to_string()))?;
    Ok(buf)
}
