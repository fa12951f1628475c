//! CycloneDX enveloped signature extraction.
//!
//! The JSON Signature Format block is read from the raw document value.
//! Three shapes exist: a single signer, a `signers` array and a `chain`
//! array; for the array shapes only the first entry is kept. RSA JWK public
//! keys are rebuilt into a PEM `PUBLIC KEY` (SubjectPublicKeyInfo); an RSA
//! key that does not validate yields no key material at all.

use crate::model::Signature;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{BigUint, RsaPublicKey};
use serde_json::Value;

/// Extracted signature and the number of additional signers that were dropped
#[derive(Debug)]
pub(crate) struct Extracted {
    pub signature: Signature,
    pub discarded: usize,
}

/// Read the top-level `signature` block of a CycloneDX JSON document
pub(crate) fn extract(raw: &Value) -> Option<Extracted> {
    let value = raw.get("signature")?;
    let block = value.as_object()?;

    if block.contains_key("algorithm") || block.contains_key("value") {
        return signer(value).map(|signature| Extracted {
            signature,
            discarded: 0,
        });
    }
    for shape in ["signers", "chain"] {
        if let Some(entries) = block.get(shape).and_then(Value::as_array) {
            if let Some(first) = entries.first() {
                return signer(first).map(|signature| Extracted {
                    signature,
                    discarded: entries.len() - 1,
                });
            }
        }
    }
    None
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn signer(value: &Value) -> Option<Signature> {
    let obj = value.as_object()?;
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let public_key_pem = obj.get("publicKey").and_then(|key| {
        if is_rsa(key) {
            jwk_to_pem(key)
        } else {
            Some(key.to_string())
        }
    });
    Some(Signature {
        algorithm: text("algorithm"),
        value: text("value"),
        public_key_pem,
        certificate_path: string_list(obj.get("certificatePath")),
        excludes: string_list(obj.get("excludes")),
    })
}

/// Decode a JWK base64 member, trying URL-safe, standard and unpadded URL-safe
pub(crate) fn decode_b64(input: &str) -> Option<Vec<u8>> {
    let input = input.trim();
    URL_SAFE
        .decode(input)
        .or_else(|_| STANDARD.decode(input))
        .or_else(|_| URL_SAFE_NO_PAD.decode(input))
        .ok()
}

/// PEM `PUBLIC KEY` for an RSA JWK (`kty == "RSA"` with `n` and `e`).
///
/// `None` when the key is not RSA or its members do not form a valid public key.
pub(crate) fn jwk_to_pem(jwk: &Value) -> Option<String> {
    if !is_rsa(jwk) {
        return None;
    }
    let n = decode_b64(jwk.get("n")?.as_str()?)?;
    let e = decode_b64(jwk.get("e")?.as_str()?)?;
    let key = RsaPublicKey::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e))
        .map_err(|err| tracing::warn!(error = %err, "rejecting invalid RSA public key"))
        .ok()?;
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|err| tracing::warn!(error = %err, "failed to encode RSA public key"))
        .ok()
}

fn is_rsa(jwk: &Value) -> bool {
    jwk.get("kty").and_then(Value::as_str) == Some("RSA")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rsa_jwk() -> Value {
        // 256-byte modulus with the high bit set, e = 65537
        let n = URL_SAFE_NO_PAD.encode(vec![0xC5u8; 256]);
        json!({"kty": "RSA", "n": n, "e": "AQAB"})
    }

    #[test]
    fn test_single_signer() {
        let raw = json!({"signature": {
            "algorithm": "RS256",
            "value": "c2lnbmF0dXJl",
            "publicKey": rsa_jwk(),
            "excludes": ["/metadata/timestamp"]
        }});
        let extracted = extract(&raw).expect("signature");
        assert_eq!(extracted.discarded, 0);
        let sig = extracted.signature;
        assert_eq!(sig.algorithm, "RS256");
        assert_eq!(sig.excludes, vec!["/metadata/timestamp"]);
        assert!(sig.is_complete());
        assert!(sig
            .public_key_pem
            .as_deref()
            .is_some_and(|p| p.starts_with("-----BEGIN PUBLIC KEY-----")));
    }

    #[test]
    fn test_signers_and_chain_keep_first() {
        let raw = json!({"signature": {"signers": [
            {"algorithm": "ES256", "value": "a"},
            {"algorithm": "RS256", "value": "b"}
        ]}});
        let extracted = extract(&raw).expect("signature");
        assert_eq!(extracted.signature.algorithm, "ES256");
        assert_eq!(extracted.discarded, 1);

        let raw = json!({"signature": {"chain": [{"algorithm": "PS256", "value": "c"}]}});
        assert_eq!(extract(&raw).expect("chain").signature.algorithm, "PS256");
    }

    #[test]
    fn test_no_signature() {
        assert!(extract(&json!({"bomFormat": "CycloneDX"})).is_none());
        assert!(extract(&json!({"signature": {"signers": []}})).is_none());
    }

    #[test]
    fn test_pem_decodes_to_same_key() {
        use rsa::pkcs8::DecodePublicKey;
        use rsa::traits::PublicKeyParts;

        let pem = jwk_to_pem(&rsa_jwk()).expect("pem");
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        let key = RsaPublicKey::from_public_key_pem(&pem).expect("valid SubjectPublicKeyInfo");
        assert_eq!(key.n().to_bytes_be(), vec![0xC5u8; 256]);
        assert_eq!(key.e(), &BigUint::from(65_537u32));
    }

    #[test]
    fn test_invalid_rsa_key_yields_no_material() {
        let oversized = URL_SAFE_NO_PAD.encode(vec![0xC5u8; 1024]);
        let modulus = URL_SAFE_NO_PAD.encode(vec![0xC5u8; 256]);
        for jwk in [
            json!({"kty": "RSA", "n": oversized, "e": "AQAB"}),
            json!({"kty": "RSA", "n": modulus, "e": "AQ"}),
            json!({"kty": "RSA", "n": "***", "e": "AQAB"}),
            json!({"kty": "RSA", "e": "AQAB"}),
        ] {
            assert!(jwk_to_pem(&jwk).is_none(), "{jwk}");
            let raw = json!({"signature": {"algorithm": "RS256", "value": "v", "publicKey": jwk}});
            let sig = extract(&raw).expect("signature").signature;
            assert!(sig.public_key_pem.is_none());
            assert!(!sig.is_complete());
        }
    }

    #[test]
    fn test_non_rsa_key_kept_raw() {
        let raw = json!({"signature": {"algorithm": "ES256", "value": "v",
            "publicKey": {"kty": "EC", "crv": "P-256", "x": "AA", "y": "BB"}}});
        let sig = extract(&raw).expect("signature").signature;
        assert!(sig.public_key_pem.as_deref().is_some_and(|k| k.contains("P-256")));
    }

    #[test]
    fn test_base64_fallback_order() {
        assert_eq!(decode_b64("AQAB"), Some(vec![1, 0, 1]));
        assert_eq!(decode_b64("-_8"), Some(vec![0xFB, 0xFF]));
        assert!(decode_b64("***").is_none());
    }
}
