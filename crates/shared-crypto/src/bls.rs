//! BLS12-381 Signature Implementation
//!
//! Provides BLS signature primitives for:
//! - Key generation
//! - Sign/verify operations
//! - Signature and public key aggregation
//!
//! Public keys live on G1 (48 bytes compressed), signatures on G2 (96 bytes).
//! Used by the validator set (key registration) and the warp verifier
//! (aggregate verification).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use blst::min_pk::{AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use zeroize::Zeroize;

use crate::CryptoError;

/// Domain separation tag for BLS signatures (proof-of-possession scheme)
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Compressed public key width in bytes.
pub const PUBLIC_KEY_LEN: usize = 48;

/// Compressed signature width in bytes.
pub const SIGNATURE_LEN: usize = 96;

#[serde_as]
#[derive(Serialize, Deserialize)]
struct PublicKeyBytes(#[serde_as(as = "Bytes")] [u8; PUBLIC_KEY_LEN]);

#[serde_as]
#[derive(Serialize, Deserialize)]
struct SignatureBytes(#[serde_as(as = "Bytes")] [u8; SIGNATURE_LEN]);

/// BLS public key (48 bytes compressed).
///
/// Always a validated group element: construction from bytes rejects
/// off-curve points, points outside the subgroup and the identity. Equality,
/// ordering and hashing are over the compressed bytes.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyBytes", into = "PublicKeyBytes")]
pub struct BlsPublicKey {
    point: PublicKey,
    bytes: [u8; PUBLIC_KEY_LEN],
}

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for BlsPublicKey {}

impl PartialOrd for BlsPublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlsPublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl Hash for BlsPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey({})", hex::encode(&self.bytes[..8]))
    }
}

impl TryFrom<PublicKeyBytes> for BlsPublicKey {
    type Error = CryptoError;

    fn try_from(raw: PublicKeyBytes) -> Result<Self, Self::Error> {
        Self::from_bytes(&raw.0)
    }
}

impl From<BlsPublicKey> for PublicKeyBytes {
    fn from(key: BlsPublicKey) -> Self {
        PublicKeyBytes(key.bytes)
    }
}

/// BLS signature (96 bytes).
///
/// Parsing only checks the encoding; the subgroup check happens during
/// verification.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "SignatureBytes", into = "SignatureBytes")]
pub struct BlsSignature(Signature);

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature({})", hex::encode(&self.to_bytes()[..8]))
    }
}

impl TryFrom<SignatureBytes> for BlsSignature {
    type Error = CryptoError;

    fn try_from(raw: SignatureBytes) -> Result<Self, Self::Error> {
        Self::from_bytes(&raw.0)
    }
}

impl From<BlsSignature> for SignatureBytes {
    fn from(sig: BlsSignature) -> Self {
        SignatureBytes(sig.to_bytes())
    }
}

/// BLS key pair for signing operations
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        let keypair = Self::from_ikm(&ikm);
        ikm.zeroize();
        keypair
    }

    /// Derive a key pair from input keying material (at least 32 bytes).
    ///
    /// The same material always yields the same key pair.
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, CryptoError> {
        let secret = SecretKey::key_gen(ikm, &[]).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret(secret))
    }

    /// Create from existing secret key bytes
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret = SecretKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let point = secret.sk_to_pk();
        let public = BlsPublicKey {
            bytes: point.to_bytes(),
            point,
        };
        Self { secret, public }
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, DST, &[]))
    }

    /// Get the public key
    pub fn public_key(&self) -> BlsPublicKey {
        self.public.clone()
    }
}

impl BlsPublicKey {
    /// Verify a signature against this public key
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        signature.0.verify(true, message, DST, &[], &self.point, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Create from 48-byte compressed representation
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        let point = PublicKey::key_validate(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self {
            point,
            bytes: *bytes,
        })
    }

    /// Create from a slice, checking the width first.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: &[u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            })?;
        Self::from_bytes(arr)
    }

    /// Serialize to 48-byte compressed form
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.bytes
    }

    /// Compressed bytes, borrowed.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.bytes
    }

    /// Aggregate multiple public keys into one
    ///
    /// The aggregated key verifies signatures aggregated over the same message.
    pub fn aggregate<'a, I>(keys: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = &'a BlsPublicKey>,
    {
        let refs: Vec<&PublicKey> = keys.into_iter().map(|k| &k.point).collect();
        if refs.is_empty() {
            return Err(CryptoError::EmptyAggregation);
        }
        // Inputs were validated at construction.
        let point = AggregatePublicKey::aggregate(&refs, false)
            .map(|apk| apk.to_public_key())
            .map_err(|_| CryptoError::AggregationFailed)?;
        Ok(Self {
            bytes: point.to_bytes(),
            point,
        })
    }
}

impl BlsSignature {
    /// Create from 96-byte representation
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Result<Self, CryptoError> {
        Signature::from_bytes(bytes)
            .map(BlsSignature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Serialize to 96-byte form
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    /// Aggregate multiple signatures into one
    ///
    /// The aggregated signature can be verified against the aggregated public key.
    pub fn aggregate<'a, I>(sigs: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = &'a BlsSignature>,
    {
        let refs: Vec<&Signature> = sigs.into_iter().map(|s| &s.0).collect();
        if refs.is_empty() {
            return Err(CryptoError::EmptyAggregation);
        }
        AggregateSignature::aggregate(&refs, true)
            .map(|asig| BlsSignature(asig.to_signature()))
            .map_err(|_| CryptoError::AggregationFailed)
    }
}
