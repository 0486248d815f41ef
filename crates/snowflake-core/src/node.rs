//! Best-effort derivation of a datacenter id for hosts that are not assigned
//! one explicitly.
//!
//! None of these strategies guarantee fleet-wide uniqueness. Deployments that
//! need it must hand out `(datacenter_id, worker_id)` pairs centrally.

use crate::{
    error::{Error, Result},
    layout::MAX_DATACENTER_ID,
};
use mac_address::MacAddressIterator;
use rand::{rngs::OsRng, TryRngCore};
use tracing::{debug, warn};

/// Supplies the datacenter id bits for a generator.
pub trait NodeIdResolver {
    /// Returns a datacenter id in `0..=MAX_DATACENTER_ID`.
    fn resolve(&self) -> Result<u8>;
}

/// Hashes the hardware addresses of every network interface on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareAddressResolver;

impl HardwareAddressResolver {
    fn signature() -> Result<String> {
        let addresses = MacAddressIterator::new()
            .map_err(|e| Error::NodeIdUnavailable(format!("list interfaces: {e}")))?;

        let signature = render_signature(addresses.map(|address| address.bytes()));

        if signature.is_empty() {
            return Err(Error::NodeIdUnavailable(
                "no interface exposes a hardware address".to_string(),
            ));
        }
        Ok(signature)
    }
}

impl NodeIdResolver for HardwareAddressResolver {
    fn resolve(&self) -> Result<u8> {
        let signature = Self::signature()?;
        let datacenter_id = mask(hash_signature(&signature));
        debug!(%signature, datacenter_id, "derived datacenter id from hardware addresses");
        Ok(datacenter_id)
    }
}

/// Draws the id from the operating system's secure random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomResolver;

impl NodeIdResolver for RandomResolver {
    fn resolve(&self) -> Result<u8> {
        let value = OsRng
            .try_next_u32()
            .map_err(|e| Error::NodeIdUnavailable(format!("secure random source: {e}")))?;
        let datacenter_id = mask(value);
        debug!(
            datacenter_id,
            "derived datacenter id from secure random source"
        );
        Ok(datacenter_id)
    }
}

/// Tries `primary` and, if it fails, `secondary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> Fallback<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: NodeIdResolver, S: NodeIdResolver> NodeIdResolver for Fallback<P, S> {
    fn resolve(&self) -> Result<u8> {
        match self.primary.resolve() {
            Ok(id) => Ok(id),
            Err(error) => {
                warn!(%error, "primary datacenter id resolver failed, falling back");
                self.secondary.resolve()
            }
        }
    }
}

/// Hardware addresses first, secure random second.
pub fn default_resolver() -> Fallback<HardwareAddressResolver, RandomResolver> {
    Fallback::new(HardwareAddressResolver, RandomResolver)
}

/// Concatenates the addresses as uppercase hex, skipping all-zero ones.
fn render_signature<I: IntoIterator<Item = [u8; 6]>>(addresses: I) -> String {
    addresses
        .into_iter()
        // loopback and virtual interfaces report an all-zero address
        .filter(|bytes| bytes.iter().any(|b| *b != 0))
        .flat_map(|bytes| bytes.map(|b| format!("{b:02X}")))
        .collect()
}

/// Polynomial string hash over the signature characters, base 31, wrapping in
/// 32 bits.
fn hash_signature(signature: &str) -> u32 {
    signature.chars().fold(0_u32, |hash, c| {
        hash.wrapping_mul(31).wrapping_add(c as u32)
    })
}

fn mask(value: u32) -> u8 {
    (value & u32::from(MAX_DATACENTER_ID)) as u8
}
