//! Ledger collaborator boundary.
//!
//! The core never talks to the network. The ledger-access collaborator
//! implements [`KeyDirectory`]; the helpers here await its lookups and then
//! hand the bytes to the pure functions in this crate.
//!
//! [`InMemoryDirectory`] is a complete in-process implementation, used by
//! tests and by tooling that has no ledger.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::address::Address;
use crate::error::{CryptoError, CryptoResult};
use crate::group::{open_member_room_key, RoomKey, RoomKeyGrant};
use crate::identity::IdentityKeyMaterial;
use crate::keys::{PrivateKey, PublicKey};

/// Read access to published identity material and room key grants.
#[async_trait]
pub trait KeyDirectory: Send + Sync {
    /// Published identity material for `address`, if the identity exists.
    async fn identity_material(&self, address: &Address)
        -> CryptoResult<Option<IdentityKeyMaterial>>;

    /// The grant addressed to `member` in `room_id`, if one was issued.
    async fn room_key_grant(
        &self,
        room_id: &str,
        member: &Address,
    ) -> CryptoResult<Option<RoomKeyGrant>>;
}

/// Fetch and validate the public key published for `address`.
pub async fn fetch_public_key<D>(directory: &D, address: &Address) -> CryptoResult<PublicKey>
where
    D: KeyDirectory + ?Sized,
{
    let material = directory
        .identity_material(address)
        .await?
        .ok_or_else(|| {
            CryptoError::KeyMaterial(format!("No identity published for {}", address))
        })?;

    let public_key = material.public_key()?;
    if !address.matches(&public_key) {
        return Err(CryptoError::KeyMaterial(format!(
            "Published public key does not belong to {}",
            address
        )));
    }
    Ok(public_key)
}

/// Fetch the caller's grant for `room_id` and open it.
///
/// Fails with [`CryptoError::NotGranted`] when the caller was never invited.
pub async fn open_room_key_from_directory<D>(
    directory: &D,
    room_id: &str,
    identity: &PrivateKey,
) -> CryptoResult<RoomKey>
where
    D: KeyDirectory + ?Sized,
{
    let member = identity.public_key().to_address();
    let grant = directory.room_key_grant(room_id, &member).await?;

    debug!(
        subsystem = "crypto",
        op = "open_room_key",
        room_id,
        member = %member,
        granted = grant.is_some(),
        "Resolved room key grant"
    );

    open_member_room_key(room_id, grant.as_ref(), identity)
}

/// In-memory [`KeyDirectory`].
///
/// Identities and grants are write-once, mirroring the ledger contract.
#[derive(Default)]
pub struct InMemoryDirectory {
    identities: RwLock<HashMap<Address, IdentityKeyMaterial>>,
    grants: RwLock<HashMap<(String, Address), RoomKeyGrant>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish identity material. Returns the identity's address.
    pub fn publish_identity(&self, material: IdentityKeyMaterial) -> CryptoResult<Address> {
        let address = material.address()?;
        let mut identities = self.identities.write();
        if identities.contains_key(&address) {
            return Err(CryptoError::InvalidInput(format!(
                "Identity {} already published",
                address
            )));
        }
        identities.insert(address.clone(), material);
        Ok(address)
    }

    /// Publish a grant for `member` in `room_id`.
    pub fn publish_grant(
        &self,
        room_id: &str,
        member: &Address,
        grant: RoomKeyGrant,
    ) -> CryptoResult<()> {
        let key = (room_id.to_string(), member.clone());
        let mut grants = self.grants.write();
        if grants.contains_key(&key) {
            return Err(CryptoError::InvalidInput(format!(
                "Grant for {} in room {} already exists",
                member, room_id
            )));
        }
        grants.insert(key, grant);
        Ok(())
    }

    /// Members holding a grant in `room_id`.
    pub fn room_members(&self, room_id: &str) -> Vec<Address> {
        let mut members: Vec<Address> = self
            .grants
            .read()
            .keys()
            .filter(|(room, _)| room == room_id)
            .map(|(_, member)| member.clone())
            .collect();
        members.sort();
        members
    }
}

#[async_trait]
impl KeyDirectory for InMemoryDirectory {
    async fn identity_material(
        &self,
        address: &Address,
    ) -> CryptoResult<Option<IdentityKeyMaterial>> {
        Ok(self.identities.read().get(address).cloned())
    }

    async fn room_key_grant(
        &self,
        room_id: &str,
        member: &Address,
    ) -> CryptoResult<Option<RoomKeyGrant>> {
        Ok(self
            .grants
            .read()
            .get(&(room_id.to_string(), member.clone()))
            .cloned())
    }
}
