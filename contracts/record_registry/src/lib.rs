#![no_std]

pub mod events;


use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol, Vec,
};

use consent_access::{AccessMode, ConsentAccessContractClient};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
/// Address of the consent_access contract consulted for every view.
const ENGINE: Symbol = symbol_short!("ENGINE");
const RECORD_CTR: Symbol = symbol_short!("REC_CTR");

const MIN_HASH_LEN: u32 = 32;
const MAX_HASH_LEN: u32 = 64;

/// On-chain anchor for one off-chain medical record.
///
/// The record content lives off-chain; `data_hash` is its pinning-service
/// pointer (IPFS CID or hex digest). The anchor itself is immutable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAnchor {
    pub id: u64,
    pub patient: Address,
    pub assigned_doctor: Option<Address>,
    pub data_hash: String,
    pub created_at: u64,
}

/// What a given requester is allowed to see of one record.
///
/// A denied view is a redacted stub, not an error: the record's existence
/// stays visible but the storage pointer is withheld.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordView {
    pub record_id: u64,
    pub patient: Address,
    pub granted: bool,
    pub mode: AccessMode,
    pub data_hash: Option<String>,
    pub created_at: u64,
}

/// Contract errors
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    RecordNotFound = 3,
    InvalidDataHash = 4,
}

fn record_key(id: u64) -> (Symbol, u64) {
    (symbol_short!("RECORD"), id)
}

fn patient_index_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("PAT_REC"), patient.clone())
}

/// Validate an off-chain content pointer (IPFS CID, hex digest and the
/// like): bounded length, characters restricted to [A-Za-z0-9_-].
fn validate_data_hash(hash: &String) -> Result<(), Error> {
    let len = hash.len();
    if !(MIN_HASH_LEN..=MAX_HASH_LEN).contains(&len) {
        return Err(Error::InvalidDataHash);
    }

    let mut buf = [0u8; MAX_HASH_LEN as usize];
    hash.copy_into_slice(&mut buf[..len as usize]);

    for &b in &buf[..len as usize] {
        if !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
            return Err(Error::InvalidDataHash);
        }
    }

    Ok(())
}

#[contract]
pub struct RecordRegistryContract;

#[contractimpl]
impl RecordRegistryContract {
    /// Initialize the registry with an admin and the address of the
    /// authorization engine it consults.
    pub fn initialize(env: Env, admin: Address, engine: Address) -> Result<(), Error> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ENGINE, &engine);
        env.storage().instance().set(&INITIALIZED, &true);

        events::publish_initialized(&env, admin, engine);

        Ok(())
    }

    /// Anchor a record for a patient, optionally naming the doctor it was
    /// created under. Returns the new record id.
    pub fn anchor_record(
        env: Env,
        patient: Address,
        assigned_doctor: Option<Address>,
        data_hash: String,
    ) -> Result<u64, Error> {
        patient.require_auth();

        validate_data_hash(&data_hash)?;

        let record_id: u64 = env.storage().instance().get(&RECORD_CTR).unwrap_or(0) + 1;
        env.storage().instance().set(&RECORD_CTR, &record_id);

        let anchor = RecordAnchor {
            id: record_id,
            patient: patient.clone(),
            assigned_doctor: assigned_doctor.clone(),
            data_hash: data_hash.clone(),
            created_at: env.ledger().timestamp(),
        };
        env.storage().persistent().set(&record_key(record_id), &anchor);

        let index_key = patient_index_key(&patient);
        let mut ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&index_key)
            .unwrap_or(Vec::new(&env));
        ids.push_back(record_id);
        env.storage().persistent().set(&index_key, &ids);

        events::publish_record_anchored(&env, record_id, patient, assigned_doctor, data_hash);

        Ok(record_id)
    }

    /// Get a record anchor by id. Patient-facing: no redaction.
    pub fn get_record(env: Env, record_id: u64) -> Result<RecordAnchor, Error> {
        env.storage()
            .persistent()
            .get(&record_key(record_id))
            .ok_or(Error::RecordNotFound)
    }

    /// Ids of every record anchored for a patient, oldest first.
    pub fn list_patient_records(env: Env, patient: Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&patient_index_key(&patient))
            .unwrap_or(Vec::new(&env))
    }

    /// One record as `requester` may see it, per the engine's decision.
    pub fn view_record(env: Env, requester: Address, record_id: u64) -> Result<RecordView, Error> {
        let engine = Self::engine(&env)?;
        let anchor: RecordAnchor = env
            .storage()
            .persistent()
            .get(&record_key(record_id))
            .ok_or(Error::RecordNotFound)?;

        Ok(Self::shape_view(&env, &engine, &requester, anchor))
    }

    /// A patient's records as `requester` may see them, most recent first.
    /// Denied records come back as redacted stubs so one denial can never
    /// abort the listing.
    pub fn view_patient_records(
        env: Env,
        requester: Address,
        patient: Address,
    ) -> Result<Vec<RecordView>, Error> {
        let engine = Self::engine(&env)?;
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&patient_index_key(&patient))
            .unwrap_or(Vec::new(&env));

        let mut views = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(anchor) = env
                .storage()
                .persistent()
                .get::<_, RecordAnchor>(&record_key(id))
            {
                views.push_back(Self::shape_view(&env, &engine, &requester, anchor));
            }
        }
        Ok(views)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    fn engine(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&ENGINE)
            .ok_or(Error::NotInitialized)
    }

    fn shape_view(env: &Env, engine: &Address, requester: &Address, anchor: RecordAnchor) -> RecordView {
        let decision = ConsentAccessContractClient::new(env, engine).decide(
            &anchor.patient,
            requester,
            &anchor.assigned_doctor,
        );

        RecordView {
            record_id: anchor.id,
            patient: anchor.patient,
            granted: decision.granted,
            mode: decision.mode,
            data_hash: if decision.granted {
                Some(anchor.data_hash)
            } else {
                None
            },
            created_at: anchor.created_at,
        }
    }
}
