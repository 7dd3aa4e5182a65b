use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub engine: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAnchoredEvent {
    pub record_id: u64,
    pub patient: Address,
    pub assigned_doctor: Option<Address>,
    pub data_hash: String,
}

pub fn publish_initialized(env: &Env, admin: Address, engine: Address) {
    env.events()
        .publish((symbol_short!("INIT"),), InitializedEvent { admin, engine });
}

pub fn publish_record_anchored(
    env: &Env,
    record_id: u64,
    patient: Address,
    assigned_doctor: Option<Address>,
    data_hash: String,
) {
    env.events().publish(
        (symbol_short!("REC_ANCH"), patient.clone()),
        RecordAnchoredEvent {
            record_id,
            patient,
            assigned_doctor,
            data_hash,
        },
    );
}
