use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Event payloads. Topics carry the addresses involved so indexers can
/// filter per patient/doctor without decoding payloads.

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyChangedEvent {
    pub admin: Address,
    pub require_consent: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentUpdatedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub enabled: bool,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketOpenedEvent {
    pub ticket_id: u64,
    pub patient: Address,
    pub doctor: Address,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketClosedEvent {
    pub ticket_id: u64,
    pub patient: Address,
    pub closed_by: Address,
    pub closed_at: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("INIT"),), InitializedEvent { admin });
}

pub fn publish_policy_changed(env: &Env, admin: Address, require_consent: bool) {
    env.events().publish(
        (symbol_short!("POLICY"),),
        PolicyChangedEvent {
            admin,
            require_consent,
        },
    );
}

pub fn publish_consent_updated(
    env: &Env,
    patient: Address,
    doctor: Address,
    enabled: bool,
    updated_at: u64,
) {
    env.events().publish(
        (symbol_short!("CONS_UPD"), patient.clone(), doctor.clone()),
        ConsentUpdatedEvent {
            patient,
            doctor,
            enabled,
            updated_at,
        },
    );
}

pub fn publish_ticket_opened(
    env: &Env,
    ticket_id: u64,
    patient: Address,
    doctor: Address,
    expires_at: u64,
) {
    env.events().publish(
        (symbol_short!("TKT_OPEN"), patient.clone(), doctor.clone()),
        TicketOpenedEvent {
            ticket_id,
            patient,
            doctor,
            expires_at,
        },
    );
}

pub fn publish_ticket_closed(
    env: &Env,
    ticket_id: u64,
    patient: Address,
    closed_by: Address,
    closed_at: u64,
) {
    env.events().publish(
        (symbol_short!("TKT_CLOSE"), patient.clone()),
        TicketClosedEvent {
            ticket_id,
            patient,
            closed_by,
            closed_at,
        },
    );
}
