use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

// ── Storage keys ──────────────────────────────────────────────
pub const TICKET_CTR: Symbol = symbol_short!("TKT_CTR");
const TICKET: Symbol = symbol_short!("TICKET");
const TICKET_PATIENT: Symbol = symbol_short!("TKT_PAT");

// ── Types ─────────────────────────────────────────────────────

/// Lifecycle of a break-glass ticket.
///
/// `Expired` is derived from the clock at read time and never written by
/// the request path; the only stored transition is `Active → Closed`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EmergencyStatus {
    Active,
    Closed,
    Expired,
}

/// A doctor-initiated, time-bounded override — always leaves an audit row.
///
/// Immutable once created except for `status`. Invariants:
/// `expires_at > created_at` and `duration_minutes > 0`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyTicket {
    pub id: u64,
    pub patient: Address,
    pub doctor: Address,
    /// Free-text justification, mandatory and human-auditable.
    pub reason: String,
    pub duration_minutes: u64,
    pub created_at: u64,
    pub expires_at: u64,
    pub status: EmergencyStatus,
    /// Set exactly once, on the `Active → Closed` transition.
    pub closed_at: Option<u64>,
}

// ── Storage helpers ───────────────────────────────────────────

fn ticket_key(id: u64) -> (Symbol, u64) {
    (TICKET, id)
}

fn patient_index_key(patient: &Address) -> (Symbol, Address) {
    (TICKET_PATIENT, patient.clone())
}

/// Increments and returns the next ticket id.
pub fn next_ticket_id(env: &Env) -> u64 {
    let next: u64 = env.storage().instance().get(&TICKET_CTR).unwrap_or(0) + 1;
    env.storage().instance().set(&TICKET_CTR, &next);
    next
}

/// Persist a freshly created ticket and index it under its patient.
pub fn store_new_ticket(env: &Env, ticket: &EmergencyTicket) {
    env.storage().persistent().set(&ticket_key(ticket.id), ticket);

    let index_key = patient_index_key(&ticket.patient);
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&index_key)
        .unwrap_or(Vec::new(env));
    ids.push_back(ticket.id);
    env.storage().persistent().set(&index_key, &ids);
}

/// Rewrite an existing ticket (status transition only — everything else on
/// the row is immutable after creation).
pub fn update_ticket(env: &Env, ticket: &EmergencyTicket) {
    env.storage().persistent().set(&ticket_key(ticket.id), ticket);
}

/// Load a ticket as stored, without deriving expiry.
pub fn load_ticket(env: &Env, id: u64) -> Option<EmergencyTicket> {
    env.storage().persistent().get(&ticket_key(id))
}

/// Ids of every ticket ever opened for a patient, oldest first.
pub fn patient_ticket_ids(env: &Env, patient: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&patient_index_key(patient))
        .unwrap_or(Vec::new(env))
}

/// The one shared activity predicate: a ticket authorizes access iff it has
/// not been closed and its expiry is still in the future. Every read path
/// goes through here so lazy expiry cannot drift between call sites.
pub fn is_ticket_active(ticket: &EmergencyTicket, now: u64) -> bool {
    ticket.status == EmergencyStatus::Active && ticket.expires_at > now
}

/// Status as it should be reported at `now`: a stored `Active` past its
/// expiry reads as `Expired`.
pub fn effective_status(ticket: &EmergencyTicket, now: u64) -> EmergencyStatus {
    match ticket.status {
        EmergencyStatus::Closed => EmergencyStatus::Closed,
        _ if ticket.expires_at <= now => EmergencyStatus::Expired,
        _ => EmergencyStatus::Active,
    }
}

/// True if any ticket currently authorizes `doctor` for `patient`.
pub fn has_active_ticket(env: &Env, patient: &Address, doctor: &Address) -> bool {
    let now = env.ledger().timestamp();
    for id in patient_ticket_ids(env, patient).iter().rev() {
        if let Some(ticket) = load_ticket(env, id) {
            if ticket.doctor == *doctor && is_ticket_active(&ticket, now) {
                return true;
            }
        }
    }
    false
}
