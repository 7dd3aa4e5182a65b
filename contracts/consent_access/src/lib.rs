#![no_std]

pub mod emergency;
pub mod events;
pub mod validation;


use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol, Vec,
};

use emergency::{EmergencyStatus, EmergencyTicket};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
/// Policy flag: when set, an assigned doctor also needs an enabled consent grant.
const REQUIRE_CONSENT: Symbol = symbol_short!("REQ_CONS");

/// A patient's standing, revocable authorization for one doctor.
///
/// There is at most one grant per (patient, doctor) pair. Revocation flips
/// `enabled` back to `false`; grants are never deleted, so "never decided"
/// (no grant stored) stays distinguishable from "explicitly revoked".
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentGrant {
    pub patient: Address,
    pub doctor: Address,
    pub enabled: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Why a disclosure was (or was not) permitted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessMode {
    Assigned,
    Emergency,
    Denied,
}

/// The computed verdict for one (patient, requester) pair at one point in time.
///
/// Never persisted — recomputed on every check so revocations and ticket
/// expiries take effect immediately.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisclosureDecision {
    pub granted: bool,
    pub mode: AccessMode,
}

/// Contract errors
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    TicketNotFound = 4,
    InvalidReason = 5,
    InvalidDuration = 6,
}

fn grant_key(patient: &Address, doctor: &Address) -> (Symbol, Address, Address) {
    (symbol_short!("CONSENT"), patient.clone(), doctor.clone())
}

fn grant_index_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("CONS_IDX"), patient.clone())
}

#[contract]
pub struct ConsentAccessContract;

#[contractimpl]
impl ConsentAccessContract {
    /// Initialize the contract with an admin address.
    ///
    /// The `require_consent_even_if_assigned` policy starts out disabled:
    /// assignment alone grants access, matching the legacy behavior.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REQUIRE_CONSENT, &false);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Toggle whether an assigned doctor additionally needs an enabled
    /// consent grant before the assignment channel matches. Admin only.
    pub fn set_require_consent(env: Env, caller: Address, flag: bool) -> Result<(), Error> {
        caller.require_auth();

        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)?;
        if caller != admin {
            return Err(Error::Unauthorized);
        }

        env.storage().instance().set(&REQUIRE_CONSENT, &flag);

        events::publish_policy_changed(&env, caller, flag);

        Ok(())
    }

    /// Current state of the assignment-needs-consent policy flag.
    pub fn require_consent(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&REQUIRE_CONSENT)
            .unwrap_or(false)
    }

    // ── Consent ledger ──────────────────────────────────────────

    /// Record a patient's consent decision for one doctor.
    ///
    /// Creates the grant if the pair is unseen, otherwise updates `enabled`
    /// in place. Calling twice with the same value is a no-op: nothing is
    /// written and no event is published.
    pub fn upsert_grant(
        env: Env,
        patient: Address,
        doctor: Address,
        enabled: bool,
    ) -> Result<ConsentGrant, Error> {
        patient.require_auth();

        let now = env.ledger().timestamp();
        let key = grant_key(&patient, &doctor);

        let grant = match env.storage().persistent().get::<_, ConsentGrant>(&key) {
            Some(existing) if existing.enabled == enabled => return Ok(existing),
            Some(mut existing) => {
                existing.enabled = enabled;
                existing.updated_at = now;
                existing
            }
            None => {
                // First decision for this doctor: remember it in the
                // patient's listing index, in first-seen order.
                let index_key = grant_index_key(&patient);
                let mut doctors: Vec<Address> = env
                    .storage()
                    .persistent()
                    .get(&index_key)
                    .unwrap_or(Vec::new(&env));
                doctors.push_back(doctor.clone());
                env.storage().persistent().set(&index_key, &doctors);

                ConsentGrant {
                    patient: patient.clone(),
                    doctor: doctor.clone(),
                    enabled,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        env.storage().persistent().set(&key, &grant);

        events::publish_consent_updated(&env, patient, doctor, enabled, now);

        Ok(grant)
    }

    /// Look up the stored grant for a (patient, doctor) pair, if any.
    pub fn get_grant(env: Env, patient: Address, doctor: Address) -> Option<ConsentGrant> {
        env.storage().persistent().get(&grant_key(&patient, &doctor))
    }

    /// All grants a patient has ever decided on, in first-decision order.
    pub fn list_grants_for_patient(env: Env, patient: Address) -> Vec<ConsentGrant> {
        let doctors: Vec<Address> = env
            .storage()
            .persistent()
            .get(&grant_index_key(&patient))
            .unwrap_or(Vec::new(&env));

        let mut grants = Vec::new(&env);
        for doctor in doctors.iter() {
            if let Some(grant) = env
                .storage()
                .persistent()
                .get::<_, ConsentGrant>(&grant_key(&patient, &doctor))
            {
                grants.push_back(grant);
            }
        }
        grants
    }

    /// True if the patient currently has an enabled grant for the doctor.
    pub fn has_consent(env: Env, patient: Address, doctor: Address) -> bool {
        env.storage()
            .persistent()
            .get::<_, ConsentGrant>(&grant_key(&patient, &doctor))
            .map(|grant| grant.enabled)
            .unwrap_or(false)
    }

    // ── Emergency access ledger ─────────────────────────────────

    /// Open a break-glass ticket for a patient's records.
    ///
    /// Always inserts a new ticket, even for a pair that already has one:
    /// every break-glass event keeps its own reason in the audit trail.
    /// The ticket expires `duration_minutes` after creation.
    pub fn request_emergency_access(
        env: Env,
        doctor: Address,
        patient: Address,
        reason: String,
        duration_minutes: u64,
    ) -> Result<u64, Error> {
        doctor.require_auth();

        validation::validate_reason(&reason)?;
        validation::validate_duration_minutes(duration_minutes)?;

        let created_at = env.ledger().timestamp();
        let ticket = EmergencyTicket {
            id: emergency::next_ticket_id(&env),
            patient: patient.clone(),
            doctor: doctor.clone(),
            reason,
            duration_minutes,
            created_at,
            expires_at: created_at + duration_minutes * 60,
            status: EmergencyStatus::Active,
            closed_at: None,
        };

        emergency::store_new_ticket(&env, &ticket);

        events::publish_ticket_opened(&env, ticket.id, patient, doctor, ticket.expires_at);

        Ok(ticket.id)
    }

    /// Fetch one ticket by id. The reported status is the effective one:
    /// a ticket past its expiry reads `Expired` even though the stored row
    /// still says `Active`.
    pub fn get_ticket(env: Env, ticket_id: u64) -> Result<EmergencyTicket, Error> {
        let mut ticket = emergency::load_ticket(&env, ticket_id).ok_or(Error::TicketNotFound)?;
        ticket.status = emergency::effective_status(&ticket, env.ledger().timestamp());
        Ok(ticket)
    }

    /// Tickets that currently authorize access to a patient's records,
    /// optionally narrowed to one doctor, most recent first.
    pub fn list_active_tickets(
        env: Env,
        patient: Address,
        doctor: Option<Address>,
    ) -> Vec<EmergencyTicket> {
        let now = env.ledger().timestamp();
        let ids = emergency::patient_ticket_ids(&env, &patient);

        let mut active = Vec::new(&env);
        for id in ids.iter().rev() {
            if let Some(ticket) = emergency::load_ticket(&env, id) {
                if !emergency::is_ticket_active(&ticket, now) {
                    continue;
                }
                if let Some(ref wanted) = doctor {
                    if ticket.doctor != *wanted {
                        continue;
                    }
                }
                active.push_back(ticket);
            }
        }
        active
    }

    /// Terminate a ticket early. Only the ticket's patient or the admin may
    /// close it. Closing an already-closed or already-expired ticket is
    /// idempotent: the current state comes back unchanged.
    pub fn close_ticket(env: Env, caller: Address, ticket_id: u64) -> Result<EmergencyTicket, Error> {
        caller.require_auth();

        let mut ticket = emergency::load_ticket(&env, ticket_id).ok_or(Error::TicketNotFound)?;

        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)?;
        if caller != ticket.patient && caller != admin {
            return Err(Error::Unauthorized);
        }

        let now = env.ledger().timestamp();
        match emergency::effective_status(&ticket, now) {
            EmergencyStatus::Closed => Ok(ticket),
            EmergencyStatus::Expired => {
                ticket.status = EmergencyStatus::Expired;
                Ok(ticket)
            }
            EmergencyStatus::Active => {
                ticket.status = EmergencyStatus::Closed;
                ticket.closed_at = Some(now);
                emergency::update_ticket(&env, &ticket);
                events::publish_ticket_closed(&env, ticket.id, ticket.patient.clone(), caller, now);
                Ok(ticket)
            }
        }
    }

    // ── Authorization engine ────────────────────────────────────

    /// Decide whether `requester` may see `patient`'s records right now.
    ///
    /// Read-only and infallible: "no access" is the `Denied` result, never
    /// an error, so call sites on the read path stay safe by default.
    ///
    /// Precedence is fixed: assignment wins over everything, emergency
    /// access is strictly a fallback. An assigned doctor who also holds an
    /// active ticket is reported as `Assigned`.
    pub fn decide(
        env: Env,
        patient: Address,
        requester: Address,
        assigned_doctor: Option<Address>,
    ) -> DisclosureDecision {
        if let Some(assigned) = assigned_doctor {
            if assigned == requester {
                let needs_consent: bool = env
                    .storage()
                    .instance()
                    .get(&REQUIRE_CONSENT)
                    .unwrap_or(false);
                if !needs_consent
                    || Self::has_consent(env.clone(), patient.clone(), requester.clone())
                {
                    return DisclosureDecision {
                        granted: true,
                        mode: AccessMode::Assigned,
                    };
                }
                // Policy demands consent and there is none: the assignment
                // channel fails and evaluation falls through to emergency.
            }
        }

        if emergency::has_active_ticket(&env, &patient, &requester) {
            return DisclosureDecision {
                granted: true,
                mode: AccessMode::Emergency,
            };
        }

        DisclosureDecision {
            granted: false,
            mode: AccessMode::Denied,
        }
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}
