#![no_std]

pub mod events;

#[cfg(test)]
mod test;

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol,
};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

const MIN_NAME_LEN: u32 = 2;
const MAX_NAME_LEN: u32 = 64;

/// Roles the authorization engine cares about
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// Directory entry for one wallet address
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub registered_at: u64,
    pub is_active: bool,
}

/// Contract errors
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    UserNotFound = 4,
    InvalidName = 5,
}

fn user_key(user: &Address) -> (Symbol, Address) {
    (symbol_short!("USER"), user.clone())
}

fn validate_name(name: &String) -> Result<(), Error> {
    let len = name.len();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(Error::InvalidName);
    }

    let mut buf = [0u8; MAX_NAME_LEN as usize];
    name.copy_into_slice(&mut buf[..len as usize]);

    // Printable ASCII only (space ' ' to tilde '~')
    for &b in &buf[..len as usize] {
        if !(32..=126).contains(&b) {
            return Err(Error::InvalidName);
        }
    }

    Ok(())
}

#[contract]
pub struct IdentityContract;

#[contractimpl]
impl IdentityContract {
    /// Initialize the directory with an admin address.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);

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

    /// Register the caller's own directory entry. Re-registering updates
    /// role and name in place; the address stays the identity.
    pub fn register_user(env: Env, user: Address, role: Role, name: String) -> Result<(), Error> {
        user.require_auth();

        validate_name(&name)?;

        let entry = User {
            address: user.clone(),
            role: role.clone(),
            name: name.clone(),
            registered_at: env.ledger().timestamp(),
            is_active: true,
        };

        env.storage().persistent().set(&user_key(&user), &entry);

        events::publish_user_registered(&env, user, role, name);

        Ok(())
    }

    /// Get a directory entry
    pub fn get_user(env: Env, user: Address) -> Result<User, Error> {
        env.storage()
            .persistent()
            .get(&user_key(&user))
            .ok_or(Error::UserNotFound)
    }

    /// Role of an address, if it is registered and active.
    pub fn get_role(env: Env, user: Address) -> Option<Role> {
        env.storage()
            .persistent()
            .get::<_, User>(&user_key(&user))
            .filter(|entry| entry.is_active)
            .map(|entry| entry.role)
    }

    /// Activate or deactivate a directory entry. Admin only.
    pub fn set_active(env: Env, caller: Address, user: Address, active: bool) -> Result<(), Error> {
        caller.require_auth();

        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)?;
        if caller != admin {
            return Err(Error::Unauthorized);
        }

        let key = user_key(&user);
        let mut entry: User = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::UserNotFound)?;
        entry.is_active = active;
        env.storage().persistent().set(&key, &entry);

        events::publish_user_status_changed(&env, user, active);

        Ok(())
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}
