use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::Role;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub user: Address,
    pub role: Role,
    pub name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserStatusChangedEvent {
    pub user: Address,
    pub is_active: bool,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("INIT"),), InitializedEvent { admin });
}

pub fn publish_user_registered(env: &Env, user: Address, role: Role, name: String) {
    env.events().publish(
        (symbol_short!("USR_REG"), user.clone()),
        UserRegisteredEvent { user, role, name },
    );
}

pub fn publish_user_status_changed(env: &Env, user: Address, is_active: bool) {
    env.events().publish(
        (symbol_short!("USR_STAT"), user.clone()),
        UserStatusChangedEvent { user, is_active },
    );
}
