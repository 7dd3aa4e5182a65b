#![cfg(test)]

use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::{symbol_short, Address, Env, IntoVal, String, TryIntoVal};

use crate::*;

fn setup(env: &Env) -> (IdentityContractClient<'_>, Address) {
    let contract_id = env.register(IdentityContract, ());
    let client = IdentityContractClient::new(env, &contract_id);

    let admin = Address::generate(env);
    client.initialize(&admin);

    (client, admin)
}

#[test]
fn test_initialize() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, admin) = setup(&env);

    assert_eq!(client.get_admin(), admin);
    assert!(client.try_initialize(&admin).is_err());
}

#[test]
fn test_register_and_get_user() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = setup(&env);

    let user = Address::generate(&env);
    let name = String::from_str(&env, "Dr. Adaeze Obi");

    client.register_user(&user, &Role::Doctor, &name);

    let entry = client.get_user(&user);
    assert_eq!(entry.role, Role::Doctor);
    assert_eq!(entry.name, name);
    assert!(entry.is_active);

    assert_eq!(client.get_role(&user), Some(Role::Doctor));
}

#[test]
fn test_unknown_user() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = setup(&env);

    let stranger = Address::generate(&env);
    assert!(client.try_get_user(&stranger).is_err());
    assert_eq!(client.get_role(&stranger), None);
}

#[test]
fn test_name_validation() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = setup(&env);

    let user = Address::generate(&env);
    let too_short = String::from_str(&env, "A");
    assert!(client
        .try_register_user(&user, &Role::Patient, &too_short)
        .is_err());

    let long_name = "A".repeat(65);
    assert!(client
        .try_register_user(&user, &Role::Patient, &String::from_str(&env, &long_name))
        .is_err());
}

#[test]
fn test_set_active() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, admin) = setup(&env);

    let user = Address::generate(&env);
    let random = Address::generate(&env);
    client.register_user(&user, &Role::Patient, &String::from_str(&env, "Ben Carter"));

    // Only the admin may flip activation
    assert!(client.try_set_active(&random, &user, &false).is_err());

    client.set_active(&admin, &user, &false);
    assert_eq!(client.get_role(&user), None);
    assert!(!client.get_user(&user).is_active);

    client.set_active(&admin, &user, &true);
    assert_eq!(client.get_role(&user), Some(Role::Patient));
}

#[test]
fn test_register_user_publishes_event() {
    let env = Env::default();
    env.mock_all_auths();

    let (client, _) = setup(&env);

    let user = Address::generate(&env);
    let name = String::from_str(&env, "Dr. Adaeze Obi");

    client.register_user(&user, &Role::Doctor, &name);
    let events = env.events().all();

    assert!(!events.is_empty());
    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(
        event.1,
        (symbol_short!("USR_REG"), user.clone()).into_val(&env)
    );
    let payload: events::UserRegisteredEvent = event.2.try_into_val(&env).unwrap();
    assert_eq!(payload.user, user);
    assert_eq!(payload.role, Role::Doctor);
    assert_eq!(payload.name, name);
}
