use soroban_sdk::String;

use crate::Error;

/// A justification must carry at least this many non-whitespace characters.
const MIN_REASON_CHARS: u32 = 6;
const MAX_REASON_LEN: u32 = 256;

/// Ticket duration policy, in minutes. The upper bound mirrors the longest
/// window the emergency UI offers; the default is applied by callers, not
/// by the ledger.
pub const DEFAULT_DURATION_MINUTES: u64 = 30;
const MIN_DURATION_MINUTES: u64 = 1;
const MAX_DURATION_MINUTES: u64 = 120;

/// Validate a break-glass justification.
/// Reasons must be printable ASCII and contain at least MIN_REASON_CHARS
/// characters that are not whitespace — "      " is not a justification.
pub fn validate_reason(reason: &String) -> Result<(), Error> {
    let len = reason.len();
    if len == 0 || len > MAX_REASON_LEN {
        return Err(Error::InvalidReason);
    }

    let mut buf = [0u8; MAX_REASON_LEN as usize];
    reason.copy_into_slice(&mut buf[..len as usize]);

    let mut meaningful: u32 = 0;
    for &b in &buf[..len as usize] {
        // Printable ASCII only (space ' ' to tilde '~')
        if !(32..=126).contains(&b) {
            return Err(Error::InvalidReason);
        }
        if b != b' ' {
            meaningful += 1;
        }
    }

    if meaningful < MIN_REASON_CHARS {
        return Err(Error::InvalidReason);
    }

    Ok(())
}

/// Validate a requested ticket lifetime.
/// Zero is never a valid window; anything beyond MAX_DURATION_MINUTES is
/// rejected rather than clamped so the caller learns about the policy.
pub fn validate_duration_minutes(duration_minutes: u64) -> Result<(), Error> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        return Err(Error::InvalidDuration);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;
    use soroban_sdk::Env;

    #[test]
    fn test_validate_reason() {
        let env = Env::default();

        // Valid
        assert_eq!(
            validate_reason(&String::from_str(&env, "Unresponsive patient")),
            Ok(())
        );
        assert_eq!(
            validate_reason(&String::from_str(&env, "Chest pain")),
            Ok(())
        );

        // Empty
        assert_eq!(
            validate_reason(&String::from_str(&env, "")),
            Err(Error::InvalidReason)
        );

        // Five characters is one short
        assert_eq!(
            validate_reason(&String::from_str(&env, "hi")),
            Err(Error::InvalidReason)
        );
        assert_eq!(
            validate_reason(&String::from_str(&env, "pains")),
            Err(Error::InvalidReason)
        );

        // Whitespace padding does not count toward the minimum
        assert_eq!(
            validate_reason(&String::from_str(&env, "  a b c   ")),
            Err(Error::InvalidReason)
        );

        // Non-printable characters
        assert_eq!(
            validate_reason(&String::from_str(&env, "chest\npain")),
            Err(Error::InvalidReason)
        );

        // Too long
        let long_reason = "a".repeat(257);
        assert_eq!(
            validate_reason(&String::from_str(&env, &long_reason)),
            Err(Error::InvalidReason)
        );
    }

    #[test]
    fn test_validate_duration_minutes() {
        // Valid
        assert_eq!(validate_duration_minutes(1), Ok(()));
        assert_eq!(validate_duration_minutes(DEFAULT_DURATION_MINUTES), Ok(()));
        assert_eq!(validate_duration_minutes(120), Ok(()));

        // Out of bounds
        assert_eq!(validate_duration_minutes(0), Err(Error::InvalidDuration));
        assert_eq!(validate_duration_minutes(121), Err(Error::InvalidDuration));
        assert_eq!(
            validate_duration_minutes(u64::MAX),
            Err(Error::InvalidDuration)
        );
    }

    proptest! {
        #[test]
        fn reason_with_too_few_meaningful_chars_is_rejected(
            body in "[ -~]{0,5}",
            padding in "[ ]{0,20}",
        ) {
            let env = Env::default();
            let mut text = std::string::String::new();
            text.push_str(&padding);
            text.push_str(&body);
            text.push_str(&padding);

            let meaningful = text.chars().filter(|c| *c != ' ').count();
            prop_assume!(meaningful < 6);

            prop_assert_eq!(
                validate_reason(&String::from_str(&env, &text)),
                Err(Error::InvalidReason)
            );
        }

        #[test]
        fn printable_reason_with_enough_chars_is_accepted(body in "[!-~]{6,64}") {
            let env = Env::default();
            prop_assert_eq!(validate_reason(&String::from_str(&env, &body)), Ok(()));
        }

        #[test]
        fn duration_in_policy_window_is_accepted(minutes in 1u64..=120) {
            prop_assert_eq!(validate_duration_minutes(minutes), Ok(()));
        }

        #[test]
        fn duration_beyond_policy_window_is_rejected(minutes in 121u64..10_000) {
            prop_assert_eq!(
                validate_duration_minutes(minutes),
                Err(Error::InvalidDuration)
            );
        }
    }
}
