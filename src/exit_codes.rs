//! Exit code constants for the plume CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, config, storage)
//! - 2: Validation failure (required input missing)
//! - 3: Generation failure (the request to the endpoint failed)
//! - 4: Lock acquisition failure (a generation is already in flight)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable config, or invalid state.
pub const USER_ERROR: i32 = 1;

/// Validation failure: a required input field is missing or empty.
pub const VALIDATION_FAILURE: i32 = 2;

/// Generation failure: the text-generation request could not be completed.
pub const GENERATION_FAILURE: i32 = 3;

/// Lock acquisition failure: another generation is already in flight.
pub const LOCK_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            VALIDATION_FAILURE,
            GENERATION_FAILURE,
            LOCK_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(VALIDATION_FAILURE, 2);
        assert_eq!(GENERATION_FAILURE, 3);
        assert_eq!(LOCK_FAILURE, 4);
    }
}
