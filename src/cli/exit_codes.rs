//! exit codes for rulecheck commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts tell a false rule apart from a broken one

/// command completed successfully (or every rule held)
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// a rule evaluated to false (only with --exit-status)
pub const RULE_FALSE: i32 = 2;

/// a rule could not be evaluated
pub const RULE_ERROR: i32 = 3;

/// invalid command-line arguments or unreadable input
pub const INVALID_ARGS: i32 = 4;

/// rule file missing, malformed, or failing verification
pub const CONFIG_ERROR: i32 = 5;
