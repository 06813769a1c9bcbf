// library crate for rulecheck
// exposes the rule engine and the modules needed by auxiliary binaries (e.g., generate-man)

pub mod cli;
pub mod config;
pub mod rules;

pub use rules::{evaluate, evaluate_with, Expression, Operand, RuleError, Value};
