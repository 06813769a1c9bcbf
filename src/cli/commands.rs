use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::debug;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::{self, RuleFile};
use crate::rules::{evaluate, evaluate_with, Expression, Value};

use super::exit_codes;
use super::output::{self, EvalData, OutputMode, RuleOutcome, RuleSummary};

/// maximum edit distance for rule name suggestions
const NAME_SUGGESTION_THRESHOLD: usize = 2;

#[derive(Parser)]
#[command(name = "rulecheck")]
#[command(about = "Evaluate declarative comparison rules against JSON context data")]
#[command(version)]
pub struct Cli {
    /// Path to rule file (overrides RULECHECK_RULES env var and default location)
    #[arg(long, global = true)]
    pub rules: Option<String>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a single expression
    Eval {
        /// Expression file (JSON or JSON5), or "-" to read from stdin
        expression: String,

        /// Context document both operands are resolved against
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Context for the left operand (overrides --context)
        #[arg(long)]
        left_context: Option<PathBuf>,

        /// Context for the right operand (overrides --context)
        #[arg(long)]
        right_context: Option<PathBuf>,

        /// Exit with a non-zero status when the expression is false
        #[arg(long)]
        exit_status: bool,
    },

    /// Evaluate rules from the rule file
    Run {
        /// Context document the rules are evaluated against
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Only evaluate the named rule(s), in the given order
        #[arg(short, long = "name", action = ArgAction::Append)]
        names: Vec<String>,

        /// Exit with a non-zero status when any rule is false
        #[arg(long)]
        exit_status: bool,
    },

    /// Inspect and validate the rule file
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// List rule names with a readable rendering of each expression
    List,
    /// Show one rule as JSON
    Show {
        /// Rule name
        name: String,
    },
    /// Show rule file path
    Path,
    /// Verify the rule file for structural errors
    Verify,
    /// Show an example rule file covering every operand shape
    Default,
}

pub fn execute(cli: Cli) -> Result<()> {
    let rules_override = cli.rules.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Eval {
            expression,
            context,
            left_context,
            right_context,
            exit_status,
        } => {
            let text = read_input(&expression)
                .unwrap_or_else(|e| fail(output_mode, exit_codes::INVALID_ARGS, &e));
            let expr: Expression = config::parse_document(&text)
                .with_context(|| format!("Failed to parse expression: {}", expression))
                .unwrap_or_else(|e| fail(output_mode, exit_codes::INVALID_ARGS, &e));

            let shared = load_optional_context(context.as_deref(), output_mode);
            let left = match left_context {
                Some(path) => load_optional_context(Some(path.as_path()), output_mode),
                None => shared.clone(),
            };
            let right = match right_context {
                Some(path) => load_optional_context(Some(path.as_path()), output_mode),
                None => shared,
            };

            debug!(expression = %expr, "evaluating from command line");

            let verdict = evaluate_with(&expr, left.as_ref(), right.as_ref()).unwrap_or_else(
                |e| fail(output_mode, exit_codes::RULE_ERROR, &anyhow!(e)),
            );

            match output_mode {
                OutputMode::Json => output::print_json(&EvalData {
                    result: verdict,
                    expression: expr.to_string(),
                }),
                OutputMode::Text => println!("{}", verdict),
                OutputMode::Quiet => {}
            }

            if exit_status && !verdict {
                std::process::exit(exit_codes::RULE_FALSE);
            }
            Ok(())
        }

        Commands::Run {
            context,
            names,
            exit_status,
        } => {
            let file = load_rule_file(rules_override, output_mode);
            let selected = select_rules(&file, &names)
                .unwrap_or_else(|e| fail(output_mode, exit_codes::INVALID_ARGS, &e));
            let context = load_optional_context(context.as_deref(), output_mode);

            let outcomes = run_rules(&selected, context.as_ref(), file.settings.stop_on_error);

            match output_mode {
                OutputMode::Json => output::print_json(&outcomes),
                OutputMode::Text => {
                    for outcome in &outcomes {
                        println!("{}", outcome.to_line());
                    }
                }
                OutputMode::Quiet => {}
            }

            if outcomes.iter().any(|o| o.error.is_some()) {
                std::process::exit(exit_codes::RULE_ERROR);
            }
            if exit_status && outcomes.iter().any(|o| o.result == Some(false)) {
                std::process::exit(exit_codes::RULE_FALSE);
            }
            Ok(())
        }

        Commands::Rules { command } => match command {
            RulesCommands::List => {
                let file = load_rule_file(rules_override, output_mode);
                let summaries: Vec<RuleSummary> = file
                    .rules
                    .iter()
                    .map(|(name, expr)| RuleSummary {
                        name: name.clone(),
                        expression: expr.to_string(),
                    })
                    .collect();

                match output_mode {
                    OutputMode::Json => output::print_json(&summaries),
                    OutputMode::Text => {
                        if summaries.is_empty() {
                            println!("No rules defined");
                        }
                        let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
                        for summary in &summaries {
                            println!("{:width$}  {}", summary.name, summary.expression);
                        }
                    }
                    OutputMode::Quiet => {}
                }
                Ok(())
            }
            RulesCommands::Show { name } => {
                let file = load_rule_file(rules_override, output_mode);
                let selected = select_rules(&file, std::slice::from_ref(&name))
                    .unwrap_or_else(|e| fail(output_mode, exit_codes::INVALID_ARGS, &e));

                for (_, expr) in selected {
                    if output_mode.is_json() {
                        output::print_json(expr);
                    } else if !output_mode.is_quiet() {
                        let json = serde_json::to_string_pretty(expr)
                            .context("Failed to serialize rule")?;
                        println!("{}", json);
                    }
                }
                Ok(())
            }
            RulesCommands::Path => {
                let path = config::get_rules_path(rules_override)?;
                println!("{}", path.display());
                Ok(())
            }
            RulesCommands::Verify => {
                let path = config::get_rules_path(rules_override)?;
                let errors = config::verify(&path)
                    .unwrap_or_else(|e| fail(output_mode, exit_codes::CONFIG_ERROR, &e));

                if errors.is_empty() {
                    if output_mode.is_json() {
                        output::print_json(&serde_json::json!({
                            "valid": true,
                            "path": path.display().to_string(),
                        }));
                    } else if !output_mode.is_quiet() {
                        println!("✓ Rule file is valid: {}", path.display());
                    }
                    return Ok(());
                }

                let message = format!(
                    "rule file has {} error(s): {}",
                    errors.len(),
                    path.display()
                );
                if output_mode.is_json() {
                    output::print_json_error_with_problems(
                        exit_codes::CONFIG_ERROR,
                        &message,
                        errors,
                    );
                } else {
                    println!("✗ Rule file has {} error(s): {}", errors.len(), path.display());
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                }
                std::process::exit(exit_codes::CONFIG_ERROR);
            }
            RulesCommands::Default => {
                let file = config::default_with_examples();
                let json =
                    serde_json::to_string_pretty(&file).context("Failed to serialize rules")?;
                println!("{}", json);
                Ok(())
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rulecheck", &mut io::stdout());
            Ok(())
        }
    }
}

/// report an error in the current output mode
pub(crate) fn report_error(mode: OutputMode, code: i32, error: &anyhow::Error) {
    let message = format!("{:#}", error);
    if mode.is_json() {
        output::print_json_error(code, &message);
    } else {
        eprintln!("Error: {}", message);
    }
}

/// report an error and exit with `code`
fn fail(mode: OutputMode, code: i32, error: &anyhow::Error) -> ! {
    report_error(mode, code, error);
    std::process::exit(code)
}

/// read a file, or stdin for "-"
fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(source).with_context(|| format!("Failed to read file: {}", source))
}

fn load_optional_context(path: Option<&Path>, mode: OutputMode) -> Option<Value> {
    let path = path?;
    let loaded = if path == Path::new("-") {
        read_input("-").and_then(|text| config::parse_context(&text))
    } else {
        config::load_context(path)
    };
    Some(loaded.unwrap_or_else(|e| fail(mode, exit_codes::INVALID_ARGS, &e)))
}

fn load_rule_file(override_path: Option<&str>, mode: OutputMode) -> RuleFile {
    config::get_rules_path(override_path)
        .and_then(|path| config::load(&path))
        .unwrap_or_else(|e| fail(mode, exit_codes::CONFIG_ERROR, &e))
}

/// the named rules in the given order, or every rule when no name is given
fn select_rules<'a>(file: &'a RuleFile, names: &[String]) -> Result<Vec<(&'a str, &'a Expression)>> {
    if names.is_empty() {
        return Ok(file
            .rules
            .iter()
            .map(|(name, expr)| (name.as_str(), expr))
            .collect());
    }

    names
        .iter()
        .map(|name| match file.rules.get_key_value(name) {
            Some((key, expr)) => Ok((key.as_str(), expr)),
            None => Err(unknown_rule(file, name)),
        })
        .collect()
}

fn unknown_rule(file: &RuleFile, name: &str) -> anyhow::Error {
    let query = name.to_lowercase();
    let mut candidates: Vec<(&String, usize)> = file
        .rules
        .keys()
        .map(|key| (key, strsim::levenshtein(&query, &key.to_lowercase())))
        .filter(|(_, distance)| *distance <= NAME_SUGGESTION_THRESHOLD)
        .collect();
    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    match candidates.first() {
        Some((suggestion, _)) => {
            anyhow!("rule '{}' not found, did you mean '{}'?", name, suggestion)
        }
        None => anyhow!("rule '{}' not found", name),
    }
}

/// evaluate rules in order, stopping after the first failure if requested
fn run_rules(
    rules: &[(&str, &Expression)],
    context: Option<&Value>,
    stop_on_error: bool,
) -> Vec<RuleOutcome> {
    let mut outcomes = Vec::with_capacity(rules.len());

    for (name, expr) in rules {
        let outcome = match evaluate(expr, context) {
            Ok(verdict) => RuleOutcome {
                name: name.to_string(),
                result: Some(verdict),
                error: None,
            },
            Err(e) => RuleOutcome {
                name: name.to_string(),
                result: None,
                error: Some(e.to_string()),
            },
        };

        debug!(rule = name, result = ?outcome.result, "rule evaluated");

        let failed = outcome.error.is_some();
        outcomes.push(outcome);
        if failed && stop_on_error {
            debug!(rule = name, "stopping after failed rule");
            break;
        }
    }

    outcomes
}
