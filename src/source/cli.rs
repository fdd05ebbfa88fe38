//! CLI-argument source
//!
//! Builds a `clap` command whose long flags are derived from the schema set
//! (`--<cli-arg> <VALUE>`; booleans get a `--<name>`/`--no-<name>` pair) and
//! parses a fixed argument vector at most once, no matter how many keys are
//! looked up. A parse failure or `--help` terminates the process (exit code 1
//! and 0 respectively); this is the one direct process exit in the pipeline.

use crate::coerce::coerce;
use crate::error::Result;
use crate::key::Key;
use crate::schema::{SchemaSet, ValueType};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use once_cell::sync::OnceCell;
use serde_json::Value;

/// Adapted CLI-argument source with a memoized parse
pub struct ArgsSource {
    argv: Vec<String>,
    command: Command,
    matches: OnceCell<ArgMatches>,
}

impl ArgsSource {
    /// Build the source; the argument vector is parsed lazily on first lookup
    pub(crate) fn new(argv: Vec<String>, schemas: &SchemaSet) -> Self {
        Self {
            argv,
            command: build_command(schemas),
            matches: OnceCell::new(),
        }
    }

    /// Look up a key in the parsed arguments, coercing raw values with the
    /// key's schema
    pub(crate) fn lookup(&self, schemas: &SchemaSet, key: &Key) -> Result<Option<Value>> {
        let matches = self.matches.get_or_init(|| self.parse());
        let flag = key.to_cli_arg();

        // Flags only exist for schema'd keys; booleans are a flag pair.
        if let Some(schema) = schemas.get(key) {
            if schema.value_type == ValueType::Bool {
                return Ok(bool_flag_value(matches, &flag));
            }
        }
        if !matches.try_contains_id(&flag).unwrap_or(false) {
            return Ok(None);
        }

        match matches.get_one::<String>(&flag) {
            Some(raw) => coerce(schemas.get(key), key, raw).map(Some),
            None => Ok(None),
        }
    }

    /// Parse the argument vector; prints and exits on error or help.
    ///
    /// The vector is immutable for the process lifetime, so a single parse
    /// serves every subsequent lookup.
    fn parse(&self) -> ArgMatches {
        debug!("parsing {} CLI arguments", self.argv.len());
        // clap expects argv[0] to be the program name
        let argv = std::iter::once("conflux".to_string()).chain(self.argv.iter().cloned());
        match self.command.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) => {
                let code = match err.kind() {
                    clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayVersion => 0,
                    _ => 1,
                };
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }
}

/// Generate the clap command from the schema set
fn build_command(schemas: &SchemaSet) -> Command {
    let mut command = Command::new("conflux").disable_version_flag(true);

    let mut entries: Vec<_> = schemas.iter().collect();
    entries.sort_by_key(|schema| schema.key.to_string());

    for schema in entries {
        let flag = schema.key.to_cli_arg();
        if schema.value_type == ValueType::Bool {
            let negated = format!("no-{flag}");
            command = command
                .arg(
                    flag_arg(&flag, schema.doc.as_deref())
                        .action(ArgAction::SetTrue)
                        .overrides_with(negated.clone()),
                )
                .arg(
                    flag_arg(&negated, None)
                        .action(ArgAction::SetTrue)
                        .overrides_with(flag),
                );
        } else {
            command = command.arg(
                flag_arg(&flag, schema.doc.as_deref())
                    .action(ArgAction::Set)
                    .value_name("VALUE"),
            );
        }
    }
    command
}

fn flag_arg(flag: &str, doc: Option<&str>) -> Arg {
    let arg = Arg::new(flag.to_string()).long(flag.to_string());
    match doc {
        Some(doc) => arg.help(doc.to_string()),
        None => arg,
    }
}

/// Resolve a boolean flag pair: `--flag` wins true, `--no-flag` wins false,
/// neither present means absent
fn bool_flag_value(matches: &ArgMatches, flag: &str) -> Option<Value> {
    let negated = format!("no-{flag}");
    if matches.get_flag(flag) {
        Some(Value::Bool(true))
    } else if matches.get_flag(&negated) {
        Some(Value::Bool(false))
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
