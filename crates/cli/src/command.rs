use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use filters::ObjectKind;

use crate::PROGRAM_NAME;

/// Output format of the `dump` subcommand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DumpFormat {
    Json,
    Conf,
}

/// Work requested by a parsed command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    Dump {
        format: DumpFormat,
    },
    Check {
        kind: ObjectKind,
        predefined_type: Option<String>,
        entities: Vec<String>,
    },
    Name {
        parent: Option<ObjectKind>,
        property_set: bool,
        names: Vec<String>,
    },
}

/// Fully parsed command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ParsedArgs {
    pub(crate) verbose: bool,
    pub(crate) configs: Vec<PathBuf>,
    pub(crate) action: Action,
}

/// Result of argument parsing that is not an error.
#[derive(Debug)]
pub(crate) enum Invocation {
    /// Help or version text to print before exiting successfully.
    Help(String),
    Run(ParsedArgs),
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("PATH")
        .help("Load filters from PATH; repeat to merge several sources in order.")
        .value_parser(value_parser!(PathBuf))
        .action(ArgAction::Append)
}

fn parse_kind(value: &str) -> Result<ObjectKind, filters::ParseObjectKindError> {
    value.parse()
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and evaluate COBie output filters")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log filter decisions at debug level.")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("dump")
                .about("Print the merged filter set")
                .arg(config_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format.")
                        .value_parser(["json", "conf"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether IFC entities are left out of the export")
                .arg(config_arg())
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .short('k')
                        .value_name("KIND")
                        .help("Sheet the entities are exported to.")
                        .value_parser(["asset", "type"])
                        .required(true),
                )
                .arg(
                    Arg::new("predefined-type")
                        .long("predefined-type")
                        .short('p')
                        .value_name("TYPE")
                        .help("PredefinedType of the entities (assets only)."),
                )
                .arg(
                    Arg::new("entities")
                        .value_name("ENTITY")
                        .required(true)
                        .num_args(1..),
                ),
        )
        .subcommand(
            Command::new("name")
                .about("Report whether attribute or property set names are filtered")
                .arg(config_arg())
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .value_name("KIND")
                        .help("Sheet owning the names (zone, type, space, floor, facility, spare, component).")
                        .value_parser(parse_kind),
                )
                .arg(
                    Arg::new("property-set")
                        .long("property-set")
                        .help("Treat the names as property set names.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("names")
                        .value_name("NAME")
                        .required(true)
                        .num_args(1..),
                ),
        )
}

/// Parses the command line into an [`Invocation`].
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = match clap_command().try_get_matches_from(arguments) {
        Ok(matches) => matches,
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(Invocation::Help(error.render().to_string()));
        }
        Err(error) => return Err(error),
    };

    let verbose = matches.get_flag("verbose");
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| clap_command().error(ErrorKind::MissingSubcommand, "a subcommand is required"))?;

    let action = match name {
        "dump" => Action::Dump {
            format: match string_value(sub, "format").as_deref() {
                Some("conf") => DumpFormat::Conf,
                _ => DumpFormat::Json,
            },
        },
        "check" => Action::Check {
            kind: match string_value(sub, "kind").as_deref() {
                Some("type") => ObjectKind::AssetType,
                _ => ObjectKind::Asset,
            },
            predefined_type: string_value(sub, "predefined-type"),
            entities: string_values(sub, "entities"),
        },
        "name" => Action::Name {
            parent: sub.get_one::<ObjectKind>("parent").copied(),
            property_set: sub.get_flag("property-set"),
            names: string_values(sub, "names"),
        },
        other => {
            return Err(clap_command().error(
                ErrorKind::InvalidSubcommand,
                format!("unrecognised subcommand '{other}'"),
            ));
        }
    };

    let configs = sub
        .get_many::<PathBuf>("config")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();

    Ok(Invocation::Run(ParsedArgs {
        verbose,
        configs,
        action,
    }))
}

fn string_value(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn string_values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
