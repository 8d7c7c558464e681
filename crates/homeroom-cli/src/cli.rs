//! Command-line definition

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::logging::LogFormat;

/// Full `homeroom` command tree
#[must_use]
pub fn command() -> Command {
    Command::new("homeroom")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate student comments from trait keywords and export them to a spreadsheet")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log line format on stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (repeat for trace)"),
        )
        .subcommand(
            Command::new("taxonomy")
                .about("List trait categories and their keywords")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            session_args(Command::new("generate").about("Generate a comment per selected student and write the report"))
                .arg(config_arg())
                .arg(
                    Arg::new("secrets")
                        .long("secrets")
                        .value_parser(value_parser!(PathBuf))
                        .help("Secrets file holding GEMINI_API_KEY"),
                )
                .arg(
                    Arg::new("no-prompt")
                        .long("no-prompt")
                        .action(ArgAction::SetTrue)
                        .help("Never ask for the API key on the terminal"),
                ),
        )
        .subcommand(
            session_args(Command::new("export").about("Write the report without generating comments"))
                .arg(config_arg()),
        )
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file (default: homeroom.toml)")
}

fn session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("students")
                .long("students")
                .value_parser(value_parser!(usize))
                .help("Number of students in the class"),
        )
        .arg(
            Arg::new("select")
                .long("select")
                .action(ArgAction::Append)
                .value_name("LABEL=KW1,KW2")
                .help("Keywords for one student, e.g. \"Student 1=courage,wit\""),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .value_parser(value_parser!(PathBuf))
                .help("Selection file (.yaml, .yml or .json)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help("Report path (default from config)"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = command()
            .try_get_matches_from(["homeroom", "taxonomy", "--log-format", "json", "-vv"])
            .unwrap();
        assert_eq!(matches.get_one::<LogFormat>("log-format"), Some(&LogFormat::Json));
        assert_eq!(matches.get_count("verbose"), 2);
    }

    #[test]
    fn select_is_repeatable() {
        let matches = command()
            .try_get_matches_from([
                "homeroom",
                "export",
                "--select",
                "1=wit",
                "--select",
                "Student 2=courage",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let selects: Vec<&String> = args.get_many::<String>("select").unwrap().collect();
        assert_eq!(selects, ["1=wit", "Student 2=courage"]);
    }

    #[test]
    fn subcommand_required() {
        assert!(command().try_get_matches_from(["homeroom"]).is_err());
    }
}
