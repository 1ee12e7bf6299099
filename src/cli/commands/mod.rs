pub mod logging;

use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_DIR: &str = "session-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";
pub const ARG_PLATFORM: &str = "platform";
pub const ARG_OUTPUT: &str = "output";

// Keep in sync with `config::DEFAULT_TIMEOUT_SECONDS`.
const DEFAULT_TIMEOUT: &str = "10";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email (prompted when missing)")
        .env("XUPER_EMAIL")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password (prompted when missing)")
        .env("XUPER_PASSWORD")
        .hide_env_values(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("xuper")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .short('u')
                .long("api-url")
                .help("Xuper API base URL, example: https://api.xuper.app")
                .env("XUPER_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_DIR)
                .long("session-dir")
                .help("Directory holding the stored session (default: $HOME/.xuper)")
                .env("XUPER_SESSION_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value(DEFAULT_TIMEOUT)
                .env("XUPER_TIMEOUT_SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account: a verification code is emailed, then prompted for")
                .arg(
                    Arg::new(ARG_NAME)
                        .short('n')
                        .long("name")
                        .help("Full name (prompted when missing)"),
                )
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("status").about("Show who is signed in and what is unlocked"))
        .subcommand(
            Command::new("downloads")
                .about("List download links, or fetch one package")
                .arg(
                    Arg::new(ARG_PLATFORM)
                        .short('p')
                        .long("platform")
                        .help("Package to fetch: mobile or tv")
                        .value_parser(["mobile", "tv"]),
                )
                .arg(
                    Arg::new(ARG_OUTPUT)
                        .short('o')
                        .long("output")
                        .help("Destination file (default: the package file name)")
                        .requires(ARG_PLATFORM)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(Command::new("users").about("List users (admin only)"));

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "xuper");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars(
            [
                ("XUPER_API_URL", None::<&str>),
                ("XUPER_TIMEOUT_SECONDS", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "xuper",
                    "status",
                    "--api-url",
                    "https://api.xuper.app",
                    "--timeout",
                    "3",
                ]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).cloned(),
                    Some("https://api.xuper.app".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(3));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("XUPER_API_URL", Some("https://api.xuper.app")),
                ("XUPER_SESSION_DIR", Some("/tmp/xuper-session")),
                ("XUPER_TIMEOUT_SECONDS", Some("30")),
                ("XUPER_EMAIL", Some("ana@xuper.app")),
                ("XUPER_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["xuper", "login"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_SESSION_DIR).cloned(),
                    Some("/tmp/xuper-session".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(30));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );

                let (name, login) = matches.subcommand().unwrap_or(("", &matches));
                assert_eq!(name, "login");
                assert_eq!(
                    login.get_one::<String>(ARG_EMAIL).cloned(),
                    Some("ana@xuper.app".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("XUPER_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["xuper".to_string(), "status".to_string()];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap_or(u8::MAX))
                );
            });
        }
    }

    #[test]
    fn test_output_requires_platform() {
        let result = new().try_get_matches_from(vec!["xuper", "downloads", "--output", "x.apk"]);
        assert!(result.is_err());

        let result = new().try_get_matches_from(vec!["xuper", "downloads", "--platform", "desktop"]);
        assert!(result.is_err());
    }
}
