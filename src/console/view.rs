//! Command surface of the console.
//!
//! The set of available commands is a pure function of whether a session is
//! authenticated. The two sets are mutually exclusive; `help` and `quit` are
//! always available.

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::adapter::{AdapterKind, ConnectParams, LoginProvider};

/// One entry in a command set listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub usage: &'static str,
    pub help: &'static str,
}

/// Commands available while unauthenticated: the three login triggers.
pub const LOGIN_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        usage: "login google",
        help: "social login through the embedded key adapter (Google channel)",
    },
    CommandSpec {
        usage: "login facebook",
        help: "social login through the embedded key adapter (Facebook channel)",
    },
    CommandSpec {
        usage: "login node",
        help: "connect to the external wallet node",
    },
];

/// Commands available while authenticated: logout plus the session actions.
pub const SESSION_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        usage: "user",
        help: "show profile information for the session",
    },
    CommandSpec {
        usage: "chain-id",
        help: "query the chain id",
    },
    CommandSpec {
        usage: "accounts",
        help: "list session accounts",
    },
    CommandSpec {
        usage: "balance",
        help: "native balance of the primary account, in wei",
    },
    CommandSpec {
        usage: "send <to> <wei>",
        help: "send a native-token transfer",
    },
    CommandSpec {
        usage: "sign <message...>",
        help: "sign a message (EIP-191 personal sign)",
    },
    CommandSpec {
        usage: "export-key",
        help: "export the session private key (embedded sessions only)",
    },
    CommandSpec {
        usage: "logout",
        help: "end the session",
    },
];

/// The command set for the given authentication state.
pub fn commands_for(authenticated: bool) -> &'static [CommandSpec] {
    if authenticated {
        SESSION_COMMANDS
    } else {
        LOGIN_COMMANDS
    }
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(AdapterKind, ConnectParams),
    Logout,
    UserInfo,
    ChainId,
    Accounts,
    Balance,
    Send { to: Address, value: U256 },
    Sign { message: String },
    ExportKey,
    Help,
    Quit,
}

/// Whether a command belongs to the current state's set.
pub fn is_available(command: &Command, authenticated: bool) -> bool {
    match command {
        Command::Help | Command::Quit => true,
        Command::Login(..) => !authenticated,
        _ => authenticated,
    }
}

/// Line parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid wei amount '{0}'")]
    InvalidAmount(String),
}

/// Parse one console line into a command.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next().ok_or(ParseError::Empty)?;

    match head.to_ascii_lowercase().as_str() {
        "login" => match tokens.next() {
            Some(target) => match target.to_ascii_lowercase().as_str() {
                "node" => Ok(Command::Login(AdapterKind::Node, ConnectParams::default())),
                social => match social.parse::<LoginProvider>() {
                    Ok(provider) => Ok(Command::Login(
                        AdapterKind::Embedded,
                        ConnectParams::social(provider),
                    )),
                    Err(_) => Err(ParseError::Usage("login <google|facebook|node>")),
                },
            },
            None => Err(ParseError::Usage("login <google|facebook|node>")),
        },
        "logout" => Ok(Command::Logout),
        "user" => Ok(Command::UserInfo),
        "chain-id" => Ok(Command::ChainId),
        "accounts" => Ok(Command::Accounts),
        "balance" => Ok(Command::Balance),
        "send" => {
            let to = tokens.next().ok_or(ParseError::Usage("send <to> <wei>"))?;
            let value = tokens.next().ok_or(ParseError::Usage("send <to> <wei>"))?;
            let to: Address = to
                .parse()
                .map_err(|_| ParseError::InvalidAddress(to.to_string()))?;
            let value: U256 = value
                .parse()
                .map_err(|_| ParseError::InvalidAmount(value.to_string()))?;
            Ok(Command::Send { to, value })
        }
        "sign" => {
            let message = tokens.collect::<Vec<_>>().join(" ");
            if message.is_empty() {
                return Err(ParseError::Usage("sign <message...>"));
            }
            Ok(Command::Sign { message })
        }
        "export-key" => Ok(Command::ExportKey),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_sets_are_disjoint_and_nonempty() {
        assert!(!LOGIN_COMMANDS.is_empty());
        assert!(!SESSION_COMMANDS.is_empty());
        for login in LOGIN_COMMANDS {
            assert!(!SESSION_COMMANDS.contains(login));
        }
        assert_eq!(commands_for(false), LOGIN_COMMANDS);
        assert_eq!(commands_for(true), SESSION_COMMANDS);
    }

    #[test]
    fn test_availability_follows_state() {
        let login = parse_command("login google").unwrap();
        assert!(is_available(&login, false));
        assert!(!is_available(&login, true));

        for cmd in ["logout", "user", "chain-id", "accounts", "balance", "export-key"] {
            let cmd = parse_command(cmd).unwrap();
            assert!(is_available(&cmd, true));
            assert!(!is_available(&cmd, false));
        }

        assert!(is_available(&Command::Help, false));
        assert!(is_available(&Command::Help, true));
        assert!(is_available(&Command::Quit, false));
        assert!(is_available(&Command::Quit, true));
    }

    #[test]
    fn test_parse_login_targets() {
        assert_eq!(
            parse_command("login node").unwrap(),
            Command::Login(AdapterKind::Node, ConnectParams::default())
        );
        match parse_command("login facebook").unwrap() {
            Command::Login(AdapterKind::Embedded, params) => {
                assert_eq!(params.login_provider, Some(LoginProvider::Facebook));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
        assert_eq!(
            parse_command("login twitter"),
            Err(ParseError::Usage("login <google|facebook|node>"))
        );
    }

    #[test]
    fn test_parse_send() {
        let cmd = parse_command(
            "send 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266 1000000000000000",
        )
        .unwrap();
        match cmd {
            Command::Send { to, value } => {
                assert_eq!(
                    to.to_string().to_lowercase(),
                    "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
                );
                assert_eq!(value, U256::from(1_000_000_000_000_000u64));
            }
            other => panic!("unexpected parse: {other:?}"),
        }

        assert!(matches!(
            parse_command("send nowhere 5"),
            Err(ParseError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_command("send 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266 lots"),
            Err(ParseError::InvalidAmount(_))
        ));
        assert_eq!(
            parse_command("send"),
            Err(ParseError::Usage("send <to> <wei>"))
        );
    }

    #[test]
    fn test_parse_sign_joins_message() {
        match parse_command("sign hello wallet console").unwrap() {
            Command::Sign { message } => assert_eq!(message, "hello wallet console"),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command(""), Err(ParseError::Empty));
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
        assert!(matches!(
            parse_command("frobnicate"),
            Err(ParseError::Unknown(_))
        ));
    }
}
