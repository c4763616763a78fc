//! Control-channel command vocabulary.
//!
//! A received line is matched against [`COMMAND_TABLE`] in order; the
//! first matching rule builds the [`Command`].  Lines that match nothing
//! are ignored.
//!
//! | Matcher              | Command      |
//! |----------------------|--------------|
//! | prefix `SET_IP `     | `SetAddress` |
//! | prefix `SET_SUBNET ` | `SetAddress` |
//! | prefix `SET_GATEWAY `| `SetAddress` |
//! | prefix `SET_INPORT ` | `SetPort`    |
//! | prefix `SET_OUTPORT `| `SetPort`    |
//! | exact `GET`          | `Get`        |
//! | exact `IP`           | `ShowIp`     |
//! | exact `MAC`          | `ShowMac`    |
//! | contains `HELP`      | `Help`       |
//! | contains `GET`       | `Get`        |
//!
//! The two substring rules are fallbacks: `HELP` is found anywhere in the
//! line, and any other line containing `GET` (e.g. `GET CONFIG`) reports
//! the configuration.

/// Text sent in response to `HELP`.
pub const HELP_TEXT: &str = "Available commands:\n\
    SET_IP <ip_address> - Set the device IP address\n\
    SET_SUBNET <subnet_mask> - Set the subnet mask\n\
    SET_GATEWAY <gateway_ip> - Set the gateway IP address\n\
    SET_INPORT <port_number> - Set the input port (default 7001)\n\
    SET_OUTPORT <port_number> - Set the output port (default 7000)\n\
    GET - Get current configuration\n\
    IP - Show current IP address\n\
    MAC - Show current MAC address\n\
    HELP - Show this help message";

/// Address-valued settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Ip,
    Subnet,
    Gateway,
}

/// Port-valued settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortField {
    In,
    Out,
}

/// Any persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Address(AddressField),
    Port(PortField),
}

impl AddressField {
    /// Label used in replies (`✅ Subnet updated and saved.`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Subnet => "Subnet",
            Self::Gateway => "Gateway",
        }
    }
}

impl PortField {
    pub fn label(self) -> &'static str {
        match self {
            Self::In => "Input port",
            Self::Out => "Output port",
        }
    }
}

impl ConfigField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Address(a) => a.label(),
            Self::Port(p) => p.label(),
        }
    }
}

/// A parsed control command.  Arguments are left raw; validation happens
/// when the command is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    SetAddress { field: AddressField, arg: &'a str },
    SetPort { field: PortField, arg: &'a str },
    Get,
    ShowIp,
    ShowMac,
    Help,
}

/// How a rule tests a line.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Line starts with the text; the remainder is the argument.
    Prefix(&'static str),
    /// Line equals the text.
    Exact(&'static str),
    /// Line contains the text anywhere.
    Contains(&'static str),
}

impl Matcher {
    /// Returns the argument slice when the line matches.
    fn apply(self, line: &str) -> Option<&str> {
        match self {
            Self::Prefix(p) => line.strip_prefix(p),
            Self::Exact(e) => (line == e).then_some(""),
            Self::Contains(c) => line.contains(c).then_some(""),
        }
    }
}

type Build = for<'a> fn(&'a str) -> Command<'a>;

struct Rule {
    matcher: Matcher,
    build: Build,
}

fn set_ip(arg: &str) -> Command<'_> {
    Command::SetAddress { field: AddressField::Ip, arg }
}

fn set_subnet(arg: &str) -> Command<'_> {
    Command::SetAddress { field: AddressField::Subnet, arg }
}

fn set_gateway(arg: &str) -> Command<'_> {
    Command::SetAddress { field: AddressField::Gateway, arg }
}

fn set_in_port(arg: &str) -> Command<'_> {
    Command::SetPort { field: PortField::In, arg }
}

fn set_out_port(arg: &str) -> Command<'_> {
    Command::SetPort { field: PortField::Out, arg }
}

fn get(_: &str) -> Command<'_> {
    Command::Get
}

fn show_ip(_: &str) -> Command<'_> {
    Command::ShowIp
}

fn show_mac(_: &str) -> Command<'_> {
    Command::ShowMac
}

fn help(_: &str) -> Command<'_> {
    Command::Help
}

/// Ordered rule table; first match wins.
const COMMAND_TABLE: &[Rule] = &[
    Rule { matcher: Matcher::Prefix("SET_IP "), build: set_ip },
    Rule { matcher: Matcher::Prefix("SET_SUBNET "), build: set_subnet },
    Rule { matcher: Matcher::Prefix("SET_GATEWAY "), build: set_gateway },
    Rule { matcher: Matcher::Prefix("SET_INPORT "), build: set_in_port },
    Rule { matcher: Matcher::Prefix("SET_OUTPORT "), build: set_out_port },
    Rule { matcher: Matcher::Exact("GET"), build: get },
    Rule { matcher: Matcher::Exact("IP"), build: show_ip },
    Rule { matcher: Matcher::Exact("MAC"), build: show_mac },
    Rule { matcher: Matcher::Contains("HELP"), build: help },
    Rule { matcher: Matcher::Contains("GET"), build: get },
];

/// Match a trimmed line against the command table.
pub fn parse(line: &str) -> Option<Command<'_>> {
    COMMAND_TABLE
        .iter()
        .find_map(|rule| rule.matcher.apply(line).map(rule.build))
}
