//! CLI argument definition and parsing.

use std::env;
use std::path::PathBuf;
use std::process;

use catena_proto::Name;
use owo_colors::OwoColorize;

const DEFAULT_SERVER: &str = "127.0.0.1";

#[derive(Clone, Debug)]
pub struct Args {
    /// The name to build a chain for. A missing trailing dot is tolerated.
    pub target: Name,
    /// Where the chain blob is written.
    pub output: PathBuf,
    /// The validating resolver dig queries.
    pub server: String,
}

impl Args {
    pub fn parse() -> Self {
        // skip executable name
        let args: Vec<String> = env::args().skip(1).collect();

        let mut server = DEFAULT_SERVER.to_string();
        let mut positional = Vec::new();

        for arg in args {
            if let Some(ns) = arg.strip_prefix('@') {
                // nameserver
                server = ns.to_string();
            } else if let Some(option) = arg.strip_prefix('-') {
                match option {
                    "h" | "-help" => {
                        print_help();
                        process::exit(0);
                    }
                    "V" | "-version" => {
                        print_version();
                        process::exit(0);
                    }
                    x => {
                        err(format!("Invalid option: -{}.", x));
                    }
                }
            } else {
                positional.push(arg);
            }
        }

        let (target, output) = match positional.as_slice() {
            [target, output] => (target, output),
            _ => {
                print_usage();
                process::exit(1);
            }
        };

        let target = match Name::from_ascii(target) {
            Ok(name) => name,
            Err(e) => err(e.to_string()),
        };

        Self {
            target,
            output: PathBuf::from(output),
            server,
        }
    }
}

macro_rules! var {
    ($var:expr) => {
        $var.if_supports_color(owo_colors::Stream::Stdout, |s| s.green())
    };
}

fn print_usage() {
    let output = owo_colors::Stream::Stdout;
    print!("{}", "Usage:".if_supports_color(output, |s| s.purple()));
    println!(
        "\tcatena [@{}] <{}> <{}>",
        var!("nameserver"),
        var!("target DNS name"),
        var!("output filename")
    );
}

fn print_help() {
    print_usage();
    println!();

    println!(
        "Builds the DNSSEC authentication chain for {} and writes the",
        var!("target DNS name")
    );
    println!("serialised chain to {}.", var!("output filename"));
    println!();

    println!(
        "\t{} is the address of a validating recursive resolver that dig",
        var!("nameserver")
    );
    println!("\tis invoked against (default: @{}).", DEFAULT_SERVER);
    println!();

    println!("Options:");
    println!("\t-h | --help     print this help message");
    println!("\t-V | --version  print the version of catena");
}

fn print_version() {
    println!("catena v{}", env!("CARGO_PKG_VERSION"));
}

fn err(msg: impl AsRef<str>) -> ! {
    eprintln!("{}", msg.as_ref());
    process::exit(1)
}
