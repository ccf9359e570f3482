//! CLI tool to inspect and edit lighttpd vhost configuration files.

use std::fs;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vhostfile_rs::VHostStore;

fn usage() -> ExitCode {
    eprintln!("Usage: vhostfile <command> <file> [name]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list               List vhosts in the file");
    eprintln!("  fmt                Render the file in canonical form to stdout");
    eprintln!("  check              Check if the file is in canonical form");
    eprintln!("  enable <name>      Enable a vhost (uncomment its block)");
    eprintln!("  disable <name>     Disable a vhost (comment its block out)");
    eprintln!("  remove <name>      Delete a vhost from the file");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  vhostfile list /etc/lighttpd/conf-enabled/50-vhosts.conf");
    eprintln!("  vhostfile disable /etc/lighttpd/conf-enabled/50-vhosts.conf staging.example.com");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        return usage();
    }

    let command = args[1].as_str();
    let path = args[2].as_str();

    match command {
        "list" => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    eprintln!("{path}: {err}");
                    return ExitCode::FAILURE;
                }
            };
            for vhost in vhostfile_rs::parse(&content) {
                let marker = if vhost.enabled { " " } else { "#" };
                println!("{marker} {} -> {}", vhost.server_name, vhost.document_root);
            }
            ExitCode::SUCCESS
        }
        "fmt" => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    eprintln!("{path}: {err}");
                    return ExitCode::FAILURE;
                }
            };
            print!("{}", vhostfile_rs::render(&vhostfile_rs::parse(&content)));
            ExitCode::SUCCESS
        }
        "check" => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    eprintln!("{path}: {err}");
                    return ExitCode::FAILURE;
                }
            };
            if vhostfile_rs::render(&vhostfile_rs::parse(&content)) == content {
                eprintln!("{path}: canonical");
                ExitCode::SUCCESS
            } else {
                eprintln!("{path}: not canonical");
                ExitCode::FAILURE
            }
        }
        "enable" | "disable" | "remove" => {
            let Some(name) = args.get(3) else {
                return usage();
            };
            let store = VHostStore::new(path);
            let result = match command {
                "enable" => store.set_enabled(name, true),
                "disable" => store.set_enabled(name, false),
                _ => store.remove(name),
            };
            match result {
                Ok(true) => {
                    eprintln!("{path}: {command}d {name}");
                    ExitCode::SUCCESS
                }
                Ok(false) => {
                    eprintln!("{path}: no vhost named {name}");
                    ExitCode::FAILURE
                }
                Err(err) => {
                    eprintln!("{path}: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {command}");
            usage()
        }
    }
}
