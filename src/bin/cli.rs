//! hashbase CLI Client
//!
//! Command-line interface for interacting with hashbase.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use hashbase::Client;

/// hashbase CLI
#[derive(Parser, Debug)]
#[command(name = "hashbase-cli")]
#[command(about = "CLI for the hashbase key-value server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    server: String,

    /// Without a subcommand, start an interactive prompt
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the server banner
    Inf,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Count stored keys
    Len,

    /// Remove every key
    Clr,

    /// Send arbitrary tokens as one request
    Raw {
        /// Tokens, quoted on the wire as needed
        #[arg(required = true)]
        args: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: cannot connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Some(command) => run_command(&mut client, command),
        None => repl(&mut client),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Execute one subcommand and print the raw reply
fn run_command(client: &mut Client, command: Commands) -> hashbase::Result<()> {
    let reply = match command {
        Commands::Inf => client.request(&["inf"])?,
        Commands::Get { key } => client.request(&["get", key.as_str()])?,
        Commands::Set { key, value } => client.request(&["set", key.as_str(), value.as_str()])?,
        Commands::Del { key } => client.request(&["del", key.as_str()])?,
        Commands::Len => client.request(&["len"])?,
        Commands::Clr => client.request(&["clr"])?,
        Commands::Raw { args } => client.request(args.as_slice())?,
    };

    println!("{}", String::from_utf8_lossy(&reply));
    Ok(())
}

/// Read lines from stdin, send each verbatim, print each reply
fn repl(client: &mut Client) -> hashbase::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!(">> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let reply = client.send_line(line.as_bytes())?;
        println!("=> {}", String::from_utf8_lossy(&reply));
    }
}
