use std::io::{self, Write};
use facefinder::{Face, FaceFinder, FaceStore, SqliteStore};

#[derive(Debug, PartialEq)]
pub enum Command {
    Resolve { race: i64, emotion: i64, oldness: i64, id: u64 },
    Flush,
    Count,
}

/// Parse a command from a provided argument vector
/// args[0] is the program name, args[1] the command
pub fn parse_command_from_args(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command provided. Use: resolve, flush, count".to_string());
    }

    let command = &args[1];

    match command.as_str() {
        "resolve" => parse_resolve(args),
        "flush" => parse_no_args(args, Command::Flush),
        "count" => parse_no_args(args, Command::Count),
        _ => Err(format!("Unknown command: {}. Available: resolve, flush, count", command)),
    }
}

/// Parse the 'resolve' command
/// Usage: resolve <race> <emotion> <oldness> [--id <number>]
fn parse_resolve(args: &[String]) -> Result<Command, String> {
    if args.len() < 5 {
        return Err("'resolve' command requires three levels. Usage: resolve <race> <emotion> <oldness> [--id N]".to_string());
    }

    let mut id = 0;
    if args.len() > 5 {
        if args.len() != 7 || args[5] != "--id" {
            return Err("Unexpected arguments after levels. Only '--id <number>' is allowed".to_string());
        }
        id = args[6]
            .parse::<u64>()
            .map_err(|_| format!("Invalid --id value: '{}'. Must be a non-negative integer.", args[6]))?;
    }

    let levels: Result<Vec<i64>, _> = args[2..5].iter()
        .map(|s| s.parse::<i64>())
        .collect();

    match levels {
        Ok(v) => Ok(Command::Resolve { race: v[0], emotion: v[1], oldness: v[2], id }),
        Err(_) => Err("Failed to parse levels as integers".to_string()),
    }
}

fn parse_no_args(args: &[String], command: Command) -> Result<Command, String> {
    if args.len() > 2 {
        eprintln!("Warning: '{}' command takes no arguments, ignoring extras", args[1]);
    }

    Ok(command)
}

/// REPL mode - interactive session sharing one finder
pub fn run_repl(finder: &mut FaceFinder<SqliteStore>) {
    println!("facefinder - nearest face lookup");
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("facefinder> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["facefinder".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        let command = match parse_command_from_args(&args) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };

        if let Err(error) = execute_command(finder, command) {
            eprintln!("Error: {}", error);
        }
    }
}

pub fn execute_command<S: FaceStore>(finder: &mut FaceFinder<S>, command: Command) -> facefinder::Result<()> {
    match command {
        Command::Resolve { race, emotion, oldness, id } => {
            let query = Face::with_id(race, emotion, oldness, id)?;
            let results = finder.resolve_scored(&query)?;

            println!("Top {} faces:", results.len());
            for (rank, (face, distance)) in results.iter().enumerate() {
                println!("{}. ID: {}, Distance: {:.4}, Race: {}, Emotion: {}, Oldness: {}",
                    rank + 1, face.id(), distance, face.race(), face.emotion(), face.oldness());
            }
        }

        Command::Flush => {
            finder.flush()?;
            println!("All faces removed, ids restart at 1 (restart to clear cached faces)");
        }

        Command::Count => match finder.cached_len() {
            Some(count) => println!("{}", count),
            None => println!("Cache not loaded yet"),
        },
    }

    Ok(())
}

fn print_help() {
    println!("Available commands:");
    println!("  resolve <race> <emotion> <oldness> [--id N] - Find the most similar faces (stores new ones)");
    println!("  flush                                       - Remove all faces and restart ids");
    println!("  count                                       - Show cached face count");
    println!("  help                                        - Show this help");
    println!("  exit, quit                                  - Exit the program");
}
