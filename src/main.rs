use clap::Parser;
use contextually::config::Settings;
use contextually::{Contextually, MemoryHost};
use serde_json::{json, Value};
use tracing::Level;

/// Activate contexts from a settings file and run commands against an
/// in-memory editor, printing everything sent to it.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON settings file containing `contextually.contexts`
    #[arg(long)]
    settings: std::path::PathBuf,
    /// Simulate a window with no active editor
    #[arg(long)]
    no_editor: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Commands to run in order, as NAME or NAME=JSON_ARGS_ARRAY
    commands: Vec<String>,
}

fn split_command(raw: &str) -> Result<(&str, Vec<Value>), String> {
    let Some((name, args)) = raw.split_once('=') else {
        return Ok((raw, Vec::new()));
    };
    match serde_json::from_str::<Value>(args) {
        Ok(Value::Array(items)) => Ok((name, items)),
        Ok(single) => Ok((name, vec![single])),
        Err(e) => Err(format!("bad arguments for {name}: {e}")),
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::load(&args.settings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let host = if args.no_editor {
        MemoryHost::without_editor()
    } else {
        MemoryHost::new()
    };
    let mut app = Contextually::activate(&settings, host);

    let mut results = Vec::new();
    for raw in &args.commands {
        let outcome = split_command(raw).and_then(|(name, call_args)| {
            app.execute(name, &call_args).map_err(|e| e.to_string())
        });
        match outcome {
            Ok(v) => results.push(json!({ "command": raw, "result": v })),
            Err(e) => {
                eprintln!("{e}");
                results.push(json!({ "command": raw, "error": e }));
            }
        }
    }

    let contexts: serde_json::Map<String, Value> = app
        .store()
        .iter()
        .map(|(name, entry)| (name.to_string(), entry.current.to_json()))
        .collect();
    let host = app.deactivate();
    let report = json!({
        "commands": results,
        "events": host.events,
        "contexts": contexts,
    });

    match serde_json::to_string_pretty(&report) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("cannot render report: {e}");
            std::process::exit(1);
        }
    }
}
