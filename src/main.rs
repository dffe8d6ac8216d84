use std::error::Error;
use std::io::{self, Read};

use mindsignal::{MindsignalConfig, ModelOrchestrator};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const USAGE: &str = "usage: mindsignal [--config path.yaml] <text...>   (reads stdin when no text is given)";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config_path = None;
    let mut words = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config_path = Some(args.next().ok_or(USAGE)?);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => words.push(arg),
        }
    }

    let cfg = match config_path {
        Some(path) => MindsignalConfig::from_file(path)?,
        None => MindsignalConfig::default(),
    }
    .with_env_overrides()?;

    let text = if words.is_empty() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        words.join(" ")
    };

    let orchestrator = ModelOrchestrator::from_config(&cfg)?;
    let result = orchestrator.run(&text)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
