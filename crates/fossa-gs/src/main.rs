use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fossa_fcp::TelemetryLayout;
use fossa_gs::logging::{init_logging, LogFormat, LogLevel};
use fossa_gs::{
    compute_synchword, decode_frame, decode_link, encode_frame, load_config, EncodeRequest,
    GsError, HexKey, StationConfig, StationOverrides,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "fossa-gs", version, about = "FOSSA ground station frame tools")]
struct Cli {
    /// Station configuration file (YAML).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Station callsign.
    #[arg(long, global = true)]
    callsign: Option<String>,

    /// Password for encrypted sections.
    #[arg(long, global = true)]
    password: Option<String>,

    /// Cipher key as hex.
    #[arg(long, value_name = "HEX", global = true)]
    key: Option<HexKey>,

    /// Protocol revision: v1 (legacy) or v2 (FOSSA-1).
    #[arg(long, value_name = "REVISION", global = true)]
    layout: Option<TelemetryLayout>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). Defaults to RUST_LOG, then info.
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode an uplink frame.
    Encode(EncodeArgs),
    /// Decode a received frame.
    Decode(DecodeArgs),
    /// Recover an AX.25 frame from a raw capture.
    Link(LinkArgs),
    /// Compute the receiver sync word.
    Synchword(SynchwordArgs),
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Function ID, decimal or 0x-prefixed hex.
    #[arg(long = "function", value_name = "ID", value_parser = parse_function_id)]
    function_id: u8,

    /// Optional data as text.
    #[arg(long, conflicts_with = "hex")]
    data: Option<String>,

    /// Optional data as hex.
    #[arg(long)]
    hex: Option<String>,

    /// Encrypt the optional data.
    #[arg(long)]
    encrypt: bool,

    /// Seed for the padding bytes.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Frame bytes as hex.
    frame: String,

    /// Frame carries an encrypted section.
    #[arg(long)]
    encrypted: bool,
}

#[derive(Args, Debug)]
struct LinkArgs {
    /// Capture as hex nibbles.
    capture: String,
}

#[derive(Args, Debug)]
struct SynchwordArgs {
    /// Leading transmitted bytes as hex, flag included.
    leading: String,
}

fn parse_function_id(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid function id '{}': {}", s, e))
}

fn load_station(cli: &Cli) -> Result<StationConfig, GsError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StationConfig::default(),
    };

    Ok(config.with_overrides(StationOverrides {
        callsign: cli.callsign.clone(),
        password: cli.password.clone(),
        key: cli.key.clone(),
        telemetry_layout: cli.layout,
    }))
}

fn print_json<T: Serialize>(report: &T) -> Result<(), GsError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), GsError> {
    let station = load_station(&cli)?;

    match cli.command {
        Command::Encode(args) => {
            let opt_data = match (args.data, args.hex) {
                (Some(text), _) => Some(text.into_bytes()),
                (None, Some(hex)) => Some(hex::decode(hex.trim())?),
                (None, None) => None,
            };
            let request = EncodeRequest {
                function_id: args.function_id,
                opt_data,
                encrypt: args.encrypt,
                seed: args.seed,
            };
            print_json(&encode_frame(&station, &request)?)
        }
        Command::Decode(args) => print_json(&decode_frame(&station, &args.frame, args.encrypted, None)?),
        Command::Link(args) => print_json(&decode_link(&args.capture)),
        Command::Synchword(args) => print_json(&compute_synchword(&args.leading)?),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
