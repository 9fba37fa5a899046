//! Tape-language virtual machine CLI.
//!
//! This binary is the host side of the machine's IO boundary. It performs:
//! 1. **Loading:** Reads a program from a file or an inline string.
//! 2. **IO:** Wires the output sink to stdout and answers input requests
//!    from stdin (or a pre-supplied byte string).
//! 3. **Pumping:** Sleeps until the machine's next wake deadline and polls
//!    it, so throttled runs and slow stepping behave as scheduled.

use clap::{Args, Parser, Subcommand};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};
use std::{fs, process, thread};

use bfvm_core::io::{InputSource, OutputSink};
use bfvm_core::isa::loader;
use bfvm_core::view::cell_views;
use bfvm_core::{Config, Fault, Machine, Status};

#[derive(Parser, Debug)]
#[command(
    name = "bfvm",
    author,
    version,
    about = "Virtual machine for the eight-instruction tape language",
    long_about = "Run a tape-language program from a file or an inline string.\n\nExamples:\n  bfvm run -f hello.bf\n  bfvm run -e '++[>+++<-]>.' --dump-tape 8\n  bfvm run -f echo.bf --input 'hi' --stats"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program to completion.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Program file to execute.
    #[arg(short, long)]
    file: Option<String>,

    /// Inline program source (alternative to --file).
    #[arg(short, long)]
    eval: Option<String>,

    /// JSON configuration file (tape size, throttle, yield delay).
    #[arg(long)]
    config: Option<String>,

    /// Override the tape size in cells.
    #[arg(long)]
    tape_size: Option<usize>,

    /// Slow-step mode: delay in milliseconds between instructions.
    #[arg(long)]
    step_delay: Option<u64>,

    /// Bytes answering ',' instructions, consumed left to right; stdin is
    /// read once they run out.
    #[arg(long)]
    input: Option<String>,

    /// Print execution statistics after the run.
    #[arg(long)]
    stats: bool,

    /// Print execution statistics as JSON after the run.
    #[arg(long)]
    stats_json: bool,

    /// Print the first N tape cells in all display bases after the run.
    #[arg(long, value_name = "N")]
    dump_tape: Option<usize>,
}

/// Writes machine output straight to stdout, flushing per byte so
/// interactive programs stay in order with input prompts.
#[derive(Debug)]
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_byte(&mut self, byte: u8) {
        let mut out = io::stdout();
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    }
}

/// Flushes pending output when the machine asks for a byte, so prompts
/// printed by the program are visible before the read blocks.
#[derive(Debug)]
struct StdinRequest;

impl InputSource for StdinRequest {
    fn request_byte(&mut self) {
        let _ = io::stdout().flush();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(&args),
    }
}

/// Runs a program: builds the machine, pumps it to its terminal state, and
/// prints any requested reports. Exits with code 1 on a fault.
fn cmd_run(args: &RunArgs) {
    let source = load_source(args.file.as_deref(), args.eval.as_deref());
    let config = load_config(args.config.as_deref(), args.tape_size);

    let program = loader::sanitize(&source);
    if program.is_empty() {
        eprintln!("[*] Program contains no instructions; nothing to run");
    }

    let mut vm = Machine::new(
        program,
        &config,
        Box::new(StdoutSink),
        Box::new(StdinRequest),
    );

    let mut feed: VecDeque<u8> = args
        .input
        .as_deref()
        .map(|s| s.bytes().collect())
        .unwrap_or_default();

    let started = match args.step_delay {
        Some(ms) => vm.auto_step(Duration::from_millis(ms)),
        None => vm.run(),
    };
    if let Err(fault) = started {
        die(&fault);
    }

    loop {
        if vm.is_awaiting_input() {
            let byte = next_input_byte(&mut feed);
            if let Err(fault) = vm.deliver_input(i64::from(byte)) {
                die(&fault);
            }
            continue;
        }
        match vm.next_wake() {
            Some(wake) => {
                let now = Instant::now();
                if wake > now {
                    thread::sleep(wake - now);
                }
                if let Err(fault) = vm.poll(Instant::now()) {
                    die(&fault);
                }
            }
            None => break,
        }
    }

    debug_assert_eq!(vm.status(), Status::Stopped);
    let _ = io::stdout().flush();

    if let Some(cells) = args.dump_tape {
        print_tape(&vm, cells);
    }
    if args.stats {
        println!();
        vm.stats().print();
    }
    if args.stats_json {
        match serde_json::to_string_pretty(vm.stats()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("[!] Could not serialize statistics: {e}"),
        }
    }
}

/// Reads the program source from a file or takes the inline string.
///
/// Exits the process with an error message if neither is given or the file
/// cannot be read.
fn load_source(file: Option<&str>, eval: Option<&str>) -> String {
    if let Some(src) = eval {
        return src.to_string();
    }
    let Some(path) = file else {
        eprintln!("Error: specify --file <program> or --eval <source>");
        eprintln!("  bfvm run -f hello.bf");
        eprintln!("  bfvm run -e '++[>+++<-]>.'");
        process::exit(1);
    };
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read file '{path}': {e}");
        process::exit(1);
    })
}

/// Builds the configuration from an optional JSON file plus CLI overrides.
fn load_config(path: Option<&str>, tape_size: Option<usize>) -> Config {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("\n[!] FATAL: Could not read config '{path}': {e}");
                process::exit(1);
            });
            Config::from_json(&text).unwrap_or_else(|e| {
                eprintln!("\n[!] FATAL: Invalid config '{path}': {e}");
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    if let Some(size) = tape_size {
        config.tape.size = size;
    }
    if config.tape.size == 0 {
        eprintln!("\n[!] FATAL: tape size must be at least one cell");
        process::exit(1);
    }
    config
}

/// Takes the next input byte from the pre-supplied feed, then from stdin.
///
/// End of input on stdin delivers 0, the conventional end-of-stream byte.
fn next_input_byte(feed: &mut VecDeque<u8>) -> u8 {
    if let Some(byte) = feed.pop_front() {
        return byte;
    }
    let mut buf = [0u8; 1];
    match io::stdin().read(&mut buf) {
        Ok(1) => buf[0],
        _ => 0,
    }
}

/// Prints the first `cells` tape cells in every display base, marking the
/// data pointer.
fn print_tape(vm: &Machine, cells: usize) {
    let tape = vm.tape();
    let count = cells.min(tape.size());
    println!();
    println!("  addr  dec  hex   bin         ascii");
    for (addr, view) in cell_views(&tape.cells()[..count]).iter().enumerate() {
        let marker = if addr == tape.pointer() { '>' } else { ' ' };
        let ascii = if view.ascii.is_ascii_graphic() {
            view.ascii
        } else {
            '·'
        };
        println!(
            "{marker} {addr:>4}  {dec:>3}  {hex}  {bin}  {ascii}",
            dec = view.dec,
            hex = view.hex,
            bin = view.bin,
        );
    }
}

/// Reports a fatal fault and exits.
fn die(fault: &Fault) -> ! {
    let _ = io::stdout().flush();
    eprintln!("\n[!] FATAL: {fault}");
    process::exit(1);
}
