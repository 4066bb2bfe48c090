//! framepool menu - drive a buffer pool from the terminal.
//!
//! Opens `$FRAMEPOOL_FILE` (default `abc.txt`) with the default sizing and
//! offers three commands: fetch a page, write a frame, shut down.
//! Set `RUST_LOG=debug` to watch the pool work.

use std::io::{self, BufRead, Write};
use std::process;

use framepool::{BlockId, BufferPoolManager, Error, FetchOutcome, FrameId, PoolConfig, StorageBackend};

const DEFAULT_FILE: &str = "abc.txt";

fn main() {
    env_logger::init();

    let path = std::env::var("FRAMEPOOL_FILE").unwrap_or_else(|_| DEFAULT_FILE.to_string());
    let mut bpm = match BufferPoolManager::open(&path, PoolConfig::default()) {
        Ok(bpm) => bpm,
        Err(e) => {
            eprintln!("Failed to open file: {}", e);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if let Err(e) = run(&mut bpm, &mut input) {
        // Exit without powering off. A failed write-back is not retried.
        eprintln!("Fatal: {}", e);
        process::exit(1);
    }

    match bpm.power_off() {
        Ok(report) => println!("Halt ({} blocks written back)", report.written_back.len()),
        Err(e) => {
            eprintln!("Fatal: {}", e);
            process::exit(1);
        }
    }
}

/// Menu loop. Returns on shutdown, end of input, or a fatal error.
fn run<B: StorageBackend>(bpm: &mut BufferPoolManager<B>, input: &mut impl BufRead) -> Result<(), Error> {
    loop {
        println!("[0] Fetch a page into memory");
        println!("[1] Write frame");
        println!("[2] Shutdown");
        println!("{}", render_frames(bpm));

        let Some(option) = prompt(input, "Option: ") else {
            return Ok(());
        };

        let result = match option.trim() {
            "0" => fetch_command(bpm, input),
            "1" => write_command(bpm, input),
            "2" => return Ok(()),
            _ => {
                eprintln!("Invalid option.");
                Ok(())
            }
        };

        match result {
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => eprintln!("{}", e),
            Ok(()) => {}
        }
        println!();
    }
}

fn fetch_command<B: StorageBackend>(
    bpm: &mut BufferPoolManager<B>,
    input: &mut impl BufRead,
) -> Result<(), Error> {
    let Some(block) = prompt_number(input, "Which page? ") else {
        eprintln!("Invalid page number.");
        return Ok(());
    };
    let block = BlockId::new(block);

    match bpm.fetch(block)? {
        FetchOutcome::Hit(frame) => println!("Page {} is already fetched ... frame ID is {}", block.0, frame.0),
        FetchOutcome::Loaded(frame) | FetchOutcome::Replaced { frame, .. } => {
            println!("Page {} loaded into frame {}.", block.0, frame.0)
        }
        FetchOutcome::NeedsVictim => {
            let Some(victim) = prompt_number(input, "Which frame to remove? ") else {
                eprintln!("Invalid frame ID.");
                return Ok(());
            };
            let outcome = bpm.fetch_evicting(block, FrameId::new(victim as usize))?;
            if let Some(frame) = outcome.frame() {
                println!("Page {} loaded into frame {}.", block.0, frame.0);
            }
        }
    }

    Ok(())
}

fn write_command<B: StorageBackend>(
    bpm: &mut BufferPoolManager<B>,
    input: &mut impl BufRead,
) -> Result<(), Error> {
    let Some(block) = prompt_number(input, "Which page? ") else {
        eprintln!("Invalid page number.");
        return Ok(());
    };

    let page_size = bpm.config().page_size();
    let Some(data) = prompt(input, &format!("Enter {} characters: ", page_size)) else {
        return Ok(());
    };
    let data = remove_spaces(data.trim_end_matches(['\r', '\n']));

    let Some(frame) = bpm.frame_of(BlockId::new(block)) else {
        eprintln!("Page {} is not in memory.", block);
        return Ok(());
    };

    bpm.write_to_frame(frame, data.as_bytes())?;
    println!("Data written to frame {} and marked as dirty.", frame.0);

    Ok(())
}

/// One line of frame state, e.g. `Frames:[*2:WXYZ][3:dddd][]`.
fn render_frames<B: StorageBackend>(bpm: &BufferPoolManager<B>) -> String {
    let mut line = String::from("Frames:");
    for state in bpm.describe_frames() {
        line.push_str(&state.to_string());
    }
    line
}

/// Strip every space, so `"W X Y Z"` becomes `"WXYZ"`.
fn remove_spaces(s: &str) -> String {
    s.chars().filter(|&c| c != ' ').collect()
}

/// Print `message` and read one line. `None` on end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            None
        }
    }
}

fn prompt_number(input: &mut impl BufRead, message: &str) -> Option<u32> {
    prompt(input, message)?.trim().parse().ok()
}
