//! Minisign Vanity Key Generator CLI
//!
//! Usage:
//!   minisign-vanity '^RWQ[Cc]afe'          # Public key starting with "RWQcafe" or "RWQCafe"
//!   minisign-vanity '(?i)beef' '[0-9]{3}$' # Both patterns must match
//!   minisign-vanity -d keys --overwrite x  # Replace keys/minisign.{key,pub}

use std::process;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use minisign_vanity::worker::format_elapsed;
use minisign_vanity::{
    CancelToken, Config, KeyFiles, OsKeyGenerator, PatternSet, VanityError, WorkerPool,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        fail(&e);
    }

    // Compile every pattern before any worker starts
    let patterns = match PatternSet::new(&config.patterns) {
        Ok(patterns) => patterns,
        Err(e) => fail(&e),
    };

    let files = KeyFiles::in_dir(&config.dir);
    if !config.overwrite {
        if let Err(e) = files.ensure_absent() {
            fail(&e);
        }
    }

    // Print startup info
    println!("Minisign Vanity Key Generator");
    println!("=============================");
    for pattern in patterns.patterns() {
        println!("Pattern:    {}", pattern);
    }
    println!("Workers:    {}", config.worker_count());
    println!();

    let pool = WorkerPool::new(config.worker_count(), patterns, OsKeyGenerator)
        .with_report_interval(config.report_interval());
    ctrlc_handler(pool.cancel_token());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let start = Instant::now();
    let result = match pool.search() {
        Ok(result) => result,
        Err(VanityError::Cancelled) => {
            println!("\nStopped by user.");
            process::exit(130);
        }
        Err(e) => fail(&e),
    };

    let public_key = result.keypair.public_key();
    println!(
        "Found match after {} keys in {}",
        result.attempts,
        format_elapsed(start.elapsed())
    );
    println!("Public key: {}", public_key);

    if let Err(e) = files.write(&result.keypair, config.overwrite) {
        fail(&e);
    }

    println!(
        "Keys saved to {} and {}",
        files.public_path().display(),
        files.secret_path().display()
    );
    println!();
    println!("{}", "WARNING: The secret key is unencrypted!".yellow().bold());
    println!("To protect it with a password, run:");
    println!("  minisign -C -s {}", files.secret_path().display());
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("{} {}", "error:".red().bold(), err);
    process::exit(1);
}

fn ctrlc_handler(cancel: CancelToken) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        log::warn!("Ctrl-C handler not installed: {}", e);
    }
}
