use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the random fan-out gateway workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve,
    /// Run CI checks (fmt, clippy, tests)
    Check,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            run_cargo(&[
                "run",
                "--release",
                "-p",
                "rng_fanout_gateway",
                "--bin",
                "rng_gateway",
            ]);
        }
        Commands::Check => {
            step("Formatting");
            run_cargo(&["fmt", "--all", "--", "--check"]);
            step("Clippy");
            run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
            step("Tests");
            run_cargo(&["test", "--workspace"]);
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}
