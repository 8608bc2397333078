//! `wmdo` implements the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! as a way to script EWMH compatible window managers from the command line. `wmdo` provides
//! `xdotool` style commands that query and change windows and desktops and that can be chained
//! together through a shared window stack.
//!
//! ## Command line examples
//!
//! ### Activate a window
//! Activate a window, switching to its desktop first, and wait for the window manager to do it.
//! ```bash
//! wmdo windowactivate --sync 0x2a00007
//! ```
//!
//! ### Move the active window
//! Move the active window to the middle of its screen keeping its vertical position.
//! ```bash
//! wmdo getactivewindow windowmove 50% y
//! ```
//!
//! ### Send a window to the next screen
//! Move the active window onto the next screen keeping its relative position.
//! ```bash
//! wmdo getactivewindow set_screen_for_window --relative 1
//! ```
use std::{env, process, time::Duration};

use clap::{crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use gory::*;
use libewmh::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use witcher::prelude::*;

mod commands;
use commands::CommandContext;

/// Environment variable holding the log filter
const LOG_ENV: &str = "WMDO_LOG";

fn cli() -> Command {
    Command::new("wmdo")
        .about(crate_description!())
        .version(crate_version!())
        .override_usage("wmdo [OPTIONS] <COMMAND> [ARGS]... [<COMMAND> [ARGS]...]...")
        .after_help(commands::summary())
        .arg(Arg::new("display").long("display").value_name("NAME").help("X display to connect to, defaults to $DISPLAY"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more, may be given up to three times"),
        )
        .arg(
            Arg::new("sync-tries")
                .long("sync-tries")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Number of polls made by --sync before giving up [default: 500]"),
        )
        .arg(
            Arg::new("sync-interval")
                .long("sync-interval")
                .value_name("MS")
                .value_parser(value_parser!(u64))
                .help("Milliseconds between polls made by --sync [default: 30]"),
        )
        .arg(
            Arg::new("strict-sync")
                .long("strict-sync")
                .action(ArgAction::SetTrue)
                .help("Fail when --sync gives up instead of carrying on"),
        )
}

// Split the arguments at each command name. The first segment holds the binary name and the
// global options, every following segment starts with a command name.
fn split_args(args: &[String]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut globals = vec![];
    let mut segments: Vec<Vec<String>> = vec![];
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && commands::find(arg).is_some() {
            segments.push(vec![arg.clone()]);
        } else if let Some(segment) = segments.last_mut() {
            segment.push(arg.clone());
        } else {
            globals.push(arg.clone());
        }
    }
    (globals, segments)
}

fn poll_opts(matches: &ArgMatches) -> PollOpts {
    let mut opts = PollOpts::new().strict(matches.get_flag("strict-sync"));
    if let Some(tries) = matches.get_one::<u32>("sync-tries") {
        opts = opts.tries(*tries);
    }
    if let Some(ms) = matches.get_one::<u64>("sync-interval") {
        opts = opts.interval(Duration::from_millis(*ms));
    }
    opts
}

fn log_filter(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn init_logging(verbosity: u8) {
    tracing_subscriber::fmt().with_env_filter(log_filter(verbosity)).with_writer(std::io::stderr).init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (globals, segments) = split_args(&args);
    let matches = cli().get_matches_from(&globals);
    init_logging(matches.get_count("verbose"));

    if segments.is_empty() {
        cli().print_help().wrap("failed to print help")?;
        return Ok(());
    }

    // Parse every command before running any so a typo doesn't leave a chain half done
    let mut chain = vec![];
    for segment in &segments {
        if let Some(verb) = commands::find(&segment[0]) {
            let sub = verb.command().try_get_matches_from(segment).unwrap_or_else(|e| e.exit());
            chain.push((verb, sub));
        }
    }

    let display = matches.get_one::<String>("display").map(|x| x.as_str());
    let wm = WindowManager::connect(display).wrap("failed to connect to the X server")?;
    let mut ctx = CommandContext::new(&wm, poll_opts(&matches));
    for (verb, sub) in &chain {
        debug!("run: {}", verb.name);
        (verb.run)(&mut ctx, sub)?;
    }

    // Whatever is left on the window stack is the output
    print!("{}", ctx.stack);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {}", "error:".red(), err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_cli() {
        cli().debug_assert();
        for verb in commands::VERBS {
            verb.command().debug_assert();
        }
    }

    #[test]
    fn test_split_args() {
        let (globals, segments) = split_args(&args("wmdo -vv --display :1 getactivewindow windowmove 10 -20"));
        assert_eq!(globals, args("wmdo -vv --display :1"));
        assert_eq!(segments, vec![args("getactivewindow"), args("windowmove 10 -20")]);

        let (globals, segments) = split_args(&args("wmdo --help"));
        assert_eq!(globals, args("wmdo --help"));
        assert!(segments.is_empty());
    }

    #[test]
    fn test_poll_opts() {
        let matches = cli().get_matches_from(args("wmdo"));
        assert_eq!(poll_opts(&matches), PollOpts::new());

        let matches = cli().get_matches_from(args("wmdo --sync-tries 3 --sync-interval 5 --strict-sync"));
        assert_eq!(poll_opts(&matches), PollOpts::new().tries(3).interval(Duration::from_millis(5)).strict(true));
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli().get_matches_from(args("wmdo")).get_count("verbose"), 0);
        assert_eq!(cli().get_matches_from(args("wmdo -vvv")).get_count("verbose"), 3);
    }
}
