//! Commands are xdotool style verbs. Each verb parses its own arguments and runs against the
//! shared [`CommandContext`]; verbs that discover a window push it on the window stack and verbs
//! that need a window fall back to the stack when none is given.
use std::{num::ParseIntError, thread, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use libewmh::prelude::*;
use tracing::debug;
use witcher::prelude::*;

/// State shared by a chain of commands for a single run
pub struct CommandContext<'a> {
    pub wm: &'a WindowManager,
    pub stack: WindowStack,
    pub poll: PollOpts,
}

impl<'a> CommandContext<'a> {
    /// Create a new context with an empty window stack
    pub fn new(wm: &'a WindowManager, poll: PollOpts) -> Self {
        Self { wm, stack: WindowStack::new(), poll }
    }
}

/// Verb describes a single command
pub struct Verb {
    pub name: &'static str,
    pub about: &'static str,
    pub args: fn(Command) -> Command,
    pub run: fn(&mut CommandContext, &ArgMatches) -> Result<()>,
}

impl Verb {
    /// Build the argument parser for this verb
    pub fn command(&self) -> Command {
        (self.args)(Command::new(self.name).about(self.about))
    }
}

/// All supported verbs
pub static VERBS: &[Verb] = &[
    Verb {
        name: "getactivewindow",
        about: "Push the current active window on the window stack",
        args: no_args,
        run: get_active_window,
    },
    Verb {
        name: "getwindowfocus",
        about: "Push the client window owning the input focus on the window stack",
        args: window_focus_args,
        run: get_window_focus,
    },
    Verb {
        name: "getwindowname",
        about: "Output the name of a window, also known as the title",
        args: window_arg,
        run: get_window_name,
    },
    Verb {
        name: "getwindowpid",
        about: "Output the PID owning a window from its _NET_WM_PID property",
        args: window_arg,
        run: get_window_pid,
    },
    Verb {
        name: "getwindowgeometry",
        about: "Output the location, size and screen of a window",
        args: window_geometry_args,
        run: get_window_geometry,
    },
    Verb { name: "get_desktop", about: "Output the current desktop in view", args: no_args, run: get_desktop },
    Verb {
        name: "set_desktop",
        about: "Change the current view to the given desktop",
        args: desktop_arg,
        run: set_desktop,
    },
    Verb {
        name: "get_num_desktops",
        about: "Output the current number of desktops",
        args: no_args,
        run: get_num_desktops,
    },
    Verb {
        name: "set_num_desktops",
        about: "Change the number of desktops",
        args: num_desktops_arg,
        run: set_num_desktops,
    },
    Verb {
        name: "get_desktop_for_window",
        about: "Output the desktop containing a window",
        args: window_arg,
        run: get_desktop_for_window,
    },
    Verb {
        name: "set_desktop_for_window",
        about: "Move a window to a different desktop",
        args: window_desktop_args,
        run: set_desktop_for_window,
    },
    Verb {
        name: "windowactivate",
        about: "Activate a window, switching to its desktop first",
        args: window_activate_args,
        run: window_activate,
    },
    Verb {
        name: "windowmove",
        about: "Move a window; 'x' or 'y' keeps the current value and N% is relative to the screen",
        args: window_move_args,
        run: window_move,
    },
    Verb {
        name: "set_screen_for_window",
        about: "Move a window to a different screen keeping its relative position",
        args: window_screen_args,
        run: set_screen_for_window,
    },
    Verb {
        name: "sleep",
        about: "Sleep for the given number of seconds, fractions are allowed",
        args: sleep_args,
        run: sleep,
    },
];

/// Lookup the verb by name
pub fn find(name: &str) -> Option<&'static Verb> {
    VERBS.iter().find(|x| x.name == name)
}

/// One line per verb for the top level help
pub fn summary() -> String {
    let mut out = String::from("Commands:\n");
    for verb in VERBS {
        out += &format!("  {:<24}{}\n", verb.name, verb.about);
    }
    out += "\nCommands may be chained, windows found by one command are used by the next.";
    out
}

/// Parse a window id given as decimal or as hex with a `0x` prefix
pub fn parse_window(val: &str) -> std::result::Result<Window, ParseIntError> {
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => Window::from_str_radix(hex, 16),
        None => val.parse::<Window>(),
    }
}

// Argument schemas
// -------------------------------------------------------------------------------------------------
fn no_args(cmd: Command) -> Command {
    cmd
}

fn window_arg(cmd: Command) -> Command {
    cmd.arg(Arg::new("WINDOW").value_parser(parse_window).help("Window id, defaults to the top of the window stack"))
}

// Optional window id followed by the given required values. Optional positionals can't lead
// required ones so they share a single multi value argument.
fn window_values(cmd: Command, names: &[&'static str]) -> Command {
    let mut value_names = vec!["WINDOW"];
    value_names.extend_from_slice(names);
    cmd.arg(
        Arg::new("ARGS")
            .required(true)
            .num_args(names.len()..=names.len() + 1)
            .value_names(value_names)
            .allow_negative_numbers(true)
            .help("Window id is optional and defaults to the window stack"),
    )
}

fn window_focus_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("force")
            .short('f')
            .action(ArgAction::SetTrue)
            .help("Report the window with focus even if it isn't a client window"),
    )
}

fn window_geometry_args(cmd: Command) -> Command {
    window_arg(cmd)
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .action(ArgAction::SetTrue)
                .help("Output values suitable for 'eval' in a shell"),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .default_value("")
                .help("Prefix for shell variable names"),
        )
}

fn desktop_arg(cmd: Command) -> Command {
    cmd.arg(Arg::new("DESKTOP").required(true).value_parser(value_parser!(u32)).help("Desktop to switch to"))
}

fn num_desktops_arg(cmd: Command) -> Command {
    cmd.arg(Arg::new("NUM").required(true).value_parser(value_parser!(u32)).help("New number of desktops"))
}

fn window_desktop_args(cmd: Command) -> Command {
    window_values(cmd, &["DESKTOP"])
}

fn sync_arg() -> Arg {
    Arg::new("sync").long("sync").action(ArgAction::SetTrue).help("Wait until the window manager has acted")
}

fn window_activate_args(cmd: Command) -> Command {
    window_arg(cmd).arg(sync_arg())
}

fn window_move_args(cmd: Command) -> Command {
    window_values(cmd, &["X", "Y"])
        .arg(sync_arg())
        .arg(
            Arg::new("relative")
                .long("relative")
                .action(ArgAction::SetTrue)
                .help("Move relative to the current window position"),
        )
        .arg(
            Arg::new("screen")
                .long("screen")
                .value_parser(value_parser!(usize))
                .help("Screen to use for percentages, defaults to the window's screen"),
        )
}

fn window_screen_args(cmd: Command) -> Command {
    window_values(cmd, &["SCREEN"]).arg(
        Arg::new("relative").long("relative").action(ArgAction::SetTrue).help("Move relative to the current screen"),
    )
}

fn sleep_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("SECONDS").required(true).value_parser(value_parser!(f64)).help("Number of seconds"))
}

// Argument access
// -------------------------------------------------------------------------------------------------
fn window(m: &ArgMatches) -> Option<Window> {
    m.get_one::<Window>("WINDOW").copied()
}

// Split the shared positional values into the optional leading window id and the given number
// of required values
fn window_and_values(m: &ArgMatches, count: usize) -> Result<(Option<Window>, Vec<String>)> {
    let mut vals: Vec<String> = m.get_many::<String>("ARGS").map(|x| x.cloned().collect()).unwrap_or_default();
    if vals.len() > count {
        let first = vals.remove(0);
        let win = parse_window(&first).wrap(&format!("invalid window id '{}'", first))?;
        return Ok((Some(win), vals));
    }
    Ok((None, vals))
}

fn value<T: std::str::FromStr>(val: &str, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>().wrap(&format!("invalid {} '{}'", name, val))
}

// Handlers
// -------------------------------------------------------------------------------------------------
fn get_active_window(ctx: &mut CommandContext, _: &ArgMatches) -> Result<()> {
    let win = ctx.wm.active_win().pass()?;
    ctx.stack.push(win);
    Ok(())
}

fn get_window_focus(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let win = if m.get_flag("force") { ctx.wm.focused_win().pass()? } else { ctx.wm.focused_win_sane().pass()? };
    ctx.stack.push(win);
    Ok(())
}

fn get_window_name(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let win = ctx.stack.pop_or(window(m)).pass()?;
    println!("{}", ctx.wm.win_name(win).pass()?.unwrap_or_default());
    Ok(())
}

fn get_window_pid(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let win = ctx.stack.pop_or(window(m)).pass()?;
    println!("{}", ctx.wm.win_pid(win).pass()?);
    Ok(())
}

fn get_window_geometry(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let prefix = m.get_one::<String>("prefix").map(|x| x.as_str()).unwrap_or("");
    for win in ctx.stack.take_targets(window(m)).pass()? {
        let (w, h) = ctx.wm.win_size(win).pass()?;
        let loc = ctx.wm.win_location(win).pass()?;
        let screen = loc.screen.map(|x| x.to_string()).unwrap_or_else(|| "none".to_string());
        if m.get_flag("shell") {
            println!("{}WINDOW={}", prefix, win);
            println!("{}X={}", prefix, loc.x);
            println!("{}Y={}", prefix, loc.y);
            println!("{}WIDTH={}", prefix, w);
            println!("{}HEIGHT={}", prefix, h);
            println!("{}SCREEN={}", prefix, screen);
        } else {
            println!("Window {}", win);
            println!("  Position: {},{} (screen: {})", loc.x, loc.y, screen);
            println!("  Geometry: {}x{}", w, h);
        }
    }
    Ok(())
}

fn get_desktop(ctx: &mut CommandContext, _: &ArgMatches) -> Result<()> {
    println!("{}", ctx.wm.current_desktop().pass()?);
    Ok(())
}

fn set_desktop(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let desktop = m.get_one::<u32>("DESKTOP").copied().unwrap_or_default();
    ctx.wm.set_current_desktop(desktop).pass()
}

fn get_num_desktops(ctx: &mut CommandContext, _: &ArgMatches) -> Result<()> {
    println!("{}", ctx.wm.desktops().pass()?);
    Ok(())
}

fn set_num_desktops(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let desktops = m.get_one::<u32>("NUM").copied().unwrap_or_default();
    ctx.wm.set_desktops(desktops).pass()
}

fn get_desktop_for_window(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let win = ctx.stack.pop_or(window(m)).pass()?;
    println!("{}", ctx.wm.win_desktop(win).pass()?);
    Ok(())
}

fn set_desktop_for_window(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let (win, vals) = window_and_values(m, 1)?;
    let desktop = value::<u32>(&vals[0], "desktop")?;
    for win in ctx.stack.take_targets(win).pass()? {
        ctx.wm.set_win_desktop(win, desktop).pass()?;
    }
    Ok(())
}

fn window_activate(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let win = ctx.stack.pop_or(window(m)).pass()?;
    ctx.wm.activate_win(win).pass()?;
    if m.get_flag("sync") {
        ctx.wm.wait_for_active(win, true, &ctx.poll).pass()?;
    }
    Ok(())
}

fn window_move(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let (win, vals) = window_and_values(m, 2)?;
    let cx = Coord::parse(&vals[0], "x").pass()?;
    let cy = Coord::parse(&vals[1], "y").pass()?;
    let relative = m.get_flag("relative");

    let win = ctx.stack.pop_or(win).pass()?;
    let orig = ctx.wm.win_location(win).pass()?;
    let (w, h) = ctx.wm.win_size(win).pass()?;
    let index = m.get_one::<usize>("screen").copied().or(orig.screen);
    let screen = ctx.wm.screen_at(index.ok_or(WindowManagerError::NoScreenForWindow(win)).pass()?).pass()?;

    let x = cx.resolve(orig.x, w, screen.x, screen.width, relative);
    let y = cy.resolve(orig.y, h, screen.y, screen.height, relative);
    debug!("windowmove: id: {}, from: {},{}, to: {},{}", win, orig.x, orig.y, x, y);
    ctx.wm.move_win(win, x, y).pass()?;

    if m.get_flag("sync") && (x, y) != (orig.x, orig.y) {
        ctx.wm.wait_for_move(win, (orig.x, orig.y), (x, y), &ctx.poll).pass()?;
    }
    Ok(())
}

fn set_screen_for_window(ctx: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let (win, vals) = window_and_values(m, 1)?;
    let requested = value::<i64>(&vals[0], "screen")?;
    let relative = m.get_flag("relative");

    let wins = ctx.stack.take_targets(win).pass()?;
    let screens = ctx.wm.screens().pass()?;
    for win in wins {
        let loc = ctx.wm.win_location(win).pass()?;
        let (w, h) = ctx.wm.win_size(win).pass()?;
        let index = loc.screen.ok_or(WindowManagerError::NoScreenForWindow(win)).pass()?;
        let source = screens.get(index).ok_or(WindowManagerError::InvalidScreen(index)).pass()?;

        let target = if relative {
            (index as i64 + requested).rem_euclid(screens.len() as i64) as usize
        } else {
            usize::try_from(requested).wrap(&format!("invalid screen {}", requested))?
        };
        let target = screens.get(target).ok_or(WindowManagerError::InvalidScreen(target)).pass()?;
        if source == target {
            continue;
        }

        let (x, y) = source.translate(target, loc.x, loc.y, w, h);
        debug!("set_screen_for_window: id: {}, screen: {} => {}", win, source.index, target.index);
        ctx.wm.move_win(win, x, y).pass()?;
    }
    Ok(())
}

fn sleep(_: &mut CommandContext, m: &ArgMatches) -> Result<()> {
    let secs = m.get_one::<f64>("SECONDS").copied().unwrap_or_default();
    thread::sleep(Duration::try_from_secs_f64(secs).wrap(&format!("invalid sleep time {}", secs))?);
    Ok(())
}
