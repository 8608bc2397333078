use libewmh::prelude::*;

fn main() {
    let wm = WindowManager::connect(None).unwrap();
    println!("X11 Information");
    println!("-----------------------------------------------------------------------");
    println!("Root Window:       {}", wm.root());
    println!("Desktops:          {}", wm.desktops().map(|x| x.to_string()).unwrap_or_else(|e| e.to_string()));
    println!("Current Desktop:   {}", wm.current_desktop().map(|x| x.to_string()).unwrap_or_else(|e| e.to_string()));
    println!();
    println!("Screens");
    println!("{:-<72}", "");
    println!("{:<6} {:<6} {:<6} {:<6} {}", "INDEX", "X", "Y", "W", "H");
    for screen in wm.screens().unwrap() {
        println!("{:<6} {:<6} {:<6} {:<6} {}", screen.index, screen.x, screen.y, screen.width, screen.height);
    }
    println!();
    println!("Active Window");
    println!("{:-<72}", "");
    println!("{:<8} {:<3} {:<6} {:<5} {:<5} {:<4} {:<4} {:<6} {}", "ID", "DSK", "PID", "X", "Y", "W", "H", "SCREEN", "NAME");

    let win = wm.active_win().unwrap();
    let desktop = wm.win_desktop(win).map(|x| x as i64).unwrap_or(-1);
    let pid = wm.win_pid(win).map(|x| x as i64).unwrap_or(-1);
    let loc = wm.win_location(win).unwrap_or(Location { x: 0, y: 0, screen: None });
    let (w, h) = wm.win_size(win).unwrap_or((0, 0));
    let screen = loc.screen.map(|x| x.to_string()).unwrap_or_else(|| "none".to_owned());
    let name = wm.win_name(win).ok().flatten().unwrap_or_default();
    println!(
        "{:<8} {:<3} {:<6} {:<5} {:<5} {:<4} {:<4} {:<6} {}",
        format!("{:0>8}", win),
        format!("{:>2}", desktop),
        pid,
        loc.x,
        loc.y,
        w,
        h,
        screen,
        name
    );
}
