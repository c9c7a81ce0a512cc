use std::{
    io::{self, BufRead, Write},
    str::FromStr,
    thread,
};

use log::error;
use tokio::{runtime::Builder as RtBuilder, sync::mpsc::UnboundedReceiver};

use crate::{
    audio::Bell,
    clock::*,
    control::{self, Command, Event, Handle},
    display::Face,
};

/// Prints the events from a receiver, redrawing the clock face in place.
pub fn log_events(mut event_rx: UnboundedReceiver<Event>) {
    let mut last_face = None;
    while let Some(e) = event_rx.blocking_recv() {
        match e {
            Event::Configured(s) => println!("\nClock set to {}. Tap to start.", s),
            Event::ConfigRejected(e) => eprintln!("\n[Error] {}", e),
            Event::Move(..) | Event::Paused | Event::Resumed => {}
            Event::TimeExpired(side) => {
                println!("\n----- TIME UP -----");
                println!("{} ran out of time, {} wins.", side, side.opposite());
            }
            Event::Update(s) => {
                let face = Face::from(&s);
                if last_face.as_ref() != Some(&face) {
                    print!("\r{}", face);
                    let _ = io::stdout().flush();
                    last_face = Some(face);
                }
            }
            Event::Reset => {
                println!("\n----- RESET -----");
                last_face = None;
            }
            Event::Muted(m) => println!("\nSound {}", if m { "off" } else { "on" }),
        }
    }
}

/// Runs the console clock.
pub fn run() {
    println!("Duoclock Console");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let settings = match ask_settings(&mut input) {
        Some(s) => s,
        None => return,
    };

    let Handle {
        event_rx,
        cmd_tx,
        ctrl,
    } = control::Builder::new()
        .settings(settings)
        .tone_sink(Bell)
        .build();

    let runner = thread::spawn(move || {
        match RtBuilder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(ctrl.start()),
            Err(e) => error!("failed to build runtime: {}", e),
        }
    });
    thread::spawn(move || log_events(event_rx));

    println!("Keys: t/b = tap top/bottom, p = pause, r = reset, m = mute, q = quit");
    read_keys(&mut input, |cmd| cmd_tx.send(cmd));

    drop(cmd_tx);
    let _ = runner.join();
}

/// Reads key lines from an input and turns them into commands,
/// until `q` or the end of input.
///
/// A reset asks for the settings of the next game on the same input.
pub fn read_keys(input: &mut impl BufRead, mut send: impl FnMut(Command)) {
    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => (),
        }
        match line.trim() {
            "t" => send(Command::Tap(Side::Top)),
            "b" => send(Command::Tap(Side::Bottom)),
            "p" => send(Command::TogglePause),
            "m" => send(Command::ToggleMute),
            "r" => {
                send(Command::Reset);
                match ask_settings(input) {
                    Some(s) => send(Command::Configure(s)),
                    None => return,
                }
            }
            "q" => return,
            "" => {}
            other => eprintln!("[Error] Unknown key: {}", other),
        }
    }
}

/// Asks for the minutes and the increment of a game.
///
/// Returns `None` at the end of input.
pub fn ask_settings(input: &mut impl BufRead) -> Option<TimingSettings> {
    println!("----- Presets -----");
    for p in PRESETS {
        println!("{:>3} min - {}", p.minutes, p.name);
    }
    let minutes: u32 = ask(input, "Minutes (1-120): ", |m| MINUTES_RANGE.contains(&m))?;
    let increment: u32 = ask(input, "Increment seconds (0-60): ", |i| {
        INCREMENT_RANGE.contains(&i)
    })?;
    match TimingSettings::from_setup(minutes, increment) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("[Error] {}", e);
            None
        }
    }
}

fn ask<T: FromStr + Copy>(
    input: &mut impl BufRead,
    msg: &str,
    predicate: impl Fn(T) -> bool,
) -> Option<T> {
    loop {
        print!("{}", msg);
        let _ = io::stdout().flush();

        let mut buf = String::new();
        match input.read_line(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(_) => (),
        }

        if let Ok(res) = buf.trim().parse() {
            if predicate(res) {
                return Some(res);
            }
        }
        eprintln!("[Error] Input mismatch");
    }
}
