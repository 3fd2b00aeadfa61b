use std::{
    fs::File,
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Sender},
        Arc,
    },
    thread::{sleep, Builder},
    time::Duration,
};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use device::{
    config::{DeviceConfig, NegotiationConfig},
    loopback::{LoopbackBus, LoopbackEndpoint},
    negotiator::NegotiationError,
    Handheld,
};
use env_logger::{Env, Target};
use keypad::{KeyState, Keypad};
use log::{error, info};
use pacer::FramePacer;
use screen::Lcd;
use shared::game_state::Role;

mod keypad;
mod pacer;
mod screen;

/// two pong handhelds wired to each other, side by side in one terminal.
///
/// the left handheld is steered with w, s and space, the right one with the arrow keys and
/// enter. ctrl-c quits.
#[derive(Parser)]
struct Cli {
    /// delay before the second handheld is powered on, in milliseconds
    #[arg(long, default_value_t = 500)]
    stagger_ms: u64,
    /// probability that a transfer loses its tail, from 0 to 1
    #[arg(long, default_value_t = 0.0, value_parser = parse_loss_rate)]
    loss_rate: f64,
    /// seconds a listening handheld waits to be probed before it tries again
    #[arg(long, default_value_t = 10)]
    listen_timeout: u64,
    /// negotiation rounds before a handheld gives up
    #[arg(long, default_value_t = 3)]
    attempts: u32,
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(1..))]
    frame_rate: u8,
    /// write logs to this file, filtered by RUST_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_loss_rate(arg: &str) -> Result<f64, String> {
    let rate = arg.parse::<f64>().map_err(|err| err.to_string())?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("{arg} is not between 0 and 1"));
    }
    Ok(rate)
}

fn main() {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        if let Err(err) = init_logging(path) {
            eprintln!("cannot open {}: {err}", path.display());
            return;
        }
    }
    if let Err(err) = enable_raw_mode().and_then(|()| {
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )
    }) {
        eprintln!("cannot set up the terminal: {err}");
        return;
    }
    let quit = run(cli);
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
    match quit {
        Ok(Quit::CtrlC) => println!("^C"),
        Ok(Quit::PairingFailed { handheld, err }) => {
            println!("handheld {handheld} failed to pair: {err}")
        }
        Err(err) => println!("error occurred: {err}"),
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(cli: Cli) -> io::Result<Quit> {
    let config = DeviceConfig {
        frame_rate: cli.frame_rate,
        negotiation: NegotiationConfig {
            listen_timeout: Duration::from_secs(cli.listen_timeout),
            max_attempts: cli.attempts,
            ..Default::default()
        },
        ..Default::default()
    };
    let bus = LoopbackBus::with_loss_rate(cli.loss_rate);
    let keys = KeyState::default();
    let running = Arc::new(AtomicBool::new(true));
    let (device_event_tx, device_event_rx) = channel();

    let mut screens = Vec::new();
    for handheld in 1..=2 {
        let keypad = if handheld == 1 {
            Keypad::player_one(keys.clone())
        } else {
            Keypad::player_two(keys.clone())
        };
        let (lcd, front) = Lcd::new();
        power_on(
            handheld,
            Handheld::new(bus.endpoint(), lcd, keypad, config.clone()),
            Duration::from_millis(cli.stagger_ms * (handheld as u64 - 1)),
            running.clone(),
            device_event_tx.clone(),
        )?;
        screens.push((format!("handheld {handheld}: pairing"), front));
    }

    let mut stdout = stdout();
    let quit = loop {
        for event in device_event_rx.try_iter() {
            match event {
                DeviceEvent::Paired { handheld, role } => {
                    screens[handheld - 1].0 = match role {
                        Role::Authority => format!("handheld {handheld}: authority"),
                        Role::Follower => format!("handheld {handheld}: follower"),
                    };
                }
                DeviceEvent::PairingFailed { handheld, err } => {
                    running.store(false, Ordering::Relaxed);
                    return Ok(Quit::PairingFailed { handheld, err });
                }
            }
        }
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.modifiers == KeyModifiers::CONTROL
                    && key_event.code == KeyCode::Char('c')
                {
                    break Quit::CtrlC;
                }
                match key_event.kind {
                    KeyEventKind::Release => keys.release(key_event.code),
                    KeyEventKind::Press | KeyEventKind::Repeat => keys.press(key_event.code),
                }
            }
        }
        let frames = screens
            .iter()
            .map(|(title, front)| {
                let frame = front
                    .lock()
                    .map(|frame| frame.clone())
                    .unwrap_or_default();
                (title.clone(), frame)
            })
            .collect::<Vec<_>>();
        screen::draw(&mut stdout, &frames)?;
    };
    running.store(false, Ordering::Relaxed);
    Ok(quit)
}

/// runs one handheld on its own thread from power on until `running` is cleared.
fn power_on(
    handheld: usize,
    mut device: Handheld<LoopbackEndpoint, Lcd, Keypad>,
    delay: Duration,
    running: Arc<AtomicBool>,
    device_event_tx: Sender<DeviceEvent>,
) -> io::Result<()> {
    Builder::new()
        .name(format!("handheld_{handheld}"))
        .spawn(move || {
            sleep(delay);
            info!("handheld {handheld} powered on");
            let mut session = match device.pair() {
                Ok(session) => session,
                Err(err) => {
                    error!("handheld {handheld} failed to pair: {err}");
                    let _ = device_event_tx.send(DeviceEvent::PairingFailed { handheld, err });
                    return;
                }
            };
            let _ = device_event_tx.send(DeviceEvent::Paired {
                handheld,
                role: session.role(),
            });
            let mut pacer = FramePacer::new(device.config().frame_period());
            while running.load(Ordering::Relaxed) {
                device.frame(&mut session);
                pacer.wait();
            }
        })?;
    Ok(())
}

enum DeviceEvent {
    Paired { handheld: usize, role: Role },
    PairingFailed { handheld: usize, err: NegotiationError },
}

enum Quit {
    CtrlC,
    PairingFailed { handheld: usize, err: NegotiationError },
}
