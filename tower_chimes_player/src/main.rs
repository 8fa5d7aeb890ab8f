// CLI entry point for the Tower Chimes terminal player.
//
// Seeds a tower, solves it at the configured pace, and redraws the pegs after
// every move. Notes are written to a MIDI file when `--midi` is given and
// discarded otherwise. Command-line flags override the config file, which
// overrides the built-in defaults. See `driver.rs` for the playback loop.
//
// Usage:
//   chimes [OPTIONS]
//     --config <PATH>     JSON config file
//     --height <N>        Tower height (default: 3)
//     --pace <BPM>        Moves per minute, 30-300 (default: 150)
//     --volume <N>        Volume, 0-100 (default: 100)
//     --palette <NAME>    ryb, rgb, rainbow, light1, light2 (default: ryb)
//     --midi <PATH>       Record the solve to a MIDI file

use std::path::PathBuf;
use std::process;

use tower_chimes_music::{AudioSink, MidiRecorder, SilentSink};
use tower_chimes_player::{
    DriverEvent, DriverSettings, Pace, Palette, PlayerConfig, PlayerError, Session, Volume,
    render_legend, render_tower, start_driver,
};

#[derive(Default)]
struct Args {
    config: Option<PathBuf>,
    height: Option<u32>,
    pace: Option<u32>,
    volume: Option<u8>,
    palette: Option<String>,
    midi: Option<PathBuf>,
}

fn main() {
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("chimes: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), PlayerError> {
    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(bpm) = args.pace {
        config.pace = Pace::new(bpm)?;
    }
    if let Some(level) = args.volume {
        config.volume = Volume::new(level)?;
    }
    if let Some(name) = &args.palette {
        config.palette = name.parse::<Palette>()?;
    }
    config.validate()?;

    let audio: Box<dyn AudioSink> = match args.midi {
        Some(path) => Box::new(MidiRecorder::new(path)),
        None => Box::new(SilentSink),
    };

    let mut session = Session::new(&config);
    let (handle, events) = start_driver(DriverSettings::from(&config), audio)?;
    handle.send(session.submit());

    println!(
        "Solving {} blocks at {} moves/min ({} palette)",
        config.height,
        config.pace.bpm(),
        config.palette
    );

    let mut mirror = None;
    for event in events.iter() {
        session.observe(&event);
        match event {
            DriverEvent::Seeded { tower } => {
                print!("{}", render_legend(&tower, config.palette));
                print!("{}", render_tower(&tower));
                mirror = Some(tower);
            }
            DriverEvent::Moved {
                applied,
                index,
                total,
            } => {
                let Some(tower) = mirror.as_mut() else {
                    continue;
                };
                if let Err(e) = tower.apply(&applied.step) {
                    eprintln!("Display out of sync: {e}");
                    break;
                }
                println!(
                    "\nMove {index}/{total}: block {} from {} to {}",
                    applied.block.width, applied.step.from, applied.step.to
                );
                print!("{}", render_tower(tower));
            }
            DriverEvent::NoteRequested { pitch, .. } => println!("  ♪ {pitch}"),
            DriverEvent::SolveComplete { moves } => {
                println!("\nSolved in {moves} moves.");
                break;
            }
            DriverEvent::Reset { .. } => break,
            DriverEvent::Fault(e) => {
                eprintln!("Solve halted: {e}");
                break;
            }
            DriverEvent::Rejected(e) => eprintln!("Rejected: {e}"),
        }
    }

    handle.stop();
    Ok(())
}

/// Parse command-line arguments with plain `std::env::args()` matching.
fn parse_args() -> Args {
    let mut parsed = Args::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                parsed.config = Some(value(&args, i, "--config requires a path").into());
            }
            "--height" => {
                i += 1;
                parsed.height = Some(number(&args, i, "--height requires a number"));
            }
            "--pace" => {
                i += 1;
                parsed.pace = Some(number(&args, i, "--pace requires a number"));
            }
            "--volume" => {
                i += 1;
                parsed.volume = Some(number(&args, i, "--volume requires a number 0-100"));
            }
            "--palette" => {
                i += 1;
                parsed.palette = Some(value(&args, i, "--palette requires a name"));
            }
            "--midi" => {
                i += 1;
                parsed.midi = Some(value(&args, i, "--midi requires a path").into());
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn value(args: &[String], i: usize, message: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{message}");
        process::exit(1);
    })
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, message: &str) -> T {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("{message}");
        process::exit(1);
    })
}

fn print_usage() {
    println!("Usage: chimes [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>     JSON config file");
    println!("  --height <N>        Tower height (default: 3)");
    println!("  --pace <BPM>        Moves per minute, 30-300 (default: 150)");
    println!("  --volume <N>        Volume, 0-100 (default: 100)");
    println!("  --palette <NAME>    ryb, rgb, rainbow, light1, light2 (default: ryb)");
    println!("  --midi <PATH>       Record the solve to a MIDI file");
    println!("  --help, -h          Show this help");
}
