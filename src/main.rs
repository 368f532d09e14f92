//! SYN6288 command-line tool: entry point.
//!
//! Opens the chip on a serial port (or a simulated chip with `--mock`),
//! optionally pushes a saved profile to it, runs one command and closes it.
//!
//! ```text
//! syn6288 [--port <PORT>] [--baud <BPS>] [--config <FILE>] [--mock] <COMMAND>
//!
//! Commands:
//!   info [--json]             Chip and driver description
//!   ports                     List serial ports
//!   say <TEXT> [--wait]       Speak text
//!   sound|message|ring <SEL>  Play a built-in prompt
//!   status [--json] | sync    Query or wait for idle
//!   stop | pause | resume | power-down
//!   volume | background-volume | speed <N>
//!   raw <COMMAND>             Send a bracket-tagged control string
//!   init-config <FILE>        Write a default profile
//! ```
//!
//! Playback commands (`say`, `sound`, `message`, `ring`) are refused while
//! the chip is still busy.
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=syn6288=debug` to
//! trace every frame.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use syn6288_lib::adapters::{
    load_config, save_config, LogSink, MockSyn6288, SerialPortFactory, ThreadDelay,
};
use syn6288_lib::domain::{DriverConfig, Message, Mode, Ring, Sound, Status, TextType};
use syn6288_lib::ports::{SerialConnection, SerialFactory};
use syn6288_lib::Syn6288;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Drive a SYN6288 speech-synthesis chip over a serial port.
#[derive(Debug, Parser)]
#[command(name = "syn6288", version, about)]
struct Cli {
    /// Serial port the chip is attached to (overrides the profile)
    #[arg(long, env = "SYN6288_PORT")]
    port: Option<String>,

    /// UART speed in bps: 9600, 19200 or 38400 (overrides the profile)
    #[arg(long)]
    baud: Option<u32>,

    /// JSON profile to load and push to the chip after init
    #[arg(long, env = "SYN6288_CONFIG")]
    config: Option<PathBuf>,

    /// Talk to a simulated chip instead of real hardware
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Cmd,
}

/// Commands that never open the chip, plus the ones that do.
#[derive(Debug, Subcommand)]
enum Cmd {
    /// Print the chip and driver description
    Info {
        #[arg(long)]
        json: bool,
    },
    /// List serial ports
    Ports,
    /// Write a default profile to FILE
    InitConfig { path: PathBuf },
    #[command(flatten)]
    Device(DeviceCmd),
}

#[derive(Debug, Subcommand)]
enum DeviceCmd {
    /// Speak text, passed to the chip byte-for-byte
    Say {
        text: String,
        /// Background track 1-15 to mix under the speech
        #[arg(long)]
        background: Option<u8>,
        /// How the chip should read the text bytes: gb2312, gbk, big5, unicode
        #[arg(long)]
        text_type: Option<TextType>,
        /// Block until the chip is idle again
        #[arg(long)]
        wait: bool,
        /// Give up waiting after this many milliseconds
        #[arg(long, requires = "wait")]
        timeout_ms: Option<u64>,
    },
    /// Play built-in sound A-Y
    Sound { sound: Sound },
    /// Play built-in message tone A-H
    Message { message: Message },
    /// Play built-in ring tone A-O
    Ring { ring: Ring },
    /// Report whether the chip is idle or busy
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Wait until the chip is idle
    Sync {
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    Stop,
    Pause,
    Resume,
    PowerDown,
    /// Set synthesis volume, 0-16
    Volume { level: u8 },
    /// Set background music volume, 0-16
    BackgroundVolume { level: u8 },
    /// Set synthesis speed, 0-5
    Speed { level: u8 },
    /// Send a raw control string such as "v[6]"
    Raw { command: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli {
        port,
        baud,
        config,
        mock,
        command,
    } = Cli::parse();

    match command {
        Cmd::Info { json } => print_info(json),
        Cmd::Ports => list_ports(),
        Cmd::InitConfig { path } => {
            save_config(&path, &DriverConfig::default())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote default profile to {}", path.display());
            Ok(())
        }
        Cmd::Device(cmd) => {
            let mut profile = match &config {
                Some(path) => load_config(path)
                    .with_context(|| format!("failed to load profile {}", path.display()))?,
                None => DriverConfig::default(),
            };
            if let Some(baud) = baud {
                profile.baud_rate = baud;
            }
            if port.is_some() {
                profile.serial_port = port;
            }
            with_device(&profile, config.is_some(), mock, cmd)
        }
    }
}

/// Open the chip, optionally push `profile`, run `cmd`, and always close it.
fn with_device(
    profile: &DriverConfig,
    apply_profile: bool,
    mock: bool,
    cmd: DeviceCmd,
) -> anyhow::Result<()> {
    let serial: Box<dyn SerialConnection> = if mock {
        Box::new(MockSyn6288::new())
    } else {
        let port = profile
            .serial_port
            .as_deref()
            .context("no serial port given; use --port or a profile with serial_port")?;
        SerialPortFactory::connection(port, profile.baud_rate)
    };

    let mut tts = Syn6288::with_bindings(serial, Box::new(ThreadDelay), Box::new(LogSink::new()));
    tts.init().context("failed to initialise SYN6288")?;

    let result = (|| -> anyhow::Result<()> {
        if apply_profile {
            tts.configure(profile).context("failed to apply profile")?;
            log::info!(
                "Profile applied: {} bps, {} mode, volume {}, speed {}",
                tts.baud_rate()?.bps(),
                tts.mode()?,
                tts.volume()?,
                tts.speed()?
            );
        }
        run(&mut tts, cmd)
    })();

    // Report the command's error ahead of any close failure
    let closed = tts.deinit().context("failed to close SYN6288");
    result.and(closed)
}

fn run(tts: &mut Syn6288, cmd: DeviceCmd) -> anyhow::Result<()> {
    match cmd {
        DeviceCmd::Say {
            text,
            background,
            text_type,
            wait,
            timeout_ms,
        } => {
            ensure_idle(tts)?;
            if let Some(track) = background {
                tts.set_mode(Mode::background(track)?)?;
            }
            if let Some(text_type) = text_type {
                tts.set_text_type(text_type)?;
            }
            log::info!("Speaking {} bytes in {} mode", text.len(), tts.mode()?);
            tts.synthesis_text(text.as_bytes())?;
            if wait {
                wait_idle(tts, timeout_ms)?;
            }
        }
        DeviceCmd::Sound { sound } => {
            ensure_idle(tts)?;
            tts.synthesis_sound(sound)?;
        }
        DeviceCmd::Message { message } => {
            ensure_idle(tts)?;
            tts.synthesis_message(message)?;
        }
        DeviceCmd::Ring { ring } => {
            ensure_idle(tts)?;
            tts.synthesis_ring(ring)?;
        }
        DeviceCmd::Status { json } => {
            let status = tts.status()?;
            if json {
                println!("{}", serde_json::to_string(&status)?);
            } else {
                let label = match status {
                    Status::Idle => "idle",
                    Status::Busy => "busy",
                };
                println!("{label}");
            }
        }
        DeviceCmd::Sync { timeout_ms } => wait_idle(tts, timeout_ms)?,
        DeviceCmd::Stop => tts.stop()?,
        DeviceCmd::Pause => tts.pause()?,
        DeviceCmd::Resume => tts.resume()?,
        DeviceCmd::PowerDown => tts.power_down()?,
        DeviceCmd::Volume { level } => tts.set_volume(level)?,
        DeviceCmd::BackgroundVolume { level } => tts.set_background_volume(level)?,
        DeviceCmd::Speed { level } => tts.set_speed(level)?,
        DeviceCmd::Raw { command } => tts.send_command(&command)?,
    }
    Ok(())
}

/// Refuse to start playback over an utterance that is still running.
fn ensure_idle(tts: &mut Syn6288) -> anyhow::Result<()> {
    if tts.status()? == Status::Busy {
        bail!("chip is busy; try `syn6288 sync` or `syn6288 stop` first");
    }
    Ok(())
}

fn wait_idle(tts: &mut Syn6288, timeout_ms: Option<u64>) -> anyhow::Result<()> {
    match timeout_ms {
        Some(ms) => tts.sync_timeout(Duration::from_millis(ms))?,
        None => tts.sync()?,
    }
    Ok(())
}

fn print_info(json: bool) -> anyhow::Result<()> {
    let info = Syn6288::info();
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("chip name:      {}", info.chip_name);
    println!("manufacturer:   {}", info.manufacturer_name);
    println!("interface:      {}", info.interface);
    println!(
        "supply voltage: {:.1}V - {:.1}V",
        info.supply_voltage_min_v, info.supply_voltage_max_v
    );
    println!("max current:    {:.1}mA", info.max_current_ma);
    println!(
        "temperature:    {:.1}C - {:.1}C",
        info.temperature_min, info.temperature_max
    );
    println!(
        "driver version: {}.{}",
        info.driver_version / 1000,
        (info.driver_version % 1000) / 100
    );
    Ok(())
}

fn list_ports() -> anyhow::Result<()> {
    let ports = SerialPortFactory::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{:<24} {}", port.name, port.port_type);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn6288_lib::ports::Delay;

    struct NoDelay;

    impl Delay for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
    }

    fn speaking_chip() -> Syn6288 {
        let mut tts = Syn6288::with_bindings(
            Box::new(MockSyn6288::with_busy_polls(5)),
            Box::new(NoDelay),
            Box::new(LogSink::new()),
        );
        tts.init().unwrap();
        run(
            &mut tts,
            DeviceCmd::Say {
                text: "hello".into(),
                background: None,
                text_type: None,
                wait: false,
                timeout_ms: None,
            },
        )
        .unwrap();
        tts
    }

    #[test]
    fn prompts_are_refused_while_busy() {
        let mut tts = speaking_chip();
        let prompts = [
            DeviceCmd::Sound {
                sound: Sound::new('a').unwrap(),
            },
            DeviceCmd::Message {
                message: Message::new('a').unwrap(),
            },
            DeviceCmd::Ring {
                ring: Ring::new('a').unwrap(),
            },
        ];
        for cmd in prompts {
            let err = run(&mut tts, cmd).unwrap_err();
            assert!(err.to_string().contains("busy"), "{err}");
        }
    }

    #[test]
    fn prompt_plays_once_chip_is_idle() {
        let mut tts = speaking_chip();
        run(&mut tts, DeviceCmd::Stop).unwrap();
        run(
            &mut tts,
            DeviceCmd::Ring {
                ring: Ring::new('b').unwrap(),
            },
        )
        .unwrap();
    }

    #[test]
    fn device_free_commands_parse_separately() {
        let cli = Cli::try_parse_from(["syn6288", "info", "--json"]).unwrap();
        assert!(matches!(cli.command, Cmd::Info { json: true }));
        let cli = Cli::try_parse_from(["syn6288", "--mock", "ring", "c"]).unwrap();
        assert!(matches!(cli.command, Cmd::Device(DeviceCmd::Ring { .. })));
    }
}
