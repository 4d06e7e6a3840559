mod config;
mod logging;
mod ui;

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use chronodeck_adapters::{
    present_clock_json, present_clock_reading, present_lap_rows, SystemClock,
    ThreadIntervalScheduler,
};
use chronodeck_application::{
    AddAlarmCommand, ApplicationService, BootstrapCommand, ClockReadingQuery, LapStopwatchCommand,
    LapsQuery, PumpTimersCommand, StartStopwatchCommand, StopStopwatchCommand,
    StopwatchDisplayQuery,
};
use chronodeck_domain::format_elapsed;
use config::AppConfig;

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };
    logging::init_logging(&config.log_filter);

    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args);
    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    ApplicationService::new(
        Box::new(SystemClock::new()),
        Box::new(ThreadIntervalScheduler),
        config.service_config(),
    )
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ui,
    Now { json: bool },
    Format { ms: u64 },
    Watch { seconds: u64, alarm: Option<AddAlarmCommand> },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    if args.len() <= 1 {
        return Ok(Command::Ui);
    }

    match args[1].as_str() {
        "ui" => Ok(Command::Ui),
        "now" => match args.get(2).map(String::as_str) {
            None => Ok(Command::Now { json: false }),
            Some("--json") => Ok(Command::Now { json: true }),
            Some(other) => Err(CommandError::Usage(format!("unknown flag: {other}"))),
        },
        "format" => {
            let raw = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing milliseconds".to_string()))?;
            let ms = raw
                .parse::<u64>()
                .map_err(|_| CommandError::Usage(format!("invalid milliseconds: {raw}")))?;
            Ok(Command::Format { ms })
        }
        "watch" => {
            let raw = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing duration in seconds".to_string()))?;
            let seconds = raw
                .parse::<u64>()
                .map_err(|_| CommandError::Usage(format!("invalid duration: {raw}")))?;
            let alarm = args.get(3).map(|time| AddAlarmCommand {
                time: time.clone(),
                label: args[4..].join(" "),
            });
            Ok(Command::Watch { seconds, alarm })
        }
        other => Err(CommandError::Usage(format!("unknown command: {other}"))),
    }
}

fn run_command(
    command: Result<Command, CommandError>,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command? {
        Command::Ui => {
            let service = build_application_service(config);
            ui::launch_window(service, config).map_err(CommandError::Runtime)
        }
        Command::Now { json } => {
            let service = build_application_service(config);
            let reading = service.clock_reading(ClockReadingQuery);
            if json {
                let encoded = present_clock_json(&reading)
                    .map_err(|error| CommandError::Runtime(error.to_string()))?;
                println!("{encoded}");
            } else {
                println!("{}", present_clock_reading(&reading));
            }
            Ok(())
        }
        Command::Format { ms } => {
            println!("{}", format_elapsed(ms));
            Ok(())
        }
        Command::Watch { seconds, alarm } => run_watch(config, seconds, alarm),
    }
}

/// Headless run: clock and stopwatch tick for `seconds`, with a lap taken on
/// every clock tick.
fn run_watch(
    config: &AppConfig,
    seconds: u64,
    alarm: Option<AddAlarmCommand>,
) -> Result<(), CommandError> {
    let mut service = build_application_service(config);
    if let Some(alarm) = alarm {
        service
            .add_alarm(alarm)
            .map_err(|error| CommandError::Usage(format!("invalid alarm: {error}")))?;
    }
    service
        .bootstrap(BootstrapCommand)
        .map_err(|error| CommandError::Runtime(format!("failed to start clock: {error}")))?;
    service
        .start_stopwatch(StartStopwatchCommand)
        .map_err(|error| CommandError::Runtime(format!("failed to start stopwatch: {error}")))?;

    let poll = config.service_config().stopwatch_period;
    let deadline = Instant::now() + Duration::from_secs(seconds);
    while Instant::now() < deadline {
        if service.pump(PumpTimersCommand).clock_ticks > 0 {
            println!(
                "{}\tstopwatch {}",
                present_clock_reading(&service.clock_reading(ClockReadingQuery)),
                service.stopwatch_display(StopwatchDisplayQuery)
            );
            service.lap_stopwatch(LapStopwatchCommand);
        }
        if let Some(notification) = service.take_notification() {
            println!("alarm: {}", notification.message);
        }
        thread::sleep(poll);
    }

    service.stop_stopwatch(StopStopwatchCommand);
    println!("elapsed {}", service.stopwatch_display(StopwatchDisplayQuery));
    for row in present_lap_rows(&service.laps(LapsQuery)) {
        println!("{row}");
    }
    service.shutdown();
    Ok(())
}

fn print_usage() {
    println!("usage:");
    println!("  chronodeck ui");
    println!("  chronodeck now [--json]");
    println!("  chronodeck format <milliseconds>");
    println!("  chronodeck watch <seconds> [HH:MM [label]]");
}
