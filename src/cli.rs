//! CLI interface for Waypoint.
//!
//! A harness around the session manager for trying tours without a phone:
//! each subcommand is one user action from the app (start a tour, scan a
//! point, reset, ...) applied to the configured store.

mod format;

use clap::{Parser, Subcommand, ValueEnum};
use waypoint::{
    ScanOutcome, SessionManager,
    clock::Clock,
    model::TourSession,
    scanner::{
        Capabilities, NfcScanner, QrScanner, Scanner, ScannerKind, SimulatedScanner,
        parse_hex_payload, select_scanner,
    },
    storage::KeyValueStore,
};

use format::{format_completion, format_history, format_status, format_tours};

/// Waypoint: scan your way through a tour.
#[derive(Debug, Parser)]
#[command(name = "waypoint", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: walking the campus tour
  1. waypoint tours
  2. waypoint start tour1
  3. waypoint scan point1
     waypoint scan --source nfc '02 65 6e 70 6f 69 6e 74 32'
  4. waypoint status
  5. waypoint scan point3 && waypoint scan point4
     → the tour completes once every point is scanned
  6. waypoint history";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available tours.
    Tours,

    /// Start a tour, abandoning any tour in progress.
    Start {
        /// Tour ID.
        tour: String,
    },

    /// Scan a point of the current tour.
    ///
    /// Completes the tour when this was the last unscanned point.
    Scan {
        /// Point ID, or a hex-encoded NDEF text record with `--source nfc`.
        payload: String,

        /// How the payload was obtained.
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
    },

    /// Complete the current tour if every point has been scanned.
    Complete,

    /// Abandon the current tour without recording it.
    Reset,

    /// Show progress through the current tour.
    Status,

    /// List completed tours.
    History,

    /// Delete the current tour and all history.
    ClearData {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// CLI-facing scan source, mapped to the domain `ScannerKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Text decoded from a QR code.
    Qr,
    /// Hex bytes of an NDEF text record.
    Nfc,
    /// A point ID typed by hand.
    Test,
}

impl SourceArg {
    fn to_domain(self) -> ScannerKind {
        match self {
            Self::Qr => ScannerKind::Camera,
            Self::Nfc => ScannerKind::Nfc,
            Self::Test => ScannerKind::Simulated,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run<S: KeyValueStore, C: Clock>(manager: &mut SessionManager<S, C>) -> Result<(), String> {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Tours => {
            print!(
                "{}",
                format_tours(
                    manager.catalog(),
                    manager.current_session().map(TourSession::tour_id)
                )
            );
            Ok(())
        }
        Command::Start { tour } => cmd_start(manager, &tour),
        Command::Scan { payload, source } => cmd_scan(manager, &payload, source),
        Command::Complete => cmd_complete(manager),
        Command::Reset => {
            manager.reset_progress();
            eprintln!("Progress reset");
            Ok(())
        }
        Command::Status => {
            print!(
                "{}",
                format_status(manager.catalog(), manager.current_session())
            );
            Ok(())
        }
        Command::History => {
            print!("{}", format_history(manager.catalog(), manager.history()));
            Ok(())
        }
        Command::ClearData { yes } => cmd_clear(manager, yes),
    };

    if let Some(e) = manager.take_persistence_error() {
        eprintln!("Warning: {e}");
    }
    result
}

fn cmd_start<S: KeyValueStore, C: Clock>(
    manager: &mut SessionManager<S, C>,
    tour_id: &str,
) -> Result<(), String> {
    manager.start_tour(tour_id).map_err(|e| e.to_string())?;
    if let Some(tour) = manager.current_tour() {
        eprintln!("Started {} ({} points)", tour.name, tour.points.len());
    }
    Ok(())
}

fn cmd_scan<S: KeyValueStore, C: Clock>(
    manager: &mut SessionManager<S, C>,
    payload: &str,
    source: Option<SourceArg>,
) -> Result<(), String> {
    let kind = source.map_or_else(
        || select_scanner(Capabilities::default()),
        SourceArg::to_domain,
    );
    let mut scanner: Box<dyn Scanner> = match kind {
        ScannerKind::Camera => Box::new(QrScanner::new([payload])),
        ScannerKind::Nfc => {
            let record = parse_hex_payload(payload).map_err(|e| e.to_string())?;
            Box::new(NfcScanner::new([record]))
        }
        ScannerKind::Simulated => Box::new(SimulatedScanner::new([payload])),
    };
    let point_id = scanner
        .next_point_id()
        .ok_or("scanner produced nothing")?
        .map_err(|e| e.to_string())?;

    let tour = manager.current_tour().cloned();
    let (outcome, completed) = manager.scan_and_complete(&point_id);
    let completed = completed.cloned();

    let tour_name = tour.as_ref().map_or("the current tour", |t| t.name.as_str());
    match outcome {
        ScanOutcome::Recorded => {}
        ScanOutcome::NoActiveSession => {
            eprintln!("Scanned point ID: {point_id}");
            eprintln!("Start a tour to track progress.");
            return Ok(());
        }
        ScanOutcome::NotInTour => {
            return Err(format!("point {point_id} is not part of {tour_name}"));
        }
        ScanOutcome::AlreadyScanned => {
            return Err(format!("point {point_id} was already scanned"));
        }
    }

    let name = tour
        .as_ref()
        .and_then(|t| t.point(&point_id))
        .map_or(point_id.as_str(), |p| p.name.as_str());
    eprintln!("Scanned {name}");

    match (&tour, completed) {
        (Some(tour), Some(completed)) => print!("{}", format_completion(tour, &completed)),
        _ => {
            if let Some(progress) = manager.progress() {
                eprintln!("{}/{} points", progress.scanned, progress.total);
            }
        }
    }
    Ok(())
}

fn cmd_complete<S: KeyValueStore, C: Clock>(
    manager: &mut SessionManager<S, C>,
) -> Result<(), String> {
    let Some(tour) = manager.current_tour().cloned() else {
        return Err("no tour in progress".to_string());
    };
    match manager.complete_tour() {
        Some(completed) => {
            print!("{}", format_completion(&tour, completed));
            Ok(())
        }
        None => {
            let remaining = manager.progress().map(|p| p.remaining).unwrap_or_default();
            Err(format!(
                "{} is not complete yet: {} point(s) left ({})",
                tour.name,
                remaining.len(),
                remaining.join(", ")
            ))
        }
    }
}

fn cmd_clear<S: KeyValueStore, C: Clock>(
    manager: &mut SessionManager<S, C>,
    yes: bool,
) -> Result<(), String> {
    if !yes {
        return Err("this deletes all tour progress and history; pass --yes to confirm".to_string());
    }
    manager.clear_all_data();
    eprintln!("All data cleared");
    Ok(())
}
