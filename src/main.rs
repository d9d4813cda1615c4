use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;
use wordwiz::cli::{CliInterface, parse_cli};
use wordwiz::game_state::{GameInterface, RoundResult, game_loop};
use wordwiz::logging::init_logging;
use wordwiz::tui::TuiInterface;
use wordwiz::wordbank::WordBank;

fn main() -> ExitCode {
    let cli = parse_cli();

    // The TUI owns the terminal, so it only logs when a file is given
    if cli.log_file.is_some() || !cli.tui {
        if let Err(e) = init_logging(cli.log_file.as_deref()) {
            eprintln!("Failed to open log file: {e}");
            return ExitCode::FAILURE;
        }
    }

    let mut bank = match WordBank::locate(cli.wordbank_path.as_deref()) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} words", bank.len());

    let mut rng = match cli.seed {
        Some(seed) => {
            bank = bank.seeded(seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let settings = cli.settings();
    let mut interface: Box<dyn GameInterface> = if cli.tui {
        match TuiInterface::new() {
            Ok(tui) => Box::new(tui),
            Err(e) => {
                eprintln!("Failed to initialize terminal: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(CliInterface::new(io::stdin().lock()))
    };

    let results = game_loop(&settings, &mut bank, interface.as_mut(), &mut rng);
    // Restore the terminal before printing anything
    drop(interface);

    let won = results
        .iter()
        .filter(|r| matches!(r, RoundResult::Won { .. }))
        .count();
    log::info!("Played {} rounds, won {}", results.len(), won);

    if let Some(message) = results.iter().find_map(RoundResult::failure_message) {
        // The CLI already showed it; the TUI screen is gone by now
        if cli.tui {
            eprintln!("{message}");
        }
        log::error!("{message}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
