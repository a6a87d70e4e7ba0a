use std::{io::Write, process::ExitCode};

use clap::Parser;
use tracing::{error, info, warn};

use qsoupload::{
    adif::encode_records,
    cli::Cli,
    config::load_api_key,
    logging,
    persist::sqlite::SqliteUploadJournal,
    runtime::{events::UploadEvent, runner::UploadRun},
    source::read_records,
    upload::qrz::QrzLogbookClient,
};

const EXIT_CONFIG: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (import, config) = Cli::parse().into_parts();

    match logging::init(&config.log_dir) {
        Ok(path) => info!(log = %path.display(), "run started"),
        Err(err) => {
            logging::init_console();
            warn!(log_dir = %config.log_dir.display(), error = %err, "could not open log file");
        }
    }

    let api_key = match load_api_key(&config.api_key_file) {
        Ok(key) => key,
        Err(err) => {
            error!(error = %err, "configuration error");
            eprintln!("{err}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let records = match read_records(&import) {
        Ok(records) => records,
        Err(err) => {
            error!(input = %import.display(), error = %err, "could not read input");
            eprintln!("{err}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let adif = encode_records(&records);
    info!(input = %import.display(), records = adif.len(), "records encoded");

    let client = QrzLogbookClient::with_endpoint(api_key, config.endpoint.clone());

    let mut journal = config
        .journal
        .as_ref()
        .and_then(|path| match SqliteUploadJournal::open(path) {
            Ok(journal) => Some(journal),
            Err(err) => {
                warn!(journal = %path.display(), error = %err, "journal unavailable");
                None
            }
        });

    let mut run = UploadRun::new(&client);
    if let Some(journal) = journal.as_mut() {
        run = run.with_journal(journal, import.display().to_string());
    }

    match run.run(&adif, print_progress).await {
        Ok(summary) => {
            println!(
                "uploaded:{}/{} failed:{}  ",
                summary.accepted, summary.total, summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let partial = err.partial();
            println!();
            eprintln!(
                "{err} (uploaded:{}/{} before abort)",
                partial.accepted, partial.total
            );
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

fn print_progress(event: &UploadEvent) {
    let (seq, total, summary) = match event {
        UploadEvent::Started { total } => (0, *total, Default::default()),
        UploadEvent::Uploading {
            seq,
            total,
            summary,
        } => (*seq, *total, *summary),
        _ => return,
    };
    print!("uploading:{}/{} [{}]     \r", summary.accepted, total, seq);
    let _ = std::io::stdout().flush();
}
