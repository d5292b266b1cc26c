use clap::Parser;
use tuirealm::{PollStrategy, Update};

use lumon::app::model::{ClientArgs, Model};
use lumon::app::storage::Storage;
use lumon::app::types::ClientConfig;
use lumon::app::utils;

fn init_logging(log_file: Option<&str>) {
    // The terminal belongs to the UI, so diagnostics only go to a file.
    let Some(log_file) = log_file else { return };

    let log_file = utils::replace_home_dir(log_file);
    if let Some(parent) = std::path::Path::new(&log_file).parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let Ok(file) = std::fs::File::create(&log_file) else {
        return;
    };

    let formatter = tracing_subscriber::fmt::format()
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::fmt()
        .event_format(formatter)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() {
    let args = ClientArgs::parse();

    let mut config = utils::read_config::<ClientConfig>(&args.config, Some("LUMON"));
    if let Some(server_url) = args.server_url {
        config.server_url = server_url;
    }

    init_logging(config.log_file.as_deref());

    let theme = Storage::new(&config.state_dir).theme_blocking();

    // Setup model
    let mut model = Model::new(config, theme);
    // Enter alternate screen
    let _ = model.terminal.enter_alternate_screen();
    let _ = model.terminal.enable_raw_mode();
    // Main loop
    // NOTE: loop until quit; quit is set in update if AppClose is received
    while !model.quit {
        // Tick
        match model.app.tick(PollStrategy::Once) {
            Err(_err) => {}
            Ok(messages) if !messages.is_empty() => {
                // NOTE: redraw if at least one msg has been processed
                model.redraw = true;
                for msg in messages.into_iter() {
                    let mut msg = Some(msg);
                    while msg.is_some() {
                        msg = model.update(msg);
                    }
                }
            }
            _ => {}
        }
        // Redraw
        if model.redraw {
            model.view();
            model.redraw = false;
        }
    }
    // Terminate terminal
    let _ = model.terminal.leave_alternate_screen();
    let _ = model.terminal.disable_raw_mode();
    let _ = model.terminal.clear_screen();
}
