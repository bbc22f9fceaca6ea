use anyhow::Result;
use crossterm::event;
use directories::ProjectDirs;
use log::LevelFilter;
use mcpi::{MinecraftProbe, Unavailable};
use pyexec::PythonRunner;
use std::{env, fs, path::PathBuf, time::Duration};

use pyeditor::{tui, ui, Config, EditorWindow};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let runner = PythonRunner::new(config.runner.interpreter.clone(), config.runner.args.clone())
        .working_dir(config.files.base_path.clone());
    let probe = minecraft_probe(&config);

    tui::install_panic_hook();
    let mut session = tui::TerminalSession::enter()?;

    let mut window = EditorWindow::new(config, Box::new(runner), probe).await?;

    if let Some(arg) = env::args().nth(1) {
        let path = PathBuf::from(&arg);
        if let Err(e) = window.load_path(&path).await {
            window
                .status_bar
                .set_error(format!("Failed to load file '{}': {:#}", arg, e));
        }
    } else {
        log::info!("No file specified, starting with the default listing");
    }

    let res = run_app(&mut session, &mut window).await;

    drop(window);
    drop(session);

    if let Err(err) = &res {
        eprintln!("PyEditor stopped with an error: {:#}", err);
        log::error!("Application error: {:#}", err);
    }
    res
}

fn init_logger() {
    let mut logger = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("pyeditor", LevelFilter::Debug);
    }

    // stderr belongs to the terminal UI while it runs
    if let Some(file) = open_log_file() {
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();
}

fn open_log_file() -> Option<fs::File> {
    let dirs = ProjectDirs::from("org", "pyeditor", "pyeditor")?;
    let log_dir = dirs.data_dir();
    fs::create_dir_all(log_dir).ok()?;
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("pyeditor.log"))
        .ok()
}

fn minecraft_probe(config: &Config) -> Box<dyn MinecraftProbe> {
    #[cfg(feature = "minecraft")]
    {
        if config.minecraft.enabled {
            return Box::new(mcpi::LocalMinecraft::new(
                config.minecraft.executable.clone(),
                config.minecraft.process_name.clone(),
            ));
        }
    }
    #[cfg(not(feature = "minecraft"))]
    let _ = config;

    log::info!("Minecraft-Pi integration disabled");
    Box::new(Unavailable)
}

async fn run_app(session: &mut tui::TerminalSession, window: &mut EditorWindow) -> Result<()> {
    loop {
        window.poll_script_output();

        if let Err(e) = session.terminal().draw(|f| ui::draw(f, window)) {
            log::error!("Terminal draw error: {}", e);
        }

        window.update_status();

        if window.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            if let Err(e) = window.handle_event(event).await {
                window.status_bar.set_error(format!("{:#}", e));
            }
        }
    }

    log::info!("Application loop ended");
    Ok(())
}
