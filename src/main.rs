use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use events::{ConsoleCommand, WindowEvent};
use services::{create_bounds_store, KeepWindowController, SimulatedHost};

#[derive(Parser, Debug)]
#[command(name = "keep-window")]
#[command(about = "Открывает единственное окно Keep или выводит его на передний план")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "keep.toml")]
    config: String,

    /// Режим сухого запуска (размеры окна не пишутся на диск)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

const HELP: &str = "Команды: click | shortcut | close | move <id> <left> <top> <width> <height> | \
resize <id> <width> <height> | user-close <id> | minimize <id> | open-tab <url> | outage on|off | \
list | quit";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level)?;

    info!("Запуск Keep Window v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - размеры окна хранятся только в памяти");
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut host = SimulatedHost::new(events_tx);
    if !config.host.restore_supported {
        warn!("Оконный менеджер не умеет разворачивать свёрнутые окна");
        host = host.without_restore();
    }
    let host = Arc::new(host);
    // Соседнее окно браузера, чтобы поиск было из чего выбирать
    host.user_open_tab("https://example.org/");

    let store = create_bounds_store(&config, args.dry_run);
    let controller = KeepWindowController::new(&config, host.clone(), store);

    info!("Все компоненты инициализированы");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ConsoleCommand>() {
                        Ok(ConsoleCommand::Quit) => break,
                        Ok(command) => run_command(&controller, &host, command).await,
                        Err(e) => {
                            warn!("{}", e);
                            println!("{}", HELP);
                        }
                    }
                }
                Ok(None) => {
                    info!("Ввод закрыт");
                    break;
                }
                Err(e) => {
                    error!("Ошибка чтения ввода: {}", e);
                    break;
                }
            },
            Some(raw) = events_rx.recv() => {
                trace_if_enabled!("Событие хоста: {:?}", raw);
                controller.handle_window_event(WindowEvent::from(raw)).await;
            }
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                }
                break;
            }
        }
    }

    info!("Завершение работы...");

    // Последние размеры окна не должны потеряться
    controller.shutdown().await;

    info!("Keep Window завершил работу");
    Ok(())
}

async fn run_command(controller: &KeepWindowController, host: &SimulatedHost, command: ConsoleCommand) {
    let result = match command {
        ConsoleCommand::Activate(source) => {
            info!("Запрос на показ окна: {}", source);
            let outcome = controller.open_or_focus().await;
            info!("Результат: {}", outcome);
            Ok(())
        }
        ConsoleCommand::Close => {
            controller.close().await;
            Ok(())
        }
        ConsoleCommand::Move(handle, bounds) => host.user_move(handle, bounds),
        ConsoleCommand::Resize(handle, width, height) => host.user_resize(handle, width, height),
        ConsoleCommand::UserClose(handle) => host.user_close(handle),
        ConsoleCommand::Minimize(handle) => host.user_minimize(handle),
        ConsoleCommand::OpenTab(location) => {
            host.user_open_tab(&location);
            Ok(())
        }
        ConsoleCommand::Outage(enabled) => {
            host.set_outage(enabled);
            Ok(())
        }
        ConsoleCommand::List => {
            for line in host.describe() {
                println!("{}", line);
            }
            match controller.known() {
                Some(handle) => println!("Окно Keep: {}", handle),
                None => println!("Окно Keep: неизвестно"),
            }
            if let Some(bounds) = controller.current_bounds() {
                let note = if controller.has_pending_write() { " (ожидает записи)" } else { "" };
                println!("Размеры: {}{}", bounds, note);
            }
            Ok(())
        }
        ConsoleCommand::Quit => Ok(()),
    };

    if let Err(e) = result {
        warn!("Команда не выполнена: {}", e);
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
