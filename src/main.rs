use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use welcome_engine::commands::AdminCommand;
use welcome_engine::shared::NO_KILLER;
use welcome_engine::{
    EngineConfig, EventBus, GameEvent, InMemoryHost, PlayerId, PlayerInfo, ServerHost,
    TokioScheduler, WelcomeEngine,
};

const CONFIG_ENV: &str = "WELCOME_ENGINE_CONFIG";

/// Channel the console host uses for ordinary player chat
const CHAT_CHANNEL: u8 = 0;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "welcome_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => match EngineConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path, error = %e, "Failed to load config");
                std::process::exit(1);
            }
        },
        Err(_) => EngineConfig::default(),
    };

    let host = Arc::new(InMemoryHost::new());
    let bus = EventBus::new();
    let scheduler = Arc::new(TokioScheduler::new());

    let engine = match WelcomeEngine::builder(host.clone(), bus.clone(), scheduler)
        .with_config(config)
        .load()
        .await
    {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Failed to load engine");
            std::process::exit(1);
        }
    };

    info!("Console ready: join <id> <name> [latency] | leave <id> | kill <victim> <killer|0> | chat <id> <text> | quit");
    for line in AdminCommand::usage() {
        info!("{}", line);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        if let Err(e) = simulate(&host, &bus, &engine, line).await {
            warn!(line = %line, error = %e, "Command failed");
        }
    }

    engine.unload().await;
}

/// Runs one console line, either as a host simulation or an admin command
async fn simulate(
    host: &InMemoryHost,
    bus: &EventBus,
    engine: &WelcomeEngine,
    line: &str,
) -> Result<(), String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match verb {
        "join" => {
            let id = parse_id(args.first())?;
            let name = args.get(1).ok_or("usage: join <id> <name> [latency]")?;
            let latency = args
                .get(2)
                .map(|l| l.parse::<u32>().map_err(|e| e.to_string()))
                .transpose()?
                .unwrap_or(0);

            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            let label = name.to_string();
            tokio::spawn(async move {
                while let Some(message) = rx.recv().await {
                    println!("[to {}] {}", label, message);
                }
            });

            host.connect(PlayerInfo::new(id, *name, latency), tx).await;
            bus.publish(GameEvent::joined(id, *name)).await;
        }
        "leave" => {
            let id = parse_id(args.first())?;
            let info = host.disconnect(id).await.ok_or("no such player")?;
            bus.publish(GameEvent::left(id, info.name)).await;
        }
        "kill" => {
            let victim = parse_id(args.first())?;
            let killer = args.get(1).map_or(Ok(NO_KILLER), |k| parse_id(Some(k)))?;
            bus.publish(GameEvent::died(victim, killer)).await;
        }
        "chat" => {
            let id = parse_id(args.first())?;
            let text = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            let event = bus.publish(GameEvent::chat(id, text)).await;
            if !event.is_consumed() {
                if let GameEvent::PlayerChat(chat) = event {
                    let name = host
                        .player(id)
                        .await
                        .map_or_else(|| id.to_string(), |p| p.name);
                    let line = format!("<{}> {}", name, chat.message);
                    host.broadcast(CHAT_CHANNEL, line.as_bytes()).await;
                }
            }
        }
        _ => {
            engine.admin().execute(line).await.map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn parse_id(arg: Option<&&str>) -> Result<PlayerId, String> {
    arg.ok_or("missing player id")?
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())
}
