mod config;

use anyhow::{bail, Context, Result};
use aura_core::{
    clock, search, BackgroundStore, Blob, Dashboard, JsonFileBackend, Setting, SettingKey,
    SettingsStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aura", version, about = "Aura new-tab dashboard")]
struct Cli {
    /// Data directory (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show resolved config and data paths
    Config {
        #[arg(long)]
        json: bool,
    },
    /// Read or change preferences
    #[command(subcommand)]
    Settings(SettingsCmd),
    /// Manage quick-link shortcuts
    #[command(subcommand)]
    Links(LinksCmd),
    /// Manage uploaded background images
    #[command(subcommand)]
    Bg(BgCmd),
    /// Print the navigation target for a query
    Search {
        /// Engine key (defaults to the configured engine)
        #[arg(long)]
        engine: Option<String>,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Print the current time in the configured clock format
    Clock {
        #[arg(long)]
        seconds: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set one field; VALUE is JSON or a bare string
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
enum LinksCmd {
    List {
        #[arg(long)]
        json: bool,
    },
    Add { title: String, url: String },
    Remove { id: String },
    /// Move the link at FROM to position TO (0-based)
    Move { from: usize, to: usize },
}

#[derive(Subcommand)]
enum BgCmd {
    /// Upload an image and make it the active background
    Add {
        path: PathBuf,
        /// Declared media type (sniffed from the bytes when omitted)
        #[arg(long)]
        media_type: Option<String>,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    /// Make a stored image the active background
    Use { id: String },
    Remove { id: String },
    /// Write a stored image's bytes to a file
    Export { id: String, out: PathBuf },
    /// Show how the background layer resolves
    Show {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config();
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = Some(dir);
    }
    init_tracing(&cfg);

    let data_dir = cfg.data_dir();
    tracing::debug!(data_dir = %data_dir.display(), "resolved data dir");
    let open_dashboard = || {
        Dashboard::new(
            SettingsStore::load(JsonFileBackend::new(&data_dir)),
            BackgroundStore::new(cfg.background_db()),
        )
    };

    match cli.command {
        Commands::Config { json } => {
            let settings_path = JsonFileBackend::new(&data_dir).path_for(aura_core::SETTINGS_KEY);
            let v = serde_json::json!({
                "config_path": config::config_path(),
                "config_dir": config::config_dir(),
                "data_dir": data_dir,
                "settings_path": settings_path,
                "background_db": cfg.background_db(),
                "log_filter": cfg.log_filter,
            });
            if json {
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else if let Some(obj) = v.as_object() {
                for (k, val) in obj {
                    println!("{k}\t{}", val.as_str().unwrap_or("-"));
                }
            }
        }
        Commands::Settings(cmd) => settings_cmd(&open_dashboard(), cmd)?,
        Commands::Links(cmd) => links_cmd(&open_dashboard(), cmd)?,
        Commands::Bg(cmd) => bg_cmd(&open_dashboard(), cmd)?,
        Commands::Search { engine, query } => {
            let query = query.join(" ");
            let engine = match engine {
                Some(e) => e,
                None => open_dashboard().settings().get().search_engine,
            };
            match search::search_url(&engine, &query) {
                Some(url) => println!("{url}"),
                None => bail!("empty query"),
            }
        }
        Commands::Clock { seconds } => {
            let format = open_dashboard().settings().get().clock_format;
            let now = chrono::Local::now();
            println!("{}", clock::format_time(&now, format, seconds));
            println!("{}", clock::format_date(&now));
        }
    }

    Ok(())
}

fn init_tracing(cfg: &config::Config) {
    let filter = EnvFilter::try_from_env("AURA_LOG")
        .ok()
        .or_else(|| {
            cfg.log_filter
                .as_deref()
                .and_then(|f| EnvFilter::try_new(f).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn settings_cmd(d: &Dashboard, cmd: SettingsCmd) -> Result<()> {
    match cmd {
        SettingsCmd::Show { json } => {
            let s = d.settings().get();
            if json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                for key in SettingKey::ALL {
                    println!("{key}\t{}", s.field(key)?);
                }
            }
        }
        SettingsCmd::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            let setting = parse_setting(key, &value)?;
            d.settings()
                .update(setting)
                .context("failed to persist settings")?;
            println!("set {key}");
        }
        SettingsCmd::Reset => {
            d.settings().reset().context("failed to persist settings")?;
            println!("settings reset");
        }
    }
    Ok(())
}

/// Try VALUE as JSON first, then as a bare string (so `light` and `12` work).
fn parse_setting(key: SettingKey, raw: &str) -> Result<Setting> {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Ok(s) = Setting::from_json(key, v) {
            return Ok(s);
        }
    }
    Ok(Setting::from_json(
        key,
        serde_json::Value::String(raw.to_string()),
    )?)
}

fn links_cmd(d: &Dashboard, cmd: LinksCmd) -> Result<()> {
    match cmd {
        LinksCmd::List { json } => {
            let links = d.settings().get().quick_links;
            if json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else {
                for l in links {
                    println!("{}\t{}\t{}", l.id, l.title, l.url);
                }
            }
        }
        LinksCmd::Add { title, url } => {
            let link = d.add_quick_link(&title, &url)?;
            println!("added {}", link.id);
        }
        LinksCmd::Remove { id } => {
            if !d.remove_quick_link(&id)? {
                bail!("no link with id {id}");
            }
            println!("removed {id}");
        }
        LinksCmd::Move { from, to } => {
            d.move_quick_link(from, to)?;
            println!("moved {from} -> {to}");
        }
    }
    Ok(())
}

fn bg_cmd(d: &Dashboard, cmd: BgCmd) -> Result<()> {
    match cmd {
        BgCmd::Add { path, media_type } => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let blob = match media_type {
                Some(mt) => Blob::new(mt, bytes),
                None => Blob::sniff(bytes),
            };
            let rec = d.upload_background(blob)?;
            println!("added {}", rec.id);
        }
        BgCmd::List { json } => {
            let active = d.settings().get().background.active_local_id;
            let records = d.backgrounds().get_all()?;
            if json {
                let items: Vec<_> = records
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id,
                            "media_type": r.file.media_type,
                            "size_bytes": r.file.len(),
                            "created_at": r.created_at,
                            "sha256": r.sha256,
                            "active": r.id == active,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for r in records {
                    let created = chrono::DateTime::from_timestamp_millis(r.created_at)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default();
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        r.id,
                        if r.id == active { "*" } else { " " },
                        r.file.media_type,
                        r.file.len(),
                        created
                    );
                }
            }
        }
        BgCmd::Use { id } => {
            if !d.select_background(&id)? {
                bail!("no background with id {id}");
            }
            println!("using {id}");
        }
        BgCmd::Remove { id } => {
            d.delete_background(&id)?;
            println!("removed {id}");
        }
        BgCmd::Export { id, out } => {
            let Some(rec) = d.backgrounds().get_by_id(&id)? else {
                bail!("no background with id {id}");
            };
            std::fs::write(&out, &rec.file.bytes)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("exported {} bytes to {}", rec.file.len(), out.display());
        }
        BgCmd::Show { json } => {
            let view = d.render_background()?;
            let active = d.settings().get().background.active_local_id;
            if json {
                let mut v = serde_json::to_value(&view)?;
                v["active_local_id"] = serde_json::Value::String(active);
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else {
                println!("{:?}", view.image);
                println!("blur\t{}px", view.blur_px);
                println!("mask\t{} @ {:.2}", view.mask_color, view.mask_opacity);
            }
            d.release_background();
        }
    }
    Ok(())
}
