// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fishbone CLI entrypoint.
//!
//! By default this serves the JSON API at `http://127.0.0.1:<port>/api` backed by a folder of
//! diagram records. `--render` instead lays out a single diagram file and prints it as SVG
//! (or as an outline with `--outline`).

use std::error::Error;

use fishbone::expansion::ExpansionState;
use fishbone::http::AppState;
use fishbone::layout::{compute_layout, Canvas, Theme};
use fishbone::model::fixtures::demo_diagram;
use fishbone::model::now_millis;
use fishbone::render::{render_outline_unicode, render_svg};
use fishbone::store::{DiagramRecord, JsonFolderStore, MemoryStore, WriteDurability};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 3001;
const STORE_DIR_ENV: &str = "FISHBONE_STORE_DIR";
const PORT_ENV: &str = "FISHBONE_PORT";
const LOG_ENV: &str = "FISHBONE_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--durable-writes] [--port <port>]\n  {program} [--store <dir>] [--durable-writes] [--port <port>]\n  {program} --demo [--port <port>]\n  {program} --render <diagram.json> [--width <w>] [--height <h>] [--theme light|dark] [--expand <path>]... [--outline]\n\nServer mode serves the JSON API at `http://127.0.0.1:<port>/api`.\n--port selects the port (0 = ephemeral; default ${PORT_ENV} or {DEFAULT_PORT}).\n\nIf store-dir/--store is omitted, ${STORE_DIR_ENV} or the current working directory is used.\n--demo serves a built-in in-memory demo diagram and cannot be combined with store-dir/--store.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\n--render prints one diagram record as SVG on stdout; --expand may repeat.\nLog filtering follows ${LOG_ENV} (default `info`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq)]
struct RenderRequest {
    input: String,
    width: Option<f64>,
    height: Option<f64>,
    theme: Option<Theme>,
    expand: Vec<String>,
    outline: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    demo: bool,
    store_dir: Option<String>,
    port: Option<u16>,
    durable_writes: bool,
    render: Option<RenderRequest>,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn parse_dimension(raw: &str) -> Result<f64, ()> {
    let value: f64 = raw.parse().map_err(|_| ())?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(())
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut input = None;
    let mut render = RenderRequest::default();
    let mut render_flags = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--store" => {
                let dir = args.next().ok_or(())?;
                set_once(&mut options.store_dir, dir)?;
            }
            "--port" => {
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                set_once(&mut options.port, port)?;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--render" => {
                let file = args.next().ok_or(())?;
                set_once(&mut input, file)?;
            }
            "--width" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut render.width, parse_dimension(&raw)?)?;
                render_flags = true;
            }
            "--height" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut render.height, parse_dimension(&raw)?)?;
                render_flags = true;
            }
            "--theme" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut render.theme, raw.parse().map_err(|_| ())?)?;
                render_flags = true;
            }
            "--expand" => {
                render.expand.push(args.next().ok_or(())?);
                render_flags = true;
            }
            "--outline" => {
                if render.outline {
                    return Err(());
                }
                render.outline = true;
                render_flags = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.store_dir, arg)?,
        }
    }

    if options.demo && options.store_dir.is_some() {
        return Err(());
    }

    match input {
        Some(input) => {
            let server_flags = options.demo
                || options.store_dir.is_some()
                || options.port.is_some()
                || options.durable_writes;
            if server_flags {
                return Err(());
            }
            options.render = Some(RenderRequest { input, ..render });
        }
        None if render_flags => return Err(()),
        None => {}
    }

    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn port_from_env() -> Result<Option<u16>, Box<dyn Error>> {
    match std::env::var(PORT_ENV) {
        Ok(raw) => {
            let port = raw
                .trim()
                .parse::<u16>()
                .map_err(|err| format!("invalid {PORT_ENV} {raw:?}: {err}"))?;
            Ok(Some(port))
        }
        Err(_) => Ok(None),
    }
}

fn render(request: RenderRequest) -> Result<(), Box<dyn Error>> {
    let raw = std::fs::read_to_string(&request.input)
        .map_err(|err| format!("cannot read {}: {err}", request.input))?;
    let record: DiagramRecord = serde_json::from_str(&raw)
        .map_err(|err| format!("cannot parse {}: {err}", request.input))?;
    let diagram = record.into_diagram()?;

    if request.outline {
        print!("{}", render_outline_unicode(&diagram));
        return Ok(());
    }

    let default = Canvas::default();
    let canvas = Canvas::new(
        request.width.unwrap_or(default.width),
        request.height.unwrap_or(default.height),
    );
    let expansion = request.expand.iter().map(String::as_str).collect::<ExpansionState>();
    let layout = compute_layout(
        &diagram,
        canvas,
        request.theme.unwrap_or_default(),
        &expansion,
        None,
    );
    println!("{}", render_svg(&layout));
    Ok(())
}

fn serve(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let port = match options.port {
        Some(port) => port,
        None => port_from_env()?.unwrap_or(DEFAULT_PORT),
    };

    let state = if options.demo {
        tracing::info!("serving the built-in demo diagram from memory");
        AppState::new(MemoryStore::with_diagrams([demo_diagram(now_millis())]))
    } else {
        let dir = options
            .store_dir
            .or_else(|| std::env::var(STORE_DIR_ENV).ok())
            .unwrap_or_else(|| ".".to_owned());
        let store = if options.durable_writes {
            JsonFolderStore::new(dir).with_durability(WriteDurability::Durable)
        } else {
            JsonFolderStore::new(dir)
        };
        tracing::info!(
            root = %store.root().display(),
            durability = ?store.durability(),
            "using diagram folder"
        );
        AppState::new(store)
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        fishbone::http::serve(listener, state).await
    })?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "fishbone".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();
        match options.render {
            Some(request) => render(request),
            None => serve(options),
        }
    })();

    if let Err(err) = result {
        eprintln!("fishbone: {err}");
        std::process::exit(1);
    }
}
