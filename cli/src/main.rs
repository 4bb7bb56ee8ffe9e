// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Roster CLI Entry Point
//!
//! Bootstraps logging and terminal output, opens the store, wires the discovery
//! service and dispatches to the command modules. Any error that reaches this
//! level is logged and turned into a non-zero `ExitCode`.

mod commands;
mod terminal;

use std::process::ExitCode;

use roster_common::{config::Config, error};
use roster_core::service::DiscoveryService;
use roster_core::store::Store;

use crate::{
    commands::{CommandLine, Commands, agent, list, promote, scan},
    terminal::{print::Print, spinner},
};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    spinner::init_logging(commands.verbosity);

    let cfg = Config::from(&commands);

    let _ = Print::init(&cfg);
    Print::banner();

    let exit_code = match run(&commands, &cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e}");
            ExitCode::FAILURE
        }
    };

    Print::end_of_program();

    exit_code
}

async fn run(commands: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    let store = Store::open(&cfg.db_path)?;
    let service = DiscoveryService::new(store, cfg);
    let session = commands.session();

    match &commands.command {
        Commands::Scan { start, end } => scan::scan(&service, &session, start, end).await,
        Commands::List { assets: false } => list::devices(&service).await,
        Commands::List { assets: true } => list::assets(&service).await,
        Commands::Promote {
            id,
            name,
            tag,
            asset_type,
        } => promote::promote(&service, &session, *id, name, tag, asset_type).await,
        Commands::Agent { ip, report } => {
            agent::agent(&service, &session, *ip, report.as_deref()).await
        }
    }
}
