// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use duebook::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Snapshot cache initialized at {}", db::db_path()?.display());
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("fetch", sub)) => commands::fetch::handle(&conn, sub)?,
        Some(("aging", sub)) => commands::aging::handle(&conn, sub)?,
        Some(("recon", sub)) => commands::recon::handle(&conn, sub)?,
        Some(("cashflow", sub)) => commands::cashflow::handle(&conn, sub)?,
        Some(("export", sub)) => commands::export::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
