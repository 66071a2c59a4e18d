// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print pretty JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue),
    )
}

fn aging_view(name: &'static str, about: &'static str) -> Command {
    json_flags(
        Command::new(name)
            .about(about)
            .arg(
                Arg::new("bucket")
                    .long("bucket")
                    .value_name("BUCKET")
                    .help("Aging bucket filter: all|current|1-30|31-60|61-90|90+"),
            )
            .arg(
                Arg::new("search")
                    .long("search")
                    .value_name("TERM")
                    .help("Substring match on document number or counterparty"),
            )
            .arg(
                Arg::new("gstin")
                    .long("gstin")
                    .value_name("GSTIN")
                    .help("Only documents for this counterparty GSTIN"),
            )
            .arg(
                Arg::new("list")
                    .long("list")
                    .help("Also print the per-document table")
                    .action(ArgAction::SetTrue),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("duebook")
        .about("Receivables/payables aging, DSO/DPO metrics, and bank reconciliation")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the local snapshot cache"))
        .subcommand(
            Command::new("config")
                .about("API settings")
                .subcommand(
                    Command::new("set-url").about("Set the API base URL").arg(
                        Arg::new("url")
                            .long("url")
                            .value_name("URL")
                            .required(true),
                    ),
                )
                .subcommand(
                    Command::new("set-token")
                        .about("Set the API bearer token")
                        .arg(
                            Arg::new("token")
                                .long("token")
                                .value_name("TOKEN")
                                .required(true),
                        ),
                )
                .subcommand(Command::new("show").about("Show current settings (token masked)")),
        )
        .subcommand(
            Command::new("fetch")
                .about("Snapshot invoices, bills, bank accounts and transactions from the API")
                .arg(
                    Arg::new("only")
                        .long("only")
                        .value_name("COLLECTION")
                        .help("Fetch a single collection: invoices|bills|accounts|transactions"),
                ),
        )
        .subcommand(
            Command::new("aging")
                .about("Aging buckets and DSO/DPO metrics over the snapshot")
                .subcommand(aging_view(
                    "receivables",
                    "Outstanding invoices bucketed by days overdue",
                ))
                .subcommand(aging_view(
                    "payables",
                    "Outstanding bills bucketed by days overdue",
                )),
        )
        .subcommand(
            Command::new("recon")
                .about("Bank reconciliation: transactions, suggestions, match commits")
                .subcommand(json_flags(
                    Command::new("accounts").about("List snapshotted bank accounts"),
                ))
                .subcommand(json_flags(
                    Command::new("transactions")
                        .about("List snapshotted bank transactions")
                        .arg(
                            Arg::new("unmatched")
                                .long("unmatched")
                                .help("Only transactions not yet matched")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_name("N")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("suggest")
                        .about("Fetch AI match suggestions and manual candidates for a transaction")
                        .arg(
                            Arg::new("transaction")
                                .long("transaction")
                                .value_name("ID")
                                .required(true),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .value_name("TERM")
                                .help("Narrow the manual candidate list"),
                        ),
                )
                .subcommand(
                    Command::new("match")
                        .about("Match a transaction to an invoice or bill")
                        .arg(
                            Arg::new("transaction")
                                .long("transaction")
                                .value_name("ID")
                                .required(true),
                        )
                        .arg(
                            Arg::new("entity-type")
                                .long("entity-type")
                                .value_name("TYPE")
                                .help("invoice|bill")
                                .required(true),
                        )
                        .arg(
                            Arg::new("entity-id")
                                .long("entity-id")
                                .value_name("ID")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("unmatch")
                        .about("Undo a transaction's match")
                        .arg(
                            Arg::new("transaction")
                                .long("transaction")
                                .value_name("ID")
                                .required(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("cashflow")
                .about("Server-computed cash-flow actuals")
                .subcommand(json_flags(
                    Command::new("summary").about("Inflow/outflow/net summary"),
                ))
                .subcommand(json_flags(
                    Command::new("statement").about("Per-period cash-flow statement"),
                ))
                .subcommand(json_flags(
                    Command::new("transactions").about("Settled cash movements behind the actuals"),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export snapshot data to a file")
                .subcommand(
                    Command::new("aging")
                        .about("Export the aging view")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_name("KIND")
                                .help("receivables|payables")
                                .required(true),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("FMT")
                                .help("csv|json")
                                .required(true),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .value_name("FILE")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("transactions")
                        .about("Export bank transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("FMT")
                                .help("csv|json")
                                .required(true),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .value_name("FILE")
                                .required(true),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check configuration and snapshot health"))
}
