// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

/// Flags that narrow the transaction list. Absent flags mean "no constraint".
pub fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the range (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the range (inclusive)"),
    )
    .arg(
        Arg::new("preset")
            .long("preset")
            .value_parser(["today", "this-week"])
            .conflicts_with_all(["from", "to"])
            .help("Named date range"),
    )
    .arg(
        Arg::new("month")
            .long("month")
            .value_name("1-12")
            .help("Month number; only used together with --year"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .value_name("YYYY")
            .value_parser(value_parser!(i32)),
    )
    .arg(
        Arg::new("bank")
            .long("bank")
            .value_name("ID")
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .value_name("ID")
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .value_name("Expense|Income"),
    )
    .arg(
        Arg::new("order")
            .long("order")
            .value_parser(["asc", "desc"]),
    )
}

fn transaction_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true),
    )
    .arg(
        Arg::new("currency")
            .long("currency")
            .required(required)
            .value_name("COP|USD"),
    )
    .arg(
        Arg::new("bank")
            .long("bank")
            .required(required)
            .value_name("ID")
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .value_name("ID")
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .value_name("Expense|Income"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .value_name("YYYY-MM-DD[ HH:MM:SS]"),
    )
    .arg(Arg::new("description").long("description"))
}

pub fn build_cli() -> Command {
    Command::new("billetera")
        .about("Local COP/USD expense and income tracker")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Database file (defaults to $BILLETERA_DB or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create or migrate the database"))
        .subcommand(
            Command::new("bank")
                .about("Banks")
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("category")
                .about("Categories (append-only)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("Expense|Income")
                                .default_value("Expense"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("type")
                            .long("type")
                            .value_name("Expense|Income"),
                    ),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(transaction_fields(Command::new("add"), true))
                .subcommand(transaction_fields(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                    false,
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm the deletion"),
                        ),
                )
                .subcommand(json_args(filter_args(
                    Command::new("list").arg(
                        Arg::new("view")
                            .long("view")
                            .value_parser(["default", "bank", "category"]),
                    ),
                ))),
        )
        .subcommand(json_args(filter_args(
            Command::new("summary").about("Income and expense totals per currency"),
        )))
        .subcommand(
            Command::new("filter")
                .about("Saved filters used when no filter flags are given")
                .subcommand(filter_args(Command::new("set")))
                .subcommand(Command::new("show"))
                .subcommand(Command::new("reset")),
        )
        .subcommand(
            Command::new("view")
                .about("Saved list layout")
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("view")
                            .required(true)
                            .value_parser(["default", "bank", "category"]),
                    ),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(Command::new("doctor").about("Report data integrity issues"))
}
