// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON Lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("loanbook")
        .version(clap::crate_version!())
        .about("Loanbook: loan tracking, EMI amortization, and expense logging")
        .subcommand(Command::new("init").about("Create the database file and schema"))
        .subcommand(
            Command::new("profile")
                .about("Active profile and display settings")
                .subcommand(
                    Command::new("use")
                        .about("Switch the active profile")
                        .arg(Arg::new("name").required(true).help("Profile name")),
                )
                .subcommand(Command::new("show").about("Show the active profile"))
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the display currency label")
                        .arg(Arg::new("currency").required(true).help("Currency code, e.g. USD")),
                ),
        )
        .subcommand(
            Command::new("salary")
                .about("Monthly salary for the active profile")
                .subcommand(
                    Command::new("set").about("Set the monthly salary").arg(
                        Arg::new("amount")
                            .long("amount")
                            .required(true)
                            .help("Monthly salary amount"),
                    ),
                )
                .subcommand(Command::new("show").about("Show the monthly salary")),
        )
        .subcommand(
            Command::new("loan")
                .about("Track loans and record EMI payments")
                .subcommand(
                    Command::new("add")
                        .about("Add a loan; EMI and totals are derived from the terms")
                        .arg(Arg::new("name").long("name").required(true).help("Loan label"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Principal amount"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .required(true)
                                .help("Annual interest rate in percent, e.g. 8.5"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .required(true)
                                .help("Start date YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("end")
                                .long("end")
                                .required(true)
                                .help("End date YYYY-MM-DD"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List loans")))
                .subcommand(
                    Command::new("show")
                        .about("Show one loan with progress and next due date")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Loan id"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("plan").about("Show the installment plan")).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64))
                            .help("Loan id"),
                    ),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Record one EMI payment")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Loan id"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Payment date YYYY-MM-DD (default: today)"),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Delete a loan").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64))
                            .help("Loan id"),
                    ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Log and review expenses")
                .subcommand(
                    Command::new("add")
                        .about("Add an expense")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Expense amount"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Expense date YYYY-MM-DD (default: today)"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Expenditure type, e.g. Food"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List expenses"))
                        .arg(Arg::new("month").long("month").help("Filter by month YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .help("Max rows"),
                        ),
                )
                .subcommand(
                    Command::new("total")
                        .about("Sum expenses for a month")
                        .arg(Arg::new("month").long("month").help("Month YYYY-MM (default: current)")),
                )
                .subcommand(
                    Command::new("rm").about("Delete an expense").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64))
                            .help("Expense id"),
                    ),
                ),
        )
        .subcommand(
            Command::new("emi")
                .about("Quote the EMI for a principal, rate, and tenure")
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Principal amount"),
                )
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .required(true)
                        .help("Annual interest rate in percent"),
                )
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u32))
                        .help("Tenure in months"),
                )
                .arg(
                    Arg::new("years")
                        .long("years")
                        .value_parser(value_parser!(u32))
                        .help("Tenure in years"),
                )
                .group(ArgGroup::new("tenure").args(["months", "years"]).required(true))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as pretty JSON"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(
                    Command::new("balance")
                        .about("Salary minus the month's expenses")
                        .arg(Arg::new("month").long("month").help("Month YYYY-MM (default: current)"))
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Print as pretty JSON"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("loans").about("Outstanding balance and progress per loan"),
                )),
        )
        .subcommand(
            Command::new("advisor")
                .about("Loan suggestions from a hosted model endpoint")
                .subcommand(
                    Command::new("set-url")
                        .about("Set the prediction endpoint URL")
                        .arg(Arg::new("url").required(true).help("Endpoint URL")),
                )
                .subcommand(
                    Command::new("recommend")
                        .about("Ask for loan options matching a borrower profile")
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .required(true)
                                .help("Annual income"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Desired loan amount"),
                        )
                        .arg(
                            Arg::new("tenure")
                                .long("tenure")
                                .required(true)
                                .help("Tenure in years"),
                        )
                        .arg(
                            Arg::new("credit-score")
                                .long("credit-score")
                                .required(true)
                                .help("Credit score"),
                        )
                        .arg(
                            Arg::new("outstanding")
                                .long("outstanding")
                                .default_value("None")
                                .help("Outstanding loans"),
                        )
                        .arg(
                            Arg::new("loan-type")
                                .long("loan-type")
                                .default_value("Personal")
                                .help("Loan type"),
                        )
                        .arg(
                            Arg::new("employment")
                                .long("employment")
                                .default_value("Salaried")
                                .help("Employment status"),
                        )
                        .arg(
                            Arg::new("taxpayer")
                                .long("taxpayer")
                                .default_value("Yes")
                                .help("Taxpayer (Yes/No)"),
                        ),
                )
                .subcommand(
                    Command::new("ask")
                        .about("Send a free-form prompt")
                        .arg(
                            Arg::new("prompt")
                                .long("prompt")
                                .required(true)
                                .help("Prompt text"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records to a file")
                .subcommand(
                    Command::new("loans")
                        .about("Export loans")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true).help("Output path")),
                )
                .subcommand(
                    Command::new("expenses")
                        .about("Export expenses")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true).help("Output path")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored records for inconsistencies"))
}
