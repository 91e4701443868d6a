// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use hermes::eval::{self, MaterialEvaluator};
use hermes::search::{Searcher, DEFAULT_SEARCH_DEPTH};
use hermes::{divide, perft, Position};

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position")
        .required(true)
        .index(1)
}

fn depth_arg() -> Arg<'static, 'static> {
    Arg::with_name("depth")
        .help("Depth of move tree to search")
        .value_name("DEPTH")
        .short("d")
        .long("depth")
        .takes_value(true)
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(depth_arg().required(true)),
        )
        .subcommand(
            SubCommand::with_name("divide")
                .about("PERFT node counts below each legal move")
                .arg(fen_arg())
                .arg(depth_arg().required(true)),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search a board position for the best move")
                .arg(fen_arg())
                .arg(depth_arg()),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves of a board position")
                .arg(fen_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("divide", Some(matches)) => run_divide(matches),
        ("search", Some(matches)) => run_search(matches),
        ("moves", Some(matches)) => run_moves(matches),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn load_position(matches: &ArgMatches) -> Position {
    let fen = matches.value_of("FEN").unwrap_or_default();
    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn print_header(pos: &Position, depth: u32) {
    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let mut pos = load_position(matches);
    print_header(&pos, depth);
    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&mut pos, i);
        let elapsed = start.elapsed();
        let ms = elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis());
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_divide(matches: &ArgMatches) -> ! {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let mut pos = load_position(matches);
    print_header(&pos, depth);
    let results = divide(&mut pos, depth);
    let mut total = 0;
    for (mov, nodes) in &results {
        println!("{}: {}", mov, nodes);
        total += nodes;
    }

    println!();
    println!("moves: {}", results.len());
    println!("nodes: {}", total);
    process::exit(0);
}

fn run_search(matches: &ArgMatches) -> ! {
    let depth = if matches.is_present("depth") {
        value_t_or_exit!(matches, "depth", u32)
    } else {
        DEFAULT_SEARCH_DEPTH
    };

    let mut pos = load_position(matches);
    print_header(&pos, depth);
    println!("static eval: {}", eval::evaluate(&pos));

    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new();
    let start = Instant::now();
    let result = searcher.search(&mut pos, depth);
    let elapsed = start.elapsed();
    match result.best_move {
        Some(mov) => println!("best move: {}", mov),
        None => println!("best move: (none)"),
    }
    println!("    score: {}", result.score);
    println!("    nodes: {}", result.nodes_searched);
    println!("     time: {} ms", elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis()));
    process::exit(0);
}

fn run_moves(matches: &ArgMatches) -> ! {
    let mut pos = load_position(matches);
    println!("{}", pos);
    let moves = pos.move_list();
    for mov in &moves {
        println!("{}", mov);
    }

    println!();
    println!("{} legal moves", moves.len());
    if moves.is_empty() && pos.is_check(pos.side_to_move()) {
        println!("checkmate");
    }
    process::exit(0);
}
