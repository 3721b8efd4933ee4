// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use chainset::ChainedHashSet;
use chainset::HashCodeStrategy;
use chainset::error::Error;
use chainset::error::ErrorKind;
use chainset::error::Result;
use chainset::interpreter::Interpreter;
use chainset::interpreter::InterpreterConfig;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use log::error;
use log::warn;

/// Run a hash table command script.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script with one command per line.
    #[arg(default_value = "input.txt")]
    script: PathBuf,

    /// Initial hash code strategy: simple, poly, cyclic or custom.
    #[arg(short, long, default_value = "simple")]
    strategy: String,

    /// Size the table before the script runs.
    #[arg(short, long)]
    buckets: Option<usize>,

    /// Do not echo script lines.
    #[arg(short, long)]
    quiet: bool,
}

fn initialize_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env();
    let _ = builder.try_init();
}

fn run(args: Args) -> Result<()> {
    let mut table = ChainedHashSet::new();
    let strategy = HashCodeStrategy::from_name(&args.strategy.to_ascii_lowercase());
    match strategy {
        Some(strategy) => table.set_strategy(strategy),
        None => warn!("unknown strategy {:?}; using simple", args.strategy),
    }
    if let Some(buckets) = args.buckets {
        table.resize(buckets)?;
    }

    let script = File::open(&args.script).map_err(|err| {
        Error::new(ErrorKind::Io, "cannot open script")
            .with_context("path", args.script.display())
            .set_source(err)
    })?;
    let base_dir = args
        .script
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = InterpreterConfig::default()
        .with_base_dir(base_dir)
        .with_echo(!args.quiet);
    let stdout = std::io::stdout().lock();
    let mut interpreter = Interpreter::with_table(table, stdout, config);
    interpreter.run_script(BufReader::new(script))
}

fn main() -> ExitCode {
    initialize_logger();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
