// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use mcp::Flags;
use std::{io, process};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let input = Flags::from_args();
    init_tracing(input.debug);
    let result = if input.quiet {
        mcp::run(&input, io::sink())
    } else {
        mcp::run(&input, io::stdout())
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
