//
//   Copyright 2026 Basil Crow
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
//

use std::process::exit;

use pdrop::cred::lookup_user;
use pdrop::display::print_cred_state;
use pdrop::drop::{drop_to, GroupsMode};

const USAGE: &str = "Usage: pdrop <username> [setgroups]";

struct Args {
    user: String,
    mode: GroupsMode,
}

fn print_usage() {
    eprintln!("{}", USAGE);
    eprintln!("Drop credentials to those of <username> via the raw 32-bit-id syscalls.");
    eprintln!();
    eprintln!("The supplementary group list is cleared by default. With the literal");
    eprintln!("second argument 'setgroups' it is instead reduced to the target's");
    eprintln!("primary gid (root only; skipped for unprivileged callers).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help       Print help");
    eprintln!("  -V, --version    Print version");
}

fn parse_args() -> Args {
    use lexopt::prelude::*;

    let mut operands: Vec<String> = Vec::new();
    let mut parser = lexopt::Parser::from_env();

    while let Some(arg) = parser.next().unwrap_or_else(|e| {
        eprintln!("pdrop: {e}");
        exit(2);
    }) {
        match arg {
            Short('h') | Long("help") => {
                print_usage();
                exit(0);
            }
            Short('V') | Long("version") => {
                println!("pdrop {}", env!("CARGO_PKG_VERSION"));
                exit(0);
            }
            Value(val) => {
                operands.push(val.to_string_lossy().into_owned());
            }
            _ => {
                eprintln!("pdrop: unexpected argument: {arg:?}");
                exit(2);
            }
        }
    }

    let Some(user) = operands.first() else {
        eprintln!("{}", USAGE);
        exit(1);
    };

    Args {
        user: user.clone(),
        mode: GroupsMode::from_operands(&operands[1..]),
    }
}

fn main() {
    pdrop::reset_sigpipe();
    let args = parse_args();

    let Some(user) = lookup_user(&args.user) else {
        // On stdout rather than stderr; callers match against it there.
        println!("'{}' not found", args.user);
        exit(1);
    };

    print!("Before: ");
    if let Err(e) = print_cred_state() {
        eprintln!("pdrop: {}", e);
        exit(1);
    }

    if let Err(e) = drop_to(user.uid.as_raw(), user.gid.as_raw(), args.mode) {
        eprintln!("{}", e);
        exit(1);
    }

    print!("After: ");
    if let Err(e) = print_cred_state() {
        eprintln!("pdrop: {}", e);
        exit(1);
    }
}
