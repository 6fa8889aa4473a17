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

pub mod cred;
pub mod display;
pub mod drop;

use std::io;

use nix::libc;

/// Error reading or parsing the current credential state.
#[derive(Debug)]
pub enum Error {
    /// I/O error from procfs.
    Io(io::Error),
    /// Error parsing procfs data.
    Parse(String),
}

impl Error {
    pub fn in_file(file: &str, reason: &str) -> Self {
        Error::Parse(format!("Error parsing /proc/self/{}: {}", file, reason))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Parse(reason) => write!(f, "{}", reason),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Restore the default SIGPIPE disposition. The Rust runtime ignores
/// SIGPIPE, which turns a write to a closed pipe into an error instead of
/// the silent exit expected of a command-line tool.
pub fn reset_sigpipe() {
    // SAFETY: SIG_DFL is always a valid disposition.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
