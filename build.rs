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

use roff::{bold, roman, Roff};
use std::fs;
use std::path::Path;

struct Example<'a> {
    title: &'a str,
    description: &'a str,
    code: &'a str,
}

struct ManPage<'a> {
    name: &'a str,
    about: &'a str,
    description: &'a str,
    synopsis: &'a str,
    options: &'a [(&'a str, &'a str)],
    examples: &'a [Example<'a>],
    exit_status: &'a str,
    files: &'a str,
    see_also: &'a str,
    warnings: &'a str,
}

fn render_man_page(page: &ManPage, out_dir: &Path) {
    let version = env!("CARGO_PKG_VERSION");
    let upper_name = page.name.to_uppercase();
    let date_version = format!("{} {}", page.name, version);
    let mut roff = Roff::default();
    roff.control("TH", [upper_name.as_str(), "1", date_version.as_str()]);
    roff.control("SH", ["NAME"]);
    roff.text([roman(format!("{} - {}", page.name, page.about))]);
    roff.control("SH", ["SYNOPSIS"]);
    roff.text([bold(page.name), roman(format!(" {}", page.synopsis))]);
    roff.control("SH", ["DESCRIPTION"]);
    roff.text([roman(page.description)]);
    if !page.options.is_empty() {
        roff.control("SH", ["OPTIONS"]);
        for (flag, help) in page.options {
            roff.control("TP", []);
            roff.text([bold(*flag)]);
            roff.text([roman(*help)]);
        }
    }
    if !page.examples.is_empty() {
        roff.control("SH", ["EXAMPLES"]);
        for example in page.examples {
            roff.text([bold(example.title)]);
            roff.text([roman(example.description)]);
            roff.control("sp", [] as [&str; 0]);
            roff.control("nf", [] as [&str; 0]);
            roff.control("RS", ["4"]);
            for line in example.code.lines() {
                roff.text([roman(line)]);
            }
            roff.control("RE", [] as [&str; 0]);
            roff.control("fi", [] as [&str; 0]);
        }
    }
    if !page.exit_status.is_empty() {
        roff.control("SH", ["EXIT STATUS"]);
        roff.text([roman(page.exit_status)]);
    }
    if !page.files.is_empty() {
        roff.control("SH", ["FILES"]);
        for line in page.files.lines() {
            if let Some((path, desc)) = line.split_once('\t') {
                roff.control("TP", []);
                roff.text([roman(path)]);
                roff.text([roman(desc)]);
            } else {
                roff.text([roman(line)]);
            }
        }
    }
    if !page.warnings.is_empty() {
        roff.control("SH", ["WARNINGS"]);
        roff.text([roman(page.warnings)]);
    }
    if !page.see_also.is_empty() {
        roff.control("SH", ["SEE ALSO"]);
        roff.text([roman(page.see_also)]);
    }
    fs::write(out_dir.join(format!("{}.1", page.name)), roff.to_roff()).unwrap();
}

fn main() {
    let out_dir = Path::new("target/man");
    fs::create_dir_all(out_dir).unwrap();

    render_man_page(
        &ManPage {
            name: "pdrop",
            about: "drop process credentials to a named user",
            description: "Resolve username in the user database, print the current \
                          real/effective/saved uid and gid and the supplementary group list, \
                          lower the supplementary group list, the gid, and finally the uid to \
                          the target user's ids, and print the resulting state. The three \
                          mutations are issued through the raw 32-bit-id kernel entry points \
                          rather than the C library wrappers, so only the calling thread's \
                          credentials change. By default the supplementary group list is \
                          cleared; with the literal second argument 'setgroups' it is reduced \
                          to the target's primary gid instead. Any other second argument is \
                          ignored and clears the list. Changing credentials normally requires \
                          running as root.",
            synopsis: "<username> [setgroups]",
            options: &[
                ("-h, --help", "Print help."),
                ("-V, --version", "Print version."),
            ],
            examples: &[Example {
                title: "Example 1 Dropping to the daemon user",
                description: "The following example, run as root, drops to the daemon \
                              user and clears the supplementary group list:",
                code: "\
# pdrop daemon
Before: e/r/suid=0(root)  e/r/sgid=0(root)  groups:
After: e/r/suid=1(daemon)  e/r/sgid=1(daemon)  groups:",
            }],
            exit_status: "0 on success, non-zero if an error occurs (such as an unknown \
                          user, a missing argument, or a failed credential change).",
            files: "/proc/self/status\tSource of the reported credential state.",
            see_also: "setgroups(2), setgid(2), setuid(2), credentials(7)",
            warnings: "The id changes apply to the calling thread only; this tool is a \
                       test helper, not a general-purpose privilege dropper.",
        },
        out_dir,
    );

    println!("cargo:rerun-if-changed=build.rs");
}
