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

use crate::cred::{self, CredState};
use crate::Error;

fn fmt_uid(uid: u32) -> String {
    match cred::resolve_uid(uid) {
        Some(name) => format!("{}({})", uid, name),
        None => uid.to_string(),
    }
}

fn fmt_gid(gid: u32) -> String {
    match cred::resolve_gid(gid) {
        Some(name) => format!("{}({})", gid, name),
        None => gid.to_string(),
    }
}

fn render(cred: &CredState) -> String {
    let mut line = String::new();

    if cred.euid == cred.ruid && cred.ruid == cred.suid {
        line.push_str(&format!("e/r/suid={}", fmt_uid(cred.euid)));
    } else {
        line.push_str(&format!(
            "euid={} ruid={} suid={}",
            fmt_uid(cred.euid),
            fmt_uid(cred.ruid),
            fmt_uid(cred.suid)
        ));
    }
    line.push_str("  ");

    if cred.egid == cred.rgid && cred.rgid == cred.sgid {
        line.push_str(&format!("e/r/sgid={}", fmt_gid(cred.egid)));
    } else {
        line.push_str(&format!(
            "egid={} rgid={} sgid={}",
            fmt_gid(cred.egid),
            fmt_gid(cred.rgid),
            fmt_gid(cred.sgid)
        ));
    }

    line.push_str("  groups:");
    for gid in &cred.groups {
        line.push(' ');
        line.push_str(&fmt_gid(*gid));
    }
    line.push('\n');

    line
}

/// Print the current identifier state as a single newline-terminated line
/// on stdout: real/effective/saved uid and gid (condensed to one field when
/// all three agree) and the supplementary group list. The caller prints any
/// label first; nothing else is written before the report.
pub fn print_cred_state() -> Result<(), Error> {
    let cred = cred::current()?;
    print!("{}", render(&cred));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ids high enough that no user database entry resolves, keeping the
    // rendered names deterministic.
    fn state(uid: (u32, u32, u32), gid: (u32, u32, u32), groups: Vec<u32>) -> CredState {
        CredState {
            ruid: uid.0,
            euid: uid.1,
            suid: uid.2,
            rgid: gid.0,
            egid: gid.1,
            sgid: gid.2,
            groups,
        }
    }

    #[test]
    fn render_condenses_matching_triples() {
        let line = render(&state(
            (4290000001, 4290000001, 4290000001),
            (4290000002, 4290000002, 4290000002),
            vec![],
        ));
        assert_eq!(
            line,
            "e/r/suid=4290000001  e/r/sgid=4290000002  groups:\n"
        );
    }

    #[test]
    fn render_expands_mismatched_triples() {
        let line = render(&state(
            (4290000001, 4290000003, 4290000001),
            (4290000002, 4290000002, 4290000002),
            vec![],
        ));
        assert!(line.starts_with(
            "euid=4290000003 ruid=4290000001 suid=4290000001"
        ));
    }

    #[test]
    fn render_lists_supplementary_groups_after_the_colon() {
        let line = render(&state(
            (4290000001, 4290000001, 4290000001),
            (4290000002, 4290000002, 4290000002),
            vec![4290000004, 4290000005],
        ));
        assert!(line.ends_with("groups: 4290000004 4290000005\n"));
    }
}
