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

use std::fs;

use nix::libc;
use nix::unistd::User;

use crate::Error;

/// Credential state of the current process: real/effective/saved uid and
/// gid plus the supplementary group list.
pub struct CredState {
    pub ruid: u32,
    pub euid: u32,
    pub suid: u32,
    pub rgid: u32,
    pub egid: u32,
    pub sgid: u32,
    pub groups: Vec<u32>,
}

/// Read the current credential state from /proc/self/status.
pub fn current() -> Result<CredState, Error> {
    let status = fs::read_to_string("/proc/self/status")?;
    parse_status(&status)
}

// Uid/Gid rows carry real, effective, saved, fs; only the first three
// matter here.
fn id_triple(value: &str) -> Option<(u32, u32, u32)> {
    let fields: Vec<u32> = value
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if fields.len() >= 3 {
        Some((fields[0], fields[1], fields[2]))
    } else {
        None
    }
}

fn parse_status(status: &str) -> Result<CredState, Error> {
    let mut uid = None;
    let mut gid = None;
    let mut groups = Vec::new();

    for line in status.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key {
            "Uid" => uid = id_triple(value),
            "Gid" => gid = id_triple(value),
            "Groups" => {
                groups = value
                    .split_whitespace()
                    .filter_map(|s| s.parse().ok())
                    .collect();
            }
            _ => {}
        }
    }

    let (ruid, euid, suid) = uid.ok_or_else(|| Error::in_file("status", "missing Uid"))?;
    let (rgid, egid, sgid) = gid.ok_or_else(|| Error::in_file("status", "missing Gid"))?;

    Ok(CredState {
        ruid,
        euid,
        suid,
        rgid,
        egid,
        sgid,
        groups,
    })
}

/// Look up a user database entry by name. NSS errors are folded into "not
/// found"; callers treat the two the same way.
pub fn lookup_user(name: &str) -> Option<User> {
    User::from_name(name).ok().flatten()
}

pub fn resolve_uid(uid: u32) -> Option<String> {
    // SAFETY: getpwuid returns a pointer to a static struct or null.
    let pw = unsafe { libc::getpwuid(uid) };
    if pw.is_null() {
        return None;
    }
    // SAFETY: pw_name is a valid C string if pw is non-null.
    let name = unsafe { std::ffi::CStr::from_ptr((*pw).pw_name) };
    name.to_str().ok().map(str::to_string)
}

pub fn resolve_gid(gid: u32) -> Option<String> {
    // SAFETY: getgrgid returns a pointer to a static struct or null.
    let gr = unsafe { libc::getgrgid(gid) };
    if gr.is_null() {
        return None;
    }
    // SAFETY: gr_name is a valid C string if gr is non-null.
    let name = unsafe { std::ffi::CStr::from_ptr((*gr).gr_name) };
    name.to_str().ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "\
Name:\tpdrop
Umask:\t0022
State:\tR (running)
Uid:\t1000\t1001\t1002\t1003
Gid:\t2000\t2001\t2002\t2003
Groups:\t4 24 27
";

    #[test]
    fn parse_status_extracts_id_triples_and_groups() {
        let cred = parse_status(STATUS).expect("parse status");
        assert_eq!(
            (cred.ruid, cred.euid, cred.suid),
            (1000, 1001, 1002),
            "fsuid must not leak into the triple"
        );
        assert_eq!((cred.rgid, cred.egid, cred.sgid), (2000, 2001, 2002));
        assert_eq!(cred.groups, vec![4, 24, 27]);
    }

    #[test]
    fn parse_status_handles_empty_groups_row() {
        let status = "Uid:\t0\t0\t0\t0\nGid:\t0\t0\t0\t0\nGroups:\t \n";
        let cred = parse_status(status).expect("parse status");
        assert!(cred.groups.is_empty());
    }

    #[test]
    fn parse_status_rejects_missing_uid_row() {
        let status = "Name:\tpdrop\nGid:\t0\t0\t0\t0\n";
        assert!(parse_status(status).is_err());
    }

    #[test]
    fn current_reads_own_status() {
        let cred = current().expect("read /proc/self/status");
        // The test runner has equal real and effective ids.
        assert_eq!(cred.ruid, cred.euid);
        assert_eq!(cred.rgid, cred.egid);
    }

    #[test]
    fn lookup_user_returns_none_for_unknown_name() {
        assert!(lookup_user("no_such_user_pdrop_test").is_none());
    }

    #[test]
    fn lookup_user_resolves_root_when_present() {
        // Minimal chroots may lack an /etc/passwd; only assert when the
        // entry exists.
        if let Some(root) = lookup_user("root") {
            assert_eq!(root.uid.as_raw(), 0);
            assert_eq!(root.gid.as_raw(), 0);
        }
    }
}
