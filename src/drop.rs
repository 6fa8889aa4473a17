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

use std::fmt;
use std::ptr;

use nix::errno::Errno;
use nix::libc;
use nix::unistd::geteuid;

/// How the supplementary group list is mutated before the gid/uid drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupsMode {
    /// Empty the supplementary list.
    Clear,
    /// Replace the supplementary list with the target's primary gid.
    KeepPrimary,
}

impl GroupsMode {
    /// Select the mode from the operands following the user name. Only a
    /// single trailing operand equal to the literal `setgroups` selects
    /// [`GroupsMode::KeepPrimary`]; any other value, extra operands, or no
    /// operand at all falls back to [`GroupsMode::Clear`]. Unrecognized
    /// trailing operands are deliberately ignored rather than rejected.
    pub fn from_operands<S: AsRef<str>>(extra: &[S]) -> GroupsMode {
        match extra {
            [flag] if flag.as_ref() == "setgroups" => GroupsMode::KeepPrimary,
            _ => GroupsMode::Clear,
        }
    }
}

/// A failed step of the drop sequence: the syscall name and the errno it
/// left behind. Displays perror-style as `<op>: <description>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropError {
    pub op: &'static str,
    pub errno: Errno,
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.errno.desc())
    }
}

impl std::error::Error for DropError {}

// x86 and arm keep the legacy 16-bit-id syscalls under the original
// numbers, with the full-width ids behind the *32 entry points. 64-bit
// architectures have a single entry point that is already full-width.
#[cfg(any(target_arch = "x86", target_arch = "arm"))]
mod nr {
    use nix::libc::{self, c_long};

    pub const SETGROUPS: c_long = libc::SYS_setgroups32;
    pub const SETGID: c_long = libc::SYS_setgid32;
    pub const SETUID: c_long = libc::SYS_setuid32;
}

#[cfg(not(any(target_arch = "x86", target_arch = "arm")))]
mod nr {
    use nix::libc::{self, c_long};

    pub const SETGROUPS: c_long = libc::SYS_setgroups;
    pub const SETGID: c_long = libc::SYS_setgid;
    pub const SETUID: c_long = libc::SYS_setuid;
}

fn check(op: &'static str, ret: libc::c_long) -> Result<(), DropError> {
    if ret < 0 {
        Err(DropError {
            op,
            errno: Errno::last(),
        })
    } else {
        Ok(())
    }
}

/// Lower the calling thread's credentials to `uid`/`gid`.
///
/// The three mutations go through the raw syscall entry on purpose: the
/// libc wrappers broadcast id changes to every thread of the process, while
/// the kernel primitives affect only the calling thread, and that per-thread
/// behavior is what this helper exists to exercise. The order is fixed:
/// the supplementary list can only be edited while the egid still confers
/// privilege, and setgid only works while the euid is still 0, so groups go
/// first, then gid, then uid.
///
/// On failure the remaining steps are not attempted and the completed steps
/// are not rolled back.
pub fn drop_to(uid: u32, gid: u32, mode: GroupsMode) -> Result<(), DropError> {
    match mode {
        GroupsMode::Clear => {
            Errno::clear();
            // SAFETY: length 0 with a null list empties the supplementary
            // list; the kernel dereferences nothing.
            let ret =
                unsafe { libc::syscall(nr::SETGROUPS, 0usize, ptr::null::<libc::gid_t>()) };
            check("setgroups", ret)?;
        }
        GroupsMode::KeepPrimary => {
            // Editing the supplementary list needs CAP_SETGID. Skip the
            // step entirely for unprivileged callers and let the gid/uid
            // mutations below report the failure.
            if geteuid().is_root() {
                let list = [gid as libc::gid_t];
                Errno::clear();
                // SAFETY: the pointer and length describe a live array.
                let ret = unsafe { libc::syscall(nr::SETGROUPS, list.len(), list.as_ptr()) };
                check("setgroups", ret)?;
            }
        }
    }

    Errno::clear();
    // SAFETY: no pointer arguments. Sets real, effective, and saved gid in
    // one step.
    let ret = unsafe { libc::syscall(nr::SETGID, gid as libc::gid_t) };
    check("setgid", ret)?;

    Errno::clear();
    // SAFETY: no pointer arguments. Sets real, effective, and saved uid in
    // one step; last because it forfeits the privilege the earlier steps
    // rely on.
    let ret = unsafe { libc::syscall(nr::SETUID, uid as libc::uid_t) };
    check("setuid", ret)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setgroups_operand_selects_keep_primary() {
        assert_eq!(
            GroupsMode::from_operands(&["setgroups"]),
            GroupsMode::KeepPrimary
        );
    }

    #[test]
    fn other_operand_shapes_fall_back_to_clear() {
        assert_eq!(GroupsMode::from_operands::<&str>(&[]), GroupsMode::Clear);
        assert_eq!(GroupsMode::from_operands(&["groups"]), GroupsMode::Clear);
        assert_eq!(GroupsMode::from_operands(&["SETGROUPS"]), GroupsMode::Clear);
        assert_eq!(
            GroupsMode::from_operands(&["setgroups", "extra"]),
            GroupsMode::Clear
        );
    }

    #[test]
    fn drop_error_displays_like_perror() {
        let e = DropError {
            op: "setgid",
            errno: Errno::EPERM,
        };
        assert_eq!(e.to_string(), "setgid: Operation not permitted");
    }

    #[test]
    fn check_maps_negative_return_to_the_current_errno() {
        assert!(check("setuid", 0).is_ok());

        Errno::clear();
        // SAFETY: an invalid syscall number takes no arguments and fails
        // with ENOSYS.
        let ret = unsafe { libc::syscall(-1) };
        let err = check("setuid", ret).unwrap_err();
        assert_eq!(err.op, "setuid");
        assert_eq!(err.errno, Errno::ENOSYS);
    }
}
