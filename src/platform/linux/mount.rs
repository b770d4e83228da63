//! Linux mount table probing and mount/umount commands

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::platform::command::{CommandRunner, CommandSpec};
use crate::platform::traits::{PlatformError, PlatformResult};

/// Kernel view of the mount table.
pub const PROC_MOUNTS: &str = "/proc/mounts";

/// Anchor `location` at `base` and fold `.`/`..` the way the kernel records
/// mount points: always absolute, never relative.
pub fn resolve_location(location: &str, base: &Path) -> String {
    let path = Path::new(location);
    let mut resolved = if path.is_absolute() { PathBuf::new() } else { base.to_path_buf() };
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved.to_string_lossy().into_owned()
}

/// Encode `location` the way the kernel writes it into the mount point
/// column of /proc/mounts, surrounded by the column separators.
///
/// The kernel octal-escapes space, tab, newline and backslash; trailing
/// slashes never appear. For an absolute path the surrounding spaces pin the
/// match to the mount point column: the device column has no leading space
/// and no other column starts with `/`.
pub fn mount_table_field(location: &str) -> String {
    let trimmed = match location.trim_end_matches('/') {
        "" => "/",
        path => path,
    };

    let mut field = String::with_capacity(trimmed.len() + 2);
    field.push(' ');
    for ch in trimmed.chars() {
        match ch {
            ' ' => field.push_str("\\040"),
            '\t' => field.push_str("\\011"),
            '\n' => field.push_str("\\012"),
            '\\' => field.push_str("\\134"),
            other => field.push(other),
        }
    }
    field.push(' ');
    field
}

/// `grep -qsF -- " <location> " /proc/mounts`
pub fn check_command(location: &str) -> CommandSpec {
    CommandSpec::new("grep").args(["-qsF", "--"]).arg(mount_table_field(location)).arg(PROC_MOUNTS)
}

/// Whether `location` is a mount point right now.
///
/// Relative locations are resolved against the working directory, as
/// mount(8) would. grep exits 0 on a match and 1 on none; anything else
/// means the table could not be read.
pub fn is_mounted(runner: &dyn CommandRunner, location: &str) -> PlatformResult<bool> {
    let cwd = env::current_dir()?;
    let check = check_command(&resolve_location(location, &cwd));
    let output = runner.run(&check)?;
    match output.code {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        code => Err(PlatformError::SystemError {
            code: code.unwrap_or(-1),
            message: format!("`{}` could not read the mount table", check),
        }),
    }
}

pub fn mount_command(device: &str, location: &str) -> CommandSpec {
    CommandSpec::new("mount").args([device, location])
}

pub fn unmount_command(location: &str) -> CommandSpec {
    CommandSpec::new("umount").arg(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::command::CommandOutput;
    use std::cell::RefCell;
    use std::io;

    struct FixedExit(Option<i32>);

    impl CommandRunner for FixedExit {
        fn run(&self, _command: &CommandSpec) -> io::Result<CommandOutput> {
            Ok(CommandOutput { code: self.0, ..Default::default() })
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<CommandSpec>>);

    impl CommandRunner for Recorder {
        fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
            self.0.borrow_mut().push(command.clone());
            Ok(CommandOutput { code: Some(1), ..Default::default() })
        }
    }

    #[test]
    fn test_mount_table_field() {
        assert_eq!(mount_table_field("/mnt/usb"), " /mnt/usb ");
        assert_eq!(mount_table_field("/mnt/usb/"), " /mnt/usb ");
        assert_eq!(mount_table_field("/"), " / ");
        assert_eq!(mount_table_field("/media/My Disk"), " /media/My\\040Disk ");
    }

    #[test]
    fn test_check_command() {
        let check = check_command("/mnt/data");
        assert_eq!(check.program, "grep");
        assert_eq!(check.args, vec!["-qsF", "--", " /mnt/data ", "/proc/mounts"]);
    }

    #[test]
    fn test_resolve_location() {
        let base = Path::new("/home/ops");
        assert_eq!(resolve_location("/mnt/usb", base), "/mnt/usb");
        assert_eq!(resolve_location("proc", base), "/home/ops/proc");
        assert_eq!(resolve_location("./disks/../usb/", base), "/home/ops/usb");
        assert_eq!(resolve_location("/mnt//usb/.", base), "/mnt/usb");
    }

    #[test]
    fn test_relative_location_checks_mount_point_column() {
        // " proc " would match the fstype column of every proc mount
        let runner = Recorder::default();
        assert!(!is_mounted(&runner, "proc").unwrap());

        let cwd = env::current_dir().unwrap();
        let expected = mount_table_field(&cwd.join("proc").to_string_lossy());
        let checks = runner.0.borrow();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].args[2], expected);
        assert!(checks[0].args[2].starts_with(" /"));
    }

    #[test]
    fn test_check_exit_codes() {
        assert!(is_mounted(&FixedExit(Some(0)), "/mnt").unwrap());
        assert!(!is_mounted(&FixedExit(Some(1)), "/mnt").unwrap());
        assert!(is_mounted(&FixedExit(Some(2)), "/mnt").is_err());
        assert!(is_mounted(&FixedExit(None), "/mnt").is_err());
    }

    #[test]
    fn test_commands() {
        assert_eq!(mount_command("/dev/sdb1", "/mnt/usb").to_string(), "mount /dev/sdb1 /mnt/usb");
        assert_eq!(unmount_command("/mnt/usb").to_string(), "umount /mnt/usb");
    }
}
