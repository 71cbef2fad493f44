use std::path::{Path, PathBuf};

/// Default helper executable; Windows PowerShell ships the clipboard-history
/// cmdlet surface the support modules build on.
pub const DEFAULT_PWSH: &str = "powershell.exe";

/// Support modules the helper preloads. They implement "read the clipboard
/// history" and "encode it as one safe JSON line" on the PowerShell side and
/// are shipped alongside the binary, not generated here.
const SUPPORT_MODULES: [&str; 2] = ["clipboard-history.psm1", "safe-json.psm1"];

const CAPTURE_COMMAND: &str = "ConvertTo-SafeEncodeJson @(Get-ClipboardHistory) -Compress";

/// Program plus argv for one helper process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Build the argv that turns PowerShell into a line-triggered history server.
///
/// The inline script imports the support modules, then loops: an empty line
/// on stdin runs one capture-and-emit cycle, any non-empty line ends the loop
/// and lets the process exit.
pub fn history_server_command(pwsh: &Path, module_dir: &Path) -> CommandSpec {
    let imports = SUPPORT_MODULES
        .iter()
        .map(|name| format!("\"{}\"", module_dir.join(name).display()))
        .collect::<Vec<_>>()
        .join(", ");
    let script = format!(
        "Import-Module @({imports});while ((Read-Host) -eq '') {{ {CAPTURE_COMMAND} }}"
    );
    CommandSpec {
        program: pwsh.to_path_buf(),
        args: vec!["-NoProfile".to_string(), "-Command".to_string(), script],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_server_command_shape() {
        let spec = history_server_command(Path::new("powershell.exe"), Path::new("/opt/mods"));

        assert_eq!(spec.program, PathBuf::from("powershell.exe"));
        assert_eq!(spec.args.len(), 3);
        assert_eq!(spec.args[0], "-NoProfile");
        assert_eq!(spec.args[1], "-Command");

        let script = &spec.args[2];
        assert!(script.starts_with("Import-Module @("));
        assert!(script.contains("clipboard-history.psm1"));
        assert!(script.contains("safe-json.psm1"));
        assert!(script.contains("while ((Read-Host) -eq '')"));
        assert!(script.contains("Get-ClipboardHistory"));
    }

    #[test]
    fn test_module_paths_are_rooted_in_module_dir() {
        let spec = history_server_command(Path::new("pwsh"), Path::new("/opt/mods"));
        let script = &spec.args[2];
        assert!(script.contains(&format!("\"{}\"", Path::new("/opt/mods").join("safe-json.psm1").display())));
    }
}
