use std::io;
use std::path::Path;
use std::process::Command;

/// Opens a file with the platform's default application
pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    command.arg(path).spawn()?;
    Ok(())
}
