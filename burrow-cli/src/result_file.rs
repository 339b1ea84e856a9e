//! The file that carries the final directory back to the calling shell.

use std::fs;
use std::io;
use std::path::Path;

/// Write `dir` to `target` as raw path bytes, without a trailing newline.
pub fn write(target: &Path, dir: &Path) -> io::Result<()> {
    fs::write(target, path_bytes(dir))?;
    tracing::info!(dir = %dir.display(), target = %target.display(), "saved final directory");
    Ok(())
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

/// POSIX shell function that runs burrow and then cds into its result.
pub fn shell_function(program: &str, target: &Path) -> String {
    let target = shell_quote(&target.to_string_lossy());
    format!(
        r#"burrow_cd() {{
    rm -f -- {target}
    command {program} "$@" && [ -f {target} ] && cd -- "$(cat -- {target})"
}}
"#
    )
}

/// Single-quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
