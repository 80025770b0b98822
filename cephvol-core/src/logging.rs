use env_logger::Target;
use std::fs;
use std::path::Path;

/// Where log records go: an append-mode pipe to `log_file`, or stderr when no
/// file was asked for or it cannot be opened.
///
/// stdout is never a target; it carries the JSON result for the automation engine.
pub fn log_target(log_file: Option<&Path>) -> Target {
    log_file
        .and_then(|path| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).ok()?;
            }
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr)
}

/// Initialise `env_logger`.
pub fn init_with(log_file: Option<&Path>) {
    // Respect RUST_LOG if set, otherwise default to info.
    // try_init so a second initialisation (tests, embedding) is tolerated.
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(log_target(log_file))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_path_pipes_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ceph_volume.log");

        assert!(matches!(log_target(Some(&path)), Target::Pipe(_)));
        assert!(path.exists());
    }

    #[test]
    fn unopenable_path_falls_back_to_stderr() {
        // A regular file cannot be the parent directory of the log.
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().join("ceph_volume.log");

        assert!(matches!(log_target(Some(&path)), Target::Stderr));
    }

    #[test]
    fn no_path_logs_to_stderr() {
        assert!(matches!(log_target(None), Target::Stderr));
    }

    #[test]
    fn init_twice_is_tolerated() {
        init_with(None);
        init_with(None);
        log::info!("logger initialised");
    }
}
