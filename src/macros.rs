// src/macros.rs

/// Logs a structured line with timestamp, level, component, pid, tid, and message.
/// Usage:
/// ```rust
/// use log::Level;
/// native_guard::guard_log!(Level::Info, "prober", "Probe started");
/// native_guard::guard_log!(Level::Debug, "timing", "elapsed={}us", 3);
/// ```
/// Logs like:
/// [2025-04-25T16:32:10+02:00][DEBUG][prober][pid=4568][tid=ThreadId(1)] Your message here
///
/// Nothing is formatted unless a logger is installed and the level is enabled.
#[macro_export]
macro_rules! guard_log {
    ($level:expr, $component:expr, $fmt:expr $(, $($arg:tt)+)?) => {
        log::log!(
            $level,
            concat!(
                "[", "{}", "]",          // timestamp
                "[", "{}", "]",          // level via Display
                "[", $component, "]",    // component
                "[pid=", "{}", "]",      // pid
                "[tid=", "{:?}", "] ",   // tid
                $fmt                     // message
            ),
            chrono::Local::now().to_rfc3339(),
            $level,
            std::process::id(),
            std::thread::current().id()
            $(, $($arg)+)?
        );
    };
}

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    /// Keeps every formatted record at WARN or above.
    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    static CAPTURE: CaptureLogger = CaptureLogger { lines: Mutex::new(Vec::new()) };

    impl Log for CaptureLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }
        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                self.lines.lock().unwrap().push(record.args().to_string());
            }
        }
        fn flush(&self) {}
    }

    #[test]
    fn detection_line_carries_component_pid_and_thread() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Warn);

        guard_log!(Level::Warn, "prober", "{} triggered", "timing_anomaly");
        guard_log!(Level::Info, "prober", "not captured");

        let tid = format!("[tid={:?}]", std::thread::current().id());
        let lines: Vec<String> = std::mem::take(&mut *CAPTURE.lines.lock().unwrap())
            .into_iter()
            .filter(|l| l.contains(&tid))
            .collect();
        assert_eq!(lines.len(), 1, "{:?}", lines);
        let line = &lines[0];
        assert!(line.contains("[WARN][prober]"), "{}", line);
        assert!(line.contains(&format!("[pid={}]", std::process::id())), "{}", line);
        assert!(line.contains("[tid=ThreadId("), "{}", line);
        assert!(line.ends_with("] timing_anomaly triggered"), "{}", line);
    }
}
