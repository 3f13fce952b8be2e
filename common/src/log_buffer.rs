//! Log buffer with levels and timestamps.
//!
//! Provides a circular buffer of log entries that a status page or a host
//! harness can drain. Each entry has a log level, message, and timestamp.
//!
//! # Log Levels
//!
//! - `Trace`: verbose debugging
//! - `Debug`: debugging information (event dispatch)
//! - `Info`: normal operation (widget registration)
//! - `Warn`: degraded but handled (pool exhaustion, out-of-range input)
//! - `Error`: construction-time failures
//!
//! # Timestamps
//!
//! The widget engine runs on a single cooperative context driven by
//! `Display::tick`. Every tick publishes its time through [`set_clock`]; log
//! entries are stamped with the last published value, so the buffer never
//! needs a time driver of its own.
//!
//! # Usage
//!
//! ```ignore
//! use dongle_common::{log_info, log_warn};
//!
//! log_info!("modifiers widget #{} registered", idx);
//! log_warn!("battery source {} out of range", source);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use heapless::String;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 48;

/// Formatting buffer used by the `log_*!` macros.
pub type LogLine = String<LOG_MSG_LEN>;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(dead_code)] // Variants used via log_*! macros
pub enum LogLevel {
    /// Verbose debugging
    Trace = 0,
    /// Debug information
    Debug = 1,
    /// Normal operation
    #[default]
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors
    Error = 4,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Log severity level.
    pub level: LogLevel,
    /// Log message (truncated to LOG_MSG_LEN).
    pub message: String<LOG_MSG_LEN>,
    /// Engine clock in milliseconds when the entry was pushed.
    pub timestamp_ms: u32,
}

impl LogEntry {
    /// Create a new log entry.
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u32,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Circular buffer of log entries.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
}

impl LogBuffer {
    /// Create a new empty log buffer.
    pub const fn new() -> Self {
        Self {
            entries: [const {
                LogEntry {
                    level: LogLevel::Info,
                    message: String::new(),
                    timestamp_ms: 0,
                }
            }; LOG_ENTRIES],
            head: 0,
            count: 0,
        }
    }

    /// Push a new log entry. Oldest entry is dropped if buffer is full.
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
    }

    /// Get the number of entries in the buffer.
    #[inline]
    pub const fn len(&self) -> usize { self.count }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> LogBufferIter<'_> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        LogBufferIter {
            buffer: self,
            pos: start,
            remaining: self.count,
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

/// Iterator over log buffer entries (oldest to newest).
pub struct LogBufferIter<'a> {
    buffer: &'a LogBuffer,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for LogBufferIter<'a> {
    type Item = &'a LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.buffer.entries[self.pos];
        self.pos = (self.pos + 1) % LOG_ENTRIES;
        self.remaining -= 1;
        Some(entry)
    }
}

/// Global log buffer protected by a mutex.
pub static LOG_BUFFER: Mutex<CriticalSectionRawMutex, LogBuffer> = Mutex::new(LogBuffer::new());

/// Last engine clock value, in milliseconds.
static CLOCK_MS: AtomicU32 = AtomicU32::new(0);

/// Publish the engine clock used to stamp new entries.
#[inline]
pub fn set_clock(now: Instant) { CLOCK_MS.store(now.as_millis() as u32, Ordering::Relaxed); }

/// Get the timestamp in milliseconds for logging.
#[inline]
pub fn current_timestamp_ms() -> u32 { CLOCK_MS.load(Ordering::Relaxed) }

/// Push a log entry to the global buffer.
///
/// This is non-blocking - if the mutex is held, the log is dropped.
pub fn push_log(
    level: LogLevel,
    message: &str,
) {
    let entry = LogEntry::new(level, message, current_timestamp_ms());

    if let Ok(mut buffer) = LOG_BUFFER.try_lock() {
        buffer.push(entry);
    }
}

/// Move every buffered entry to `sink`, oldest first.
///
/// Returns the number of entries drained, 0 when the lock is contended.
pub fn drain(mut sink: impl FnMut(&LogEntry)) -> usize {
    let Ok(mut buffer) = LOG_BUFFER.try_lock() else {
        return 0;
    };
    let drained = buffer.len();
    buffer.iter().for_each(&mut sink);
    buffer.clear();
    drained
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf = $crate::log_buffer::LogLine::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Info, buf.as_str());
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf = $crate::log_buffer::LogLine::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Warn, buf.as_str());
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf = $crate::log_buffer::LogLine::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Error, buf.as_str());
        #[cfg(feature = "defmt")]
        defmt::error!($($arg)*);
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf = $crate::log_buffer::LogLine::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Debug, buf.as_str());
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_truncates_message() {
        let long = "x".repeat(LOG_MSG_LEN * 2);
        let entry = LogEntry::new(LogLevel::Warn, &long, 7);
        assert_eq!(entry.message.len(), LOG_MSG_LEN, "Message should be truncated to capacity");
        assert_eq!(entry.timestamp_ms, 7);
    }

    #[test]
    fn test_buffer_starts_empty() {
        let buffer = LogBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn test_buffer_wraps_and_keeps_newest() {
        let mut buffer = LogBuffer::new();
        for i in 0..(LOG_ENTRIES as u32 + 3) {
            buffer.push(LogEntry::new(LogLevel::Info, "tick", i));
        }

        assert_eq!(buffer.len(), LOG_ENTRIES, "Buffer should cap at LOG_ENTRIES");
        let stamps: Vec<u32> = buffer.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps.first(), Some(&3), "Oldest three entries should be dropped");
        assert_eq!(stamps.last(), Some(&(LOG_ENTRIES as u32 + 2)));
        assert!(stamps.windows(2).all(|w| w[0] < w[1]), "Iteration should be oldest first");
    }

    #[test]
    fn test_clear_resets_count() {
        let mut buffer = LogBuffer::new();
        buffer.push(LogEntry::new(LogLevel::Error, "boom", 1));
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_level_prefixes() {
        assert_eq!(LogLevel::Trace.prefix(), 'T');
        assert_eq!(LogLevel::Debug.prefix(), 'D');
        assert_eq!(LogLevel::Info.prefix(), 'I');
        assert_eq!(LogLevel::Warn.prefix(), 'W');
        assert_eq!(LogLevel::Error.prefix(), 'E');
        assert!(LogLevel::Warn > LogLevel::Info, "Levels should order by severity");
    }
}
