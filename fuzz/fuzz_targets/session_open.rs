//! Fuzz target for opening and reading arbitrary bytes as a ZIP archive.
//!
//! The bytes are written to a temporary file, opened through an
//! `ArchiveSession`, and every entry is stat'ed and read with a small size
//! limit. The goal is to find panics or hangs in the session layer and the
//! codec beneath it.
//!
//! Run with: cargo +nightly fuzz run session_open

#![no_main]

use std::io::Write;

use libfuzzer_sys::fuzz_target;
use zipsession::{ArchiveSession, NoDiagnostics, SessionOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(mut file) = tempfile::NamedTempFile::new() else {
        return;
    };
    if file.write_all(data).and_then(|()| file.flush()).is_err() {
        return;
    }

    let options = SessionOptions::new().max_entry_size(1 << 20);
    let mut session = ArchiveSession::with_sink(NoDiagnostics).options(options);
    if session.open_read_encrypted(file.path(), "fuzz").is_err() {
        return;
    }

    let Ok(count) = session.count_entries() else {
        return;
    };
    // Cap the work per input
    for index in 0..count.min(64) {
        let _ = session.stat_entry(index);
        let _ = session.read_entry(index);
    }
    let _ = session.close();
});
