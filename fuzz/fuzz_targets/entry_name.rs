//! Fuzz target for entry name validation with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run entry_name
//!
//! Key security properties being tested:
//! - Path traversal rejection (../ and ..\)
//! - Absolute path rejection
//! - NUL byte handling

#![no_main]

use std::path::{Component, Path};

use libfuzzer_sys::fuzz_target;
use zipsession::PathSafety;
use zipsession::safety::{is_safe_entry_name, validate_extract_path};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    let accepted = is_safe_entry_name(name);
    let validated = validate_extract_path(name, Path::new("dest"), PathSafety::Strict, 0);
    assert_eq!(accepted, validated.is_ok(), "validation disagrees for {name:?}");

    if let Ok(target) = validated {
        assert!(!name.contains('\0'), "NUL byte accepted: {name:?}");
        assert!(
            !name.split(['/', '\\']).any(|part| part == ".."),
            "Path traversal accepted: {name:?}"
        );
        assert!(
            target
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir)),
            "Escaping target for {name:?}: {target:?}"
        );
    }
});
