//! # Example System Module
//!
//! A minimal HardInfo module built as a shared object. It reports uptime,
//! memory and kernel version from `/proc` and exports the same values as
//! methods (`system::getUptime`, `system::getMemoryTotal`,
//! `system::getKernel`).
//!
//! Cargo names the artifact `libexample_system.so`; install it into the
//! modules directory as `system.so`.

#![allow(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use hardinfo_core::text::{seconds_to_string, size_human_readable};
use hardinfo_core::sysfs;
use hardinfo_module_api::abi::{RawModuleAbout, RawModuleEntry, RawModuleMethod};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CString;
use std::fs;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

const PROC: &str = "/proc";

/// Uptime report for a procfs mount
pub fn uptime_report(proc_dir: &Path) -> String {
    let seconds = sysfs::read_float(proc_dir, "uptime");
    seconds_to_string(seconds as u32)
}

/// Total and available memory from `meminfo`
pub fn memory_report(proc_dir: &Path) -> String {
    let meminfo = fs::read_to_string(proc_dir.join("meminfo")).unwrap_or_default();

    let field = |name: &str| -> Option<f32> {
        meminfo
            .lines()
            .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
            .and_then(|value| value.split_whitespace().next()?.parse::<f32>().ok())
            .map(|kib| kib * 1024.0)
    };

    match (field("MemTotal"), field("MemAvailable")) {
        (Some(total), Some(available)) => format!(
            "{} total, {} available",
            size_human_readable(total),
            size_human_readable(available)
        ),
        (Some(total), None) => format!("{} total", size_human_readable(total)),
        _ => "Unknown".to_string(),
    }
}

/// Running kernel release
pub fn kernel_report(proc_dir: &Path) -> String {
    sysfs::read_string(proc_dir.join("sys").join("kernel"), "osrelease")
        .unwrap_or_else(|| "Unknown".to_string())
}

#[derive(Clone, Copy)]
enum Report {
    Uptime,
    Memory,
    Kernel,
}

impl Report {
    fn render(self, proc_dir: &Path) -> String {
        match self {
            Self::Uptime => uptime_report(proc_dir),
            Self::Memory => memory_report(proc_dir),
            Self::Kernel => kernel_report(proc_dir),
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Uptime => "uptime",
            Self::Memory => "memory",
            Self::Kernel => "kernel",
        }
    }
}

thread_local! {
    static PROC_DIR: RefCell<PathBuf> = RefCell::new(PathBuf::from(PROC));
    static CACHE: RefCell<HashMap<&'static str, String>> = RefCell::new(HashMap::new());
    // Strings handed to the host, one slot per exported function
    static OUTPUT: RefCell<HashMap<&'static str, CString>> = RefCell::new(HashMap::new());
}

fn scan(report: Report, reload: bool) {
    CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if reload || !cache.contains_key(report.key()) {
            let text = PROC_DIR.with(|dir| report.render(&dir.borrow()));
            cache.insert(report.key(), text);
        }
    });
}

fn cached(report: Report) -> String {
    scan(report, false);
    CACHE.with(|cache| cache.borrow().get(report.key()).cloned().unwrap_or_default())
}

/// Keep `text` alive until the next call into the function owning `slot`
fn hand_out(slot: &'static str, text: String) -> *const c_char {
    let text = CString::new(text.replace('\0', "")).unwrap_or_default();
    OUTPUT.with(|output| {
        let mut output = output.borrow_mut();
        let stored = output.entry(slot).or_default();
        *stored = text;
        stored.as_ptr()
    })
}

extern "C" fn uptime_callback() -> *const c_char {
    hand_out("uptime_callback", cached(Report::Uptime))
}

extern "C" fn memory_callback() -> *const c_char {
    hand_out("memory_callback", cached(Report::Memory))
}

extern "C" fn kernel_callback() -> *const c_char {
    hand_out("kernel_callback", cached(Report::Kernel))
}

extern "C" fn uptime_scan(reload: bool) {
    scan(Report::Uptime, reload);
}

extern "C" fn memory_scan(reload: bool) {
    scan(Report::Memory, reload);
}

extern "C" fn kernel_scan(reload: bool) {
    scan(Report::Kernel, reload);
}

// Methods ignore their parameter and always read fresh values.
extern "C" fn get_uptime(_param: *const c_char) -> *const c_char {
    scan(Report::Uptime, true);
    hand_out("get_uptime", cached(Report::Uptime))
}

extern "C" fn get_memory_total(_param: *const c_char) -> *const c_char {
    scan(Report::Memory, true);
    hand_out("get_memory_total", cached(Report::Memory))
}

extern "C" fn get_kernel(_param: *const c_char) -> *const c_char {
    scan(Report::Kernel, true);
    hand_out("get_kernel", cached(Report::Kernel))
}

static ENTRIES: [RawModuleEntry; 4] = [
    RawModuleEntry {
        name: c"Uptime".as_ptr(),
        icon: c"uptime.png".as_ptr(),
        callback: Some(uptime_callback),
        scan_callback: Some(uptime_scan),
    },
    RawModuleEntry {
        name: c"Memory".as_ptr(),
        icon: c"memory.png".as_ptr(),
        callback: Some(memory_callback),
        scan_callback: Some(memory_scan),
    },
    RawModuleEntry {
        name: c"Kernel".as_ptr(),
        icon: c"os.png".as_ptr(),
        callback: Some(kernel_callback),
        scan_callback: Some(kernel_scan),
    },
    RawModuleEntry::END,
];

static METHODS: [RawModuleMethod; 4] = [
    RawModuleMethod {
        name: c"getUptime".as_ptr(),
        function: Some(get_uptime),
    },
    RawModuleMethod {
        name: c"getMemoryTotal".as_ptr(),
        function: Some(get_memory_total),
    },
    RawModuleMethod {
        name: c"getKernel".as_ptr(),
        function: Some(get_kernel),
    },
    RawModuleMethod::END,
];

static ABOUT: RawModuleAbout = RawModuleAbout {
    description: c"Uptime, memory and kernel summary".as_ptr(),
    author: c"HardInfo Developers".as_ptr(),
    version: c"0.1.0".as_ptr(),
    license: c"GPL-2.0-only".as_ptr(),
};

/// Module display name
#[no_mangle]
pub extern "C" fn hi_module_get_name() -> *const c_char {
    c"System".as_ptr()
}

/// Entry table, terminated by a null name
#[no_mangle]
pub extern "C" fn hi_module_get_entries() -> *const RawModuleEntry {
    ENTRIES.as_ptr()
}

/// Sort weight
#[no_mangle]
pub extern "C" fn hi_module_get_weight() -> c_int {
    50
}

/// About table
#[no_mangle]
pub extern "C" fn hi_module_get_about() -> *const RawModuleAbout {
    &ABOUT
}

/// Exported methods, terminated by a null name
#[no_mangle]
pub extern "C" fn hi_exported_methods() -> *const RawModuleMethod {
    METHODS.as_ptr()
}

/// Drop cached reports
#[no_mangle]
pub extern "C" fn hi_module_init() {
    CACHE.with(|cache| cache.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn fake_proc() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("uptime"), "93784.12 180000.50\n").unwrap();
        fs::write(
            dir.path().join("meminfo"),
            "MemTotal:       16384000 kB\nMemFree:         1024000 kB\nMemAvailable:    8192000 kB\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("sys/kernel")).unwrap();
        fs::write(dir.path().join("sys/kernel/osrelease"), "6.1.0-test\n").unwrap();
        dir
    }

    #[test]
    fn test_reports() {
        let dir = fake_proc();

        assert_eq!(uptime_report(dir.path()), seconds_to_string(93784));
        assert_eq!(
            memory_report(dir.path()),
            format!(
                "{} total, {} available",
                size_human_readable(16384000.0 * 1024.0),
                size_human_readable(8192000.0 * 1024.0)
            )
        );
        assert_eq!(kernel_report(dir.path()), "6.1.0-test");
    }

    #[test]
    fn test_missing_proc() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(memory_report(dir.path()), "Unknown");
        assert_eq!(kernel_report(dir.path()), "Unknown");
    }

    #[test]
    fn test_exported_tables() {
        assert_eq!(ENTRIES.len(), 4);
        assert!(ENTRIES[3].name.is_null());
        assert!(METHODS[3].name.is_null());

        // SAFETY: the name is a static C string literal.
        let name = unsafe { CStr::from_ptr(hi_module_get_name()) };
        assert_eq!(name.to_str().unwrap(), "System");
    }

    #[test]
    fn test_callbacks_use_cache_until_reload() {
        let dir = fake_proc();
        PROC_DIR.with(|proc_dir| *proc_dir.borrow_mut() = dir.path().to_path_buf());
        hi_module_init();

        let read = |ptr: *const c_char| {
            // SAFETY: the string stays valid until the next call into the same callback.
            unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
        };

        assert_eq!(read(kernel_callback()), "6.1.0-test");

        fs::write(dir.path().join("sys/kernel/osrelease"), "6.2.0-test\n").unwrap();
        assert_eq!(read(kernel_callback()), "6.1.0-test");

        kernel_scan(true);
        assert_eq!(read(kernel_callback()), "6.2.0-test");
        assert_eq!(read(get_kernel(std::ptr::null())), "6.2.0-test");
    }
}
