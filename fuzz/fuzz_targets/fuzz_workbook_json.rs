#![no_main]

use libfuzzer_sys::fuzz_target;
use locsync::infrastructure::JsonWorkbookReader;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Reading and parsing an upload must never panic
        if let Ok(workbook) = JsonWorkbookReader::read_str(content) {
            let _ = locsync::parse_workbook(&workbook);
        }
    }
});
