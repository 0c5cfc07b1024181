use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a zip archive with the given entries, deflating every other one
/// so both storage methods are exercised.
pub fn write_archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (i, (entry_name, data)) in entries.iter().enumerate() {
        let method = if i % 2 == 0 {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);
        writer.start_file(*entry_name, options).unwrap();
        writer.write_all(data).unwrap();
    }

    let path = dir.join(name);
    fs::write(&path, writer.finish().unwrap().into_inner()).unwrap();
    path
}

pub fn sample_ipa(dir: &Path) -> PathBuf {
    write_archive(
        dir,
        "Game.ipa",
        &[
            ("Payload/Game.app/Info.plist", b"<plist/>"),
            ("Payload/Game.app/main.rsb", b"main payload"),
            ("Payload/Game.app/res/ui.rsb", b"ui payload"),
            ("Payload/Game.app/res/UPPER.RSB", b"not matched"),
            ("Payload/Game.app/audio/music.rsb", b"music payload"),
        ],
    )
}
