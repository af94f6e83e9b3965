use std::fs;
use std::path::PathBuf;

/// Bytes of an installed font, preferring DejaVu Sans.
///
/// Tests that draw glyphs skip with a notice when no font is installed,
/// or fail if `GEN_WORDCLOUD_REQUIRE_FONT` is set.
pub fn system_font() -> Option<Vec<u8>> {
    let font = find_system_font();
    if font.is_none() {
        if std::env::var_os("GEN_WORDCLOUD_REQUIRE_FONT").is_some() {
            panic!("no usable system font found and GEN_WORDCLOUD_REQUIRE_FONT is set");
        }
        eprintln!("skipping: no usable system font installed");
    }
    font
}

fn find_system_font() -> Option<Vec<u8>> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let mut faces: Vec<_> = db.faces().filter(|f| f.index == 0).collect();
    faces.sort_by_key(|f| !f.families.iter().any(|(name, _)| name == "DejaVu Sans"));

    let font = faces.into_iter().find_map(|face| {
        db.with_face_data(face.id, |data, _| data.to_vec())
            .filter(|data| fontdue::Font::from_bytes(data.as_slice(), Default::default()).is_ok())
    });
    font
}

/// Fresh directory laid out the way the tool expects its working directory.
pub fn workdir(name: &str, en: &str, ja: &str, font: &[u8]) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stopwords.en.csv"), en).unwrap();
    fs::write(dir.join("stopwords.ja.csv"), ja).unwrap();
    fs::write(dir.join("HackGenConsoleNF-Bold.ttf"), font).unwrap();
    dir
}
