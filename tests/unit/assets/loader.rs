use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "imagedraw_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 8, 7, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn both_strategies_decode_the_same_image() {
    let tmp = temp_dir("loader_both");
    std::fs::create_dir_all(&tmp).unwrap();
    let png = tmp.join("a.png");
    write_png(&png, 4, 3);

    let from_fs = load_from_filesystem(&png).unwrap();
    let from_mem = load_from_memory(&png).unwrap();
    assert_eq!((from_fs.width, from_fs.height), (4, 3));
    assert_eq!((from_mem.width, from_mem.height), (4, 3));
    assert_eq!(from_fs.rgba8_premul, from_mem.rgba8_premul);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn empty_and_missing_paths_are_invalid() {
    for strategy in [LoadStrategy::Filesystem, LoadStrategy::Memory] {
        let err = strategy.load(Path::new("")).unwrap_err();
        assert!(matches!(err, DrawError::InvalidPath(_)), "{err}");

        let err = strategy
            .load(Path::new("/definitely/not/here/x.png"))
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidPath(_)), "{err}");
    }
}

#[test]
fn directories_are_not_loadable_files() {
    let tmp = temp_dir("loader_dir");
    std::fs::create_dir_all(&tmp).unwrap();

    assert!(!check_file_exists(&tmp));
    let err = load_from_memory(&tmp).unwrap_err();
    assert!(matches!(err, DrawError::InvalidPath(_)));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn non_image_bytes_are_decode_failures() {
    let tmp = temp_dir("loader_garbage");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("not_an_image.png");
    std::fs::write(&path, b"hello").unwrap();

    let err = load_from_memory(&path).unwrap_err();
    assert!(matches!(err, DrawError::Decode(_)), "{err}");
    let err = load_from_filesystem(&path).unwrap_err();
    assert!(matches!(err, DrawError::Decode(_)), "{err}");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn strategy_parse_accepts_aliases() {
    assert_eq!(LoadStrategy::parse("memory").unwrap(), LoadStrategy::Memory);
    assert_eq!(LoadStrategy::parse("Stream").unwrap(), LoadStrategy::Memory);
    assert_eq!(
        LoadStrategy::parse(" filesystem ").unwrap(),
        LoadStrategy::Filesystem
    );
    assert!(matches!(
        LoadStrategy::parse("network"),
        Err(DrawError::Config(_))
    ));
    assert_eq!(LoadStrategy::default(), LoadStrategy::Memory);
}

#[test]
fn oversized_file_is_an_io_failure_before_buffering() {
    let tmp = temp_dir("loader_oversized");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("huge.png");
    // Sparse on common filesystems, so no real disk space is used.
    let f = std::fs::File::create(&path).unwrap();
    f.set_len(MAX_BUFFERED_FILE_BYTES + 1).unwrap();
    drop(f);

    let err = load_from_memory(&path).unwrap_err();
    assert!(matches!(err, DrawError::Io(_)), "{err}");

    std::fs::remove_dir_all(&tmp).ok();
}
