use std::fmt::Write;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use expect_test::expect;
use packonly::{ArchiveHeader, IndexEntry, NoProgress, PackError, pack_directory};
use tempfile::TempDir;

fn utf8(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap()
}

fn write(root: &Utf8Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn parse_index(archive: &[u8]) -> (ArchiveHeader, Vec<IndexEntry>) {
    let header = ArchiveHeader::parse(archive[..ArchiveHeader::HEADER_LEN].try_into().unwrap());
    let entries = archive[ArchiveHeader::HEADER_LEN..]
        .chunks_exact(IndexEntry::ENTRY_LEN)
        .take(header.entry_count as usize)
        .map(|chunk| IndexEntry::parse(chunk.try_into().unwrap()))
        .collect();
    (header, entries)
}

fn list_entries(out: &mut impl Write, archive: &[u8]) {
    let (header, entries) = parse_index(archive);
    writeln!(out, "entries={}", header.entry_count).unwrap();
    for entry in entries {
        let name = entry.name.decode().replace(std::path::MAIN_SEPARATOR, "/");
        writeln!(out, "offset={} length={} name={name}", entry.offset, entry.length).unwrap();
    }
    writeln!(out, "total={}", archive.len()).unwrap();
}

fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = utf8(&dir);
    write(&root, "a.txt", &(0..30).collect::<Vec<u8>>());
    write(&root, "b.png", &[0xAB; 10]);
    write(&root, "シナリオ.txt", b"hello");
    write(&root, "bgm/op.ogg", &[0x11; 27]);
    dir
}

#[test]
fn packing_directory_works() {
    let input = sample_tree();
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("data.pd");

    let summary = pack_directory(utf8(&input), &output, NoProgress).unwrap();
    assert_eq!(summary.entry_count, 4);
    assert_eq!(summary.total_len, 720);

    let archive = fs::read(&output).unwrap();
    let mut out = String::new();
    list_entries(&mut out, &archive);
    expect![[r#"
        entries=4
        offset=648 length=30 name=a.txt
        offset=678 length=10 name=b.png
        offset=688 length=5 name=シナリオ.txt
        offset=693 length=27 name=bgm/op.ogg
        total=720
    "#]]
    .assert_eq(&out);
}

#[test]
fn archive_satisfies_layout_invariants() {
    let input = sample_tree();
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("data.pd");
    pack_directory(utf8(&input), &output, NoProgress).unwrap();

    let archive = fs::read(&output).unwrap();
    let (header, entries) = parse_index(&archive);
    assert!(header.validate_magic().is_ok());
    assert_eq!(header.entry_count as usize, entries.len());
    assert!(archive[8..64].iter().all(|&b| b == 0));
    assert_eq!(archive[68..72], [0; 4]);

    assert_eq!(entries[0].offset as usize, 72 + 144 * entries.len());
    for pair in entries.windows(2) {
        assert_eq!(pair[1].offset, pair[0].offset + pair[0].length);
    }
    let last = entries.last().unwrap();
    assert_eq!(archive.len() as u64, last.data_range().end);

    for i in 0..entries.len() {
        let record = &archive[72 + 144 * i..][..144];
        assert_eq!(record[132..136], [0; 4]);
        assert_eq!(record[140..144], [0; 4]);
    }
}

#[test]
fn payloads_are_obfuscated_by_name_and_length() {
    let input = sample_tree();
    let root = utf8(&input);
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("data.pd");
    pack_directory(&root, &output, NoProgress).unwrap();

    let archive = fs::read(&output).unwrap();
    let (_, entries) = parse_index(&archive);
    for entry in entries {
        let name = entry.name.decode().into_owned();
        let original = fs::read(root.join(&name)).unwrap();
        let range = entry.data_range();
        let mut packed = archive[range.start as usize..range.end as usize].to_vec();

        let flipped = !name.to_ascii_lowercase().ends_with(".png") && original.len() > 0x1A;
        if flipped {
            assert_eq!(packed[0x1A], original[0x1A] ^ 0xFF, "{name}");
            packed[0x1A] ^= 0xFF;
        }
        assert_eq!(packed, original, "{name}");
    }
}

#[test]
fn name_field_is_shift_jis() {
    let input = sample_tree();
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("data.pd");
    pack_directory(utf8(&input), &output, NoProgress).unwrap();

    let archive = fs::read(&output).unwrap();
    let record = &archive[72 + 144 * 2..][..128];
    let encoded = b"\x83V\x83i\x83\x8a\x83I.txt";
    assert_eq!(&record[..encoded.len()], encoded);
    assert!(record[encoded.len()..].iter().all(|&b| b == 0));
}

#[test]
fn long_names_are_truncated_with_terminator() {
    let dir = TempDir::new().unwrap();
    let root = utf8(&dir);
    let name = format!("{}.dat", "n".repeat(150));
    write(&root, &name, b"x");
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("long.pd");
    pack_directory(&root, &output, NoProgress).unwrap();

    let archive = fs::read(&output).unwrap();
    let record = &archive[72..72 + 144];
    assert!(record[..127].iter().all(|&b| b == b'n'));
    assert_eq!(record[127], 0);
}

#[cfg(unix)]
#[test]
fn symlinked_file_is_packed_with_target_contents() {
    let outside = TempDir::new().unwrap();
    let target = utf8(&outside).join("shared.ogg");
    let data = (0..40).collect::<Vec<u8>>();
    fs::write(&target, &data).unwrap();
    let input = TempDir::new().unwrap();
    std::os::unix::fs::symlink(&target, utf8(&input).join("se.ogg")).unwrap();

    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("se.pd");
    let summary = pack_directory(utf8(&input), &output, NoProgress).unwrap();
    assert_eq!(summary.total_len, 72 + 144 + 40);

    let archive = fs::read(&output).unwrap();
    let (_, entries) = parse_index(&archive);
    assert_eq!(entries[0].name.decode(), "se.ogg");
    assert_eq!(entries[0].length, 40);
    let mut expected = data;
    expected[0x1A] ^= 0xFF;
    assert_eq!(&archive[216..], &expected[..]);
}

#[test]
fn packing_is_deterministic() {
    let input = sample_tree();
    let out_dir = TempDir::new().unwrap();
    let first = utf8(&out_dir).join("first.pd");
    let second = utf8(&out_dir).join("second.pd");
    pack_directory(utf8(&input), &first, NoProgress).unwrap();
    pack_directory(utf8(&input), &second, NoProgress).unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn empty_directory_produces_no_archive() {
    let input = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let output = utf8(&out_dir).join("empty.pd");

    let err = pack_directory(utf8(&input), &output, NoProgress).unwrap_err();
    assert!(matches!(err, PackError::EmptyInput));
    assert!(!output.exists());
}

#[test]
fn missing_directory_produces_no_archive() {
    let out_dir = TempDir::new().unwrap();
    let root = utf8(&out_dir);
    let output = root.join("missing.pd");

    let err = pack_directory(root.join("missing"), &output, NoProgress).unwrap_err();
    assert!(matches!(err, PackError::InputNotFound(_)));
    assert!(!output.exists());
}
