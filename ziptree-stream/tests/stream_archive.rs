//! End-to-end tests for the streamed archive: every produced byte is parsed
//! back with an independent reader built from the public ZIP layout, and the
//! recovered entries are compared against the source objects.

use flate2::read::DeflateDecoder;
use std::collections::HashMap;
use std::io::Read;
use ziptree_core::{
    Crc32, DosDateTime, ObjectId, ObjectKind, ObjectStore, RawObject, Result, WalkControl,
    ZipTreeError,
};
use ziptree_stream::{EntryOutcome, SkipReason, ZipStreamer};

/// In-memory object store keyed by id; ids need not hash their content.
#[derive(Default)]
struct MockStore {
    objects: HashMap<ObjectId, RawObject>,
}

impl MockStore {
    fn insert_blob(&mut self, hex: &str, data: &[u8]) -> ObjectId {
        let id = ObjectId::from_hex(hex).unwrap();
        self.objects.insert(
            id,
            RawObject {
                kind: ObjectKind::Blob,
                data: data.to_vec(),
            },
        );
        id
    }
}

impl ObjectStore for MockStore {
    fn read(&self, id: &ObjectId) -> Result<RawObject> {
        self.objects
            .get(id)
            .cloned()
            .ok_or_else(|| ZipTreeError::object_missing(*id))
    }
}

fn oid(fill: u8) -> ObjectId {
    ObjectId::from_raw([fill; 20])
}

fn stamp() -> DosDateTime {
    DosDateTime::from_unix(1_000_000_000)
}

// ---- minimal standard-compliant reader ------------------------------------

fn rd_u16(b: &[u8], o: usize) -> u16 {
    u16::from_le_bytes([b[o], b[o + 1]])
}

fn rd_u32(b: &[u8], o: usize) -> u32 {
    u32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]])
}

struct LocalView {
    offset: u64,
    method: u16,
    crc32: u32,
    uncompressed_size: u32,
    name: Vec<u8>,
    payload: Vec<u8>,
}

impl LocalView {
    fn content(&self) -> Vec<u8> {
        if self.method == 8 {
            let mut out = Vec::new();
            DeflateDecoder::new(&self.payload[..])
                .read_to_end(&mut out)
                .expect("deflated payload must inflate");
            out
        } else {
            assert_eq!(self.method, 0, "only methods 0 and 8 are ever emitted");
            self.payload.clone()
        }
    }
}

struct CentralView {
    method: u16,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    local_offset: u32,
    name: Vec<u8>,
}

struct Parsed {
    locals: Vec<LocalView>,
    centrals: Vec<CentralView>,
    trailer_entries: (u16, u16),
    dir_size: u32,
    dir_offset: u32,
    comment: Vec<u8>,
}

fn parse_archive(b: &[u8]) -> Parsed {
    let mut pos = 0usize;

    let mut locals = Vec::new();
    while pos + 4 <= b.len() && rd_u32(b, pos) == 0x0403_4B50 {
        let method = rd_u16(b, pos + 8);
        let crc32 = rd_u32(b, pos + 14);
        let compressed = rd_u32(b, pos + 18) as usize;
        let uncompressed_size = rd_u32(b, pos + 22);
        let name_len = rd_u16(b, pos + 26) as usize;
        let extra_len = rd_u16(b, pos + 28) as usize;
        assert_eq!(extra_len, 0, "ziptree never writes extra fields");
        let name = b[pos + 30..pos + 30 + name_len].to_vec();
        let data = pos + 30 + name_len;
        locals.push(LocalView {
            offset: pos as u64,
            method,
            crc32,
            uncompressed_size,
            name,
            payload: b[data..data + compressed].to_vec(),
        });
        pos = data + compressed;
    }

    let dir_start = pos;
    let mut centrals = Vec::new();
    while pos + 4 <= b.len() && rd_u32(b, pos) == 0x0201_4B50 {
        let name_len = rd_u16(b, pos + 28) as usize;
        let extra_len = rd_u16(b, pos + 30) as usize;
        let comment_len = rd_u16(b, pos + 32) as usize;
        centrals.push(CentralView {
            method: rd_u16(b, pos + 10),
            crc32: rd_u32(b, pos + 16),
            compressed_size: rd_u32(b, pos + 20),
            uncompressed_size: rd_u32(b, pos + 24),
            local_offset: rd_u32(b, pos + 42),
            name: b[pos + 46..pos + 46 + name_len].to_vec(),
        });
        pos += 46 + name_len + extra_len + comment_len;
    }

    assert_eq!(rd_u32(b, pos), 0x0605_4B50, "trailer must follow the directory");
    let trailer_entries = (rd_u16(b, pos + 8), rd_u16(b, pos + 10));
    let dir_size = rd_u32(b, pos + 12);
    let dir_offset = rd_u32(b, pos + 16);
    let comment_len = rd_u16(b, pos + 20) as usize;
    let comment = b[pos + 22..pos + 22 + comment_len].to_vec();
    assert_eq!(pos + 22 + comment_len, b.len(), "no trailing garbage");

    assert_eq!(dir_offset as usize, dir_start);
    assert_eq!(dir_size as usize, pos - dir_start);

    Parsed {
        locals,
        centrals,
        trailer_entries,
        dir_size,
        dir_offset,
        comment,
    }
}

// ---- scenarios -------------------------------------------------------------

#[test]
fn empty_tree_is_a_lone_trailer() {
    let streamer = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    let out = streamer.finish(None).unwrap();

    assert_eq!(out.len(), 22);
    let parsed = parse_archive(&out);
    assert!(parsed.locals.is_empty());
    assert!(parsed.centrals.is_empty());
    assert_eq!(parsed.trailer_entries, (0, 0));
    assert_eq!(parsed.dir_size, 0);
    assert_eq!(parsed.dir_offset, 0);
    assert!(parsed.comment.is_empty());
}

#[test]
fn base_dir_and_small_file() {
    let mut store = MockStore::default();
    let blob = store.insert_blob("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", b"hi");
    let tree = oid(0x22);
    let commit = oid(0x33);

    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    let out = z.write_entry(&store, &tree, b"", b"proj", 0o040777).unwrap();
    assert_eq!(out, EntryOutcome::Directory);
    let out = z
        .write_entry(&store, &blob, b"proj/", b"a.txt", 0o100644)
        .unwrap();
    assert_eq!(out, EntryOutcome::File);
    let bytes = z.finish(Some(&commit)).unwrap();

    let parsed = parse_archive(&bytes);
    assert_eq!(parsed.trailer_entries, (2, 2));
    assert_eq!(parsed.locals.len(), 2);
    assert_eq!(parsed.centrals.len(), 2);

    assert_eq!(parsed.locals[0].name, b"proj/");
    assert_eq!(parsed.locals[0].uncompressed_size, 0);
    assert_eq!(parsed.locals[0].crc32, 0);

    assert_eq!(parsed.locals[1].name, b"proj/a.txt");
    assert_eq!(parsed.locals[1].uncompressed_size, 2);
    assert_eq!(parsed.locals[1].crc32, Crc32::compute(b"hi"));
    // Two bytes cannot shrink: stored, payload verbatim.
    assert_eq!(parsed.locals[1].method, 0);
    assert_eq!(parsed.locals[1].payload, b"hi");

    assert_eq!(parsed.comment, commit.to_hex().as_bytes());
}

#[test]
fn central_offsets_replay_the_stream() {
    let mut store = MockStore::default();
    let a = store.insert_blob(&"11".repeat(20), b"alpha contents");
    let b = store.insert_blob(&"22".repeat(20), &b"beta beta beta ".repeat(100));
    let c = store.insert_blob(&"33".repeat(20), b"");

    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    z.write_entry(&store, &oid(9), b"", b"dir", 0o040000).unwrap();
    z.write_entry(&store, &a, b"dir/", b"a", 0o100644).unwrap();
    z.write_entry(&store, &b, b"dir/", b"b", 0o100755).unwrap();
    z.write_entry(&store, &c, b"dir/", b"empty", 0o100644).unwrap();
    let bytes = z.finish(None).unwrap();

    let parsed = parse_archive(&bytes);
    assert_eq!(parsed.locals.len(), 4);
    assert_eq!(parsed.centrals.len(), 4);
    for (local, central) in parsed.locals.iter().zip(&parsed.centrals) {
        assert_eq!(u64::from(central.local_offset), local.offset);
        assert_eq!(central.name, local.name);
        assert_eq!(central.method, local.method);
        assert_eq!(central.crc32, local.crc32);
        assert_eq!(central.uncompressed_size, local.uncompressed_size);
        assert_eq!(central.compressed_size as usize, local.payload.len());
    }

    // Round-trip: the recovered tuples match the source tree.
    assert_eq!(parsed.locals[1].content(), b"alpha contents");
    assert_eq!(parsed.locals[2].content(), b"beta beta beta ".repeat(100));
    assert_eq!(parsed.locals[3].content(), b"");
    assert!(parsed.locals[0].name.ends_with(b"/"));
}

#[test]
fn compressible_file_is_deflated() {
    let mut store = MockStore::default();
    let data = b"the same line of text over and over\n".repeat(200);
    let blob = store.insert_blob(&"ab".repeat(20), &data);

    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    z.write_entry(&store, &blob, b"", b"big.txt", 0o100644)
        .unwrap();
    let bytes = z.finish(None).unwrap();

    let parsed = parse_archive(&bytes);
    let entry = &parsed.locals[0];
    assert_eq!(entry.method, 8);
    assert!((entry.payload.len() as u32) < entry.uncompressed_size);
    assert_eq!(entry.content(), data);
    assert_eq!(entry.crc32, Crc32::compute(&data));
}

#[test]
fn level_zero_stores_everything() {
    let mut store = MockStore::default();
    let data = b"compressible compressible compressible\n".repeat(100);
    let blob = store.insert_blob(&"cd".repeat(20), &data);

    let mut z = ZipStreamer::new(Vec::new(), 0, stamp()).unwrap();
    z.write_entry(&store, &oid(1), b"", b"d", 0o040000).unwrap();
    z.write_entry(&store, &blob, b"d/", b"f", 0o100644).unwrap();
    let bytes = z.finish(None).unwrap();

    for entry in parse_archive(&bytes).locals {
        assert_eq!(entry.method, 0);
    }
}

#[test]
fn same_inputs_give_identical_bytes() {
    let mut store = MockStore::default();
    let blob = store.insert_blob(&"ef".repeat(20), b"deterministic content here");

    let build = |store: &MockStore| {
        let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
        z.write_entry(store, &oid(7), b"", b"proj", 0o040777).unwrap();
        z.write_entry(store, &blob, b"proj/", b"f.txt", 0o100644)
            .unwrap();
        z.finish(Some(&oid(8))).unwrap()
    };

    assert_eq!(build(&store), build(&store));
}

#[test]
fn oversized_path_skips_entry_and_continues() {
    let mut store = MockStore::default();
    let blob = store.insert_blob(&"0f".repeat(20), b"payload");
    let base = vec![b'x'; 65_530];

    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    let outcome = z
        .write_entry(&store, &blob, &base, b"toolong.txt", 0o100644)
        .unwrap();
    let EntryOutcome::Skipped(SkipReason::PathTooLong { len, .. }) = &outcome else {
        panic!("expected a path-too-long skip, got {outcome:?}");
    };
    assert_eq!(*len, 65_541);
    assert_eq!(outcome.control(), WalkControl::Continue);

    // A path of exactly 65535 bytes is still fine.
    let base = vec![b'x'; 65_535 - 5];
    let ok = z.write_entry(&store, &blob, &base, b"t.txt", 0o100644).unwrap();
    assert_eq!(ok, EntryOutcome::File);

    let bytes = z.finish(None).unwrap();
    let parsed = parse_archive(&bytes);
    assert_eq!(parsed.trailer_entries, (1, 1));
    assert_eq!(parsed.locals.len(), 1);
    assert_eq!(parsed.locals[0].name.len(), 65_535);
}

#[test]
fn unsupported_mode_skips_and_stops_descent() {
    let store = MockStore::default();
    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();

    let outcome = z
        .write_entry(&store, &oid(5), b"", b"link", 0o120000)
        .unwrap();
    let EntryOutcome::Skipped(reason) = &outcome else {
        panic!("expected an unsupported-mode skip, got {outcome:?}");
    };
    let SkipReason::UnsupportedMode { mode, .. } = reason else {
        panic!("expected an unsupported-mode skip, got {reason:?}");
    };
    assert_eq!(*mode, 0o120000);
    assert_eq!(outcome.control(), WalkControl::Stop);
    // The diagnostic names the path and the object.
    let text = reason.to_string();
    assert!(text.contains("link"));
    assert!(text.contains(&oid(5).to_hex()));

    let bytes = z.finish(None).unwrap();
    assert_eq!(parse_archive(&bytes).trailer_entries, (0, 0));
}

#[test]
fn missing_blob_is_fatal() {
    let store = MockStore::default();
    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    let err = z
        .write_entry(&store, &oid(0xAB), b"", b"gone", 0o100644)
        .unwrap_err();
    assert!(matches!(err, ZipTreeError::ObjectMissing { .. }));
}

#[test]
fn non_blob_object_for_file_entry_is_fatal() {
    let mut store = MockStore::default();
    let id = oid(0x44);
    store.objects.insert(
        id,
        RawObject {
            kind: ObjectKind::Tree,
            data: Vec::new(),
        },
    );
    let mut z = ZipStreamer::new(Vec::new(), 6, stamp()).unwrap();
    let err = z.write_entry(&store, &id, b"", b"f", 0o100644).unwrap_err();
    assert!(matches!(err, ZipTreeError::ObjectCorrupt { .. }));
}
