use super::*;
use crate::storage::{MemoryStorage, Storage};
use std::path::Path;

fn custom(id: &str) -> Track {
    Track::new(id, id, format!("blob:jukon/{id}"), TrackOrigin::Custom)
}

fn exts() -> Vec<String> {
    vec!["mp3".into(), "wav".into(), "ogg".into(), "m4a".into()]
}

#[test]
fn builtin_tracks_get_default_prefixed_ids() {
    let tracks = builtin_tracks([("Demo 1", "/music/demo1.mp3"), ("Demo 2", "/music/demo2.mp3")]);
    assert_eq!(tracks[0].id, "default-1");
    assert_eq!(tracks[1].id, "default-2");
    assert!(tracks.iter().all(Track::is_builtin));
}

#[test]
fn track_list_keeps_builtins_first_and_ids_unique() {
    let mut list = TrackList::new();
    assert_eq!(list.push(custom("custom-a")).unwrap(), 0);
    let builtin = builtin_tracks([("Demo", "/music/demo.mp3")]).remove(0);
    assert_eq!(list.push(builtin).unwrap(), 0);
    assert_eq!(list.get(1).unwrap().id, "custom-a");

    assert!(list.push(custom("custom-a")).is_err());
    assert_eq!(list.len(), 2);
}

#[test]
fn track_list_refuses_to_remove_builtins() {
    let mut list = TrackList::from_tracks(
        builtin_tracks([("Demo", "/music/demo.mp3")])
            .into_iter()
            .chain([custom("custom-a")]),
    );
    assert!(list.remove(0).is_none());
    assert_eq!(list.remove(1).unwrap().id, "custom-a");
    assert_eq!(list.len(), 1);
}

#[test]
fn default_prefixed_id_counts_as_builtin_even_if_tagged_custom() {
    let t = custom("default-9");
    assert!(t.is_builtin());
}

#[test]
fn custom_tracks_roundtrip_through_storage_without_origin() {
    let mut storage = MemoryStorage::new();
    let tracks = [custom("custom-1"), custom("custom-2")];
    save_custom_tracks(&mut storage, tracks.iter()).unwrap();

    let raw = storage.get(CUSTOM_TRACKS_KEY).unwrap();
    assert!(raw.contains("\"id\":\"custom-1\""));
    assert!(!raw.contains("origin"));

    let loaded = load_custom_tracks(&storage);
    assert_eq!(loaded, tracks.to_vec());
}

#[test]
fn load_custom_tracks_ignores_malformed_json_and_reserved_ids() {
    let mut storage = MemoryStorage::new();
    storage.set(CUSTOM_TRACKS_KEY, "{oops".to_string()).unwrap();
    assert!(load_custom_tracks(&storage).is_empty());

    storage
        .set(
            CUSTOM_TRACKS_KEY,
            r#"[{"id":"default-1","name":"x","src":"y"},{"id":"custom-1","name":"a","src":"b"}]"#.to_string(),
        )
        .unwrap();
    let loaded = load_custom_tracks(&storage);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "custom-1");
}

#[test]
fn parse_listing_rejects_malformed_entries_individually() {
    let body = r#"[
        {"name": "one.mp3", "path": "public/music/one.mp3", "type": "file"},
        {"name": ""},
        {"size": 12},
        {"name": 42},
        {"name": "nested", "type": "dir"},
        {"name": "two.ogg"}
    ]"#;
    let entries = parse_listing(body).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["one.mp3", "two.ogg"]);
}

#[test]
fn parse_listing_requires_an_array() {
    assert!(matches!(parse_listing(r#"{"message":"Not Found"}"#), Err(ListingError::NotAList)));
    assert!(matches!(parse_listing("not json"), Err(ListingError::Json(_))));
}

#[test]
fn tracks_from_listing_filters_extensions_and_maps_into_music_dir() {
    let entries = parse_listing(
        r#"[
            {"name": "Intro.MP3"},
            {"name": "cover.jpg"},
            {"name": "sub/loop.wav"},
            {"name": "readme.md"},
            {"name": "voice.m4a"}
        ]"#,
    )
    .unwrap();

    let list = tracks_from_listing(&entries, "/music/", &exts());
    let got: Vec<(&str, &str, &str)> = list
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str(), t.src.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("remote-Intro.MP3", "Intro", "/music/Intro.MP3"),
            ("remote-loop.wav", "loop", "/music/loop.wav"),
            ("remote-voice.m4a", "voice", "/music/voice.m4a"),
        ]
    );
    assert!(list.iter().all(|t| t.origin == TrackOrigin::Remote));
}

#[test]
fn tracks_from_listing_drops_duplicate_base_names() {
    let entries = parse_listing(r#"[{"name": "a/x.mp3"}, {"name": "b/x.mp3"}]"#).unwrap();
    let list = tracks_from_listing(&entries, "/music", &exts());
    assert_eq!(list.len(), 1);
}

#[test]
fn upload_filter_accepts_audio_only() {
    assert!(is_audio_file(Path::new("/tmp/song.MP3")));
    assert!(is_audio_file(Path::new("/tmp/song.flac")));
    assert!(is_audio_file(Path::new("/tmp/song.m4a")));
    assert!(!is_audio_file(Path::new("/tmp/cover.png")));
    assert!(!is_audio_file(Path::new("/tmp/noext")));
}

#[test]
fn track_name_strips_last_extension() {
    assert_eq!(track_name_from_file(Path::new("/tmp/My Song.mp3")), "My Song");
    assert_eq!(track_name_from_file(Path::new("/tmp/a.b.ogg")), "a.b");
}
