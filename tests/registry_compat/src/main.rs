fn main() {
    println!("Run `cargo test -p registry-compat` to execute registry compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use steamshelf_launcher::LaunchSpec;
    use steamshelf_shortcuts::{
        Registry, ShortcutConfig, ShortcutError, generate_app_id, upsert_shortcut,
    };
    use steamshelf_vdf::{Value, decode, encode};

    /// Builds registry bytes the way Steam itself writes them: mixed key
    /// casing across entries, fields this tool does not model, and one
    /// entry missing the `tags` map entirely.
    fn steam_fixture() -> Vec<u8> {
        let mut b: Vec<u8> = Vec::new();
        b.extend_from_slice(b"\x00shortcuts\x00");

        // Slot 0: full modern entry with foreign fields.
        b.extend_from_slice(b"\x000\x00");
        b.extend_from_slice(b"\x02appid\x00");
        b.extend_from_slice(&111i32.to_le_bytes());
        b.extend_from_slice(b"\x01AppName\x00Foo\x00");
        b.extend_from_slice(b"\x01Exe\x00\"/a/Foo.sh\"\x00");
        b.extend_from_slice(b"\x01StartDir\x00\"/a\"\x00");
        b.extend_from_slice(b"\x01icon\x00\x00");
        b.extend_from_slice(b"\x01LaunchOptions\x00\x00");
        b.extend_from_slice(b"\x02IsHidden\x00");
        b.extend_from_slice(&0i32.to_le_bytes());
        b.extend_from_slice(b"\x02LastPlayTime\x00");
        b.extend_from_slice(&1_600_000_000i32.to_le_bytes());
        b.extend_from_slice(b"\x01FlatpakAppID\x00\x00");
        b.extend_from_slice(b"\x02DevkitOverrideAppID\x00");
        b.extend_from_slice(&0i32.to_le_bytes());
        b.extend_from_slice(b"\x00tags\x00");
        b.extend_from_slice(b"\x010\x00favorite\x00");
        b.push(0x08);
        b.push(0x08);

        // Slot 1: legacy lowercase entry, no tags map.
        b.extend_from_slice(b"\x001\x00");
        b.extend_from_slice(b"\x02appid\x00");
        b.extend_from_slice(&222i32.to_le_bytes());
        b.extend_from_slice(b"\x01appname\x00Old Game\x00");
        b.extend_from_slice(b"\x01exe\x00\"/old/game\"\x00");
        b.extend_from_slice(b"\x01startdir\x00\"/old\"\x00");
        b.push(0x08);

        b.push(0x08); // end shortcuts
        b.push(0x08); // end root
        b
    }

    /// Encoded bytes of each slot map, keyed by slot key text.
    fn slot_bytes(data: &[u8]) -> Vec<(String, Vec<u8>)> {
        let root = decode(data).unwrap();
        let shortcuts = root.get("shortcuts").and_then(Value::as_map).unwrap();
        shortcuts
            .iter()
            .map(|(k, v)| {
                let m = v.as_map().unwrap();
                (k.to_str_lossy().into_owned(), encode(m))
            })
            .collect()
    }

    fn config(name: &str, exe: &str) -> ShortcutConfig {
        ShortcutConfig {
            name: name.into(),
            exe: exe.into(),
            ..Default::default()
        }
    }

    #[test]
    fn steam_fixture_round_trips_byte_identical() {
        let data = steam_fixture();
        let root = decode(&data).unwrap();
        assert_eq!(encode(&root), data);
    }

    #[test]
    fn untouched_slots_survive_upsert_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");
        fs::write(&path, steam_fixture()).unwrap();

        let before = slot_bytes(&steam_fixture());
        let outcome = upsert_shortcut(&path, &config("New Game", "/n/new.sh")).unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.slot, 2);

        let after = slot_bytes(&fs::read(&path).unwrap());
        assert_eq!(after.len(), 3);
        // Slots "0" and "1" are byte-identical and keep their keys.
        assert_eq!(&after[..2], &before[..]);
    }

    #[test]
    fn absent_file_upsert_creates_slot_zero_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("shortcuts.vdf");

        let outcome = upsert_shortcut(&path, &config("Foo", "/a/Foo.sh")).unwrap();
        assert_eq!(outcome.slot, 0);
        assert!(outcome.created);
        assert!(outcome.warnings.is_empty());

        let root = decode(&fs::read(&path).unwrap()).unwrap();
        let shortcuts = root.get("shortcuts").and_then(Value::as_map).unwrap();
        assert_eq!(shortcuts.len(), 1);
        let slot = shortcuts.get("0").and_then(Value::as_map).unwrap();

        assert_eq!(
            slot.get("appid").and_then(Value::as_int),
            Some(outcome.app_id as i32)
        );
        assert_eq!(
            slot.get("Exe").and_then(Value::as_str).unwrap().as_bytes(),
            b"\"/a/Foo.sh\""
        );
        // Boolean defaults: overlay and desktop config on, the rest off.
        assert_eq!(slot.get("AllowOverlay").and_then(Value::as_int), Some(1));
        assert_eq!(
            slot.get("AllowDesktopConfig").and_then(Value::as_int),
            Some(1)
        );
        assert_eq!(slot.get("IsHidden").and_then(Value::as_int), Some(0));
        assert_eq!(slot.get("OpenVR").and_then(Value::as_int), Some(0));
        assert_eq!(slot.get("Devkit").and_then(Value::as_int), Some(0));
        assert_eq!(slot.get("LastPlayTime").and_then(Value::as_int), Some(0));
        assert!(slot.get("tags").and_then(Value::as_map).is_some());
    }

    #[test]
    fn same_identity_update_reuses_slot_and_preserves_playtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");
        fs::write(&path, steam_fixture()).unwrap();

        // Seed a slot whose appid we control, then update it.
        let first = upsert_shortcut(&path, &config("Foo", "/a/Foo.sh")).unwrap();

        // Steam bumps playtime between our runs.
        let reg = Registry::load(&path).unwrap();
        let slot_count = reg.shortcuts().len();
        let patched = patch_last_play_time(&reg.to_bytes(), first.app_id, 1_700_000_000);
        fs::write(&path, patched).unwrap();

        let updated = upsert_shortcut(
            &path,
            &ShortcutConfig {
                launch_options: "--flag".into(),
                ..config("Foo", "/a/Foo.sh")
            },
        )
        .unwrap();
        assert_eq!(updated.app_id, first.app_id);
        assert_eq!(updated.slot, first.slot);
        assert!(!updated.created);

        let reg = Registry::load(&path).unwrap();
        let shortcuts = reg.shortcuts();
        assert_eq!(shortcuts.len(), slot_count);
        let record = shortcuts
            .iter()
            .find(|s| s.app_id == first.app_id)
            .unwrap();
        assert_eq!(record.launch_options, "--flag");
        assert_eq!(record.last_play_time, 1_700_000_000);
    }

    /// Rewrites `LastPlayTime` for the slot holding `app_id` via the tree
    /// API, returning re-encoded bytes.
    fn patch_last_play_time(data: &[u8], app_id: u32, value: i32) -> Vec<u8> {
        let mut root = decode(data).unwrap();
        let shortcuts = root.get_mut("shortcuts").and_then(Value::as_map_mut).unwrap();
        for index in 0..shortcuts.len() {
            let Some((_, v)) = shortcuts.get_index_mut(index) else {
                break;
            };
            let Some(slot) = v.as_map_mut() else { continue };
            if slot.get("appid").and_then(Value::as_int) == Some(app_id as i32) {
                if let Some(v) = slot.get_mut("LastPlayTime") {
                    *v = Value::Int(value);
                }
            }
        }
        encode(&root)
    }

    #[test]
    fn repeated_upserts_keep_slots_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");

        for i in 0..5 {
            let outcome =
                upsert_shortcut(&path, &config(&format!("G{i}"), &format!("/g/{i}.sh"))).unwrap();
            assert_eq!(outcome.slot, i);
        }

        let root = decode(&fs::read(&path).unwrap()).unwrap();
        let shortcuts = root.get("shortcuts").and_then(Value::as_map).unwrap();
        let keys: Vec<String> = shortcuts
            .iter()
            .map(|(k, _)| k.to_str_lossy().into_owned())
            .collect();
        assert_eq!(keys, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn truncated_registry_is_a_decode_error_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.vdf");
        let fixture = steam_fixture();
        let truncated = &fixture[..20];
        fs::write(&path, truncated).unwrap();

        let result = upsert_shortcut(&path, &config("Foo", "/a/Foo.sh"));
        assert!(matches!(result, Err(ShortcutError::Vdf(_))));
        assert_eq!(fs::read(&path).unwrap(), truncated);
    }

    #[test]
    fn generated_script_becomes_the_shortcut_exe() {
        let dir = tempfile::tempdir().unwrap();
        let scripts_dir = dir.path().join("scripts");
        let registry_path = dir.path().join("shortcuts.vdf");

        let spec = LaunchSpec {
            game_exe: "/games/Foo/Foo.exe".into(),
            game_id: Some("umu-620".into()),
            prefix: Some("/prefixes/foo".into()),
            ..Default::default()
        };
        let script =
            steamshelf_launcher::generate(&spec, Path::new("/opt/umu/umu-run"), &scripts_dir)
                .unwrap();
        assert_eq!(script, scripts_dir.join("umu-620.sh"));

        let outcome = upsert_shortcut(
            &registry_path,
            &config("Foo", &script.to_string_lossy()),
        )
        .unwrap();

        let quoted = format!("\"{}\"", script.display());
        assert_eq!(outcome.app_id, generate_app_id(&quoted, "Foo"));

        let reg = Registry::load(&registry_path).unwrap();
        let shortcuts = reg.shortcuts();
        assert_eq!(shortcuts[0].exe, quoted);
        assert_eq!(shortcuts[0].start_dir, format!("\"{}\"", scripts_dir.display()));
    }
}
