use clockradio_proto::prefs::{keys, AlarmTime, Preferences};
use serde_json::json;

#[test]
fn saved_values_load_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");

    let mut prefs = Preferences::load(&path);
    prefs.set(keys::ALARM_ENABLED, true);
    prefs.set(keys::ALARM_TIME, AlarmTime::new(6, 30).unwrap());
    prefs.set(keys::ALARM_CHANNEL, "Jazz");
    prefs.set(keys::RADIO_VOLUME, 65);
    prefs.save().unwrap();

    let loaded = Preferences::load(&path);
    assert_eq!(loaded.values(), prefs.values());
    assert!(loaded.bool(keys::ALARM_ENABLED));
    assert_eq!(loaded.alarm_time(keys::ALARM_TIME).to_string(), "06:30");
    assert_eq!(loaded.string(keys::ALARM_CHANNEL).as_deref(), Some("Jazz"));
    assert_eq!(loaded.int(keys::RADIO_VOLUME), 65);
}

#[test]
fn saved_file_is_flat_dotted_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut prefs = Preferences::load(&path);
    prefs.set(keys::ALARM_TIME, AlarmTime::new(7, 5).unwrap());
    prefs.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["alarm.time"], json!([7, 5]));
    assert_eq!(raw["volume.step"], json!(5));
}

#[test]
fn in_memory_save_is_noop() {
    let prefs = Preferences::in_memory();
    assert!(prefs.save().is_ok());
}
