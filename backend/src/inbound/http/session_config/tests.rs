//! Unit tests for session configuration validation.

use super::*;
use rstest::rstest;
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'a'; len])?;
        Ok(Self { path })
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn options(key_file: PathBuf, allow_ephemeral: bool) -> SessionOptions {
    SessionOptions {
        key_file,
        allow_ephemeral,
        cookie_secure: true,
    }
}

fn missing_key_path() -> PathBuf {
    std::env::temp_dir().join(format!("missing-session-key-{}", Uuid::new_v4()))
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_long_key_file() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");

    let settings = session_settings(&options(key_file.path.clone(), false), BuildMode::Release)
        .expect("valid release settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_rejects_short_key() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN - 1).expect("key file");

    let err = expect_error(
        session_settings(&options(key_file.path.clone(), false), BuildMode::Release),
        "short key must be rejected",
    );

    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key() {
    let err = expect_error(
        session_settings(&options(missing_key_path(), false), BuildMode::Release),
        "missing key must be rejected",
    );

    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let err = expect_error(
        session_settings(&options(missing_key_path(), true), BuildMode::Release),
        "ephemeral keys must be rejected",
    );

    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(false)]
#[case(true)]
fn debug_generates_key_when_file_missing(#[case] allow_ephemeral: bool) {
    let settings = session_settings(&options(missing_key_path(), allow_ephemeral), BuildMode::Debug)
        .expect("debug builds fall back to a generated key");

    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_short_key() {
    let key_file = TempKeyFile::new(8).expect("key file");

    assert!(session_settings(&options(key_file.path.clone(), false), BuildMode::Debug).is_ok());
}

#[rstest]
fn same_key_material_derives_same_key() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file");
    let opts = options(key_file.path.clone(), false);

    let first = session_settings(&opts, BuildMode::Release).expect("first load");
    let second = session_settings(&opts, BuildMode::Release).expect("second load");

    assert_eq!(first.key.master(), second.key.master());
}
