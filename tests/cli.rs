use std::fs;
use std::process::Command;

/// A bad `--start` is reported before the dataset is loaded, so nothing is
/// fetched or cached.
#[test]
fn bad_dates_fail_before_loading() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");

    for sub in [&["sample"][..], &["ngram", "--term", "covid", "--out", "covid.csv"][..]] {
        let out = Command::new(env!("CARGO_BIN_EXE_rtrend"))
            .args(sub)
            .args(["--start", "2020/01/01", "--no-progress"])
            .arg("--data-dir")
            .arg(&data)
            .env("RTREND_REMOTE_TEMPLATE", "http://127.0.0.1:9/{file}")
            .env("RTREND_FETCH_TIMEOUT_SECS", "2")
            .current_dir(tmp.path())
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(!out.status.success());
        assert!(stderr.contains("parsing date"), "{sub:?}: {stderr}");
        assert!(!stderr.contains("loading dataset"), "{sub:?}: {stderr}");
        assert!(!data.exists() || fs::read_dir(&data).unwrap().next().is_none());
    }
}
